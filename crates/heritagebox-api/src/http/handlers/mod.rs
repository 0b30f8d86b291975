//! HTTP request handlers.

pub mod chat;
pub mod handoff;
pub mod payment;
pub mod poll;
pub mod slack;
