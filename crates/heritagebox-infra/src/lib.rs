//! Concrete adapters for the HeritageBox chat backend's upstream
//! capabilities: reply generation (OpenAI), team messaging (Slack),
//! product pricing (Airtable), and card charging (Stripe), plus
//! environment configuration.
//!
//! Every adapter is constructed with optional credentials and degrades to
//! a typed "not configured" error instead of failing startup.

pub mod airtable;
pub mod config;
pub mod llm;
pub mod slack;
pub mod stripe;
