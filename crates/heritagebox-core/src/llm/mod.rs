//! Reply-generation boundary.

pub mod provider;

pub use provider::LlmProvider;
