//! Refines a prompt through an OpenAI compatible completion API and wraps the
//! original and refined text in a small JSON document.

pub mod api;
pub mod config;
pub mod record;
pub mod session;
#[cfg(test)]
mod test_support;

pub use api::{ApiClient, RefineError, RefineOutcome};
pub use config::Config;
pub use record::{Metadata, PromptRecord};
pub use session::{save_document, Session, SessionSummary};
