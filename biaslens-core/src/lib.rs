//! Core of biaslens: locating critic excerpts in an answer and rendering the
//! answer with those excerpts highlighted.
//!
//! Nothing here touches the terminal. The `biaslens` binary owns the UI and
//! drives this crate through [`turn::Conversation`] and [`provider::run_turn`].

pub mod critique;
pub mod error;
pub mod inline;
pub mod locate;
pub mod metrics;
pub mod panel;
pub mod prompts;
pub mod provider;
pub mod resolve;
pub mod splice;
pub mod turn;
pub mod types;

pub use error::{Error, ProviderError, Result};
pub use types::{Critique, CritiqueSegment, IssueType, Severity, TextRange};
