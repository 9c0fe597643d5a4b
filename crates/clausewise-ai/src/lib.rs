//! Suggestion engine seam: clause revisions are produced by an opaque async
//! source and delivered back to the clause store keyed by clause id.

mod broker;
mod scripted;

pub use broker::{SuggestionBroker, SuggestionError, SuggestionRequest, SuggestionSource};
pub use scripted::ScriptedSuggestions;
