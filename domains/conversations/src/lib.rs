//! Conversations domain: per-chat flow state and the engine that drives it

pub mod domain;
pub mod engine;
pub mod error;
pub mod repository;

// Re-export domain types at the crate root for convenience
pub use domain::flows::StepSpec;
pub use domain::prompts::{FLOW_CALLBACK_PREFIX, REQUIRE_AUTH};
pub use domain::state::{CardChoice, ConversationState, Field, Flow, FlowStep};
pub use domain::validation::{Rule, ValidationError};

pub use engine::{ConversationEngine, InputOutcome};
pub use error::{EntryError, FlowCommitError};

// Re-export repository types
pub use repository::{ConversationStore, InMemoryConversationStore};
