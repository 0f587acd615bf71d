//! Backend abstraction, routing and answer extraction.

pub mod backend;
pub mod extract;
pub mod model;
pub mod router;
pub mod service;

pub use backend::{Backend, NoProgress, ProgressSink};
pub use extract::extract_last_code_block;
pub use model::ModelId;
pub use router::{BackendMode, LlmBackend, resolve_model};
pub use service::{GenerationService, NO_CHANGES_MESSAGE};
