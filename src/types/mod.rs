//! Public types for the Sentiq API.

mod context;
mod generation;
mod request;
mod task;

pub use context::CallContext;
pub use generation::{Attempt, FAILURE_SENTINEL, Failure, Generation, Source};
pub use request::GenerationRequest;
pub use task::{ProviderId, Task};
