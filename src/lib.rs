//! Sentiq - generation request gateway
//!
//! Turns a prompt into generated text by coordinating a shared token-bucket
//! rate limiter, a content-addressed response cache, strict-JSON prompt
//! wrapping and failover across two interchangeable providers (Gemini as
//! primary, Groq as secondary).
//!
//! # Example
//!
//! ```rust,no_run
//! use sentiq::{CallContext, Generation, GenerationRequest, Sentiq};
//!
//! #[tokio::main]
//! async fn main() -> sentiq::Result<()> {
//!     let gateway = Sentiq::builder()
//!         .gemini(std::env::var("GEMINI_API_KEY").ok())
//!         .groq(std::env::var("GROQ_API_KEY").ok())
//!         .build()?;
//!
//!     let request = GenerationRequest::new("Rewrite: led a team of 4", "achievement_rewrite");
//!     match gateway.generate(&request, &CallContext::new()).await {
//!         Generation::Text { text, source } => println!("{text} ({source:?})"),
//!         Generation::Failed(failure) => {
//!             for attempt in failure.attempts {
//!                 eprintln!("{}: {}", attempt.name, attempt.error);
//!             }
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Legacy surface
//!
//! Callers that expect a plain string can use
//! [`Gateway::call_llm_router`], which returns [`FAILURE_SENTINEL`] when
//! every provider fails.

pub mod cache;
pub mod config;
pub mod error;
pub mod gateway;
pub mod providers;
pub mod ratelimit;
pub mod telemetry;
pub mod types;

/// Crate version, as reported by the CLI.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

// Re-export main types at crate root
pub use cache::{CacheKey, ResponseCache};
pub use config::Config;
pub use error::{ErrorKind, Result, SentiqError};
pub use gateway::{Gateway, GatewayBuilder, Sentiq};
pub use providers::TextProvider;
pub use ratelimit::{RateLimitScope, TokenBucket};
pub use types::{
    Attempt, CallContext, FAILURE_SENTINEL, Failure, Generation, GenerationRequest, ProviderId,
    Source, Task,
};
