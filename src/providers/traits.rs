//! Provider capability trait.
//!
//! Both provider slots implement one capability: send a prompt to a model
//! and return plain text. Each adapter is responsible, in order, for
//!
//! 1. checking its own credentials (`Configuration` if absent),
//! 2. taking a token from its rate limiter (`RateLimited` if denied),
//! 3. performing the remote call under the caller's [`CallContext`]
//!    (remote-class errors on transport, protocol, timeout or cancellation).
//!
//! The gateway treats every error from `invoke` the same way: log it and
//! move on to the next provider.
//!
//! # Example
//!
//! ```ignore
//! async fn invoke(&self, prompt: &str, model: &str, ctx: &CallContext) -> Result<String> {
//!     let key = self.api_key()?;
//!     ratelimit::admit(&self.limiter, self.name())?;
//!     ctx.run(self.send(key, prompt, model)).await
//! }
//! ```

use async_trait::async_trait;

use crate::Result;
use crate::types::CallContext;

/// A text-generation backend.
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Provider name for logging/debugging.
    fn name(&self) -> &str;

    /// Model used when the request carries no override.
    fn default_model(&self) -> &str;

    /// Generate text for `prompt` with `model`.
    async fn invoke(&self, prompt: &str, model: &str, ctx: &CallContext) -> Result<String>;
}
