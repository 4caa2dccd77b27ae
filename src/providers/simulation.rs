//! Offline simulation stub.
//!
//! Deterministic payloads for development and tests. Never touches the
//! network, the cache or the rate limiter.

use crate::types::Task;

/// Marker returned for free-form tasks.
pub const SIMULATED_TEXT: &str = "SIMULATED RESPONSE";

/// Synthetic response for `task`.
///
/// Strict-JSON tasks get a minimal JSON object naming the task; everything
/// else gets [`SIMULATED_TEXT`].
pub fn simulated_response(task: &Task) -> String {
    if task.is_strict_json() {
        serde_json::json!({ "status": "simulated", "task": task.as_str() }).to_string()
    } else {
        SIMULATED_TEXT.to_string()
    }
}
