//! Provider adapters.
//!
//! Two interchangeable text-generation backends behind [`TextProvider`]:
//! [`GeminiProvider`] (primary slot by default) and [`GroqProvider`]
//! (secondary), plus the offline [`simulation`] stub.

pub mod gemini;
pub mod groq;
pub mod simulation;
pub mod traits;

pub use gemini::GeminiProvider;
pub use groq::GroqProvider;
pub use traits::TextProvider;

use std::time::Duration;

use reqwest::{Client, ClientBuilder, Response};
use serde::Deserialize;

use crate::{Result, SentiqError};

/// Connect timeout for provider HTTP clients. Overall call duration is
/// bounded per call by [`CallContext`](crate::CallContext).
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

fn http_client() -> Result<Client> {
    build_client(Client::builder().connect_timeout(CONNECT_TIMEOUT))
}

fn build_client(builder: ClientBuilder) -> Result<Client> {
    builder
        .build()
        .map_err(|e| SentiqError::Configuration(format!("failed to build HTTP client: {e}")))
}

/// Both APIs wrap failures as `{"error": {"message": "..."}}`.
#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Pass 2xx responses through; turn anything else into `Api { status, message }`.
async fn error_for_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorBody>(&body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| {
            if body.is_empty() {
                status.to_string()
            } else {
                body
            }
        });
    Err(SentiqError::Api {
        status: status.as_u16(),
        message,
    })
}
