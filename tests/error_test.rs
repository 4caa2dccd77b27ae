use std::time::Duration;

use sentiq::{ErrorKind, Result, SentiqError};

#[test]
fn test_error_display() {
    let err = SentiqError::Configuration("GROQ_API_KEY missing".to_string());
    assert!(err.to_string().contains("GROQ_API_KEY"));

    let err = SentiqError::Api {
        status: 429,
        message: "quota exhausted".into(),
    };
    assert_eq!(err.to_string(), "API error (429): quota exhausted");
}

#[test]
fn test_result_alias() {
    fn returns_error() -> Result<()> {
        Err(SentiqError::EmptyResponse)
    }
    assert!(returns_error().is_err());
}

// ============================================================================
// Classification
// ============================================================================

#[test]
fn remote_errors() {
    let remote = [
        SentiqError::Http("connection reset".into()),
        SentiqError::Api {
            status: 500,
            message: "internal".into(),
        },
        SentiqError::Api {
            status: 400,
            message: "bad request".into(),
        },
        SentiqError::Timeout(Duration::from_secs(30)),
        SentiqError::Cancelled,
        SentiqError::EmptyResponse,
    ];
    for err in remote {
        assert_eq!(err.kind(), ErrorKind::Remote, "{err}");
        assert!(err.is_remote());
    }
}

#[test]
fn non_remote_errors() {
    let err = SentiqError::Configuration("x".into());
    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert!(!err.is_remote());

    let err = SentiqError::RateLimited {
        provider: "groq".into(),
    };
    assert_eq!(err.kind(), ErrorKind::RateLimited);
    assert!(!err.is_remote());

    let err = SentiqError::Cache("disk full".into());
    assert_eq!(err.kind(), ErrorKind::Cache);

    let err = SentiqError::AllProvidersFailed { attempts: vec![] };
    assert_eq!(err.kind(), ErrorKind::AllFailed);
}

#[test]
fn json_errors_convert() {
    let parse = serde_json::from_str::<serde_json::Value>("{not json");
    let err: SentiqError = parse.unwrap_err().into();
    assert!(matches!(err, SentiqError::Json(_)));
}

#[test]
fn io_errors_become_cache_errors() {
    let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
    let err: SentiqError = io.into();
    assert!(matches!(err, SentiqError::Cache(ref m) if m.contains("read-only")));
}

#[test]
fn kind_labels() {
    assert_eq!(ErrorKind::RateLimited.as_str(), "rate_limited");
    assert_eq!(ErrorKind::AllFailed.to_string(), "all_failed");
    assert_eq!(
        serde_json::to_string(&ErrorKind::Configuration).unwrap(),
        "\"configuration\""
    );
}
