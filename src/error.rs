use thiserror::Error;

/// Failures surfaced by the feed layer after the retry policy is exhausted.
///
/// Nothing here is fatal to the process: a malformed row degrades to a
/// dropped record inside the parsers, and a failed required feed degrades to
/// a clearly-flagged synthetic snapshot in the pipeline.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("request to {endpoint} failed: {source}")]
    Request {
        endpoint: String,
        #[source]
        source: reqwest_middleware::Error,
    },

    #[error("{endpoint} returned HTTP {status}")]
    Status {
        endpoint: String,
        status: reqwest::StatusCode,
    },

    #[error("could not read body from {endpoint}: {source}")]
    Body {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("could not decode {endpoint}: {detail}")]
    Decode { endpoint: String, detail: String },
}

impl FeedError {
    /// Endpoint path the failure belongs to, for diagnostics.
    pub fn endpoint(&self) -> &str {
        match self {
            Self::Request { endpoint, .. }
            | Self::Status { endpoint, .. }
            | Self::Body { endpoint, .. }
            | Self::Decode { endpoint, .. } => endpoint,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_names_endpoint() {
        let err = FeedError::Decode {
            endpoint: "capacityOutlook/current".to_string(),
            detail: "unexpected EOF".to_string(),
        };
        assert_eq!(err.endpoint(), "capacityOutlook/current");
        assert!(err.to_string().contains("capacityOutlook/current"));
    }
}
