use std::time::Duration;

/// Failures talking to, or making sense of, the adjudicating model.
#[derive(Debug, thiserror::Error)]
pub enum AdjudicatorError {
    #[error("API error: {0}")]
    Api(String),
    #[error("Rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },
    #[error("Network error: {0}")]
    Network(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Parsing error: {0}")]
    Parse(String),
    #[error("Max retries exceeded after {attempts} attempts: {last}")]
    RetriesExhausted { attempts: u32, last: String },
}

impl AdjudicatorError {
    /// Errors that are worth a backoff before the next attempt.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            AdjudicatorError::RateLimited { .. }
                | AdjudicatorError::Network(_)
                | AdjudicatorError::InvalidResponse(_)
                | AdjudicatorError::Parse(_)
        )
    }

    /// Wait the server asked for, if any.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            AdjudicatorError::RateLimited { retry_after_ms } => {
                Some(Duration::from_millis(*retry_after_ms))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_rate_limits_carry_a_retry_after() {
        let limited = AdjudicatorError::RateLimited { retry_after_ms: 2000 };
        assert_eq!(limited.retry_after(), Some(Duration::from_secs(2)));
        assert!(limited.is_transient());
        assert_eq!(AdjudicatorError::Network("reset".into()).retry_after(), None);
        assert!(!AdjudicatorError::Api("400".into()).is_transient());
    }
}
