use std::fmt;

/// Failure of a single call to the extraction oracle.
#[derive(Debug, Clone, PartialEq)]
pub enum OracleError {
    /// The call could not be completed (network, timeout, quota, non-2xx status,
    /// empty candidate list).
    Transport {
        /// HTTP status when the provider answered, `None` when it never did.
        status: Option<u16>,
        message: String,
    },
    /// The returned payload is not valid JSON.
    MalformedJson(String),
    /// The payload is JSON but does not match the requested shape.
    SchemaMismatch(String),
}

impl OracleError {
    /// Short machine-friendly name used in logs and reports.
    pub fn kind(&self) -> &'static str {
        match self {
            OracleError::Transport { .. } => "transport",
            OracleError::MalformedJson(_) => "malformed_json",
            OracleError::SchemaMismatch(_) => "schema_mismatch",
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        OracleError::Transport {
            status: None,
            message: message.into(),
        }
    }
}

impl fmt::Display for OracleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OracleError::Transport {
                status: Some(status),
                message,
            } => write!(f, "Oracle transport error ({}): {}", status, message),
            OracleError::Transport {
                status: None,
                message,
            } => write!(f, "Oracle transport error: {}", message),
            OracleError::MalformedJson(msg) => write!(f, "Oracle returned malformed JSON: {}", msg),
            OracleError::SchemaMismatch(msg) => {
                write!(f, "Oracle response does not match schema: {}", msg)
            }
        }
    }
}

impl std::error::Error for OracleError {}

impl From<reqwest::Error> for OracleError {
    /// Converts a `reqwest::Error` into a transport failure, keeping the status if any.
    fn from(err: reqwest::Error) -> Self {
        OracleError::Transport {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

/// Pipeline-level error types.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// A raw lead record failed validation. Never escapes the validator.
    SchemaValidation(String),
    /// An oracle call failed for one lead. Never escapes `process`.
    Oracle(OracleError),
    /// The configuration is unusable. Fatal for the whole run.
    Config(String),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::SchemaValidation(msg) => write!(f, "Schema validation error: {}", msg),
            PipelineError::Oracle(e) => write!(f, "{}", e),
            PipelineError::Config(msg) => write!(f, "Config error: {}", msg),
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PipelineError::Oracle(e) => Some(e),
            _ => None,
        }
    }
}

impl From<OracleError> for PipelineError {
    fn from(err: OracleError) -> Self {
        PipelineError::Oracle(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oracle_error_display() {
        let err = OracleError::Transport {
            status: Some(429),
            message: "quota exceeded".to_string(),
        };
        let display = err.to_string();
        assert!(display.contains("429"));
        assert!(display.contains("quota exceeded"));

        let err = OracleError::transport("connection reset");
        assert_eq!(err.to_string(), "Oracle transport error: connection reset");
    }

    #[test]
    fn test_oracle_error_kinds() {
        assert_eq!(OracleError::transport("x").kind(), "transport");
        assert_eq!(OracleError::MalformedJson("x".into()).kind(), "malformed_json");
        assert_eq!(OracleError::SchemaMismatch("x".into()).kind(), "schema_mismatch");
    }

    #[test]
    fn test_pipeline_error_wraps_oracle_error() {
        let err: PipelineError = OracleError::MalformedJson("eof".into()).into();
        assert!(matches!(err, PipelineError::Oracle(OracleError::MalformedJson(_))));
        assert!(std::error::Error::source(&err).is_some());

        let err = PipelineError::Config("model cannot be empty".into());
        assert!(err.to_string().starts_with("Config error"));
    }
}
