use thiserror::Error;

use crate::llm::CompletionError;

/// Failure of the tag pipeline.
///
/// Every variant renders with the `Failed to generate tags:` prefix, which is
/// the message surfaced to HTTP callers. The cause is embedded in that
/// message, so neither variant reports a `source()`.
#[derive(Debug, Error)]
pub enum TaggingError {
    /// The provider call failed or returned no content.
    #[error("Failed to generate tags: {0}")]
    Provider(CompletionError),

    /// The provider returned content that is not JSON.
    #[error("Failed to generate tags: model output is not valid JSON: {0}")]
    MalformedOutput(serde_json::Error),
}

impl From<CompletionError> for TaggingError {
    fn from(error: CompletionError) -> Self {
        Self::Provider(error)
    }
}

impl TaggingError {
    /// Returns true when the failure happened before any usable answer came
    /// back from the provider.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Provider(
                CompletionError::Network(_)
                    | CompletionError::Timeout(_)
                    | CompletionError::Http { .. }
                    | CompletionError::Serialization(_)
            )
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_errors_carry_the_pipeline_prefix() {
        let error = TaggingError::from(CompletionError::NoResponse);
        assert_eq!(error.to_string(), "Failed to generate tags: No response from LLM");
        assert!(!error.is_transport());
    }

    #[test]
    fn malformed_output_carries_the_pipeline_prefix() {
        let json_error = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let error = TaggingError::MalformedOutput(json_error);

        assert!(error.to_string().starts_with("Failed to generate tags: "));
        assert!(!error.is_transport());
    }

    #[test]
    fn http_failures_are_transport_errors() {
        let error = TaggingError::from(CompletionError::Http {
            status: 429,
            message: "Rate limit reached".to_string(),
        });

        assert!(error.is_transport());
        assert!(error.to_string().contains("Rate limit reached"));
    }

    #[test]
    fn alternate_format_does_not_repeat_the_cause() {
        let json_error = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let cause = json_error.to_string();
        let error = anyhow::Error::from(TaggingError::MalformedOutput(json_error));

        let rendered = format!("{error:#}");
        assert_eq!(rendered.matches(&cause).count(), 1, "{rendered}");

        let error = anyhow::Error::from(TaggingError::from(CompletionError::NoResponse));
        assert_eq!(
            format!("{error:#}"),
            "Failed to generate tags: No response from LLM"
        );
    }
}
