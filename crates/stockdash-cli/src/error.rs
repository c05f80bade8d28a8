use stockdash_core::{ConfigError, ValidationError};
use stockdash_dashboard::{DashboardError, ErrorClass};
use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{}", view_message(.0))]
    View(#[from] DashboardError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Appends the error code unless the message already carries it.
fn view_message(error: &DashboardError) -> String {
    let message = error.to_string();
    let code = error.code();
    if message.contains(code) {
        message
    } else {
        format!("{message} [{code}]")
    }
}

impl CliError {
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) | Self::Config(_) => 2,
            Self::View(DashboardError::UnknownMenuItem { .. }) => 2,
            Self::View(error) if error.class() == ErrorClass::Validation => 2,
            Self::View(_) => 3,
            Self::Serialization(_) => 4,
            Self::Io(_) => 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use stockdash_ai::CommentaryError;
    use stockdash_core::SourceError;

    use super::*;

    #[test]
    fn view_failures_split_user_input_from_runtime_errors() {
        let unknown = CliError::from(DashboardError::UnknownMenuItem {
            value: "options".into(),
        });
        assert_eq!(unknown.exit_code(), 2);

        let no_holdings = CliError::from(DashboardError::NoHoldings);
        assert_eq!(no_holdings.exit_code(), 2);

        let offline = CliError::from(DashboardError::CommentaryUnavailable);
        assert_eq!(offline.exit_code(), 3);
        assert!(offline.to_string().ends_with("[commentary.unavailable]"));
    }

    #[test]
    fn error_code_is_printed_once() {
        let error = CliError::from(DashboardError::from(SourceError::not_found(
            "fixture catalog has no symbol 'ZZZZ'",
        )));
        let message = error.to_string();

        assert_eq!(message.matches("source.not_found").count(), 1);
        assert_eq!(error.exit_code(), 3);
    }

    #[test]
    fn missing_api_key_names_the_variable() {
        let error = CliError::from(DashboardError::from(CommentaryError::MissingApiKey {
            env: "OPENAI_API_KEY".into(),
        }));

        assert!(error.to_string().contains("OPENAI_API_KEY"));
        assert!(error.to_string().ends_with("[commentary.missing_key]"));
        assert_eq!(error.exit_code(), 3);
    }

    #[test]
    fn io_errors_exit_with_ten() {
        let error = CliError::from(std::io::Error::other("disk"));
        assert_eq!(error.exit_code(), 10);
    }
}
