//! Error types for the provider.

use std::fmt;

use thiserror::Error;

use crate::client::ClientError;
use crate::schema::Diagnostic;

/// The resource operation during which a backend call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Resource creation.
    Create,
    /// Resource refresh.
    Read,
    /// In-place update.
    Update,
    /// Resource deletion.
    Delete,
    /// Import of an existing article.
    Import,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Create => "Create",
            Self::Read => "Read",
            Self::Update => "Update",
            Self::Delete => "Delete",
            Self::Import => "Import",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while serving provider requests.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// A resource operation ran before Configure succeeded.
    #[error("Provider is not configured")]
    NotConfigured,

    /// A configuration error occurred.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A validation error occurred.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The requested resource type is unknown.
    #[error("Unknown resource type: {0}")]
    UnknownResource(String),

    /// The state handed over by the host does not fit the resource model.
    #[error("Invalid resource state: {0}")]
    InvalidState(String),

    /// Invalid request from the host.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A call to the shop backend failed.
    #[error("Error during article {operation}: {source}")]
    Backend {
        /// The operation that issued the call.
        operation: Operation,
        /// What went wrong on the HTTP side.
        #[source]
        source: ClientError,
    },

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ProviderError {
    /// Wrap a client error with the operation it interrupted.
    pub fn backend(operation: Operation, source: ClientError) -> Self {
        Self::Backend { operation, source }
    }

    /// Convert the error into the diagnostic reported to the host.
    ///
    /// Backend failures keep the short `Error during article <Operation>`
    /// summary and carry the HTTP details in the diagnostic detail.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            Self::Backend { operation, source } => {
                Diagnostic::error(format!("Error during article {}", operation))
                    .with_detail(source.to_string())
            }
            Self::NotConfigured => Diagnostic::error("Provider is not configured").with_detail(
                "Configure must succeed before resources can be managed; check the provider block",
            ),
            other => Diagnostic::error(other.to_string()),
        }
    }
}

impl From<ProviderError> for tonic::Status {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::NotConfigured => tonic::Status::failed_precondition(err.to_string()),
            ProviderError::Configuration(msg) => tonic::Status::failed_precondition(msg),
            ProviderError::Validation(msg) => tonic::Status::invalid_argument(msg),
            ProviderError::UnknownResource(msg) => tonic::Status::not_found(msg),
            ProviderError::InvalidState(msg) => tonic::Status::invalid_argument(msg),
            ProviderError::InvalidRequest(msg) => tonic::Status::invalid_argument(msg),
            ProviderError::Backend { .. } => tonic::Status::unavailable(err.to_string()),
            ProviderError::Serialization(err) => {
                tonic::Status::invalid_argument(format!("Serialization error: {}", err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::DiagnosticSeverity;

    #[test]
    fn test_error_display() {
        let err = ProviderError::UnknownResource("tfp_example_basket".to_string());
        assert_eq!(format!("{}", err), "Unknown resource type: tfp_example_basket");

        let err = ProviderError::NotConfigured;
        assert_eq!(format!("{}", err), "Provider is not configured");

        let err = ProviderError::InvalidState("missing id".to_string());
        assert_eq!(format!("{}", err), "Invalid resource state: missing id");
    }

    #[test]
    fn test_backend_error_display() {
        let err = ProviderError::backend(
            Operation::Create,
            ClientError::BadStatus {
                status: 409,
                body: "duplicate".to_string(),
            },
        );
        assert_eq!(
            err.to_string(),
            "Error during article Create: Backend returned bad status 409: duplicate"
        );
    }

    #[test]
    fn test_backend_error_diagnostic() {
        let err = ProviderError::backend(Operation::Delete, ClientError::MissingId);
        let diag = err.to_diagnostic();
        assert_eq!(diag.severity, DiagnosticSeverity::Error);
        assert_eq!(diag.summary, "Error during article Delete");
        assert_eq!(
            diag.detail.as_deref(),
            Some("Backend response did not contain an article id")
        );
    }

    #[test]
    fn test_plain_error_diagnostic() {
        let diag = ProviderError::Validation("bad".to_string()).to_diagnostic();
        assert_eq!(diag.summary, "Validation error: bad");
        assert!(diag.detail.is_none());
    }

    #[test]
    fn test_error_to_status() {
        let status: tonic::Status = ProviderError::UnknownResource("x".to_string()).into();
        assert_eq!(status.code(), tonic::Code::NotFound);

        let status: tonic::Status = ProviderError::InvalidRequest("x".to_string()).into();
        assert_eq!(status.code(), tonic::Code::InvalidArgument);

        let status: tonic::Status = ProviderError::NotConfigured.into();
        assert_eq!(status.code(), tonic::Code::FailedPrecondition);

        let status: tonic::Status =
            ProviderError::backend(Operation::Read, ClientError::MissingId).into();
        assert_eq!(status.code(), tonic::Code::Unavailable);
    }

    #[test]
    fn test_operation_display() {
        assert_eq!(Operation::Create.to_string(), "Create");
        assert_eq!(Operation::Import.to_string(), "Import");
    }
}
