//! Error types for the conversion service.
//!
//! Every fallible operation returns [`Result`] and propagates with `?`; the
//! axum [`IntoResponse`] impl at the bottom is the single place where an
//! error becomes a user-visible HTTP response. Upload-flow errors are
//! rendered back into the upload form; download errors are plain bodies.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error as ThisError;

use crate::templates;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(ThisError, Debug)]
pub enum Error {
    /// Missing or malformed upload data
    #[error("{message}")]
    Validation { message: String },

    /// File extension maps to no conversion strategy
    #[error("unsupported file extension {extension:?}")]
    UnsupportedFormat { extension: String },

    /// A conversion strategy failed (decode error, PDF generation error,
    /// office tool failure)
    #[error("conversion failed: {reason}")]
    Conversion { reason: String },

    /// Requested download does not exist in the output directory
    #[error("{filename} not found")]
    NotFound { filename: String },

    /// Filesystem operation error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Unexpected error with full context chain
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Shorthand for the missing/empty upload case.
    pub fn missing_upload() -> Self {
        Error::Validation {
            message: "No se subió ningún archivo.".to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation { .. } => StatusCode::BAD_REQUEST,
            Error::UnsupportedFormat { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Error::Conversion { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns a user-safe error message, without leaking internal implementation details
    pub fn user_message(&self) -> String {
        match self {
            Error::Validation { message } => message.clone(),
            Error::UnsupportedFormat { .. } => "Tipo de archivo no soportado.".to_string(),
            Error::Conversion { reason } => format!("Error: {reason}"),
            Error::NotFound { filename } => format!("{filename} no encontrado."),
            Error::Io(_) | Error::Other(_) => "Error interno del servidor.".to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            Error::NotFound { .. } => {
                tracing::debug!(error = %self, "Download not found");
                return (status, self.user_message()).into_response();
            }
            Error::Io(_) | Error::Other(_) => {
                tracing::error!(error = ?self, "Request failed");
            }
            _ => {
                tracing::warn!(error = %self, "Rejecting upload");
            }
        }
        // Render the message into the upload form so the user sees it in
        // context; fall back to the bare message if the template itself
        // fails.
        let body =
            templates::render_index(Some(&self.user_message()), None).unwrap_or_else(|_| self.user_message());
        (status, Html(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_messages_match_the_ui_language() {
        assert_eq!(Error::missing_upload().user_message(), "No se subió ningún archivo.");
        let err = Error::UnsupportedFormat {
            extension: "exe".to_string(),
        };
        assert_eq!(err.user_message(), "Tipo de archivo no soportado.");
        let err = Error::Conversion {
            reason: "boom".to_string(),
        };
        assert_eq!(err.user_message(), "Error: boom");
    }

    #[test]
    fn status_codes_distinguish_caller_and_server_faults() {
        assert_eq!(Error::missing_upload().status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            Error::UnsupportedFormat {
                extension: "exe".into()
            }
            .status_code(),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
        assert_eq!(
            Error::NotFound {
                filename: "x.pdf".into()
            }
            .status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            Error::Other(anyhow::anyhow!("internal")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
