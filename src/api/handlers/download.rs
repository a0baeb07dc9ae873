//! PDF download endpoint.

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};

use crate::AppState;
use crate::errors::{Error, Result};
use crate::storage;

/// `GET /pdfs/{filename}` - stream a converted PDF as an attachment.
///
/// Only bare filenames that actually exist in the PDF directory are served;
/// anything traversal-shaped is a 404, never an arbitrary file.
pub async fn download_pdf(State(state): State<AppState>, Path(filename): Path<String>) -> Result<Response> {
    let name = storage::checked_download_name(&filename)?;
    let path = state.storage.output_path(name);

    let bytes = tokio::fs::read(&path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::NotFound {
                filename: name.to_string(),
            }
        } else {
            Error::Io(e)
        }
    })?;

    tracing::debug!(filename = %name, size = bytes.len(), "Serving download");

    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{name}\""),
        ),
    ];
    Ok((headers, bytes).into_response())
}

#[cfg(test)]
mod tests {
    use crate::test_utils::TestApp;
    use axum::http::StatusCode;

    #[test_log::test(tokio::test)]
    async fn existing_pdf_is_served_as_attachment() {
        let app = TestApp::spawn().await;
        std::fs::write(app.pdf_dir().join("tok_listo.pdf"), b"%PDF-1.4 data").unwrap();

        let response = app.server.get("/pdfs/tok_listo.pdf").await;
        response.assert_status_ok();
        assert_eq!(response.header("content-type"), "application/pdf");
        assert!(
            response
                .header("content-disposition")
                .to_str()
                .unwrap()
                .contains("attachment")
        );
        assert_eq!(response.as_bytes().as_ref(), b"%PDF-1.4 data".as_slice());
    }

    #[test_log::test(tokio::test)]
    async fn unknown_filename_is_not_found() {
        let app = TestApp::spawn().await;

        let response = app.server.get("/pdfs/never-produced.pdf").await;
        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[test_log::test(tokio::test)]
    async fn traversal_attempts_are_not_found() {
        let app = TestApp::spawn().await;
        // A real file one level above the PDF dir that must stay unreachable
        std::fs::write(app.root().join("secreto.txt"), b"secret").unwrap();

        for path in ["/pdfs/..%2Fsecreto.txt", "/pdfs/%2e%2e%2fsecreto.txt"] {
            let response = app.server.get(path).await;
            response.assert_status(StatusCode::NOT_FOUND);
            assert_ne!(response.as_bytes().as_ref(), b"secret".as_slice());
        }
    }
}
