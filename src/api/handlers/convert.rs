//! Upload form and conversion endpoint.

use axum::{
    extract::{Multipart, State},
    response::Html,
};
use bytes::Bytes;

use crate::AppState;
use crate::convert::{self, ConversionKind};
use crate::errors::{Error, Result};
use crate::storage;
use crate::templates;

/// `GET /` - render the blank upload form.
pub async fn show_form() -> Result<Html<String>> {
    let html = templates::render_index(None, None).map_err(anyhow::Error::from)?;
    Ok(Html(html))
}

/// `POST /` - accept one multipart file upload, convert it, and re-render
/// the form with either a download link or an error banner.
pub async fn upload_and_convert(State(state): State<AppState>, mut multipart: Multipart) -> Result<Html<String>> {
    let (filename, data) = read_file_field(&mut multipart).await?;
    let filename = storage::sanitize_filename(&filename)?;

    let extension = storage::extension(&filename).unwrap_or_default();
    let kind = ConversionKind::from_extension(&extension).ok_or(Error::UnsupportedFormat {
        extension: extension.clone(),
    })?;

    let token = storage::new_token();
    let input_path = state.storage.input_path(token, &filename);
    tokio::fs::write(&input_path, &data).await?;

    let pdf_name = state.storage.output_name(token, &filename);
    let output_path = state.storage.output_path(&pdf_name);

    tracing::info!(
        %token,
        filename = %filename,
        kind = ?kind,
        size = data.len(),
        "Converting upload"
    );
    convert::convert(&state.config, kind, &input_path, &output_path).await?;
    tracing::info!(%token, output = %pdf_name, "Conversion finished");

    // The stem comes from the user's filename; characters like `#`, `?`,
    // and `%` would otherwise corrupt the href.
    let download_url = format!("/pdfs/{}", urlencoding::encode(&pdf_name));
    let html = templates::render_index(None, Some(&download_url)).map_err(anyhow::Error::from)?;
    Ok(Html(html))
}

/// Pull the `file` field out of the multipart body.
///
/// A missing field, an empty filename, and a malformed multipart body all
/// collapse into the same user-facing validation error, matching what the
/// form can actually express.
async fn read_file_field(multipart: &mut Multipart) -> Result<(String, Bytes)> {
    let mut uploaded: Option<(String, Bytes)> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::debug!(error = %e, "Malformed multipart body");
        Error::missing_upload()
    })? {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let data = field.bytes().await.map_err(|e| {
            tracing::debug!(error = %e, "Failed to read upload body");
            Error::missing_upload()
        })?;
        uploaded = Some((filename, data));
    }

    match uploaded {
        Some((filename, data)) if !filename.is_empty() => Ok((filename, data)),
        _ => Err(Error::missing_upload()),
    }
}
