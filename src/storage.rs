//! Filesystem layout for uploaded inputs and converted outputs.
//!
//! Every upload gets a fresh UUID token; the token prefixes both the stored
//! input name and the output PDF name, so concurrent requests never collide
//! even when they upload the same original filename.

use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::errors::{Error, Result};

/// Paths for the two service-owned directories.
#[derive(Debug, Clone)]
pub struct Storage {
    upload_dir: PathBuf,
    pdf_dir: PathBuf,
}

impl Storage {
    pub fn new(upload_dir: PathBuf, pdf_dir: PathBuf) -> Self {
        Self { upload_dir, pdf_dir }
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    pub fn pdf_dir(&self) -> &Path {
        &self.pdf_dir
    }

    /// Create both directories. Called once at startup.
    pub async fn ensure_dirs(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.upload_dir).await?;
        tokio::fs::create_dir_all(&self.pdf_dir).await?;
        Ok(())
    }

    /// Where the uploaded bytes for `filename` are persisted.
    pub fn input_path(&self, token: Uuid, filename: &str) -> PathBuf {
        self.upload_dir.join(format!("{token}_{filename}"))
    }

    /// Name of the output PDF for the given original filename.
    pub fn output_name(&self, token: Uuid, filename: &str) -> String {
        format!("{token}_{}.pdf", stem(filename))
    }

    /// Full path of a file inside the PDF directory.
    pub fn output_path(&self, name: &str) -> PathBuf {
        self.pdf_dir.join(name)
    }
}

/// Generate the per-upload token that namespaces input and output names.
pub fn new_token() -> Uuid {
    Uuid::new_v4()
}

/// The original filename without its final extension.
pub fn stem(filename: &str) -> &str {
    Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename)
}

/// The lowercased extension (without the dot), if any.
pub fn extension(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// Reduce a client-supplied filename to a safe single path component.
///
/// Browsers normally send a bare name, but nothing stops a client from
/// sending `../../etc/passwd`. Only the final component is kept; names that
/// are empty or dot-only after reduction are rejected.
pub fn sanitize_filename(raw: &str) -> Result<String> {
    let candidate = raw.rsplit(['/', '\\']).next().unwrap_or_default().trim();
    if candidate.is_empty() || candidate == "." || candidate == ".." {
        return Err(Error::missing_upload());
    }
    Ok(candidate.to_string())
}

/// Reject download names that could escape the PDF directory.
///
/// Not-found rather than a validation error: a traversal-shaped name is
/// indistinguishable from a file we never produced.
pub fn checked_download_name(name: &str) -> Result<&str> {
    if name.is_empty() || name.contains(['/', '\\']) || name.contains("..") {
        return Err(Error::NotFound {
            filename: name.to_string(),
        });
    }
    Ok(name)
}
