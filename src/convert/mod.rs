//! Conversion strategy dispatch.
//!
//! One strategy per input family, selected purely by file extension. Each
//! strategy implements the same contract: `(input path, output path)` to
//! `Result<()>`, writing a PDF at the output path on success.

pub mod image;
pub mod office;
pub mod text;

use std::path::Path;

use anyhow::Context;

use crate::config::Config;
use crate::errors::{Error, Result};

/// The three supported conversion families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionKind {
    Image,
    Text,
    Office,
}

impl ConversionKind {
    /// Pure mapping from a lowercased extension (without dot) to a strategy.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "jpg" | "jpeg" | "png" | "bmp" => Some(ConversionKind::Image),
            "txt" => Some(ConversionKind::Text),
            "doc" | "docx" | "xls" | "xlsx" | "ppt" | "pptx" => Some(ConversionKind::Office),
            _ => None,
        }
    }
}

/// Run the selected strategy.
///
/// Image and text conversions are CPU-bound library calls and run on the
/// blocking pool; the office strategy awaits a subprocess.
pub async fn convert(config: &Config, kind: ConversionKind, input: &Path, output: &Path) -> Result<()> {
    match kind {
        ConversionKind::Image => {
            let (input, output) = (input.to_owned(), output.to_owned());
            tokio::task::spawn_blocking(move || image::convert(&input, &output))
                .await
                .context("image conversion task panicked")??;
        }
        ConversionKind::Text => {
            let (input, output) = (input.to_owned(), output.to_owned());
            tokio::task::spawn_blocking(move || text::convert(&input, &output))
                .await
                .context("text conversion task panicked")??;
        }
        ConversionKind::Office => {
            office::convert(&config.office, input, output).await?;
        }
    }

    // The strategy reported success, so the file must be there; a missing
    // output at this point would surface downstream as a broken download.
    if !output.exists() {
        return Err(Error::Conversion {
            reason: format!("no output file was produced at {}", output.display()),
        });
    }
    Ok(())
}
