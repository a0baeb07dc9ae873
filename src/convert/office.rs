//! Office document to PDF conversion via an external headless tool.
//!
//! The configured command is invoked LibreOffice-style:
//!
//! ```text
//! <command> --headless --convert-to pdf --outdir <pdf dir> <input>
//! ```
//!
//! The tool names its output after the input file's stem. Stored inputs are
//! token-prefixed, so the produced name is already unique per request; it
//! is still verified (and renamed if it differs from the canonical output
//! path) because a zero exit status with no file is a real failure mode of
//! these tools, not a success.

use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;

use crate::config::OfficeConfig;
use crate::errors::{Error, Result};

pub async fn convert(config: &OfficeConfig, input: &Path, output: &Path) -> Result<()> {
    let outdir = output.parent().ok_or_else(|| Error::Conversion {
        reason: format!("output path {} has no parent directory", output.display()),
    })?;

    let mut command = Command::new(&config.command);
    command
        .arg("--headless")
        .arg("--convert-to")
        .arg("pdf")
        .arg("--outdir")
        .arg(outdir)
        .arg(input)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        // The timeout below drops the output() future; without this the
        // child would keep running and write its PDF after the request
        // already failed.
        .kill_on_drop(true);

    tracing::debug!(command = %config.command, input = %input.display(), "Invoking office converter");

    let result = tokio::time::timeout(config.timeout, command.output())
        .await
        .map_err(|_| Error::Conversion {
            reason: format!(
                "{} did not finish within {}",
                config.command,
                humantime::format_duration(config.timeout)
            ),
        })?
        .map_err(|e| Error::Conversion {
            reason: format!("could not run {}: {e}", config.command),
        })?;

    if !result.status.success() {
        let stderr = String::from_utf8_lossy(&result.stderr);
        return Err(Error::Conversion {
            reason: format!("{} exited with {}: {}", config.command, result.status, stderr.trim()),
        });
    }

    // The tool writes <outdir>/<input stem>.pdf. With token-prefixed inputs
    // this is normally the canonical output name already.
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let produced = outdir.join(format!("{stem}.pdf"));

    if !tokio::fs::try_exists(&produced).await? {
        return Err(Error::Conversion {
            reason: format!("{} reported success but produced no {}", config.command, produced.display()),
        });
    }
    if produced != output {
        tokio::fs::rename(&produced, output).await?;
    }
    Ok(())
}
