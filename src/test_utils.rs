//! Shared helpers for handler tests: an isolated application over temporary
//! directories, plus small fixture builders.

use std::path::{Path, PathBuf};

use axum_test::TestServer;
use tempfile::TempDir;

use crate::config::Config;
use crate::storage::Storage;
use crate::{AppState, build_router};

pub struct TestApp {
    pub server: TestServer,
    config: Config,
    // Held so the directories outlive the test
    _root: TempDir,
}

impl TestApp {
    /// Application over fresh temp directories, default config otherwise.
    pub async fn spawn() -> Self {
        Self::spawn_with(|_, _| {}).await
    }

    /// Like [`TestApp::spawn`], but with the office command pointed at a
    /// stub script that mimics the LibreOffice CLI contract.
    #[cfg(unix)]
    pub async fn spawn_with_stub_office() -> Self {
        Self::spawn_with(|config, root| {
            config.office.command = write_stub_office(root);
        })
        .await
    }

    async fn spawn_with(customize: impl FnOnce(&mut Config, &Path)) -> Self {
        let root = TempDir::new().expect("Failed to create temp dir");

        let mut config = Config {
            upload_dir: root.path().join("uploads"),
            pdf_dir: root.path().join("pdfs"),
            ..Config::default()
        };
        customize(&mut config, root.path());

        let storage = Storage::new(config.upload_dir.clone(), config.pdf_dir.clone());
        storage.ensure_dirs().await.expect("Failed to create storage dirs");

        let state = AppState {
            config: config.clone(),
            storage,
        };
        let server = TestServer::new(build_router(state)).expect("Failed to create test server");

        Self {
            server,
            config,
            _root: root,
        }
    }

    pub fn root(&self) -> &Path {
        self._root.path()
    }

    pub fn upload_dir(&self) -> &Path {
        &self.config.upload_dir
    }

    pub fn pdf_dir(&self) -> &Path {
        &self.config.pdf_dir
    }

    pub fn pdf_dir_is_empty(&self) -> bool {
        std::fs::read_dir(self.pdf_dir())
            .map(|mut entries| entries.next().is_none())
            .unwrap_or(true)
    }

    /// Extract the `/pdfs/...` download link from a rendered form.
    pub fn download_url_in(&self, body: &str) -> String {
        let start = body.find("/pdfs/").expect("response contains no download link");
        let rest = &body[start..];
        let end = rest.find('"').expect("unterminated download link");
        rest[..end].to_string()
    }
}

/// A tiny valid 4x4 red PNG, generated through the same codec the service
/// decodes with.
pub fn png_bytes() -> Vec<u8> {
    let mut bytes = std::io::Cursor::new(Vec::new());
    image::RgbImage::from_pixel(4, 4, image::Rgb([255, 0, 0]))
        .write_to(&mut bytes, image::ImageOutputFormat::Png)
        .expect("Failed to encode fixture PNG");
    bytes.into_inner()
}

/// Executable shell stub honoring `--outdir <dir> <input>`, writing
/// `<outdir>/<input stem>.pdf` like the real converter.
#[cfg(unix)]
fn write_stub_office(dir: &Path) -> String {
    use std::os::unix::fs::PermissionsExt;

    let script = r#"#!/bin/sh
out=""; in=""
while [ $# -gt 0 ]; do
  case "$1" in
    --outdir) out="$2"; shift ;;
    --headless|--convert-to|pdf) ;;
    *) in="$1" ;;
  esac
  shift
done
name=$(basename "$in")
stem="${name%.*}"
printf '%%PDF-1.4 stub' > "$out/$stem.pdf"
"#;

    let path: PathBuf = dir.join("fake-office");
    std::fs::write(&path, script).expect("Failed to write office stub");
    let mut perms = std::fs::metadata(&path).expect("Failed to stat office stub").permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).expect("Failed to chmod office stub");
    path.to_string_lossy().into_owned()
}
