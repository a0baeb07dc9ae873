//! Application configuration management.
//!
//! Configuration is loaded from a YAML file with environment variable
//! overrides. The file path defaults to `config.yaml` but can be specified
//! via the `-f` flag or the `CONVERTIDOR_CONFIG` environment variable.
//!
//! Sources are merged in order (later overrides earlier):
//!
//! 1. **YAML config file** - base configuration (default: `config.yaml`;
//!    a missing file simply yields the defaults)
//! 2. **Environment variables** - variables prefixed with `CONVERTIDOR_`
//!
//! For nested values, use double underscores: `CONVERTIDOR_OFFICE__COMMAND=soffice`
//! sets `office.command`.

use clap::Parser;
use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};

/// Simple CLI args - just for specifying config file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file
    #[arg(short = 'f', long, env = "CONVERTIDOR_CONFIG", default_value = "config.yaml")]
    pub config: String,

    /// Validate configuration and exit without starting the server.
    #[arg(long)]
    pub validate: bool,
}

/// Main application configuration.
///
/// All fields have defaults, so an empty (or absent) config file is valid.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// HTTP server host to bind to (e.g., "0.0.0.0" for all interfaces)
    pub host: String,
    /// HTTP server port to bind to
    pub port: u16,
    /// Directory where uploaded input files are stored
    pub upload_dir: PathBuf,
    /// Directory where converted PDFs are written and served from
    pub pdf_dir: PathBuf,
    /// Maximum accepted upload size in bytes
    pub max_upload_size: usize,
    /// External office document converter settings
    pub office: OfficeConfig,
    /// TTL-based eviction of stored inputs and outputs
    pub cleanup: CleanupConfig,
}

/// Settings for the external headless office converter.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct OfficeConfig {
    /// Executable to invoke (must accept LibreOffice-style
    /// `--headless --convert-to pdf --outdir` arguments)
    pub command: String,
    /// Hard deadline for one conversion subprocess
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

/// Background eviction of files older than `max_age` from the upload and
/// PDF directories. The original service never deleted anything; both
/// directories grew without bound.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct CleanupConfig {
    pub enabled: bool,
    /// Files older than this are deleted
    #[serde(with = "humantime_serde")]
    pub max_age: Duration,
    /// How often the sweeper wakes up
    #[serde(with = "humantime_serde")]
    pub sweep_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        let upload_dir = std::env::temp_dir().join("convertidor");
        let pdf_dir = upload_dir.join("pdfs");
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            upload_dir,
            pdf_dir,
            max_upload_size: 25 * 1024 * 1024,
            office: OfficeConfig::default(),
            cleanup: CleanupConfig::default(),
        }
    }
}

impl Default for OfficeConfig {
    fn default() -> Self {
        Self {
            command: "libreoffice".to_string(),
            timeout: Duration::from_secs(120),
        }
    }
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_age: Duration::from_secs(60 * 60),
            sweep_interval: Duration::from_secs(15 * 60),
        }
    }
}

impl Config {
    pub fn load(args: &Args) -> Result<Self, figment::Error> {
        let config: Self = Self::figment(args).extract()?;
        config.validate()?;
        Ok(config)
    }

    pub fn figment(args: &Args) -> Figment {
        Figment::new()
            // Load base config file
            .merge(Yaml::file(&args.config))
            // Environment variables can still override specific values
            .merge(Env::prefixed("CONVERTIDOR_").split("__"))
    }

    fn validate(&self) -> Result<(), figment::Error> {
        if self.max_upload_size == 0 {
            return Err(figment::Error::from("max_upload_size must be greater than zero".to_string()));
        }
        if self.upload_dir == self.pdf_dir {
            return Err(figment::Error::from(
                "upload_dir and pdf_dir must be distinct directories".to_string(),
            ));
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args_for(path: &str) -> Args {
        Args {
            config: path.to_string(),
            validate: false,
        }
    }

    #[test]
    fn missing_config_file_yields_defaults() {
        let config = Config::load(&args_for("/nonexistent/config.yaml")).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.office.command, "libreoffice");
        assert_eq!(config.cleanup.max_age, Duration::from_secs(3600));
        assert_eq!(config.pdf_dir, config.upload_dir.join("pdfs"));
    }

    #[test]
    fn yaml_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            "port: 9999\noffice:\n  command: soffice\n  timeout: 30s\ncleanup:\n  enabled: false\n",
        )
        .unwrap();

        let config = Config::load(&args_for(path.to_str().unwrap())).unwrap();
        assert_eq!(config.port, 9999);
        assert_eq!(config.office.command, "soffice");
        assert_eq!(config.office.timeout, Duration::from_secs(30));
        assert!(!config.cleanup.enabled);
        // Untouched fields keep their defaults
        assert_eq!(config.host, "0.0.0.0");
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "prot: 8080\n").unwrap();

        assert!(Config::load(&args_for(path.to_str().unwrap())).is_err());
    }

    #[test]
    fn colliding_directories_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "upload_dir: /tmp/x\npdf_dir: /tmp/x\n").unwrap();

        assert!(Config::load(&args_for(path.to_str().unwrap())).is_err());
    }
}
