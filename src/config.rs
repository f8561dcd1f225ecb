// Configuration module
// The defaults reproduce the deployment contract (port 8000, all interfaces,
// a "dist" root next to the working directory); an optional serve.toml can
// override them. Environment variables are deliberately not consulted.

use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::http::mime::MimeMap;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub site: SiteConfig,
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Site configuration: what gets served and how directories behave
#[derive(Debug, Deserialize, Clone)]
pub struct SiteConfig {
    pub root: String,
    pub index_files: Vec<String>,
    pub directory_listing: bool,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub access_log: bool,
}

impl Config {
    /// Load configuration with built-in defaults, overridable by an
    /// optional `serve.toml` in the working directory.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("serve")
    }

    /// Load configuration from specified file path (without extension)
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("site.root", "dist")?
            .set_default(
                "site.index_files",
                vec!["index.html".to_string(), "index.htm".to_string()],
            )?
            .set_default("site.directory_listing", true)?
            .set_default("logging.access_log", true)?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

/// Per-process state, immutable after startup.
///
/// `root` is the canonicalized asset directory; all request paths resolve
/// against it and must stay inside it. The MIME table is fixed here so the
/// handler never touches mutable global state.
pub struct AppState {
    pub config: Config,
    pub root: PathBuf,
    pub mime: MimeMap,
}

impl AppState {
    pub fn new(config: Config, root: PathBuf) -> Self {
        Self {
            config,
            root,
            mime: MimeMap::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> Config {
        // A name no file on disk matches, so only the set_default layer applies
        Config::load_from("no-such-config-file").expect("defaults should load")
    }

    #[test]
    fn test_default_values() {
        let cfg = defaults();
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 8000);
        assert_eq!(cfg.server.workers, None);
        assert_eq!(cfg.site.root, "dist");
        assert_eq!(cfg.site.index_files, vec!["index.html", "index.htm"]);
        assert!(cfg.site.directory_listing);
        assert!(cfg.logging.access_log);
    }

    #[test]
    fn test_socket_addr() {
        let cfg = defaults();
        let addr = cfg.get_socket_addr().expect("address should parse");
        assert_eq!(addr.port(), 8000);
        assert!(addr.ip().is_unspecified());
    }
}
