// Configuration module entry point
// Loads compiled-in defaults, optionally overridden by config.toml

mod state;
mod types;

use std::net::SocketAddr;

pub use state::AppState;
pub use types::{
    Config, HttpConfig, LoggingConfig, PerformanceConfig, ServerConfig, StaticFilesConfig,
};

/// Default config file name (without extension)
pub const DEFAULT_CONFIG_PATH: &str = "config";

impl Config {
    /// Load configuration from `config.toml` in the working directory, if present
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from specified file path (without extension)
    ///
    /// A missing file is not an error: every key has a default.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = Self::builder_with_defaults()?
            .add_source(config::File::with_name(config_path).required(false))
            .build()?;

        settings.try_deserialize()
    }

    fn builder_with_defaults(
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError> {
        config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("static_files.root_dir", "./dist/")?
            .set_default("static_files.index_files", vec!["index.html", "index.htm"])?
            .set_default("static_files.directory_listing", true)?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "default")?
            .set_default("performance.keep_alive", true)?
            .set_default("performance.connection_timeout", 0)?
            .set_default("http.server_name", "NoCacheHTTP/0.1")
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        let host = self.server.host.trim_start_matches('[').trim_end_matches(']');
        let addr = if host.contains(':') {
            format!("[{host}]:{}", self.server.port)
        } else {
            format!("{host}:{}", self.server.port)
        };
        addr.parse()
            .map_err(|e| format!("Invalid address '{addr}': {e}"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
                workers: None,
            },
            static_files: StaticFilesConfig {
                root_dir: "./dist/".to_string(),
                index_files: vec!["index.html".to_string(), "index.htm".to_string()],
                directory_listing: true,
            },
            logging: LoggingConfig {
                access_log: true,
                access_log_format: "default".to_string(),
                access_log_file: None,
                error_log_file: None,
            },
            performance: PerformanceConfig {
                keep_alive: true,
                connection_timeout: 0,
            },
            http: HttpConfig {
                server_name: "NoCacheHTTP/0.1".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing");
        let cfg = Config::load_from(path.to_str().unwrap()).unwrap();

        assert_eq!(cfg.server.port, 8000);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.static_files.root_dir, "./dist/");
        assert_eq!(cfg.static_files.index_files, vec!["index.html", "index.htm"]);
        assert!(cfg.static_files.directory_listing);
        assert!(cfg.server.workers.is_none());
        assert_eq!(cfg.performance.connection_timeout, 0);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[server]\nport = 9001\n\n[static_files]\nroot_dir = \"public\"").unwrap();

        let base = dir.path().join("server");
        let cfg = Config::load_from(base.to_str().unwrap()).unwrap();
        assert_eq!(cfg.server.port, 9001);
        assert_eq!(cfg.static_files.root_dir, "public");
        // Untouched keys keep their defaults
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.http.server_name, "NoCacheHTTP/0.1");
    }

    #[test]
    fn test_default_matches_builder_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing");
        let loaded = Config::load_from(path.to_str().unwrap()).unwrap();
        let built = Config::default();

        assert_eq!(loaded.server.port, built.server.port);
        assert_eq!(loaded.static_files.root_dir, built.static_files.root_dir);
        assert_eq!(loaded.logging.access_log_format, built.logging.access_log_format);
    }

    #[test]
    fn test_socket_addr() {
        let mut cfg = Config::default();
        assert_eq!(cfg.get_socket_addr().unwrap().port(), 8000);

        cfg.server.host = "::1".to_string();
        assert!(cfg.get_socket_addr().unwrap().is_ipv6());

        cfg.server.host = "not a host".to_string();
        assert!(cfg.get_socket_addr().is_err());
    }
}
