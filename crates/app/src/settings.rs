//! Settings for the `splitnow` binary.
//!
//! Read from an optional TOML file (`settings.toml` by default) and then from
//! `SPLITNOW__*` environment variables, e.g. `SPLITNOW__SERVER__PORT=8080`.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::Result;

pub const DEFAULT_CONFIG_PATH: &str = "settings";

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct App {
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<IpAddr>,
    pub port: u16,
}

impl Server {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(
            self.bind.unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST)),
            self.port,
        )
    }
}

impl Default for Server {
    fn default() -> Self {
        Self {
            bind: None,
            port: 3000,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: App,
    pub server: Option<Server>,
}

impl Settings {
    pub fn new(path: Option<&str>) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::with_name(path.unwrap_or(DEFAULT_CONFIG_PATH)).required(false))
            .add_source(Environment::with_prefix("SPLITNOW").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Address to serve on, `127.0.0.1:3000` without a `[server]` table.
    pub fn server_addr(&self) -> SocketAddr {
        self.server
            .as_ref()
            .map(Server::addr)
            .unwrap_or_else(|| Server::default().addr())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_toml(toml: &str) -> Settings {
        Config::builder()
            .add_source(File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn defaults_without_server_table() {
        let settings = from_toml("");
        assert_eq!(settings.app.level, "info");
        assert!(settings.server.is_none());
        assert_eq!(settings.server_addr().to_string(), "127.0.0.1:3000");
    }

    #[test]
    fn reads_server_table() {
        let settings = from_toml(
            r#"
            [app]
            level = "debug"

            [server]
            bind = "0.0.0.0"
            port = 8080
            "#,
        );
        assert_eq!(settings.app.level, "debug");
        assert_eq!(settings.server_addr().to_string(), "0.0.0.0:8080");
    }

    #[test]
    fn missing_bind_uses_localhost() {
        let settings = from_toml("[server]\nport = 4000\n");
        assert_eq!(settings.server_addr().to_string(), "127.0.0.1:4000");
    }
}
