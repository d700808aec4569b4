//! Runtime configuration, read from the environment

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;

const DEFAULT_DB: &str = "shelflink.db";
const DEFAULT_ADDR: &str = "127.0.0.1:8080";

#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite database path (`SHELFLINK_DB`)
    pub db_path: PathBuf,
    /// Listen address (`SHELFLINK_ADDR`)
    pub bind_addr: SocketAddr,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::parse(
            std::env::var("SHELFLINK_DB").ok(),
            std::env::var("SHELFLINK_ADDR").ok(),
        )
    }

    fn parse(db: Option<String>, addr: Option<String>) -> anyhow::Result<Self> {
        let db_path = PathBuf::from(db.unwrap_or_else(|| DEFAULT_DB.to_string()));
        let bind_addr = addr
            .unwrap_or_else(|| DEFAULT_ADDR.to_string())
            .parse()
            .context("SHELFLINK_ADDR must be a host:port address")?;
        Ok(Self { db_path, bind_addr })
    }
}
