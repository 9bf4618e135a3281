//! Server configuration from command-line flags and environment.

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "coffee-web", version, about = "Coffee order tracker")]
pub struct Config {
    /// SQLite connection URL
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite:data/coffee.sqlite?mode=rwc")]
    pub database_url: String,

    /// Address to listen on
    #[arg(long, env = "COFFEE_ADDR", default_value = "127.0.0.1:8000")]
    pub addr: SocketAddr,

    /// Site root produced by cargo-leptos; `pkg/` under it is served at `/pkg`
    #[arg(long, env = "SITE_ROOT", default_value = "target/site")]
    pub site_root: PathBuf,
}

impl Config {
    pub fn pkg_dir(&self) -> PathBuf {
        self.site_root.join("pkg")
    }
}
