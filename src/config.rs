//! Process configuration, read from command-line flags with environment fallbacks.

use crate::server::assets::AssetMode;

use clap::{Parser, ValueEnum};
use reqwest::Url;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Environment {
    /// Proxy front-end requests to a running development asset server.
    Development,
    /// Serve the built front-end bundle from disk.
    Production,
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "contact-intake",
    about = "Contact form and newsletter backend with front-end asset serving"
)]
pub struct Config {
    #[arg(long, env = "APP_HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    #[arg(long, env = "APP_PORT", default_value_t = 5000)]
    pub port: u16,

    #[arg(long = "env", env = "APP_ENV", value_enum, default_value_t = Environment::Production)]
    pub environment: Environment,

    /// Directory holding the built front-end (production only)
    #[arg(long, env = "APP_PUBLIC_DIR", default_value = "dist/public")]
    pub public_dir: PathBuf,

    /// Development asset server to proxy to (development only)
    #[arg(long, env = "APP_DEV_SERVER_URL", default_value = "http://127.0.0.1:5173")]
    pub dev_server: Url,
}

impl Config {
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn asset_mode(&self) -> AssetMode {
        match self.environment {
            Environment::Development => AssetMode::Proxy {
                upstream: self.dev_server.clone(),
            },
            Environment::Production => AssetMode::Static {
                public_dir: self.public_dir.clone(),
            },
        }
    }
}
