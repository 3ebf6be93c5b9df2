//! Server configuration from command line flags and environment variables.

use std::net::SocketAddr;

use anyhow::Context;
use clap::Parser;

/// Entrant registry HTTP server
#[derive(Debug, Clone, Parser)]
#[command(name = "entrant-server", version, about)]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long, env = "ENTRANT_ADDR", default_value = "0.0.0.0:3000")]
    pub addr: String,

    /// Start with an empty store instead of the demonstration records
    #[arg(long, env = "ENTRANT_NO_SEED", default_value_t = false)]
    pub no_seed: bool,

    /// Tracing filter directive; `RUST_LOG` takes precedence when set
    #[arg(long, env = "ENTRANT_LOG", default_value = "info")]
    pub log_filter: String,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        self.addr
            .parse()
            .with_context(|| format!("invalid listen address `{}`", self.addr))
    }
}
