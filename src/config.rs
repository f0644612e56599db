/*!
 * Server Configuration
 * Command-line arguments with environment variable fallbacks
 */

use crate::core::limits::{DEFAULT_PORT, DEFAULT_TOTAL_MEMORY};
use crate::core::types::Size;
use clap::Parser;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "gc-manager")]
#[command(about = "Simulated memory manager with pluggable GC strategies and a WebSocket dashboard channel")]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long, env = "GC_HOST", default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    pub host: IpAddr,

    /// WebSocket server port
    #[arg(short, long, env = "GC_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Size of the simulated memory space in bytes
    #[arg(long, env = "GC_TOTAL_MEMORY", default_value_t = DEFAULT_TOTAL_MEMORY)]
    pub total_memory: Size,

    /// Real seconds per settings "minute"
    #[arg(long, env = "GC_TICK_SECONDS", default_value_t = 60, value_parser = clap::value_parser!(u64).range(1..))]
    pub tick_seconds: u64,

    /// Full state push period in milliseconds
    #[arg(long, env = "GC_PUSH_INTERVAL_MS", default_value_t = 2000, value_parser = clap::value_parser!(u64).range(1..))]
    pub push_interval_ms: u64,

    /// Seed for a reproducible ledger and collection sequence
    #[arg(long, env = "GC_SEED")]
    pub seed: Option<u64>,
}

impl ServerConfig {
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn tick_unit(&self) -> Duration {
        Duration::from_secs(self.tick_seconds)
    }

    pub fn push_interval(&self) -> Duration {
        Duration::from_millis(self.push_interval_ms)
    }
}
