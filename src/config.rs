use clap::Parser;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use crate::store::RedisSettings;

/// Process configuration. Every option can also come from the
/// environment variable named next to it.
#[derive(Parser, Debug, Clone)]
#[command(name = "latency-monitor", version, about = "Latency statistics for one endpoint, read from Redis")]
pub struct Config {
    /// Address to listen on
    #[arg(long, env = "MONITOR_BIND", default_value = "0.0.0.0")]
    pub bind: IpAddr,

    /// HTTP listen port
    #[arg(long, env = "MONITOR_PORT", default_value_t = 1938)]
    pub port: u16,

    /// Redis host holding the samples
    #[arg(long, env = "REDIS_HOST", default_value = "10.0.0.2")]
    pub redis_host: String,

    /// Redis port
    #[arg(long, env = "REDIS_PORT", default_value_t = 6379)]
    pub redis_port: u16,

    /// Logical Redis database the samples live in
    #[arg(long, env = "REDIS_DB", default_value_t = 1)]
    pub redis_db: i64,

    /// Name of the monitored endpoint (key prefix in Redis)
    #[arg(long, env = "MONITOR_ENDPOINT", default_value = "api")]
    pub endpoint: String,

    /// How many of the most recent samples to summarize
    #[arg(
        long,
        env = "SAMPLE_LIMIT",
        default_value_t = 100,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub sample_limit: u32,

    /// Seconds to wait for a Redis connection
    #[arg(long, env = "CONNECT_TIMEOUT_SECS", default_value_t = 10)]
    pub connect_timeout_secs: u64,

    /// Seconds to wait for the sample query
    #[arg(long, env = "QUERY_TIMEOUT_SECS", default_value_t = 10)]
    pub query_timeout_secs: u64,
}

impl Config {
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }

    pub fn redis(&self) -> RedisSettings {
        RedisSettings {
            host: self.redis_host.clone(),
            port: self.redis_port,
            db: self.redis_db,
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            query_timeout: Duration::from_secs(self.query_timeout_secs),
        }
    }
}
