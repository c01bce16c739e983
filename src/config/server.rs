//! Server configuration types.
//!
//! Listener bindings for the proxy and the optional Prometheus scrape
//! endpoint. Default values are sourced from `crate::constants`.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_ADDRESS, DEFAULT_PORT, DEFAULT_THREADS};

fn default_address() -> String {
    DEFAULT_ADDRESS.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

// Default worker thread count
fn default_threads() -> usize {
    DEFAULT_THREADS
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_address")]
    pub address: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Number of worker threads (default: 4)
    #[serde(default = "default_threads")]
    pub threads: usize,
    /// Port of the Prometheus scrape endpoint; disabled when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics_port: Option<u16>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            port: default_port(),
            threads: default_threads(),
            metrics_port: None,
        }
    }
}

impl ServerConfig {
    /// `address:port` of the proxy listener
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }

    /// `address:port` of the metrics listener, when enabled
    pub fn metrics_addr(&self) -> Option<String> {
        self.metrics_port
            .map(|port| format!("{}:{}", self.address, port))
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.address.trim().is_empty() {
            return Err("server.address cannot be empty".to_string());
        }
        if self.threads == 0 {
            return Err("server.threads must be at least 1".to_string());
        }
        if self.metrics_port == Some(self.port) {
            return Err(format!(
                "server.metrics_port {} collides with server.port",
                self.port
            ));
        }
        Ok(())
    }
}
