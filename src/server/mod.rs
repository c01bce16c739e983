// Server module - Pingora HTTP server setup and configuration

use pingora::server::configuration::Opt as ServerOpt;
use pingora::server::Server;
use pingora_core::services::listening::Service;
use thiserror::Error;

use crate::config::Config;
use crate::proxy::ImageViewProxy;
use crate::storage::StorageError;

/// Errors raised while assembling the server
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to create Pingora server: {0}")]
    Pingora(String),

    #[error("Failed to configure object store: {0}")]
    Storage(#[from] StorageError),
}

/// ImageView HTTP server wrapper around Pingora
pub struct ImageViewServer {
    config: Config,
    server_opt: ServerOpt,
}

impl ImageViewServer {
    pub fn new(config: Config, server_opt: ServerOpt) -> Self {
        Self { config, server_opt }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the Pingora server options
    pub fn server_opt(&self) -> &ServerOpt {
        &self.server_opt
    }

    /// Build the Pingora server with the proxy service and, when
    /// `server.metrics_port` is set, the Prometheus scrape service.
    pub fn build(self) -> Result<Server, ServerError> {
        let mut server = Server::new(Some(self.server_opt))
            .map_err(|e| ServerError::Pingora(e.to_string()))?;
        server.bootstrap();

        let proxy = ImageViewProxy::from_config(&self.config)?;

        let mut proxy_service = pingora_proxy::http_proxy_service(&server.configuration, proxy);
        let listen_addr = self.config.server.listen_addr();
        proxy_service.add_tcp(&listen_addr);
        proxy_service.threads = Some(self.config.server.threads);

        tracing::info!(
            address = %listen_addr,
            threads = self.config.server.threads,
            "Proxy listener configured"
        );
        server.add_service(proxy_service);

        if let Some(metrics_addr) = self.config.server.metrics_addr() {
            let mut prometheus_service = Service::prometheus_http_service();
            prometheus_service.add_tcp(&metrics_addr);

            tracing::info!(address = %metrics_addr, "Metrics listener configured");
            server.add_service(prometheus_service);
        }

        Ok(server)
    }
}
