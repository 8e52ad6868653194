use async_trait::async_trait;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;

use log::{debug, info};

use tokio::net::{TcpListener, TcpStream};

use crate::{
    connection::FastCGIConnectionIDFactory, phases::PhaseEngine,
    server::processor::ConnectionProcessor,
};

pub struct TcpServer {
    server_configuration: crate::config::ServerConfiguration,
    engine: Arc<PhaseEngine>,
    connection_id_factory: FastCGIConnectionIDFactory,
}

impl TcpServer {
    pub fn new(
        server_configuration: &crate::config::ServerConfiguration,
        engine: Arc<PhaseEngine>,
    ) -> Self {
        Self {
            server_configuration: server_configuration.clone(),
            engine,
            connection_id_factory: FastCGIConnectionIDFactory::new(),
        }
    }

    async fn create_listener(&self) -> anyhow::Result<TcpListener> {
        let bind_address = self.server_configuration.bind_address();

        let listener = TcpListener::bind(bind_address)
            .await
            .with_context(|| format!("TcpListener::bind error bind_address '{}'", bind_address))?;

        let local_addr = listener.local_addr().context("local_addr error")?;

        info!("TcpServer listening on {:?}", local_addr);

        Ok(listener)
    }

    fn handle_connection(&self, stream: TcpStream, address: SocketAddr) {
        let connection_id = self.connection_id_factory.new_connection_id();

        debug!("connection_id {:?} from {:?}", connection_id, address);

        ConnectionProcessor::new(
            connection_id,
            Arc::clone(&self.engine),
            self.server_configuration.fastcgi_connection_configuration(),
        )
        .start(stream.into_split());
    }
}

#[async_trait]
impl super::SocketServer for TcpServer {
    async fn run(&self) -> anyhow::Result<()> {
        let listener = self
            .create_listener()
            .await
            .context("TcpServer::create_listener error")?;

        loop {
            let (stream, address) = listener
                .accept()
                .await
                .context("TcpListener::accept error")?;

            self.handle_connection(stream, address);
        }
    }
}
