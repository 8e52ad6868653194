use async_trait::async_trait;

use std::sync::Arc;

use anyhow::Context;

use log::{debug, info};

use tokio::net::{
    unix::SocketAddr,
    {UnixListener, UnixStream},
};

use crate::{
    connection::FastCGIConnectionIDFactory, phases::PhaseEngine,
    server::processor::ConnectionProcessor,
};

pub struct UnixServer {
    server_configuration: crate::config::ServerConfiguration,
    engine: Arc<PhaseEngine>,
    connection_id_factory: FastCGIConnectionIDFactory,
}

impl UnixServer {
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

    async fn create_listener(&self) -> anyhow::Result<UnixListener> {
        let bind_address = self.server_configuration.bind_address();

        // a stale socket file from a previous run blocks bind
        let remove_result = tokio::fs::remove_file(bind_address).await;
        debug!("remove_result = {:?}", remove_result);

        let listener = UnixListener::bind(bind_address)
            .with_context(|| format!("UnixListener::bind error path '{}'", bind_address))?;

        let local_addr = listener.local_addr().context("local_addr error")?;

        info!("UnixServer listening on {:?}", local_addr);

        Ok(listener)
    }

    fn handle_connection(&self, stream: UnixStream, address: SocketAddr) {
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
impl super::SocketServer for UnixServer {
    async fn run(&self) -> anyhow::Result<()> {
        let listener = self
            .create_listener()
            .await
            .context("UnixServer::create_listener error")?;

        loop {
            let (stream, address) = listener
                .accept()
                .await
                .context("UnixListener::accept error")?;

            self.handle_connection(stream, address);
        }
    }
}
