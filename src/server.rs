mod processor;
mod tcp;
mod unix;

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    config::{ServerConfiguration, ServerType},
    phases::PhaseEngine,
};

#[async_trait]
trait SocketServer {
    async fn run(&self) -> anyhow::Result<()>;
}

pub struct Server {
    socket_server: Box<dyn SocketServer>,
}

impl Server {
    pub fn new(engine: Arc<PhaseEngine>, server_configuration: &ServerConfiguration) -> Self {
        let socket_server: Box<dyn SocketServer> = match server_configuration.server_type() {
            ServerType::TCP => Box::new(tcp::TcpServer::new(server_configuration, engine)),
            ServerType::UNIX => Box::new(unix::UnixServer::new(server_configuration, engine)),
        };

        Self { socket_server }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        self.socket_server.run().await
    }
}
