use std::sync::Arc;

use log::{debug, warn};

use tokio::io::{AsyncRead, AsyncWrite};

use tokio_fastcgi::{Request, Requests};

use crate::{
    connection::FastCGIConnectionID, phases::PhaseEngine, request::HttpRequest,
    response::responder::Responder,
};

pub struct ConnectionProcessor {
    connection_id: FastCGIConnectionID,
    engine: Arc<PhaseEngine>,
    fastcgi_connection_configuration: crate::config::FastCGIConnectionConfiguration,
}

impl ConnectionProcessor {
    pub fn new(
        connection_id: FastCGIConnectionID,
        engine: Arc<PhaseEngine>,
        fastcgi_connection_configuration: &crate::config::FastCGIConnectionConfiguration,
    ) -> Arc<Self> {
        Arc::new(Self {
            connection_id,
            engine,
            fastcgi_connection_configuration: fastcgi_connection_configuration.clone(),
        })
    }

    async fn process_one_request(self: Arc<Self>, request: Request<impl AsyncWrite + Unpin>) {
        if let Err(err) = request
            .process(|request| async move {
                let mut http_request =
                    HttpRequest::from_fastcgi(self.connection_id, request.as_ref());

                debug!(
                    "{:?} {} {}?{}",
                    http_request.request_id(),
                    http_request.method(),
                    http_request.uri(),
                    http_request.args()
                );

                self.engine.run(&mut http_request);

                let http_response = http_request.into_response();

                Responder::new(request, http_response).respond().await
            })
            .await
        {
            warn!("request.process failed: err = {}", err,);
        }
    }

    pub fn start<R, W>(self: Arc<Self>, split_socket: (R, W))
    where
        R: AsyncRead + Unpin + Send + Sync + 'static,
        W: AsyncWrite + Unpin + Send + Sync + 'static,
    {
        // Spawn a task that collects requests from the web server over this
        // connection and spawns one more task per request.
        tokio::spawn(async move {
            let mut requests = Requests::from_split_socket(
                split_socket,
                *self
                    .fastcgi_connection_configuration
                    .max_concurrent_connections(),
                *self
                    .fastcgi_connection_configuration
                    .max_requests_per_connection(),
            );

            while let Ok(Some(request)) = requests.next().await {
                tokio::spawn(Arc::clone(&self).process_one_request(request));
            }

            debug!("connection_id {:?} closed", self.connection_id);
        });
    }
}
