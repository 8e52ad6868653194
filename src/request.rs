use getset::{Getters, MutGetters, Setters};

use tokio::io::AsyncWrite;

use crate::{
    connection::{FastCGIConnectionID, FastCGIRequestID},
    response::HttpResponse,
};

/// One request in flight. Owned by the task serving it and handed by mutable
/// reference to each phase handler in turn.
#[derive(Debug, Getters, MutGetters, Setters)]
pub struct HttpRequest<'a> {
    #[getset(get = "pub")]
    request_id: FastCGIRequestID,
    #[getset(get = "pub")]
    method: &'a str,
    #[getset(get = "pub")]
    uri: &'a str,
    #[getset(get = "pub", set = "pub")]
    args: String,
    #[getset(get = "pub", get_mut = "pub")]
    response: HttpResponse,
}

impl<'a> HttpRequest<'a> {
    pub fn new(request_id: FastCGIRequestID, method: &'a str, uri: &'a str, args: &str) -> Self {
        Self {
            request_id,
            method,
            uri,
            args: args.to_string(),
            response: HttpResponse::default(),
        }
    }

    pub fn from_fastcgi<W: AsyncWrite + Unpin>(
        connection_id: FastCGIConnectionID,
        request: &'a tokio_fastcgi::Request<W>,
    ) -> Self {
        let method = request.get_str_param("request_method").unwrap_or("GET");

        let request_uri = request.get_str_param("request_uri").unwrap_or("/");

        // document_uri is the normalized path; request_uri still carries the query.
        let uri = match request.get_str_param("document_uri") {
            Some(document_uri) => document_uri,
            None => request_uri
                .split_once('?')
                .map_or(request_uri, |(path, _)| path),
        };

        let args = request.get_str_param("query_string").unwrap_or("");

        Self::new(
            FastCGIRequestID::new(connection_id, request.get_request_id()),
            method,
            uri,
            args,
        )
    }

    pub fn into_response(self) -> HttpResponse {
        self.response
    }
}
