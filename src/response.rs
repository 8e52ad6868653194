mod body;
pub mod responder;

use getset::Getters;

use http::{HeaderMap, HeaderValue, StatusCode};

pub use body::{BodyBuf, BodyChain};

/// Response state of one request: written by phase handlers, consumed by the
/// output stage once the pipeline is done.
#[derive(Debug, Default, Getters)]
#[getset(get = "pub")]
pub struct HttpResponse {
    status: Option<StatusCode>,
    content_length: Option<u64>,
    headers: HeaderMap,
    body: BodyChain,
}

impl HttpResponse {
    pub fn set_status(&mut self, status: StatusCode) {
        self.status = Some(status);
    }

    pub fn set_content_type(&mut self, content_type: HeaderValue) {
        self.headers.insert(http::header::CONTENT_TYPE, content_type);
    }

    #[cfg(test)]
    pub fn content_type(&self) -> Option<&HeaderValue> {
        self.headers.get(http::header::CONTENT_TYPE)
    }

    pub fn set_content_length(&mut self, content_length: u64) {
        self.content_length = Some(content_length);
    }

    pub fn output(&mut self, chain: BodyChain) {
        self.body = chain;
    }

    /// True once a handler (or the host) decided the status.
    pub fn is_final(&self) -> bool {
        self.status.is_some()
    }

    /// Replaces whatever was produced so far with a body-less status response.
    pub fn finalize_with_status(&mut self, status: StatusCode) {
        *self = Self {
            status: Some(status),
            ..Default::default()
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finalize_with_status_discards_partial_response() {
        let mut response = HttpResponse::default();
        response.set_content_type(HeaderValue::from_static("text/plain"));
        response.set_content_length(5);
        response.output(BodyChain::single(BodyBuf::last(b"hello".to_vec())));

        response.finalize_with_status(StatusCode::FORBIDDEN);

        assert_eq!(*response.status(), Some(StatusCode::FORBIDDEN));
        assert!(response.content_type().is_none());
        assert!(response.content_length().is_none());
        assert!(response.body().is_empty());
    }
}
