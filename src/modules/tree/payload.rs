use std::sync::Arc;

use http::{HeaderValue, StatusCode};

use crate::response::{BodyBuf, BodyChain, HttpResponse};

/// Immutable response body shared by every request served from it.
#[derive(Debug, Clone)]
pub struct StaticPayload {
    data: Arc<[u8]>,
    content_type: HeaderValue,
}

impl StaticPayload {
    pub fn new(data: impl AsRef<[u8]>, content_type: &'static str) -> Self {
        Self {
            data: Arc::from(data.as_ref()),
            content_type: HeaderValue::from_static(content_type),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Writes a complete 200 response whose body is exactly this payload.
    pub fn write_response(&self, response: &mut HttpResponse) {
        response.set_status(StatusCode::OK);
        response.set_content_type(self.content_type.clone());
        response.set_content_length(self.len() as u64);
        response.output(BodyChain::single(BodyBuf::last(Arc::clone(&self.data))));
    }
}
