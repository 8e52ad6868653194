use std::sync::atomic::{AtomicU64, Ordering};

use getset::Getters;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FastCGIConnectionID(pub u64);

pub struct FastCGIConnectionIDFactory {
    next_connection_id: AtomicU64,
}

impl FastCGIConnectionIDFactory {
    pub fn new() -> Self {
        Self {
            next_connection_id: AtomicU64::new(1),
        }
    }

    pub fn new_connection_id(&self) -> FastCGIConnectionID {
        let connection_id = self.next_connection_id.fetch_add(1, Ordering::Relaxed);

        FastCGIConnectionID(connection_id)
    }
}

/// Identifies one FastCGI request: the connection it arrived on plus the
/// request id the web server assigned within that connection.
#[derive(Clone, Copy, Debug, Default, Getters)]
#[getset(get = "pub")]
pub struct FastCGIRequestID {
    connection_id: FastCGIConnectionID,
    request_id: u16,
}

impl FastCGIRequestID {
    pub fn new(connection_id: FastCGIConnectionID, request_id: u16) -> Self {
        Self {
            connection_id,
            request_id,
        }
    }
}
