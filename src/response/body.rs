use std::sync::Arc;

#[derive(Debug, Clone)]
pub enum HttpResponseBody {
    ArcBytes(Arc<[u8]>),

    Bytes(Vec<u8>),
}

impl HttpResponseBody {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::ArcBytes(a) => &a[..],
            Self::Bytes(b) => b.as_slice(),
        }
    }
}

impl From<Arc<[u8]>> for HttpResponseBody {
    fn from(a: Arc<[u8]>) -> Self {
        Self::ArcBytes(a)
    }
}

impl From<Vec<u8>> for HttpResponseBody {
    fn from(b: Vec<u8>) -> Self {
        Self::Bytes(b)
    }
}

/// One link of the output chain. `last_buf` marks the end of the body.
#[derive(Debug, Clone)]
pub struct BodyBuf {
    pub data: HttpResponseBody,
    pub last_buf: bool,
}

impl BodyBuf {
    pub fn last(data: impl Into<HttpResponseBody>) -> Self {
        Self {
            data: data.into(),
            last_buf: true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BodyChain {
    bufs: Vec<BodyBuf>,
}

impl BodyChain {
    pub fn single(buf: BodyBuf) -> Self {
        Self { bufs: vec![buf] }
    }

    pub fn is_empty(&self) -> bool {
        self.bufs.is_empty()
    }

    /// Total number of body bytes across all links.
    pub fn len(&self) -> usize {
        self.bufs.iter().map(|b| b.data.as_bytes().len()).sum()
    }

    pub fn is_complete(&self) -> bool {
        self.bufs.last().map_or(false, |b| b.last_buf)
    }

    pub fn iter(&self) -> impl Iterator<Item = &[u8]> {
        self.bufs.iter().map(|b| b.data.as_bytes())
    }
}
