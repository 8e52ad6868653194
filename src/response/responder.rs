use std::{fmt::Write, sync::Arc};

use log::{debug, warn};

use tokio::io::AsyncWrite;

use tokio_fastcgi::{Request, RequestResult};

use super::HttpResponse;

#[derive(thiserror::Error, Debug)]
pub enum SendResponseError {
    #[error("build header string error: {0}")]
    BuildHeaderStringError(#[from] std::fmt::Error),

    #[error("content length mismatch: advertised {advertised} body {actual}")]
    ContentLengthMismatch { advertised: u64, actual: u64 },

    #[error("body chain has no final buffer")]
    IncompleteBody,

    #[error("tokio_fastcgi write error: {0}")]
    TokioFastCGIWriteError(#[from] tokio_fastcgi::Error),
}

/// Serializes the CGI response header block. The advertised length must match
/// the body chain exactly and a non-empty chain must end with its final
/// buffer; otherwise nothing is sent.
pub fn build_header_string(response: &HttpResponse) -> Result<String, SendResponseError> {
    if !response.body().is_empty() && !response.body().is_complete() {
        return Err(SendResponseError::IncompleteBody);
    }

    let body_length = response.body().len() as u64;

    let content_length = match *response.content_length() {
        Some(advertised) if advertised != body_length => {
            return Err(SendResponseError::ContentLengthMismatch {
                advertised,
                actual: body_length,
            });
        }
        Some(advertised) => advertised,
        None => body_length,
    };

    let status = (*response.status()).unwrap_or(http::StatusCode::INTERNAL_SERVER_ERROR);

    let mut header_string = String::new();

    write!(
        header_string,
        "Status: {} {}\n",
        status.as_u16(),
        status.canonical_reason().unwrap_or("[Unknown]")
    )?;

    for (key, value) in response.headers() {
        write!(
            header_string,
            "{}: {}\n",
            key.as_str(),
            value.to_str().unwrap_or("[Unknown]")
        )?;
    }

    write!(header_string, "content-length: {}\n", content_length)?;

    header_string.push('\n');

    Ok(header_string)
}

pub struct Responder<W>
where
    W: AsyncWrite + Unpin,
{
    request: Arc<Request<W>>,
    response: HttpResponse,
}

impl<W> Responder<W>
where
    W: AsyncWrite + Unpin,
{
    pub fn new(request: Arc<Request<W>>, response: HttpResponse) -> Self {
        Self { request, response }
    }

    async fn internal_send_response(self) -> Result<(), SendResponseError> {
        let header_string = build_header_string(&self.response)?;

        let mut stdout = self.request.get_stdout();

        stdout.write(header_string.as_bytes()).await?;

        for chunk in self.response.body().iter() {
            stdout.write(chunk).await?;
        }

        Ok(())
    }

    pub async fn respond(self) -> RequestResult {
        debug!("respond response = {:?}", self.response);

        match self.internal_send_response().await {
            Ok(_) => RequestResult::Complete(0),
            Err(err) => {
                warn!("send response failed: {}", err);
                RequestResult::Complete(1)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use http::{HeaderValue, StatusCode};

    use super::*;
    use crate::response::{BodyBuf, BodyChain};

    fn text_response(advertised: Option<u64>) -> HttpResponse {
        let payload: Arc<[u8]> = Arc::from(&b"hello world"[..]);

        let mut response = HttpResponse::default();
        response.set_status(StatusCode::OK);
        response.set_content_type(HeaderValue::from_static("text/plain"));
        if let Some(advertised) = advertised {
            response.set_content_length(advertised);
        }
        response.output(BodyChain::single(BodyBuf::last(payload)));
        response
    }

    #[test]
    fn header_block_advertises_exact_body_length() {
        let header_string = build_header_string(&text_response(Some(11))).unwrap();

        assert_eq!(
            header_string,
            "Status: 200 OK\ncontent-type: text/plain\ncontent-length: 11\n\n"
        );
    }

    #[test]
    fn missing_content_length_is_computed_from_body() {
        let header_string = build_header_string(&text_response(None)).unwrap();

        assert!(header_string.contains("content-length: 11\n"));
    }

    #[test]
    fn length_past_end_of_payload_is_rejected() {
        let err = build_header_string(&text_response(Some(12))).unwrap_err();

        assert!(matches!(
            err,
            SendResponseError::ContentLengthMismatch {
                advertised: 12,
                actual: 11
            }
        ));
    }

    #[test]
    fn body_without_final_buffer_is_rejected() {
        let mut response = HttpResponse::default();
        response.set_status(StatusCode::OK);
        response.output(BodyChain::single(BodyBuf {
            data: b"hello".to_vec().into(),
            last_buf: false,
        }));

        let err = build_header_string(&response).unwrap_err();

        assert!(matches!(err, SendResponseError::IncompleteBody));
    }

    #[test]
    fn not_found_has_empty_body() {
        let mut response = HttpResponse::default();
        response.finalize_with_status(StatusCode::NOT_FOUND);

        let header_string = build_header_string(&response).unwrap();

        assert_eq!(header_string, "Status: 404 Not Found\ncontent-length: 0\n\n");
    }
}
