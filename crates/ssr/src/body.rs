//! Response body produced by the assembler.

use std::fmt;

use bytes::{Bytes, BytesMut};
use futures_util::{stream::BoxStream, StreamExt};

/// Either a complete document or a live stream of document bytes.
pub enum DocumentBody {
    Complete(Bytes),
    Streaming(BoxStream<'static, Bytes>),
}

impl DocumentBody {
    pub fn is_streaming(&self) -> bool {
        matches!(self, DocumentBody::Streaming(_))
    }

    /// Drain the body into memory.
    pub async fn collect(self) -> Bytes {
        match self {
            DocumentBody::Complete(bytes) => bytes,
            DocumentBody::Streaming(mut stream) => {
                let mut buf = BytesMut::new();
                while let Some(chunk) = stream.next().await {
                    buf.extend_from_slice(&chunk);
                }
                buf.freeze()
            }
        }
    }
}

impl From<String> for DocumentBody {
    fn from(html: String) -> Self {
        DocumentBody::Complete(Bytes::from(html))
    }
}

impl From<&'static str> for DocumentBody {
    fn from(html: &'static str) -> Self {
        DocumentBody::Complete(Bytes::from_static(html.as_bytes()))
    }
}

impl fmt::Debug for DocumentBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentBody::Complete(bytes) => f
                .debug_tuple("Complete")
                .field(&bytes.len())
                .finish(),
            DocumentBody::Streaming(_) => f.write_str("Streaming(..)"),
        }
    }
}
