use bytes::Bytes;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::gopher::response::Response;

/// Writes a response body to a client, tracking partial progress.
pub struct ResponseWriter {
    buffer: Bytes,
    written: usize,
}

impl ResponseWriter {
    pub fn new(response: Response) -> Self {
        Self {
            buffer: response.into_bytes(),
            written: 0,
        }
    }

    pub fn written(&self) -> usize {
        self.written
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub async fn write_to_stream<W>(&mut self, stream: &mut W) -> anyhow::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        while self.written < self.buffer.len() {
            let n = stream.write(&self.buffer[self.written..]).await?;

            if n == 0 {
                return Err(anyhow::anyhow!("connection closed while writing"));
            }

            self.written += n;
        }

        stream.flush().await?;
        Ok(())
    }
}
