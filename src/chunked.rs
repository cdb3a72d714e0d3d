// Copyright (c) 2026 The httpflow developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE.txt or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT.txt or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Decodes `Transfer-Encoding: chunked` bodies.
//!
//! Each call to [`ChunkedReader::next_chunk`] reads one hex-length-prefixed chunk. The
//! underlying `AsyncBufRead` already buffers and splits inbound bytes at the socket layer,
//! so the "inbound buffer longer than the current chunk's remaining length" case the spec
//! describes is handled by `read_exact` against the buffered reader rather than by bespoke
//! bookkeeping here.

use bytes::Bytes;
use tokio::io::{AsyncBufRead, AsyncReadExt};

use crate::error::{Error, Result};
use crate::response::read_line;

pub struct ChunkedReader<R> {
    reader: R,
    done: bool,
}

impl<R: AsyncBufRead + Unpin> ChunkedReader<R> {
    pub fn new(reader: R) -> Self {
        ChunkedReader { reader, done: false }
    }

    /// True once the terminating zero-length chunk has been consumed.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Unwraps the underlying reader, regardless of whether the chunk stream ran to
    /// completion.
    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Returns the next chunk's bytes, or `None` once the terminating zero-length chunk
    /// (and any trailers) has been consumed.
    pub async fn next_chunk(&mut self) -> Result<Option<Bytes>> {
        if self.done {
            return Ok(None);
        }

        let size_line = read_line(&mut self.reader, "Chunk header").await?;
        let size_field = match size_line.iter().position(|&b| b == b';') {
            Some(i) => &size_line[..i],
            None => &size_line[..],
        };
        let size_str = std::str::from_utf8(size_field)
            .map_err(|_| Error::HttpParser { context: "Chunk header" })?
            .trim();
        let size = u64::from_str_radix(size_str, 16).map_err(|_| Error::HttpParser { context: "Chunk header" })?;

        if size == 0 {
            loop {
                let trailer = read_line(&mut self.reader, "Chunk trailer").await?;
                if trailer.is_empty() {
                    break;
                }
            }
            self.done = true;
            return Ok(None);
        }

        let mut buf = vec![0u8; size as usize];
        self.reader.read_exact(&mut buf).await.map_err(Error::Io)?;

        let trailing = read_line(&mut self.reader, "End of chunk newline").await?;
        if !trailing.is_empty() {
            return Err(Error::HttpParser { context: "End of chunk newline" });
        }

        Ok(Some(Bytes::from(buf)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tokio::io::BufReader;

    #[tokio::test]
    async fn decodes_multiple_chunks_to_original_body() {
        let raw = b"5\r\nhello\r\n6\r\n world\r\n0\r\n\r\n";
        let mut chunks = ChunkedReader::new(BufReader::new(Cursor::new(raw.to_vec())));
        let mut body = Vec::new();
        while let Some(chunk) = chunks.next_chunk().await.unwrap() {
            body.extend_from_slice(&chunk);
        }
        assert_eq!(body, b"hello world");
    }

    #[tokio::test]
    async fn zero_length_chunk_terminates_immediately() {
        let raw = b"0\r\n\r\n";
        let mut chunks = ChunkedReader::new(BufReader::new(Cursor::new(raw.to_vec())));
        assert!(chunks.next_chunk().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn ignores_chunk_extensions_and_trailers() {
        let raw = b"5;foo=bar\r\nhello\r\n0\r\nX-Trailer: ignored\r\n\r\n";
        let mut chunks = ChunkedReader::new(BufReader::new(Cursor::new(raw.to_vec())));
        let mut body = Vec::new();
        while let Some(chunk) = chunks.next_chunk().await.unwrap() {
            body.extend_from_slice(&chunk);
        }
        assert_eq!(body, b"hello");
    }

    #[tokio::test]
    async fn malformed_chunk_header_is_a_parser_error() {
        let raw = b"zz\r\n";
        let mut chunks = ChunkedReader::new(BufReader::new(Cursor::new(raw.to_vec())));
        let err = chunks.next_chunk().await.unwrap_err();
        match err {
            Error::HttpParser { context } => assert_eq!(context, "Chunk header"),
            _ => panic!("expected HttpParser"),
        }
    }
}
