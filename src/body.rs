// Copyright (c) 2026 The httpflow developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE.txt or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT.txt or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Chooses and drives the response body framing (§4.5) and splices in gzip (§4.6).

use bytes::Bytes;
use tokio::io::{AsyncReadExt, BufReader};

use crate::chunked::ChunkedReader;
use crate::error::Result;
use crate::gzip::GzipDecoder;
use crate::request::HeaderList;
use crate::response::header;
use crate::transport::Transport;

/// The buffered transport every framing variant reads from.
pub type Conn = BufReader<Transport>;

/// The lazily-pulled, already-framed (and, if applicable, already-decompressed) response
/// body. See the crate-level design note on why this is a hand-rolled pull interface
/// rather than a `futures::Stream` impl.
pub enum BodyStream {
    Empty(Conn),
    ContentLength {
        reader: Conn,
        remaining: u64,
        chunk_size: usize,
    },
    Chunked(ChunkedReader<Conn>),
    ToEof {
        reader: Conn,
        chunk_size: usize,
        eof: bool,
    },
    Gzip {
        inner: Box<BodyStream>,
        decoder: GzipDecoder,
        eof: bool,
    },
}

impl BodyStream {
    /// Chooses the framing per §4.5: HEAD responses carry no body; chunked beats
    /// Content-Length; absent both, the body runs to end-of-connection.
    pub fn frame(method: &[u8], headers: &HeaderList, reader: Conn, chunk_size: usize) -> BodyStream {
        if method.eq_ignore_ascii_case(b"HEAD") {
            return BodyStream::Empty(reader);
        }

        if let Some(te) = header(headers, "transfer-encoding") {
            if te.eq_ignore_ascii_case(b"chunked") {
                return BodyStream::Chunked(ChunkedReader::new(reader));
            }
        }

        if let Some(len) = header(headers, "content-length") {
            if let Ok(len_str) = std::str::from_utf8(len) {
                if let Ok(n) = len_str.trim().parse::<u64>() {
                    return BodyStream::ContentLength {
                        reader,
                        remaining: n,
                        chunk_size,
                    };
                }
            }
        }

        BodyStream::ToEof {
            reader,
            chunk_size,
            eof: false,
        }
    }

    /// Wraps `self` in a gzip-decoding stage if `Content-Encoding: gzip` is present (§4.6).
    pub fn maybe_decompress(self, headers: &HeaderList) -> BodyStream {
        match header(headers, "content-encoding") {
            Some(v) if v.eq_ignore_ascii_case(b"gzip") => BodyStream::Gzip {
                inner: Box::new(self),
                decoder: GzipDecoder::new(),
                eof: false,
            },
            _ => self,
        }
    }

    /// Pulls the next chunk, or `None` once the body has been fully framed and delivered.
    pub async fn next_chunk(&mut self) -> Result<Option<Bytes>> {
        match self {
            BodyStream::Empty(_) => Ok(None),
            BodyStream::ContentLength {
                reader,
                remaining,
                chunk_size,
            } => {
                if *remaining == 0 {
                    return Ok(None);
                }
                let take = (*remaining).min(*chunk_size as u64) as usize;
                let mut buf = vec![0u8; take];
                reader.read_exact(&mut buf).await.map_err(crate::error::Error::Io)?;
                *remaining -= take as u64;
                Ok(Some(Bytes::from(buf)))
            }
            BodyStream::Chunked(c) => c.next_chunk().await,
            BodyStream::ToEof {
                reader,
                chunk_size,
                eof,
            } => {
                if *eof {
                    return Ok(None);
                }
                let mut buf = vec![0u8; *chunk_size];
                let n = reader.read(&mut buf).await.map_err(crate::error::Error::Io)?;
                if n == 0 {
                    *eof = true;
                    return Ok(None);
                }
                buf.truncate(n);
                Ok(Some(Bytes::from(buf)))
            }
            BodyStream::Gzip { inner, decoder, eof } => {
                if *eof {
                    return Ok(None);
                }
                loop {
                    match inner.next_chunk().await? {
                        Some(chunk) => {
                            let out = decoder.push(&chunk)?;
                            if !out.is_empty() {
                                return Ok(Some(out));
                            }
                        }
                        None => {
                            *eof = true;
                            let out = decoder.finish()?;
                            return Ok(if out.is_empty() { None } else { Some(out) });
                        }
                    }
                }
            }
        }
    }

    /// True once the body has reached its natural framed end *and* the underlying socket
    /// is still known-good, i.e. eligible for pooling (§4.9). A consumer that stops early
    /// leaves this `false`, so the transport is closed instead. A `ToEof`-framed body
    /// (no `Content-Length`, not chunked) can only finish because the peer already closed
    /// the connection to signal the end of the body — that's the dead socket, not a live
    /// one — so it always reports `false` here even once fully drained.
    pub fn is_complete(&self) -> bool {
        match self {
            BodyStream::Empty(_) => true,
            BodyStream::ContentLength { remaining, .. } => *remaining == 0,
            BodyStream::Chunked(c) => c.is_done(),
            BodyStream::ToEof { .. } => false,
            BodyStream::Gzip { inner, eof, .. } => *eof && inner.is_complete(),
        }
    }

    /// Drains every remaining chunk, discarding the bytes. Used by the buffered consumer
    /// semantics and by callers who only want `is_complete` to become true without caring
    /// about the data.
    pub async fn drain(&mut self) -> Result<()> {
        while self.next_chunk().await?.is_some() {}
        Ok(())
    }

    /// Unwraps the connection back out of the framing (and, if present, decompression)
    /// layers so the engine can decide whether to pool or close it. Any bytes still
    /// sitting in the `BufReader`'s internal buffer are discarded, which is safe because
    /// this crate never pipelines requests on a socket.
    pub(crate) fn into_conn(self) -> Conn {
        match self {
            BodyStream::Empty(reader) => reader,
            BodyStream::ContentLength { reader, .. } => reader,
            BodyStream::Chunked(c) => c.into_inner(),
            BodyStream::ToEof { reader, .. } => reader,
            BodyStream::Gzip { inner, .. } => inner.into_conn(),
        }
    }
}
