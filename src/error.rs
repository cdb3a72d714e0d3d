// Copyright (c) 2026 The httpflow developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE.txt or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT.txt or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use bytes::Bytes;

/// The error type produced by every fallible operation in this crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A URL string failed to parse. `reason` is a short, stable, human-readable tag
    /// (e.g. `"Invalid scheme"`) rather than a full sentence, so callers can match on it.
    #[error("invalid url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: &'static str },

    /// The wire-format parser rejected a status line, header, or chunk framing token.
    /// `context` identifies which parsing stage failed.
    #[error("http parse error: {context}")]
    HttpParser { context: &'static str },

    /// `simple_http` (and friends) got a final status code outside `[200, 300)`.
    #[error("http status {code}")]
    StatusCode { code: u16, body: Bytes },

    /// The redirect driver followed `max_redirects` hops without landing on a
    /// non-3xx response (or a 3xx with no `Location`).
    #[error("too many redirects")]
    TooManyRedirects,

    /// Transport-level I/O failure: DNS, connect, read, or write.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// TLS handshake or record-layer failure.
    #[error("tls error: {0}")]
    Tls(#[from] rustls::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
