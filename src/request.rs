// Copyright (c) 2026 The httpflow developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE.txt or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT.txt or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The request descriptor and its wire serialisation.

use std::sync::Arc;

use bytes::Bytes;

use crate::query::QueryPairs;

/// An ordered, duplicate-preserving header list. Names are compared case-insensitively
/// by every helper in this crate, but stored and transmitted verbatim.
pub type HeaderList = Vec<(Bytes, Bytes)>;

/// A producer of replayable body chunks, used by [`Body::Stream`]. It must be safe to call
/// more than once: the redirect driver may reissue the same request against a new origin.
pub type BodyProducer = Arc<dyn Fn() -> Vec<Bytes> + Send + Sync>;

/// A request body: either fully buffered, or produced lazily with a declared length.
#[derive(Clone)]
pub enum Body {
    Bytes(Bytes),
    Stream { len: u64, producer: BodyProducer },
}

impl Body {
    pub fn len(&self) -> u64 {
        match self {
            Body::Bytes(b) => b.len() as u64,
            Body::Stream { len, .. } => *len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Materialises the body's chunks. For [`Body::Bytes`] this is a single chunk; for
    /// [`Body::Stream`] the producer is invoked fresh every time, which is what makes the
    /// body replayable across redirects.
    pub(crate) fn chunks(&self) -> Vec<Bytes> {
        match self {
            Body::Bytes(b) => vec![b.clone()],
            Body::Stream { producer, .. } => producer(),
        }
    }
}

impl Default for Body {
    fn default() -> Self {
        Body::Bytes(Bytes::new())
    }
}

/// An immutable request descriptor: the canonical output of [`crate::parse_url`], mutated
/// only by the redirect driver and the convenience helpers (e.g. [`crate::url_encoded_body`])
/// before being handed to [`crate::http`].
#[derive(Clone)]
pub struct Request {
    pub method: Bytes,
    pub secure: bool,
    pub host: String,
    pub port: u16,
    pub path: Bytes,
    pub query: QueryPairs,
    pub headers: HeaderList,
    pub body: Body,
}

impl Request {
    /// A bare `GET /` request to `host:port`. Used internally by the URL parser and
    /// redirect driver; most callers will go through [`crate::parse_url`] instead.
    pub fn new(host: impl Into<String>, port: u16, secure: bool) -> Self {
        Request {
            method: Bytes::from_static(b"GET"),
            secure,
            host: host.into(),
            port,
            path: Bytes::from_static(b"/"),
            query: Vec::new(),
            headers: Vec::new(),
            body: Body::default(),
        }
    }

    /// The `Host` header value per §3: bare host if the port is the scheme default,
    /// otherwise `host:port`.
    pub fn host_header(&self) -> String {
        let default_port = if self.secure { 443 } else { 80 };
        if self.port == default_port {
            self.host.clone()
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    fn header_value<'a>(&'a self, name: &str) -> Option<&'a Bytes> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name.as_bytes()))
            .map(|(_, v)| v)
    }

    /// Serialises the request line, injected headers, caller headers, and body into a
    /// single byte buffer ready to write to a transport. `Host`, `Content-Length`, and
    /// `Accept-Encoding` are always engine-controlled: caller-supplied values for those
    /// three names are dropped (engine values win, per §3).
    pub fn serialize(&self, user_agent: Option<&Bytes>) -> Bytes {
        let mut out = Vec::with_capacity(256 + self.body.len() as usize);
        out.extend_from_slice(&self.method);
        out.push(b' ');
        out.extend_from_slice(&self.wire_path());
        out.extend_from_slice(b" HTTP/1.1\r\n");

        out.extend_from_slice(b"Host: ");
        out.extend_from_slice(self.host_header().as_bytes());
        out.extend_from_slice(b"\r\n");

        out.extend_from_slice(b"Content-Length: ");
        out.extend_from_slice(self.body.len().to_string().as_bytes());
        out.extend_from_slice(b"\r\n");

        out.extend_from_slice(b"Accept-Encoding: gzip\r\n");

        if self.header_value("user-agent").is_none() {
            if let Some(ua) = user_agent {
                out.extend_from_slice(b"User-Agent: ");
                out.extend_from_slice(ua);
                out.extend_from_slice(b"\r\n");
            }
        }

        const RESERVED: [&str; 3] = ["host", "content-length", "accept-encoding"];
        for (name, value) in &self.headers {
            if RESERVED
                .iter()
                .any(|r| name.eq_ignore_ascii_case(r.as_bytes()))
            {
                continue;
            }
            out.extend_from_slice(name);
            out.extend_from_slice(b": ");
            out.extend_from_slice(value);
            out.extend_from_slice(b"\r\n");
        }
        out.extend_from_slice(b"\r\n");

        for chunk in self.body.chunks() {
            out.extend_from_slice(&chunk);
        }

        Bytes::from(out)
    }

    /// The path-plus-query the request line carries, e.g. `/a/b?x=1&y=two+words`.
    pub fn wire_path(&self) -> Bytes {
        let mut out = Vec::with_capacity(self.path.len() + 16);
        if self.path.starts_with(b"/") {
            out.extend_from_slice(&self.path);
        } else {
            out.push(b'/');
            out.extend_from_slice(&self.path);
        }
        if !self.query.is_empty() {
            out.push(b'?');
            out.extend_from_slice(&crate::query::render(&self.query));
        }
        Bytes::from(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_header_omits_default_port() {
        let req = Request::new("example.com", 80, false);
        assert_eq!(req.host_header(), "example.com");

        let req = Request::new("example.com", 443, true);
        assert_eq!(req.host_header(), "example.com");
    }

    #[test]
    fn host_header_includes_non_default_port() {
        let req = Request::new("example.com", 8443, true);
        assert_eq!(req.host_header(), "example.com:8443");
    }

    #[test]
    fn wire_path_has_exactly_one_question_mark_in_order() {
        let mut req = Request::new("example.com", 80, false);
        req.path = Bytes::from_static(b"/a/b");
        req.query = vec![
            (b"x".to_vec(), b"1".to_vec()),
            (b"y".to_vec(), b"two words".to_vec()),
        ];
        let wire = req.wire_path();
        assert_eq!(wire.iter().filter(|&&b| b == b'?').count(), 1);
        assert_eq!(&wire[..], b"/a/b?x=1&y=two+words".as_ref());
    }

    #[test]
    fn serialize_injects_reserved_headers_and_drops_caller_overrides() {
        let mut req = Request::new("example.com", 80, false);
        req.body = Body::Bytes(Bytes::from_static(b"hello"));
        req.headers
            .push((Bytes::from_static(b"Content-Length"), Bytes::from_static(b"999")));
        req.headers
            .push((Bytes::from_static(b"X-Custom"), Bytes::from_static(b"yes")));
        let wire = req.serialize(None);
        let text = String::from_utf8_lossy(&wire);
        assert!(text.starts_with("GET / HTTP/1.1\r\n"));
        assert!(text.contains("Content-Length: 5\r\n"));
        assert!(!text.contains("999"));
        assert!(text.contains("X-Custom: yes\r\n"));
        assert!(text.ends_with("hello"));
    }
}
