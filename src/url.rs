// Copyright (c) 2026 The httpflow developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE.txt or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT.txt or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Turns a URL string into a canonical [`Request`] descriptor.

use bytes::Bytes;

use crate::error::{Error, Result};
use crate::percent;
use crate::query;
use crate::request::Request;

/// Parses `input` into a canonical request descriptor with method `GET`, an empty body,
/// and no caller headers. See SPEC_FULL.md §4.1 for the grammar.
pub fn parse_url(input: &str) -> Result<Request> {
    let (secure, rest) = if let Some(rest) = input.strip_prefix("http://") {
        (false, rest)
    } else if let Some(rest) = input.strip_prefix("https://") {
        (true, rest)
    } else {
        return Err(Error::InvalidUrl {
            url: input.to_string(),
            reason: "Invalid scheme",
        });
    };

    // Non-ASCII bytes are percent-encoded on the fly so the rest of the parser can work on
    // plain ASCII delimiters. ASCII bytes, including reserved delimiters, pass through
    // untouched at this stage.
    let rest = prescape_non_ascii(rest.as_bytes());

    let slash = rest.iter().position(|&b| b == b'/');
    let (authority, path_and_query) = match slash {
        Some(i) => (&rest[..i], &rest[i..]),
        None => (&rest[..], &rest[0..0]),
    };

    let (host, port) = parse_authority(authority, secure, input)?;

    let raw_path = match path_and_query.iter().position(|&b| b == b'?') {
        Some(i) => &path_and_query[..i],
        None => path_and_query,
    };
    let raw_query_and_fragment = match path_and_query.iter().position(|&b| b == b'?') {
        Some(i) => &path_and_query[i + 1..],
        None => &path_and_query[0..0],
    };
    let raw_query = match raw_query_and_fragment.iter().position(|&b| b == b'#') {
        Some(i) => &raw_query_and_fragment[..i],
        None => raw_query_and_fragment,
    };

    let path = if raw_path.is_empty() {
        Bytes::from_static(b"/")
    } else {
        Bytes::from(percent::encode_path(raw_path))
    };

    let mut req = Request::new(host, port, secure);
    req.path = path;
    req.query = query::parse(raw_query);
    Ok(req)
}

/// Splits an authority (`host`, `host:port`, `[v6]`, or `[v6]:port`) into host and port,
/// applying scheme defaults. `original` is only used to build error messages.
fn parse_authority(authority: &[u8], secure: bool, original: &str) -> Result<(String, u16)> {
    let default_port: u16 = if secure { 443 } else { 80 };

    if authority.first() == Some(&b'[') {
        let close = authority.iter().position(|&b| b == b']').ok_or_else(|| Error::InvalidUrl {
            url: original.to_string(),
            reason: "Invalid host",
        })?;
        let host = String::from_utf8_lossy(&authority[1..close]).into_owned();
        let rest = &authority[close + 1..];
        let port = if rest.is_empty() {
            default_port
        } else if let Some(port_bytes) = rest.strip_prefix(b":".as_ref()) {
            parse_port(port_bytes, original)?
        } else {
            return Err(Error::InvalidUrl {
                url: original.to_string(),
                reason: "Invalid host",
            });
        };
        return Ok((host, port));
    }

    match authority.iter().position(|&b| b == b':') {
        Some(i) => {
            let host = String::from_utf8_lossy(&authority[..i]).into_owned();
            let port = parse_port(&authority[i + 1..], original)?;
            Ok((host, port))
        }
        None => {
            let host = String::from_utf8_lossy(authority).into_owned();
            Ok((host, default_port))
        }
    }
}

fn parse_port(bytes: &[u8], original: &str) -> Result<u16> {
    let s = std::str::from_utf8(bytes).map_err(|_| Error::InvalidUrl {
        url: original.to_string(),
        reason: "Invalid port",
    })?;
    s.parse::<u16>().map_err(|_| Error::InvalidUrl {
        url: original.to_string(),
        reason: "Invalid port",
    })
}

fn prescape_non_ascii(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len());
    for &b in input {
        if b < 0x80 {
            out.push(b);
        } else {
            out.push(b'%');
            const HEX: &[u8; 16] = b"0123456789ABCDEF";
            out.push(HEX[(b >> 4) as usize]);
            out.push(HEX[(b & 0xf) as usize]);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_http_root() {
        let req = parse_url("http://example.com/").unwrap();
        assert_eq!(req.host, "example.com");
        assert_eq!(req.port, 80);
        assert!(!req.secure);
        assert_eq!(&req.path[..], b"/".as_ref());
        assert!(req.query.is_empty());
        assert_eq!(&req.method[..], b"GET".as_ref());
    }

    #[test]
    fn parses_https_with_port_query_and_fragment() {
        let req = parse_url("https://example.com:8443/a/b?x=1&y=two%20words#frag").unwrap();
        assert_eq!(req.port, 8443);
        assert!(req.secure);
        assert_eq!(&req.path[..], b"/a/b".as_ref());
        assert_eq!(
            req.query,
            vec![
                (b"x".to_vec(), b"1".to_vec()),
                (b"y".to_vec(), b"two words".to_vec()),
            ]
        );
        let wire = req.wire_path();
        assert_eq!(&wire[..], b"/a/b?x=1&y=two+words".as_ref());
        assert!(!String::from_utf8_lossy(&wire).contains("frag"));
    }

    #[test]
    fn rejects_unknown_scheme() {
        let err = parse_url("ftp://x").unwrap_err();
        match err {
            Error::InvalidUrl { url, reason } => {
                assert_eq!(url, "ftp://x");
                assert_eq!(reason, "Invalid scheme");
            }
            _ => panic!("expected InvalidUrl"),
        }
    }

    #[test]
    fn rejects_non_numeric_port() {
        let err = parse_url("http://example.com:abc/").unwrap_err();
        match err {
            Error::InvalidUrl { reason, .. } => assert_eq!(reason, "Invalid port"),
            _ => panic!("expected InvalidUrl"),
        }
    }

    #[test]
    fn empty_path_becomes_root() {
        let req = parse_url("http://example.com").unwrap();
        assert_eq!(&req.path[..], b"/".as_ref());
    }

    #[test]
    fn parses_ipv6_literal_with_port() {
        let req = parse_url("http://[::1]:8080/x").unwrap();
        assert_eq!(req.host, "::1");
        assert_eq!(req.port, 8080);
        assert_eq!(&req.path[..], b"/x".as_ref());
    }

    #[test]
    fn parses_ipv6_literal_without_port_uses_scheme_default() {
        let req = parse_url("https://[::1]/").unwrap();
        assert_eq!(req.host, "::1");
        assert_eq!(req.port, 443);
    }
}
