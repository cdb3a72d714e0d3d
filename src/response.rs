// Copyright (c) 2026 The httpflow developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE.txt or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT.txt or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Reads the response status line and headers off the wire.

use bytes::Bytes;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::error::{Error, Result};
use crate::request::HeaderList;

/// The parsed status line, with the reason phrase preserved verbatim.
#[derive(Debug, Clone)]
pub struct Status {
    pub version: Bytes,
    pub code: u16,
    pub reason: Bytes,
}

impl Status {
    pub fn is_redirect(&self) -> bool {
        (300..400).contains(&self.code)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.code)
    }
}

/// Looks up a header value by case-insensitive name, returning the first match in
/// document order.
pub fn header<'a>(headers: &'a HeaderList, name: &str) -> Option<&'a Bytes> {
    headers
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name.as_bytes()))
        .map(|(_, v)| v)
}

pub(crate) async fn read_line<R: AsyncBufRead + Unpin>(reader: &mut R, context: &'static str) -> Result<Bytes> {
    let mut line = Vec::new();
    let n = reader
        .read_until(b'\n', &mut line)
        .await
        .map_err(Error::Io)?;
    if n == 0 {
        return Err(Error::HttpParser { context });
    }
    if line.last() == Some(&b'\n') {
        line.pop();
        if line.last() == Some(&b'\r') {
            line.pop();
        }
    }
    Ok(Bytes::from(line))
}

/// Reads and parses the status line and header block, stopping at the terminating blank
/// line. Leaves the reader positioned at the first body byte.
pub async fn parse_status_and_headers<R: AsyncBufRead + Unpin>(
    reader: &mut R,
) -> Result<(Status, HeaderList)> {
    let status_line = read_line(reader, "Status line").await?;
    let status = parse_status_line(&status_line)?;

    let mut headers = HeaderList::new();
    loop {
        let line = read_line(reader, "Header line").await?;
        if line.is_empty() {
            break;
        }
        let colon = line
            .iter()
            .position(|&b| b == b':')
            .ok_or(Error::HttpParser { context: "Header line" })?;
        let name = Bytes::copy_from_slice(&line[..colon]);
        let mut value = &line[colon + 1..];
        while value.first() == Some(&b' ') || value.first() == Some(&b'\t') {
            value = &value[1..];
        }
        headers.push((name, Bytes::copy_from_slice(value)));
    }

    Ok((status, headers))
}

fn parse_status_line(line: &[u8]) -> Result<Status> {
    let text = line;
    let first_space = text
        .iter()
        .position(|&b| b == b' ')
        .ok_or(Error::HttpParser { context: "Status line" })?;
    let version = Bytes::copy_from_slice(&text[..first_space]);
    let rest = &text[first_space + 1..];
    let second_space = rest
        .iter()
        .position(|&b| b == b' ')
        .ok_or(Error::HttpParser { context: "Status line" })?;
    let code_str =
        std::str::from_utf8(&rest[..second_space]).map_err(|_| Error::HttpParser { context: "Status line" })?;
    let code: u16 = code_str.parse().map_err(|_| Error::HttpParser { context: "Status line" })?;
    let reason = Bytes::copy_from_slice(&rest[second_space + 1..]);
    Ok(Status { version, code, reason })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tokio::io::BufReader;

    #[tokio::test]
    async fn parses_status_line_and_headers() {
        let raw = b"HTTP/1.1 200 OK\r\nContent-Length: 5\r\nX-Foo:  bar\r\n\r\nhello";
        let mut reader = BufReader::new(Cursor::new(raw.to_vec()));
        let (status, headers) = parse_status_and_headers(&mut reader).await.unwrap();
        assert_eq!(status.code, 200);
        assert_eq!(&status.reason[..], b"OK".as_ref());
        assert_eq!(header(&headers, "content-length").unwrap(), &Bytes::from_static(b"5"));
        assert_eq!(header(&headers, "x-foo").unwrap(), &Bytes::from_static(b"bar"));
    }

    #[tokio::test]
    async fn rejects_malformed_status_line() {
        let raw = b"nonsense\r\n\r\n";
        let mut reader = BufReader::new(Cursor::new(raw.to_vec()));
        let err = parse_status_and_headers(&mut reader).await.unwrap_err();
        match err {
            Error::HttpParser { context } => assert_eq!(context, "Status line"),
            _ => panic!("expected HttpParser"),
        }
    }
}
