// Copyright (c) 2026 The httpflow developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE.txt or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT.txt or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A loopback harness that speaks raw scripted bytes, so tests exercise the header
//! parser, body framing, and pool interplay together rather than mocking at the
//! transport boundary.

use std::net::SocketAddr;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Binds a loopback listener, accepts exactly one connection, and for each entry in
/// `responses` reads (and discards) one request head before writing the scripted bytes
/// back verbatim. Relies on the client pooling and reusing the same plaintext socket
/// across a redirect hop to the same origin, matching how `httpflow`'s pool actually
/// behaves.
pub async fn serve_script(responses: Vec<&'static [u8]>) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        for response in responses {
            read_request_head(&mut socket).await;
            socket.write_all(response).await.unwrap();
        }
    });
    addr
}

async fn read_request_head(socket: &mut tokio::net::TcpStream) {
    let mut buf = Vec::new();
    let mut byte = [0u8; 1];
    loop {
        let n = socket.read(&mut byte).await.unwrap();
        if n == 0 {
            break;
        }
        buf.push(byte[0]);
        if buf.ends_with(b"\r\n\r\n") {
            break;
        }
    }
}
