// Copyright (c) 2026 The httpflow developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE.txt or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT.txt or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Composes transport, serialiser, parser, and body framing into one round-trip (§4.9).

use std::future::Future;

use tokio::io::{AsyncWriteExt, BufReader};

use crate::body::BodyStream;
use crate::error::Result;
use crate::pool::Pool;
use crate::request::{HeaderList, Request};
use crate::response::{parse_status_and_headers, Status};
use crate::transport::Transport;

/// Runs one request/response round-trip against `pool`, handing the parsed status,
/// headers, and a `&mut` body stream to `consumer`. The consumer reads as much (or as
/// little) of the body as it wants; afterwards, a plaintext socket whose body was fully
/// consumed is returned to the pool, and everything else (TLS, an early-stopped body, an
/// error path) is closed instead.
pub async fn http<F, Fut, T>(req: &Request, pool: &Pool, consumer: F) -> Result<T>
where
    F: FnOnce(Status, HeaderList, &mut BodyStream) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let transport = dial(req, pool).await?;
    let mut conn = BufReader::new(transport);

    let wire = req.serialize(pool.config.user_agent.as_ref());
    conn.get_mut().write_all(&wire).await?;
    log::trace!("wrote {} request bytes to {}:{}", wire.len(), req.host, req.port);

    let (status, headers) = parse_status_and_headers(&mut conn).await?;
    log::trace!("parsed status {} from {}:{}", status.code, req.host, req.port);

    let mut body = BodyStream::frame(&req.method, &headers, conn, pool.config.read_chunk_size)
        .maybe_decompress(&headers);

    let result = consumer(status, headers, &mut body).await;

    let complete = result.is_ok() && body.is_complete();
    let transport = body.into_conn().into_inner();
    settle(req, pool, transport, complete);

    result
}

async fn dial(req: &Request, pool: &Pool) -> Result<Transport> {
    if req.secure {
        return Transport::connect_tls(&req.host, req.port).await;
    }

    if let Some(socket) = pool.acquire(&req.host, req.port) {
        return Ok(Transport::Plain(socket));
    }

    log::debug!("dialing new plaintext connection to {}:{}", req.host, req.port);
    let socket = Transport::connect_plain(&req.host, req.port).await?;
    Ok(Transport::Plain(socket))
}

/// Releases `transport` to the pool if it's plaintext and `body_complete` is true;
/// otherwise drops it, closing the connection.
fn settle(req: &Request, pool: &Pool, transport: Transport, body_complete: bool) {
    if body_complete {
        if let Some(socket) = transport.into_plain() {
            pool.release(&req.host, req.port, socket);
        }
        return;
    }
    if transport.into_plain().is_some() {
        log::warn!(
            "closing connection to {}:{} instead of pooling: body not fully consumed",
            req.host,
            req.port
        );
    }
}
