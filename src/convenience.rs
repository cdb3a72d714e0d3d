// Copyright (c) 2026 The httpflow developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE.txt or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT.txt or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The buffered-response helpers built on top of the streaming engine (§4.11).

use std::future::Future;
use std::sync::Arc;

use bytes::Bytes;

use crate::body::BodyStream;
use crate::error::{Error, Result};
use crate::pool::Pool;
use crate::query;
use crate::redirect::http_follow;
use crate::request::{Body, HeaderList, Request};
use crate::response::Status;
use crate::url::parse_url;

/// A consumer that accumulates every chunk of the body into a single [`Bytes`] and
/// returns it alongside the status and headers. Most one-shot callers want this instead
/// of writing their own `next_chunk` loop.
pub async fn buffered_consumer(
    status: Status,
    headers: HeaderList,
    body: &mut BodyStream,
) -> Result<(Status, HeaderList, Bytes)> {
    let mut buf = Vec::new();
    while let Some(chunk) = body.next_chunk().await? {
        buf.extend_from_slice(&chunk);
    }
    Ok((status, headers, Bytes::from(buf)))
}

/// Parses `url`, follows redirects, buffers the terminal response body, and returns it if
/// the final status is in `[200, 300)`. Runs against a pool created and closed just for
/// this one call. Any other status fails with [`Error::StatusCode`].
pub async fn simple_http(url: &str) -> Result<Bytes> {
    let req = parse_url(url)?;
    with_pool(|pool| async move {
        let (status, _headers, body) = http_follow(req, &pool, buffered_consumer).await?;
        if status.is_success() {
            Ok(body)
        } else {
            Err(Error::StatusCode { code: status.code, body })
        }
    })
    .await
}

/// Sets `req`'s body to the form-urlencoded rendering of `pairs`, switches the method to
/// `POST`, and replaces any existing `Content-Type` header with
/// `application/x-www-form-urlencoded`.
pub fn url_encoded_body(pairs: &[(impl AsRef<[u8]>, impl AsRef<[u8]>)], mut req: Request) -> Request {
    let owned: Vec<(Vec<u8>, Vec<u8>)> = pairs
        .iter()
        .map(|(k, v)| (k.as_ref().to_vec(), v.as_ref().to_vec()))
        .collect();
    let encoded = query::render(&owned);

    req.method = Bytes::from_static(b"POST");
    req.body = Body::Bytes(Bytes::from(encoded));
    req.headers
        .retain(|(name, _)| !name.eq_ignore_ascii_case(b"content-type"));
    req.headers.push((
        Bytes::from_static(b"Content-Type"),
        Bytes::from_static(b"application/x-www-form-urlencoded"),
    ));
    req
}

/// Creates a [`Pool`], runs `f` against it, and guarantees [`Pool::close_all`] runs on
/// every exit path — including a panic unwinding through `f` — via a drop guard.
pub async fn with_pool<F, Fut, T>(f: F) -> Result<T>
where
    F: FnOnce(Arc<Pool>) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    struct CloseOnDrop(Arc<Pool>);
    impl Drop for CloseOnDrop {
        fn drop(&mut self) {
            self.0.close_all();
        }
    }

    let pool = Pool::new();
    let _guard = CloseOnDrop(pool.clone());
    f(pool).await
}
