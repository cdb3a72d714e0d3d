// Copyright (c) 2026 The httpflow developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE.txt or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT.txt or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Wraps the engine with 3xx/`Location` handling, bounded by a redirect counter (§4.10).

use std::future::Future;

use bytes::Bytes;

use crate::body::BodyStream;
use crate::engine;
use crate::error::{Error, Result};
use crate::pool::Pool;
use crate::request::{HeaderList, Request};
use crate::response::{header, Status};
use crate::url::parse_url;

enum Hop<T> {
    Done(T),
    Redirect(Request),
}

/// Runs `req` through [`engine::http`], following `[300, 400)` responses that carry a
/// `Location` header until a terminal response arrives (or the redirect cap is reached).
/// `consumer` is invoked exactly once, against the terminal response.
pub async fn http_follow<F, Fut, T>(mut req: Request, pool: &Pool, consumer: F) -> Result<T>
where
    F: FnOnce(Status, HeaderList, &mut BodyStream) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut remaining = pool.config.max_redirects;
    let mut consumer = Some(consumer);

    loop {
        let slot = &mut consumer;
        let current = &req;
        let hop: Hop<T> = engine::http(&req, pool, move |status, headers, body| async move {
            if status.is_redirect() {
                if let Some(location) = header(&headers, "location").cloned() {
                    body.drain().await?;
                    let next = resolve_redirect(current, status.code, &location)?;
                    return Ok(Hop::Redirect(next));
                }
            }
            let consumer = slot.take().expect("consumer is invoked at most once per http_follow call");
            let result = consumer(status, headers, body).await?;
            Ok(Hop::Done(result))
        })
        .await?;

        match hop {
            Hop::Done(result) => return Ok(result),
            Hop::Redirect(next) => {
                if remaining == 0 {
                    return Err(Error::TooManyRedirects);
                }
                remaining -= 1;
                log::debug!(
                    "redirect {}:{}{} -> {}:{}{}",
                    req.host,
                    req.port,
                    String::from_utf8_lossy(&req.wire_path()),
                    next.host,
                    next.port,
                    String::from_utf8_lossy(&next.wire_path())
                );
                req = next;
            }
        }
    }
}

/// Resolves a `Location` header value against `original` into a fresh request descriptor.
/// Per §4.10/§9, the parsed location always carries method `GET` (`parse_url` never
/// produces anything else); for non-303 hops the original request's headers and body are
/// carried forward onto the new descriptor, matching how real redirect chains usually
/// want to keep posting the same payload to a same-meaning resource. For a 303 the body
/// and caller headers are dropped, since "see other" means fetch the new resource plain.
fn resolve_redirect(original: &Request, status_code: u16, location: &Bytes) -> Result<Request> {
    let location_str = std::str::from_utf8(location).map_err(|_| Error::HttpParser {
        context: "Location header",
    })?;

    let absolute = if location_str.starts_with('/') {
        let scheme = if original.secure { "https" } else { "http" };
        format!("{scheme}://{}:{}{location_str}", original.host, original.port)
    } else {
        location_str.to_string()
    };

    let mut next = parse_url(&absolute)?;
    if status_code != 303 {
        next.headers = original.headers.clone();
        next.body = original.body.clone();
    }
    Ok(next)
}
