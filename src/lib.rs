// Copyright (c) 2026 The httpflow developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE.txt or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT.txt or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A streaming HTTP/1.1 client.
//!
//! `httpflow` performs requests against plaintext and TLS origins and hands the response
//! body to the caller as a lazily-pulled byte stream, so responses of unbounded size can
//! be processed in bounded memory. It is meant as a building block for higher-level code
//! (downloaders, API clients, crawlers) rather than a general-purpose HTTP toolkit: there
//! is no HTTP/2, no cookie jar, no proxy support, and no request retry.
//!
//! ```no_run
//! # async fn run() -> httpflow::Result<()> {
//! let body = httpflow::simple_http("https://example.com/").await?;
//! println!("{} bytes", body.len());
//! # Ok(())
//! # }
//! ```
//!
//! Most callers will reach for [`simple_http`] or [`url_encoded_body`]. Callers that want
//! to stream a large response without buffering it should build on [`http_follow`] or
//! [`http`] directly, reading the body through [`body::BodyStream::next_chunk`].

mod body;
mod chunked;
mod config;
mod convenience;
mod engine;
mod error;
mod gzip;
mod percent;
mod pool;
mod query;
mod redirect;
mod request;
mod response;
mod transport;
mod url;

pub use crate::body::BodyStream;
pub use crate::config::ClientConfig;
pub use crate::convenience::{buffered_consumer, simple_http, url_encoded_body, with_pool};
pub use crate::engine::http;
pub use crate::error::{Error, Result};
pub use crate::pool::Pool;
pub use crate::redirect::http_follow;
pub use crate::request::{Body, BodyProducer, HeaderList, Request};
pub use crate::response::{header, Status};
pub use crate::url::parse_url;
