// Copyright (c) 2026 The httpflow developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE.txt or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT.txt or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use bytes::Bytes;

/// Tunables for a [`crate::Pool`] and the requests run against it.
///
/// There is no global default instance beyond [`ClientConfig::default`]; every knob here
/// used to be a constant scattered across the engine, the redirect driver, and the transport.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Maximum number of redirect hops `http_follow` will take before failing with
    /// [`crate::Error::TooManyRedirects`].
    pub max_redirects: u32,

    /// Size of the read buffer used when streaming from a plaintext or TLS transport.
    pub read_chunk_size: usize,

    /// If set, sent as the `User-Agent` header on every request that doesn't already
    /// supply one. `None` means no `User-Agent` is injected.
    pub user_agent: Option<Bytes>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            max_redirects: 10,
            read_chunk_size: 32 * 1024,
            user_agent: None,
        }
    }
}
