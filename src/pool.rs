// Copyright (c) 2026 The httpflow developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE.txt or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT.txt or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Stashes and reuses idle plaintext sockets keyed by origin (§4.8).

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::net::TcpStream;

use crate::config::ClientConfig;

type Key = (String, u16);

/// A shared cache of at most one idle plaintext socket per `(host, port)`. TLS sockets
/// never enter the pool (§3, §9).
pub struct Pool {
    idle: Mutex<HashMap<Key, TcpStream>>,
    pub(crate) config: ClientConfig,
}

impl Pool {
    pub fn new() -> Arc<Pool> {
        Self::with_config(ClientConfig::default())
    }

    pub fn with_config(config: ClientConfig) -> Arc<Pool> {
        Arc::new(Pool {
            idle: Mutex::new(HashMap::new()),
            config,
        })
    }

    /// Removes and returns the idle socket for `(host, port)`, if any.
    pub(crate) fn acquire(&self, host: &str, port: u16) -> Option<TcpStream> {
        let key = (host.to_string(), port);
        let found = self.idle.lock().unwrap().remove(&key);
        if found.is_some() {
            log::debug!("pool acquire hit for {host}:{port}");
        } else {
            log::debug!("pool acquire miss for {host}:{port}");
        }
        found
    }

    /// Inserts `socket` as the idle entry for `(host, port)`. A socket already parked
    /// under that key is dropped, which closes it.
    pub(crate) fn release(&self, host: &str, port: u16, socket: TcpStream) {
        let key = (host.to_string(), port);
        let prior = self.idle.lock().unwrap().insert(key, socket);
        log::debug!("pool release for {host}:{port}");
        drop(prior);
    }

    /// Drains and closes every idle socket.
    pub fn close_all(&self) {
        let drained: Vec<_> = self.idle.lock().unwrap().drain().collect();
        log::debug!("pool close_all dropping {} idle sockets", drained.len());
        drop(drained);
    }
}
