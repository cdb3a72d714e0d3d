// Copyright (c) 2026 The httpflow developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE.txt or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT.txt or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The uniform byte-oriented duplex stream to a peer: plaintext or TLS.

use std::io;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use once_cell::sync::OnceCell;
use rustls::{ClientConfig as RustlsConfig, OwnedTrustAnchor, RootCertStore, ServerName};
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio::net::TcpStream;
use tokio_rustls::{client::TlsStream, TlsConnector};

use crate::error::{Error, Result};

/// A plaintext socket or a TLS stream, exposed through one [`AsyncRead`] + [`AsyncWrite`]
/// type so the engine never has to care which one it is holding.
pub enum Transport {
    Plain(TcpStream),
    Tls(Box<TlsStream<TcpStream>>),
}

impl Transport {
    /// Resolves `host` with the OS resolver and connects a plaintext TCP socket to the
    /// first address returned.
    pub async fn connect_plain(host: &str, port: u16) -> Result<TcpStream> {
        let addr = resolve_first(host, port).await?;
        Ok(TcpStream::connect(addr).await?)
    }

    /// Dials a plaintext socket, then layers a TLS client handshake on top of it using a
    /// process-wide [`TlsConnector`] backed by the Mozilla root store shipped by
    /// `webpki-roots`.
    pub async fn connect_tls(host: &str, port: u16) -> Result<Transport> {
        let tcp = Self::connect_plain(host, port).await?;
        let connector = shared_connector();
        let server_name = ServerName::try_from(host)
            .map_err(|_| Error::InvalidUrl {
                url: host.to_string(),
                reason: "Invalid host",
            })?;
        let stream = connector.connect(server_name, tcp).await?;
        Ok(Transport::Tls(Box::new(stream)))
    }

    /// Returns the underlying plaintext socket for pooling, if this is a plaintext
    /// transport. TLS transports are never pooled (§4.8) so this always returns `None`
    /// for the `Tls` variant.
    pub fn into_plain(self) -> Option<TcpStream> {
        match self {
            Transport::Plain(s) => Some(s),
            Transport::Tls(_) => None,
        }
    }
}

impl AsyncRead for Transport {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        match Pin::get_mut(self) {
            Transport::Plain(s) => Pin::new(s).poll_read(cx, buf),
            Transport::Tls(s) => Pin::new(s.as_mut()).poll_read(cx, buf),
        }
    }
}

impl AsyncWrite for Transport {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        match Pin::get_mut(self) {
            Transport::Plain(s) => Pin::new(s).poll_write(cx, buf),
            Transport::Tls(s) => Pin::new(s.as_mut()).poll_write(cx, buf),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match Pin::get_mut(self) {
            Transport::Plain(s) => Pin::new(s).poll_flush(cx),
            Transport::Tls(s) => Pin::new(s.as_mut()).poll_flush(cx),
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match Pin::get_mut(self) {
            Transport::Plain(s) => Pin::new(s).poll_shutdown(cx),
            Transport::Tls(s) => Pin::new(s.as_mut()).poll_shutdown(cx),
        }
    }
}

async fn resolve_first(host: &str, port: u16) -> Result<SocketAddr> {
    let mut addrs = tokio::net::lookup_host((host, port)).await?;
    addrs.next().ok_or_else(|| {
        Error::Io(io::Error::new(
            io::ErrorKind::NotFound,
            format!("no addresses found for {host}:{port}"),
        ))
    })
}

fn shared_connector() -> TlsConnector {
    static CONNECTOR: OnceCell<TlsConnector> = OnceCell::new();
    CONNECTOR
        .get_or_init(|| {
            let mut roots = RootCertStore::empty();
            roots.add_trust_anchors(webpki_roots::TLS_SERVER_ROOTS.iter().map(|ta| {
                OwnedTrustAnchor::from_subject_spki_name_constraints(
                    ta.subject,
                    ta.spki,
                    ta.name_constraints,
                )
            }));
            let config = RustlsConfig::builder()
                .with_safe_defaults()
                .with_root_certificates(roots)
                .with_no_client_auth();
            TlsConnector::from(Arc::new(config))
        })
        .clone()
}
