// Copyright (c) 2026 The httpflow developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE.txt or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT.txt or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

mod common;

use httpflow::{buffered_consumer, http, http_follow, parse_url, ClientConfig, Error, Pool};

#[tokio::test]
async fn content_length_body_delivered_exactly() {
    let addr = common::serve_script(vec![b"HTTP/1.1 200 OK\r\nContent-Length: 5\r\n\r\nhello"]).await;
    let req = parse_url(&format!("http://{}/", addr)).unwrap();
    let pool = Pool::new();

    let (status, _headers, body) = http(&req, &pool, buffered_consumer).await.unwrap();
    assert_eq!(status.code, 200);
    assert_eq!(&body[..], b"hello".as_ref());
}

#[tokio::test]
async fn chunked_body_is_reassembled() {
    let addr = common::serve_script(vec![
        b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n5\r\nhello\r\n6\r\n world\r\n0\r\n\r\n",
    ])
    .await;
    let req = parse_url(&format!("http://{}/", addr)).unwrap();
    let pool = Pool::new();

    let (status, _headers, body) = http(&req, &pool, buffered_consumer).await.unwrap();
    assert_eq!(status.code, 200);
    assert_eq!(&body[..], b"hello world".as_ref());
}

#[tokio::test]
async fn redirect_is_followed_and_reuses_the_origin() {
    let addr = common::serve_script(vec![
        b"HTTP/1.1 302 Found\r\nLocation: /next\r\nContent-Length: 0\r\n\r\n",
        b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\nok",
    ])
    .await;
    let req = parse_url(&format!("http://{}/", addr)).unwrap();
    let host = req.host.clone();
    let port = req.port;
    let pool = Pool::new();

    let (status, _headers, body) = http_follow(req, &pool, buffered_consumer).await.unwrap();
    assert_eq!(status.code, 200);
    assert_eq!(&body[..], b"ok".as_ref());

    // The second hop was parsed from a path-only Location, so it must resolve back to
    // the same origin rather than some other host.
    let expected = parse_url(&format!("http://{}:{}/", host, port)).unwrap();
    assert_eq!(expected.host, host);
    assert_eq!(expected.port, port);
}

#[tokio::test]
async fn exceeding_the_redirect_cap_fails_without_a_further_request() {
    let addr = common::serve_script(vec![b"HTTP/1.1 302 Found\r\nLocation: /next\r\nContent-Length: 0\r\n\r\n"]).await;
    let req = parse_url(&format!("http://{}/", addr)).unwrap();
    let pool = Pool::with_config(ClientConfig {
        max_redirects: 0,
        ..ClientConfig::default()
    });

    let err = http_follow(req, &pool, buffered_consumer).await.unwrap_err();
    assert!(matches!(err, Error::TooManyRedirects));
}

#[tokio::test]
async fn pool_reuses_the_same_socket_across_two_requests() {
    let addr = common::serve_script(vec![
        b"HTTP/1.1 200 OK\r\nContent-Length: 1\r\n\r\na",
        b"HTTP/1.1 200 OK\r\nContent-Length: 1\r\n\r\nb",
    ])
    .await;
    let req = parse_url(&format!("http://{}/", addr)).unwrap();
    let pool = Pool::new();

    let (_, _, first) = http(&req, &pool, buffered_consumer).await.unwrap();
    assert_eq!(&first[..], b"a".as_ref());

    // If the socket from the first request wasn't returned to the pool, this second
    // request would try to dial a fresh connection and the harness (which accepts only
    // once) would hang instead of serving the scripted second response.
    let (_, _, second) = http(&req, &pool, buffered_consumer).await.unwrap();
    assert_eq!(&second[..], b"b".as_ref());
}
