// Shared helpers for building exchanges at fixed instants

use bytes::Bytes;
use http::{Method, Request, Response};
use kura::cache::fmt_http_date;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Fixed reference instant for every scenario
pub const T: u64 = 1_700_000_000;

pub fn at(secs: u64) -> SystemTime {
    UNIX_EPOCH + Duration::from_secs(secs)
}

pub fn date(secs: u64) -> String {
    fmt_http_date(at(secs))
}

pub fn request(method: Method, uri: &str, headers: &[(&str, &str)]) -> Request<Bytes> {
    let mut builder = Request::builder().method(method).uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    builder.body(Bytes::new()).expect("valid request")
}

pub fn response(status: u16, headers: &[(&str, &str)], body: &'static [u8]) -> Response<Bytes> {
    let mut builder = Response::builder().status(status);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    builder
        .body(Bytes::from_static(body))
        .expect("valid response")
}
