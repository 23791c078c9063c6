//! # Request Emitter
//!
//! Turns a finished [`Draft`] into a [`PreparedRequest`], optionally dumps it
//! in HTTP/1.1 wire form, sends it and streams the response back out.

use std::io::Write;

use bytes::Bytes;
use reqwest::blocking::{Client, Response};
use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode, Version};
use url::Url;

use crate::draft::{Draft, Headers};
use crate::encoder::{encode, AttachmentSource};
use crate::error::{ReqError, Result};
use crate::request_url::compose;

/// A fully built request, ready for the transport
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    pub method: Method,
    pub url: Url,
    pub headers: Headers,
    pub body: Option<Bytes>,
}

impl Draft {
    /// Consume the draft and produce the request it describes.
    ///
    /// Attachments are read here; an unreadable file aborts the build and
    /// nothing partial is kept.
    pub fn build(mut self, source: &dyn AttachmentSource) -> Result<PreparedRequest> {
        if self.method.is_empty() {
            return Err(ReqError::NoMethod);
        }
        let method = Method::from_bytes(self.method.as_bytes())
            .map_err(|_| ReqError::InvalidMethod(self.method.clone()))?;

        let target = compose(&self);
        let url = Url::parse(&target).map_err(|err| ReqError::InvalidUrl {
            url: target.clone(),
            source: err,
        })?;

        let body = encode(&self, source)?.map(|encoded| {
            self.headers.set("Content-Type", encoded.content_type);
            encoded.bytes
        });

        tracing::debug!(%method, %url, body_len = body.as_ref().map(Bytes::len), "request built");
        Ok(PreparedRequest {
            method,
            url,
            headers: self.headers,
            body,
        })
    }
}

impl PreparedRequest {
    /// Path and query as they appear on the request line
    pub fn request_target(&self) -> String {
        match self.url.query() {
            Some(query) => format!("{}?{}", self.url.path(), query),
            None => self.url.path().to_string(),
        }
    }

    /// `Host` header value: host plus any non-default port
    pub fn host(&self) -> String {
        let host = self.url.host_str().unwrap_or_default();
        match self.url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        }
    }

    /// Write the request as it goes on the wire
    pub fn write_to(&self, out: &mut dyn Write) -> std::io::Result<()> {
        write!(out, "{} {} HTTP/1.1\r\n", self.method, self.request_target())?;
        write!(out, "Host: {}\r\n", self.host())?;
        for (name, value) in self.headers.iter() {
            write!(out, "{name}: {value}\r\n")?;
        }
        if let Some(body) = &self.body {
            write!(out, "Content-Length: {}\r\n", body.len())?;
        }
        out.write_all(b"\r\n")?;
        if let Some(body) = &self.body {
            out.write_all(body)?;
        }
        Ok(())
    }

    /// Convert into a request for `client`
    pub fn into_request(self, client: &Client) -> Result<reqwest::blocking::Request> {
        let mut builder = client.request(self.method, self.url);
        for (name, value) in self.headers.iter() {
            builder = builder.header(name, value);
        }
        if let Some(body) = self.body {
            builder = builder.body(body);
        }
        Ok(builder.build()?)
    }
}

/// Write a response status line and headers in wire form
pub fn write_response_head(
    version: Version,
    status: StatusCode,
    headers: &HeaderMap,
    out: &mut dyn Write,
) -> std::io::Result<()> {
    write!(out, "{version:?} {status}\r\n")?;
    for (name, value) in headers {
        write!(out, "{}: ", name.as_str())?;
        out.write_all(value.as_bytes())?;
        out.write_all(b"\r\n")?;
    }
    out.write_all(b"\r\n")
}

/// Stream a response to `out`: the body only, or the whole message when dumping
pub fn write_response(mut response: Response, dump: bool, out: &mut dyn Write) -> Result<()> {
    if dump {
        write_response_head(response.version(), response.status(), response.headers(), out)?;
    }
    response.copy_to(out)?;
    out.flush()?;
    Ok(())
}

/// Build, optionally dump, send, and print the response for one draft.
pub fn execute(
    draft: Draft,
    source: &dyn AttachmentSource,
    client: &Client,
    out: &mut dyn Write,
) -> Result<()> {
    let dump = draft.dump;
    let request = draft.build(source)?;

    if dump {
        request.write_to(out)?;
        out.flush()?;
    }

    tracing::info!(method = %request.method, url = %request.url, "sending request");
    let response = client.execute(request.into_request(client)?)?;
    tracing::info!(status = %response.status(), "response received");

    write_response(response, dump, out)
}
