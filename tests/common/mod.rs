//! Shared helpers for the integration tests

#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::thread::{self, JoinHandle};

use req::{parse_args, Defaults, Draft, FsAttachments, PreparedRequest, Result};

/// Defaults as if only the given `REQ_*` variables were set
pub fn defaults(vars: &[(&str, &str)]) -> Defaults {
    Defaults::from_lookup(|name| {
        vars.iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.to_string())
            .unwrap_or_default()
    })
    .expect("valid test defaults")
}

/// Parse `args` on top of `defaults`
pub fn draft(defaults: &Defaults, args: &[&str]) -> Result<Draft> {
    let mut draft = Draft::new(defaults);
    parse_args(args, &mut draft)?;
    Ok(draft)
}

/// Parse and build against the real filesystem
pub fn build(defaults: &Defaults, args: &[&str]) -> Result<PreparedRequest> {
    draft(defaults, args)?.build(&FsAttachments)
}

/// The request as dumped before sending
pub fn dump(request: &PreparedRequest) -> String {
    let mut out = Vec::new();
    request.write_to(&mut out).expect("write to memory");
    String::from_utf8_lossy(&out).into_owned()
}

/// A plain-text `200 OK` reply carrying `body`
pub fn ok_response(body: &str) -> String {
    format!(
        "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    )
}

/// Listens on a loopback port, answers exactly one request with a canned
/// reply and hands back the raw request it received.
pub struct OneShotServer {
    addr: SocketAddr,
    handle: JoinHandle<Vec<u8>>,
}

impl OneShotServer {
    pub fn start(response: String) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback");
        let addr = listener.local_addr().expect("local addr");
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().expect("accept");
            let received = read_request(&mut stream);
            stream.write_all(response.as_bytes()).expect("write response");
            received
        });
        Self { addr, handle }
    }

    /// `127.0.0.1:<port>`, usable as a host token
    pub fn host(&self) -> String {
        self.addr.to_string()
    }

    /// Wait for the request and return it as text
    pub fn received(self) -> String {
        let bytes = self.handle.join().expect("server thread");
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

fn read_request(stream: &mut TcpStream) -> Vec<u8> {
    let mut received = Vec::new();
    let mut buf = [0u8; 4096];
    loop {
        let n = stream.read(&mut buf).expect("read request");
        if n == 0 {
            return received;
        }
        received.extend_from_slice(&buf[..n]);
        if let Some(end) = received.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&received[..end]).to_ascii_lowercase();
            let body_len = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|len| len.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if received.len() >= end + 4 + body_len {
                return received;
            }
        }
    }
}

/// A loopback address nothing is listening on
pub fn closed_host() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    addr.to_string()
}
