//! Loopback OSRM stand-in for provider behaviour tests.

use std::{
    io::{BufRead, BufReader, Write},
    net::{TcpListener, TcpStream},
    sync::mpsc::{self, Receiver},
    thread,
};

/// A single-shot HTTP server answering one request with a canned body.
pub struct StubServer {
    base_url: String,
    requests: Receiver<String>,
}

impl StubServer {
    /// Bind to an ephemeral loopback port and answer the first request with
    /// `status` and a JSON `body`.
    pub fn respond_with(status: u16, body: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback listener");
        let addr = listener.local_addr().expect("listener address");
        let (tx, rx) = mpsc::channel();
        let body = body.to_owned();

        thread::spawn(move || {
            if let Ok((stream, _)) = listener.accept() {
                let request_line = serve(stream, status, &body);
                let _ = tx.send(request_line);
            }
        });

        Self {
            base_url: format!("http://{addr}"),
            requests: rx,
        }
    }

    /// Base URL to configure the provider with.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Request line of the first request, e.g. `GET /route/v1/... HTTP/1.1`.
    pub fn request_line(&self) -> String {
        self.requests
            .recv()
            .expect("stub server should have received a request")
    }
}

fn serve(stream: TcpStream, status: u16, body: &str) -> String {
    let mut reader = BufReader::new(stream);
    let mut request_line = String::new();
    reader
        .read_line(&mut request_line)
        .expect("read request line");
    loop {
        let mut header = String::new();
        let read = reader.read_line(&mut header).expect("read header");
        if read == 0 || header == "\r\n" {
            break;
        }
    }

    let reason = if status == 200 { "OK" } else { "Error" };
    let response = format!(
        "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let mut stream = reader.into_inner();
    stream
        .write_all(response.as_bytes())
        .expect("write stub response");
    stream.flush().expect("flush stub response");
    request_line.trim_end().to_owned()
}

/// A base URL on a loopback port with nothing listening.
pub fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback listener");
    let addr = listener.local_addr().expect("listener address");
    drop(listener);
    format!("http://{addr}")
}
