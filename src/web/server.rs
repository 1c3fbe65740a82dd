// ============================================================
// Layer 1 — UI Server
// ============================================================
// A blocking tiny_http loop: receive one request, answer it,
// move on. Requests are therefore never handled concurrently and
// the bot needs no locking.
//
// Transport problems with a single client (unreadable body,
// dropped connection while responding) are logged and skipped;
// they never stop the loop.

use std::io::Read;
use std::net::SocketAddr;

use anyhow::Result;
use tiny_http::{Header, Request, Response, Server};

use crate::application::qa_bot::QaBot;
use crate::web::routes::{route, Reply};

/// Largest request body accepted, in bytes.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

pub struct UiServer {
    server: Server,
}

impl UiServer {
    /// Bind the listening socket. Use port 0 for any free port.
    pub fn bind(addr: &str) -> Result<Self> {
        let server = Server::http(addr)
            .map_err(|e| anyhow::anyhow!("Cannot bind UI server to '{addr}': {e}"))?;
        Ok(Self { server })
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.server.server_addr().to_ip()
    }

    /// Serve until the process is stopped.
    pub fn run(&self, bot: &QaBot) -> Result<()> {
        while self.serve_one(bot) {}
        Ok(())
    }

    /// Answer exactly one request. Returns `false` once the listener
    /// has shut down and no more requests will arrive.
    pub fn serve_one(&self, bot: &QaBot) -> bool {
        match self.server.recv() {
            Ok(request) => {
                self.handle(bot, request);
                true
            }
            Err(e) => {
                tracing::warn!("UI server stopped receiving: {e}");
                false
            }
        }
    }

    fn handle(&self, bot: &QaBot, mut request: Request) {
        let method = request.method().clone();
        let url = request.url().to_string();

        let reply = match read_body(&mut request) {
            Ok(body) => route(bot, &method, &url, &body),
            Err(reply) => reply,
        };
        tracing::debug!("{method} {url} -> {}", reply.status);

        if let Err(e) = request.respond(to_response(reply)) {
            tracing::warn!("Failed to send response for {method} {url}: {e}");
        }
    }
}

/// Read the whole body as UTF-8, refusing anything over the limit.
fn read_body(request: &mut Request) -> Result<String, Reply> {
    if request.body_length().is_some_and(|n| n > MAX_BODY_BYTES) {
        return Err(Reply::payload_too_large(MAX_BODY_BYTES));
    }

    let mut bytes = Vec::new();
    let limit = MAX_BODY_BYTES as u64 + 1;
    if let Err(e) = request.as_reader().take(limit).read_to_end(&mut bytes) {
        tracing::warn!("Failed to read request body: {e}");
        return Err(Reply::bad_request("could not read request body"));
    }
    if bytes.len() > MAX_BODY_BYTES {
        return Err(Reply::payload_too_large(MAX_BODY_BYTES));
    }
    String::from_utf8(bytes).map_err(|_| Reply::bad_request("request body is not UTF-8"))
}

fn to_response(reply: Reply) -> Response<std::io::Cursor<Vec<u8>>> {
    let mut response = Response::from_string(reply.body).with_status_code(reply.status);
    if let Ok(header) = Header::from_bytes("Content-Type", reply.content_type) {
        response = response.with_header(header);
    }
    response
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::keyword::KeywordBackend;
    use std::io::Write;
    use std::net::TcpStream;

    /// Send one raw request and return the full response text.
    fn exchange(addr: SocketAddr, raw: impl Into<Vec<u8>>) -> std::thread::JoinHandle<String> {
        let raw = raw.into();
        std::thread::spawn(move || {
            let mut stream = TcpStream::connect(addr).unwrap();
            stream.write_all(&raw).unwrap();
            let mut response = Vec::new();
            stream.read_to_end(&mut response).unwrap();
            String::from_utf8_lossy(&response).into_owned()
        })
    }

    fn status_line(response: &str) -> &str {
        response.lines().next().unwrap_or_default()
    }

    fn post(path: &str, content_type: &str, body: &str) -> String {
        format!(
            "POST {path} HTTP/1.0\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\n\r\n{body}",
            body.len()
        )
    }

    #[test]
    fn test_serves_json_answer_over_tcp() {
        let server = UiServer::bind("127.0.0.1:0").unwrap();
        let addr = server.local_addr().unwrap();
        let bot = QaBot::new(Box::new(KeywordBackend::new()));

        let client = exchange(addr, post(
            "/api/answer",
            "application/json",
            r#"{"question":"capital of France?","context":"Lyon is big. The capital of France is Paris."}"#,
        ));
        assert!(server.serve_one(&bot));

        let response = client.join().unwrap();
        assert!(response.starts_with("HTTP/1.1 200") || response.starts_with("HTTP/1.0 200"));
        assert!(response.contains("application/json"));
        assert!(response.contains(r#"{"answer":"The capital of France is Paris."}"#));
    }

    #[test]
    fn test_oversized_body_is_413() {
        let server = UiServer::bind("127.0.0.1:0").unwrap();
        let addr = server.local_addr().unwrap();
        let bot = QaBot::new(Box::new(KeywordBackend::new()));

        let body = "x".repeat(MAX_BODY_BYTES + 10);
        let client = exchange(addr, post("/api/answer", "application/json", &body));
        assert!(server.serve_one(&bot));

        let response = client.join().unwrap();
        assert!(status_line(&response).contains(" 413"), "{}", status_line(&response));
    }

    #[test]
    fn test_chunked_body_past_the_limit_is_413() {
        let server = UiServer::bind("127.0.0.1:0").unwrap();
        let addr = server.local_addr().unwrap();
        let bot = QaBot::new(Box::new(KeywordBackend::new()));

        // no Content-Length: the cap has to be enforced while reading
        let chunk = "x".repeat(MAX_BODY_BYTES + 10);
        let raw = format!(
            "POST /api/answer HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\
             Transfer-Encoding: chunked\r\n\r\n{:x}\r\n{chunk}\r\n0\r\n\r\n",
            chunk.len()
        );
        let client = exchange(addr, raw);
        assert!(server.serve_one(&bot));

        let response = client.join().unwrap();
        assert!(status_line(&response).contains(" 413"), "{}", status_line(&response));
    }

    #[test]
    fn test_non_utf8_body_is_400() {
        let server = UiServer::bind("127.0.0.1:0").unwrap();
        let addr = server.local_addr().unwrap();
        let bot = QaBot::new(Box::new(KeywordBackend::new()));

        let mut raw = b"POST / HTTP/1.0\r\nContent-Type: application/x-www-form-urlencoded\r\n\
                        Content-Length: 3\r\n\r\n".to_vec();
        raw.extend_from_slice(&[0xff, 0xfe, 0xfd]);
        let client = exchange(addr, raw);
        assert!(server.serve_one(&bot));

        let response = client.join().unwrap();
        assert!(status_line(&response).contains(" 400"), "{}", status_line(&response));
        assert!(response.contains("not UTF-8"));
    }
}
