// ============================================================
// Layer 1 — Request Routing
// ============================================================
// Turns one HTTP request (method, target, body) into one Reply.
// Kept free of sockets so every route can be unit tested with a
// stub backend.
//
//   GET  /              empty form, or example N with ?example=N
//   POST /              form submit → form with answer
//   POST /api/answer    JSON {question, context} → {answer}
//   GET  /health        "ok"
//
// A failing backend is logged in full and shown to the user as a
// generic message.

use serde_json::json;
use tiny_http::Method;

use crate::application::qa_bot::QaBot;
use crate::domain::query::{QueryRequest, EXAMPLES};
use crate::web::form::{parse_urlencoded, split_target};
use crate::web::page::{self, FormState};

pub const GENERIC_ERROR: &str = "Sorry, something went wrong while answering. Please try again.";

const HTML: &str = "text/html; charset=utf-8";
const JSON: &str = "application/json";
const TEXT: &str = "text/plain; charset=utf-8";

/// A response ready to be written to the client.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status:       u16,
    pub content_type: &'static str,
    pub body:         String,
}

impl Reply {
    fn new(status: u16, content_type: &'static str, body: impl Into<String>) -> Self {
        Self { status, content_type, body: body.into() }
    }

    fn json(status: u16, value: serde_json::Value) -> Self {
        Self::new(status, JSON, value.to_string())
    }

    pub fn payload_too_large(limit: usize) -> Self {
        Self::new(413, TEXT, format!("request body exceeds {limit} bytes"))
    }

    pub fn bad_request(reason: &str) -> Self {
        Self::new(400, TEXT, reason.to_string())
    }
}

pub fn route(bot: &QaBot, method: &Method, url: &str, body: &str) -> Reply {
    let (path, query) = split_target(url);
    match (method, path) {
        (Method::Get, "/")           => show_form(query),
        (Method::Post, "/")          => submit_form(bot, body),
        (Method::Post, "/api/answer") => answer_json(bot, body),
        (Method::Get, "/health")     => Reply::new(200, TEXT, "ok"),
        (_, "/" | "/api/answer" | "/health") => Reply::new(405, TEXT, "method not allowed"),
        _ => Reply::new(404, TEXT, "not found"),
    }
}

fn show_form(query: &str) -> Reply {
    let mut state = FormState::default();
    let example = parse_urlencoded(query)
        .get("example")
        .and_then(|n| n.parse::<usize>().ok())
        .and_then(|n| EXAMPLES.get(n));
    if let Some(ex) = example {
        state.question = ex.question.to_string();
        state.context  = ex.context.to_string();
    }
    Reply::new(200, HTML, page::render(&state))
}

fn submit_form(bot: &QaBot, body: &str) -> Reply {
    let mut form = parse_urlencoded(body);
    let mut state = FormState {
        question: form.remove("question").unwrap_or_default(),
        context:  form.remove("context").unwrap_or_default(),
        ..Default::default()
    };

    match bot.answer(&state.question, &state.context) {
        Ok(answer) => {
            state.answer = answer;
            Reply::new(200, HTML, page::render(&state))
        }
        Err(e) => {
            tracing::error!("Answering form submission failed: {e}");
            state.error = Some(GENERIC_ERROR);
            Reply::new(500, HTML, page::render(&state))
        }
    }
}

fn answer_json(bot: &QaBot, body: &str) -> Reply {
    let request: QueryRequest = match serde_json::from_str(body) {
        Ok(r) => r,
        Err(e) => return Reply::json(400, json!({ "error": format!("invalid JSON body: {e}") })),
    };

    match bot.answer(&request.question, &request.context) {
        Ok(answer) => Reply::json(200, json!({ "answer": answer })),
        Err(e) => {
            tracing::error!("Answering API request failed: {e}");
            Reply::json(500, json!({ "error": GENERIC_ERROR }))
        }
    }
}
