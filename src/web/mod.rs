// ============================================================
// Layer 1 — Web UI
// ============================================================
// The browser-facing side of the bot: one form with a question
// field, a context field and a read-only answer field, plus a
// small JSON endpoint for scripts.
//
//   server.rs — tiny_http accept loop
//   routes.rs — request → Reply, calls QaBot::answer
//   page.rs   — HTML rendering of the form
//   form.rs   — urlencoded decoding, HTML escaping

pub mod form;
pub mod page;
pub mod routes;
pub mod server;
