// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Workflow coordination only:
//   - no tensors or tokenizers (Layer 5)
//   - no HTML or sockets (Layer 1)
//
// qa_bot.rs holds the one piece of request-time logic; the serve
// use case wires it to the web UI at startup.

// The question → answer adapter
pub mod qa_bot;

// Startup: load backend, bind UI, serve
pub mod serve_use_case;
