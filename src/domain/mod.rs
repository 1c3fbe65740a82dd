// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust types and traits describing a Q&A exchange.
//
// Rules for this layer:
//   - NO burn or tokenizers types
//   - NO HTTP, file I/O or clap
//   - Only structs, enums, errors and traits
//
// Everything else (the model, the web form, the CLI) is built
// against these definitions, so a stub backend in a unit test
// and the transformer in production look identical to callers.

// QueryRequest / QueryResult and the built-in UI examples
pub mod query;

// Failures an inference backend can report
pub mod error;

// InferenceBackend trait and the BackendKind selector
pub mod traits;
