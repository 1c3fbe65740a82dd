// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Reading model artifacts off disk:
//
//   checkpoint.rs      — architecture config + burn weights
//                        (CompactRecorder), with support for the
//                        trainer's latest_epoch.json pointer
//
//   tokenizer_store.rs — tokenizer.json and the special token ids
//                        used to frame question/context pairs
//
// Failures here surface as BackendError::ModelLoad, which the
// serve use case turns into a fatal startup error.

/// Model checkpoint loading
pub mod checkpoint;

/// Tokenizer loading
pub mod tokenizer_store;
