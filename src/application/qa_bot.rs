// ============================================================
// Layer 2 — QaBot
// ============================================================
// Adapts a two-string submission into one backend call and hands
// back only the answer text.
//
// No validation, no retries, no post-processing: inputs go to the
// backend as typed, and a backend error comes back exactly as the
// backend produced it.

use crate::domain::error::BackendError;
use crate::domain::query::QueryRequest;
use crate::domain::traits::InferenceBackend;

pub struct QaBot {
    backend: Box<dyn InferenceBackend>,
}

impl QaBot {
    /// Wrap an already-loaded backend. The bot never reloads it.
    pub fn new(backend: Box<dyn InferenceBackend>) -> Self {
        Self { backend }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Answer `question` from `context`.
    pub fn answer(&self, question: &str, context: &str) -> Result<String, BackendError> {
        tracing::info!("Question received: {question}");
        tracing::info!("Context received: {context}");

        let result = self.backend.infer(&QueryRequest::new(question, context))?;

        tracing::info!("Answer produced: {} (score {:.4})", result.answer, result.score);
        Ok(result.answer)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::query::QueryResult;
    use std::cell::RefCell;

    /// Always answers with the same text.
    struct Fixed(&'static str);

    impl InferenceBackend for Fixed {
        fn infer(&self, _: &QueryRequest) -> Result<QueryResult, BackendError> {
            Ok(QueryResult::new(self.0, 0.9, 3, 8))
        }
        fn name(&self) -> &'static str { "fixed" }
    }

    /// Always fails with the given error.
    struct Failing(BackendError);

    impl InferenceBackend for Failing {
        fn infer(&self, _: &QueryRequest) -> Result<QueryResult, BackendError> {
            Err(self.0.clone())
        }
        fn name(&self) -> &'static str { "failing" }
    }

    /// Echoes the question back and records what it was sent.
    struct Echo(RefCell<Vec<QueryRequest>>);

    impl InferenceBackend for Echo {
        fn infer(&self, request: &QueryRequest) -> Result<QueryResult, BackendError> {
            self.0.borrow_mut().push(request.clone());
            Ok(QueryResult::new(request.question.clone(), 1.0, 0, 0))
        }
        fn name(&self) -> &'static str { "echo" }
    }

    #[test]
    fn test_returns_only_the_answer_text() {
        let bot = QaBot::new(Box::new(Fixed("Paris")));
        let answer = bot.answer(
            "What is the capital of France?",
            "France is a country in Europe. The capital of France is Paris.",
        );
        assert_eq!(answer, Ok("Paris".to_string()));
    }

    #[test]
    fn test_empty_answer_is_returned_as_is() {
        let bot = QaBot::new(Box::new(Fixed("")));
        assert_eq!(bot.answer("q", "c"), Ok(String::new()));
    }

    #[test]
    fn test_backend_error_is_not_wrapped() {
        let err = BackendError::InputTooLong { tokens: 900, limit: 512 };
        let bot = QaBot::new(Box::new(Failing(err.clone())));
        assert_eq!(bot.answer("q", "c"), Err(err));
    }

    #[test]
    fn test_calls_are_independent() {
        let bot = QaBot::new(Box::new(Echo(RefCell::new(Vec::new()))));
        assert_eq!(bot.answer("first", "ctx one").unwrap(), "first");
        assert_eq!(bot.answer("second", "ctx two").unwrap(), "second");
    }

    #[test]
    fn test_inputs_reach_the_backend_unchanged() {
        let backend = std::rc::Rc::new(Echo(RefCell::new(Vec::new())));

        struct Shared(std::rc::Rc<Echo>);
        impl InferenceBackend for Shared {
            fn infer(&self, r: &QueryRequest) -> Result<QueryResult, BackendError> { self.0.infer(r) }
            fn name(&self) -> &'static str { "shared" }
        }

        let bot = QaBot::new(Box::new(Shared(backend.clone())));
        bot.answer("  ", "\t odd\u{0}input ").unwrap();
        assert_eq!(
            backend.0.borrow().as_slice(),
            &[QueryRequest::new("  ", "\t odd\u{0}input ")]
        );
    }

    #[test]
    fn test_logging_does_not_change_the_answer() {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_test_writer()
            .finish();
        let bot = QaBot::new(Box::new(Fixed("{answer} %s \n")));

        let logged = tracing::subscriber::with_default(subscriber, || bot.answer("q", "c"));
        let silent = bot.answer("q", "c");
        assert_eq!(logged, silent);
        assert_eq!(logged.unwrap(), "{answer} %s \n");
    }
}
