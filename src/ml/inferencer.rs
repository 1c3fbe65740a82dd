// ============================================================
// Layer 5 — Transformer Backend
// ============================================================
// Runs the span encoder on one (question, context) pair:
//
//   1. tokenize question and context separately
//   2. frame as [CLS] question [SEP] context [SEP], pad to max_seq_len
//   3. forward pass → start/end logits → softmax
//   4. best span (s, e) inside the context, s <= e < s + MAX_ANSWER_LEN
//   5. map the span back to the original context via token offsets
//
// The model, tokenizer and device are loaded once and never
// mutated, so a single instance serves every request.

use burn::prelude::*;
use burn::tensor::TensorData;
use tokenizers::Tokenizer;

use crate::domain::error::BackendError;
use crate::domain::query::{QueryRequest, QueryResult};
use crate::domain::traits::InferenceBackend;
use crate::infra::checkpoint::CheckpointManager;
use crate::infra::tokenizer_store::{SpecialTokens, TokenizerStore};
use crate::ml::model::SpanEncoder;

/// Longest answer, in tokens, the span search will consider.
const MAX_ANSWER_LEN: usize = 30;

pub struct TransformerBackend<B: Backend> {
    model:       SpanEncoder<B>,
    tokenizer:   Tokenizer,
    special:     SpecialTokens,
    max_seq_len: usize,
    device:      B::Device,
}

impl<B: Backend> TransformerBackend<B> {
    /// Load tokenizer, architecture and weights from a checkpoint directory.
    pub fn load(ckpt: &CheckpointManager, device: B::Device) -> Result<Self, BackendError> {
        let tokenizer = TokenizerStore::new(ckpt.dir().clone()).load()?;
        let cfg       = ckpt.load_config()?;
        check_vocab_fits(&tokenizer, cfg.vocab_size)
            .map_err(|reason| BackendError::model_load(ckpt.dir().display(), reason))?;
        let model     = ckpt.load_model::<B>(&cfg, &device)?;
        tracing::info!(
            "Span encoder ready: {} layers, d_model={}, max_seq_len={}",
            cfg.num_layers, cfg.d_model, cfg.max_seq_len,
        );
        Ok(Self::new(model, tokenizer, cfg.max_seq_len, device))
    }

    pub fn new(model: SpanEncoder<B>, tokenizer: Tokenizer, max_seq_len: usize, device: B::Device) -> Self {
        let special = SpecialTokens::from_tokenizer(&tokenizer);
        Self { model, tokenizer, special, max_seq_len, device }
    }

    fn predict(&self, question: &str, context: &str) -> Result<QueryResult, BackendError> {
        let q_enc = self.tokenizer.encode(question, false)
            .map_err(|e| BackendError::Tokenize(format!("question: {e}")))?;
        let c_enc = self.tokenizer.encode(context, false)
            .map_err(|e| BackendError::Tokenize(format!("context: {e}")))?;

        if c_enc.get_ids().is_empty() {
            return Ok(QueryResult::empty());
        }

        let mut input_ids: Vec<u32> = Vec::with_capacity(self.max_seq_len);
        input_ids.push(self.special.cls);
        input_ids.extend_from_slice(q_enc.get_ids());
        input_ids.push(self.special.sep);
        let context_start = input_ids.len();
        input_ids.extend_from_slice(c_enc.get_ids());
        let context_end = input_ids.len();
        input_ids.push(self.special.sep);

        let seq_len = input_ids.len();
        if seq_len > self.max_seq_len {
            return Err(BackendError::InputTooLong { tokens: seq_len, limit: self.max_seq_len });
        }
        input_ids.resize(self.max_seq_len, self.special.pad);

        let (start_probs, end_probs) = self.span_probabilities(&input_ids, seq_len)?;
        let (best_start, best_end, score) =
            best_span(&start_probs, &end_probs, context_start, context_end);

        // Token offsets are byte ranges in `context`
        let offsets = c_enc.get_offsets();
        let start = offsets[best_start - context_start].0;
        let end   = offsets[best_end - context_start].1;
        let answer = context.get(start..end)
            .ok_or_else(|| BackendError::Inference(format!("span {start}..{end} is not on a char boundary")))?;

        tracing::debug!("Span [{best_start},{best_end}] score={score:.4} answer='{answer}'");
        Ok(QueryResult::new(answer.trim(), score, start, end))
    }

    /// Softmax-ed start and end distributions over the unpadded tokens.
    fn span_probabilities(&self, input_ids: &[u32], seq_len: usize) -> Result<(Vec<f32>, Vec<f32>), BackendError> {
        let ids: Vec<i64> = input_ids.iter().map(|&x| x as i64).collect();
        let input = Tensor::<B, 1, Int>::from_data(TensorData::new(ids, [input_ids.len()]), &self.device)
            .unsqueeze::<2>();

        let logits = self.model.forward(input);
        let to_probs = |t: Tensor<B, 2>| -> Result<Vec<f32>, BackendError> {
            let t = t.reshape([self.max_seq_len]).slice([0..seq_len]);
            burn::tensor::activation::softmax(t, 0)
                .into_data()
                .to_vec::<f32>()
                .map_err(|e| BackendError::Inference(format!("{e:?}")))
        };
        Ok((to_probs(logits.start)?, to_probs(logits.end)?))
    }
}

/// Every id the tokenizer can emit, special tokens included, must
/// index into the embedding table; otherwise the first request
/// would fail inside the forward pass.
fn check_vocab_fits(tokenizer: &Tokenizer, vocab_size: usize) -> Result<(), String> {
    let special = SpecialTokens::from_tokenizer(tokenizer);
    let largest = tokenizer
        .get_vocab(true)
        .values()
        .copied()
        .chain([special.pad, special.cls, special.sep])
        .max()
        .unwrap_or(0);
    if largest as usize >= vocab_size {
        return Err(format!(
            "tokenizer produces id {largest} but the model vocabulary has only {vocab_size} entries"
        ));
    }
    Ok(())
}

/// Highest `p_start[s] * p_end[e]` with `lo <= s <= e < hi` and
/// `e - s < MAX_ANSWER_LEN`. Returns `(s, e, score)`.
fn best_span(start_probs: &[f32], end_probs: &[f32], lo: usize, hi: usize) -> (usize, usize, f32) {
    let mut best = (lo, lo, f32::NEG_INFINITY);
    for s in lo..hi {
        for e in s..(s + MAX_ANSWER_LEN).min(hi) {
            let score = start_probs[s] * end_probs[e];
            if score > best.2 {
                best = (s, e, score);
            }
        }
    }
    best
}

impl<B: Backend> InferenceBackend for TransformerBackend<B> {
    fn infer(&self, request: &QueryRequest) -> Result<QueryResult, BackendError> {
        self.predict(&request.question, &request.context)
    }

    fn name(&self) -> &'static str {
        "transformer"
    }
}
