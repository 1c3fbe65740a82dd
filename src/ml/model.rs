// ============================================================
// Layer 5 — Span Encoder (inference-only architecture)
// ============================================================
// A BERT-style encoder with a two-logit head per token:
//
//   ids → token emb + position emb → N × EncoderBlock → LayerNorm
//       → Linear(d_model, 2) → start_logits, end_logits
//
// Field names follow the record layout written by the trainer,
// so a CompactRecorder checkpoint loads straight into this struct.
// There is no dropout here: the model is only ever run forward.

use burn::{
    nn::{
        attention::{MhaInput, MultiHeadAttention, MultiHeadAttentionConfig},
        Embedding, EmbeddingConfig,
        LayerNorm, LayerNormConfig,
        Linear, LinearConfig,
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};

/// Architecture hyperparameters, as stored in `train_config.json`.
///
/// The trainer writes extra keys (learning rate, epochs, ...);
/// serde ignores them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpanEncoderConfig {
    pub vocab_size:  usize,
    pub max_seq_len: usize,
    pub d_model:     usize,
    pub num_heads:   usize,
    pub num_layers:  usize,
    pub d_ff:        usize,
}

impl SpanEncoderConfig {
    /// Build a model with freshly initialised weights.
    /// Callers load a record into it right afterwards.
    pub fn init<B: Backend>(&self, device: &B::Device) -> SpanEncoder<B> {
        SpanEncoder {
            token_embedding:    EmbeddingConfig::new(self.vocab_size, self.d_model).init(device),
            position_embedding: EmbeddingConfig::new(self.max_seq_len, self.d_model).init(device),
            layers: (0..self.num_layers)
                .map(|_| self.init_block(device))
                .collect(),
            final_norm: LayerNormConfig::new(self.d_model).init(device),
            qa_head:    LinearConfig::new(self.d_model, 2).init(device),
        }
    }

    fn init_block<B: Backend>(&self, device: &B::Device) -> EncoderBlock<B> {
        EncoderBlock {
            self_attn:   MultiHeadAttentionConfig::new(self.d_model, self.num_heads).init(device),
            ffn_linear1: LinearConfig::new(self.d_model, self.d_ff).init(device),
            ffn_linear2: LinearConfig::new(self.d_ff, self.d_model).init(device),
            norm1:       LayerNormConfig::new(self.d_model).init(device),
            norm2:       LayerNormConfig::new(self.d_model).init(device),
        }
    }

    /// `d_model` must split evenly across attention heads.
    pub fn validate(&self) -> Result<(), String> {
        if self.num_heads == 0 || self.d_model % self.num_heads != 0 {
            return Err(format!(
                "d_model ({}) is not divisible by num_heads ({})",
                self.d_model, self.num_heads
            ));
        }
        if self.max_seq_len < 3 {
            return Err(format!("max_seq_len ({}) leaves no room for text", self.max_seq_len));
        }
        Ok(())
    }
}

#[derive(Module, Debug)]
pub struct EncoderBlock<B: Backend> {
    pub self_attn:   MultiHeadAttention<B>,
    pub ffn_linear1: Linear<B>,
    pub ffn_linear2: Linear<B>,
    pub norm1:       LayerNorm<B>,
    pub norm2:       LayerNorm<B>,
}

impl<B: Backend> EncoderBlock<B> {
    /// Post-norm residual block: attention, then GELU feed-forward.
    pub fn forward(&self, x: Tensor<B, 3>) -> Tensor<B, 3> {
        let attn = self.self_attn.forward(MhaInput::self_attn(x.clone())).context;
        let x = self.norm1.forward(x + attn);
        let ffn = self.ffn_linear2.forward(
            burn::tensor::activation::gelu(self.ffn_linear1.forward(x.clone())),
        );
        self.norm2.forward(x + ffn)
    }
}

#[derive(Module, Debug)]
pub struct SpanEncoder<B: Backend> {
    pub token_embedding:    Embedding<B>,
    pub position_embedding: Embedding<B>,
    pub layers:             Vec<EncoderBlock<B>>,
    pub final_norm:         LayerNorm<B>,
    pub qa_head:            Linear<B>,
}

/// Per-token logits for the first and last token of the answer.
pub struct SpanLogits<B: Backend> {
    /// [batch, seq_len]
    pub start: Tensor<B, 2>,
    /// [batch, seq_len]
    pub end:   Tensor<B, 2>,
}

impl<B: Backend> SpanEncoder<B> {
    /// input_ids: [batch, seq_len]
    pub fn forward(&self, input_ids: Tensor<B, 2, Int>) -> SpanLogits<B> {
        let [batch_size, seq_len] = input_ids.dims();

        let tok_emb = self.token_embedding.forward(input_ids);
        let positions = Tensor::<B, 1, Int>::arange(0..seq_len as i64, &tok_emb.device())
            .unsqueeze::<2>()
            .expand([batch_size, seq_len]);
        let pos_emb = self.position_embedding.forward(positions);

        let mut x = tok_emb + pos_emb;
        for layer in &self.layers {
            x = layer.forward(x);
        }
        let logits = self.qa_head.forward(self.final_norm.forward(x)); // [batch, seq, 2]

        SpanLogits {
            start: logits
                .clone()
                .slice([0..batch_size, 0..seq_len, 0..1])
                .reshape([batch_size, seq_len]),
            end: logits
                .slice([0..batch_size, 0..seq_len, 1..2])
                .reshape([batch_size, seq_len]),
        }
    }
}
