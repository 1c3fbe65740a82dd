// ============================================================
// Layer 6 — Tokenizer Store
// ============================================================
// Loads the HuggingFace `tokenizer.json` that sits next to the
// weights, and resolves the special token ids the span encoder
// was trained with.
//
// The trainer pins [PAD]=0, [CLS]=101, [SEP]=102 (BERT
// convention), so those are the fallbacks when a tokenizer file
// does not list the tokens explicitly.

use std::path::PathBuf;

use tokenizers::Tokenizer;

use crate::domain::error::BackendError;

const TOKENIZER_FILE: &str = "tokenizer.json";

/// Ids of the tokens used to frame `[CLS] question [SEP] context [SEP]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecialTokens {
    pub pad: u32,
    pub cls: u32,
    pub sep: u32,
}

impl SpecialTokens {
    pub fn from_tokenizer(tokenizer: &Tokenizer) -> Self {
        Self {
            pad: tokenizer.token_to_id("[PAD]").unwrap_or(0),
            cls: tokenizer.token_to_id("[CLS]").unwrap_or(101),
            sep: tokenizer.token_to_id("[SEP]").unwrap_or(102),
        }
    }
}

pub struct TokenizerStore {
    dir: PathBuf,
}

impl TokenizerStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Load `tokenizer.json` from the store directory.
    pub fn load(&self) -> Result<Tokenizer, BackendError> {
        let path = self.dir.join(TOKENIZER_FILE);
        tracing::info!("Loading tokenizer from '{}'", path.display());
        Tokenizer::from_file(&path)
            .map_err(|e| BackendError::model_load(path.display(), e))
    }
}

/// Write a word-level tokenizer covering `words`, lowercasing and
/// splitting on whitespace/punctuation. Test fixture only.
#[cfg(test)]
pub fn write_word_level_tokenizer(dir: &std::path::Path, words: &[&str]) -> PathBuf {
    let mut vocab = serde_json::json!({
        "[PAD]": 0, "[UNK]": 1, "[CLS]": 101, "[SEP]": 102,
    });
    let mut next_id = 104u32;
    for w in words {
        let w = w.to_lowercase();
        if vocab.get(&w).is_none() {
            vocab[w] = serde_json::json!(next_id);
            next_id += 1;
        }
    }

    let special = |id: u32, content: &str| serde_json::json!({
        "id": id, "content": content, "single_word": false, "lstrip": false,
        "rstrip": false, "normalized": false, "special": true
    });
    let tokenizer_json = serde_json::json!({
        "version": "1.0",
        "truncation": null,
        "padding": null,
        "added_tokens": [
            special(0, "[PAD]"), special(1, "[UNK]"),
            special(101, "[CLS]"), special(102, "[SEP]"),
        ],
        "normalizer": {
            "type": "BertNormalizer",
            "clean_text": true,
            "handle_chinese_chars": true,
            "strip_accents": null,
            "lowercase": true
        },
        "pre_tokenizer": { "type": "Whitespace" },
        "post_processor": null,
        "decoder": null,
        "model": { "type": "WordLevel", "vocab": vocab, "unk_token": "[UNK]" }
    });

    std::fs::create_dir_all(dir).unwrap();
    let path = dir.join(TOKENIZER_FILE);
    std::fs::write(&path, serde_json::to_string_pretty(&tokenizer_json).unwrap()).unwrap();
    path
}
