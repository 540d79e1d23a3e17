//! Token counting.
//!
//! Tries the native tokenizer for the model family first; any model
//! without one silently degrades to the shared character estimator so
//! every provider falls back identically.

/// Count tokens in `text` for `model`.
pub fn count(model: &str, text: &str) -> usize {
    match tiktoken_rs::get_bpe_from_model(model) {
        Ok(bpe) => bpe.encode_with_special_tokens(text).len(),
        Err(e) => {
            tracing::debug!("no native tokenizer for '{model}': {e}; using estimate");
            estimate(text)
        }
    }
}

/// Estimate tokens with the portable ~4 characters per token heuristic.
pub fn estimate(text: &str) -> usize {
    (text.len() / 4).max(1)
}
