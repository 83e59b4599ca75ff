//! Stable cache keys.
//!
//! Embedding entries are keyed by the normalized question text; retrieval
//! entries by (embedding hash, limit, threshold) so a changed search
//! profile never aliases a cached result.

/// Key for the embedding cache (long TTL).
pub fn embedding_key(normalized_text: &str) -> String {
    let hash = blake3::hash(normalized_text.as_bytes()).to_hex();
    format!("embedding:{hash}")
}

/// Key for the retrieval-result cache (short TTL).
pub fn retrieval_key(embedding: &[f32], limit: usize, min_score: f32) -> String {
    let mut hasher = blake3::Hasher::new();
    for value in embedding {
        hasher.update(&value.to_le_bytes());
    }
    let hash = hasher.finalize().to_hex();
    // Thresholds are config constants with short decimal forms; keying on
    // millis keeps the key readable and collision-free.
    let threshold_millis = (min_score * 1000.0).round() as i32;
    format!("search:{hash}:{limit}:{threshold_millis}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_text_same_key() {
        assert_eq!(embedding_key("what is x"), embedding_key("what is x"));
        assert_ne!(embedding_key("what is x"), embedding_key("what is y"));
    }

    #[test]
    fn retrieval_key_varies_by_params() {
        let vector = vec![0.1f32, 0.2, 0.3];
        let base = retrieval_key(&vector, 10, 0.5);
        assert_eq!(base, retrieval_key(&vector, 10, 0.5));
        assert_ne!(base, retrieval_key(&vector, 20, 0.5));
        assert_ne!(base, retrieval_key(&vector, 10, 0.2));
        assert_ne!(base, retrieval_key(&[0.1f32, 0.2, 0.4], 10, 0.5));
    }
}
