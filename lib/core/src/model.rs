use crate::{Expression, ModelError, Vector};
use serde::ser::Error as _;
use serde::{Deserialize, Serialize, Serializer};

/// A single nearest-neighbor result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub term: String,
    #[serde(serialize_with = "serialize_score")]
    pub score: f32,
}

impl Match {
    pub fn new(term: impl Into<String>, score: f32) -> Self {
        Self {
            term: term.into(),
            score,
        }
    }
}

/// JSON has no NaN or infinity, so non-finite scores fail to encode
pub(crate) fn serialize_score<S>(score: &f32, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if !score.is_finite() {
        return Err(S::Error::custom(format!("non-finite score: {}", score)));
    }
    serializer.serialize_f32(*score)
}

/// Shape of the embedding space, for health reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub vocabulary: usize,
    pub dim: usize,
}

/// The embedding space queries are evaluated against.
///
/// Implementations are shared read-only between concurrent requests.
pub trait Model: Send + Sync {
    /// Compose an expression into a single vector
    fn evaluate(&self, expr: &Expression) -> Result<Vector, ModelError>;

    /// Symmetric similarity score between two vectors
    fn similarity(&self, a: &Vector, b: &Vector) -> f32;

    /// Up to `n` terms most similar to `v`, best first.
    ///
    /// Interpreting `n <= 0` or `n` larger than the vocabulary is up to the model.
    fn nearest_neighbors(&self, v: &Vector, n: i64) -> Result<Vec<Match>, ModelError>;

    fn info(&self) -> Option<ModelInfo> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_encoding() {
        let json = serde_json::to_string(&Match::new("queen", 0.5)).unwrap();
        assert_eq!(json, r#"{"term":"queen","score":0.5}"#);

        for score in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            let err = serde_json::to_string(&Match::new("queen", score)).unwrap_err();
            assert!(err.to_string().contains("non-finite score"));
        }
    }
}
