//! Sparse linear expressions over vocabulary terms.

use crate::{Error, Model, Result, Vector};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

type TermMap = HashMap<String, f32, ahash::RandomState>;

/// A weighted combination of vocabulary terms, e.g. `king - man + woman`.
///
/// Serialized as a plain JSON object mapping each term to its weight:
///
/// ```
/// use wordvec_core::Expression;
///
/// let mut expr = Expression::new();
/// expr.accumulate(1.0, "king");
/// expr.accumulate(-1.0, "man");
/// expr.accumulate(1.0, "woman");
///
/// let json = serde_json::to_value(&expr).unwrap();
/// assert_eq!(json["man"], -1.0);
/// ```
///
/// Decoding does not accumulate: if a JSON object repeats a term, the last
/// weight wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Expression {
    terms: TermMap,
}

impl Expression {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`accumulate`](Self::accumulate)
    #[must_use]
    pub fn with(mut self, weight: f32, term: impl Into<String>) -> Self {
        self.accumulate(weight, term);
        self
    }

    /// Add `weight` to the coefficient of `term`. Absent terms start at 0.
    pub fn accumulate(&mut self, weight: f32, term: impl Into<String>) {
        *self.terms.entry(term.into()).or_insert(0.0) += weight;
    }

    /// Accumulate the same `weight` for every term in `terms`
    pub fn accumulate_all<I, S>(&mut self, weight: f32, terms: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for term in terms {
            self.accumulate(weight, term);
        }
    }

    /// Accumulate every entry of `other` into this expression
    pub fn merge(&mut self, other: &Expression) {
        for (term, weight) in other.iter() {
            self.accumulate(weight, term);
        }
    }

    pub fn coefficient(&self, term: &str) -> Option<f32> {
        self.terms.get(term).copied()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Iterate `(term, weight)` pairs in unspecified order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f32)> + '_ {
        self.terms.iter().map(|(term, weight)| (term.as_str(), *weight))
    }

    /// Compose this expression into a vector.
    ///
    /// An expression without terms is rejected before the model is consulted.
    pub fn evaluate(&self, model: &dyn Model) -> Result<Vector> {
        if self.is_empty() {
            return Err(Error::EmptyExpression);
        }
        Ok(model.evaluate(self)?)
    }
}

impl<S: Into<String>> FromIterator<(S, f32)> for Expression {
    fn from_iter<I: IntoIterator<Item = (S, f32)>>(iter: I) -> Self {
        let mut expr = Expression::new();
        expr.extend(iter);
        expr
    }
}

impl<S: Into<String>> Extend<(S, f32)> for Expression {
    fn extend<I: IntoIterator<Item = (S, f32)>>(&mut self, iter: I) {
        for (term, weight) in iter {
            self.accumulate(weight, term);
        }
    }
}
