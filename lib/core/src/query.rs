//! Query shapes and how each one is answered by a [`Model`].
//!
//! Every query type implements [`Evaluate`], so the HTTP service and the
//! remote client share a single definition of what a query means. The
//! [`Endpoint`] trait pins each query to its route.

use crate::model::serialize_score;
use crate::{Expression, Match, Model, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A query that knows how to answer itself
pub trait Evaluate {
    type Response: Serialize + DeserializeOwned;

    fn evaluate(&self, model: &dyn Model) -> Result<Self::Response>;
}

/// Binds a query type to its wire route
pub trait Endpoint: Evaluate + Serialize + DeserializeOwned {
    const KIND: QueryKind;
    const PATH: &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    Similarity,
    BatchSimilarity,
    TopN,
}

impl QueryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryKind::Similarity => "sim",
            QueryKind::BatchSimilarity => "sim-multi",
            QueryKind::TopN => "most-sim",
        }
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Similarity between two expressions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimilarityQuery {
    #[serde(default, skip_serializing_if = "Expression::is_empty")]
    pub a: Expression,
    #[serde(default, skip_serializing_if = "Expression::is_empty")]
    pub b: Expression,
}

impl SimilarityQuery {
    pub fn new(a: Expression, b: Expression) -> Self {
        Self { a, b }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimilarityResponse {
    #[serde(serialize_with = "serialize_score")]
    pub value: f32,
}

impl Evaluate for SimilarityQuery {
    type Response = SimilarityResponse;

    fn evaluate(&self, model: &dyn Model) -> Result<SimilarityResponse> {
        // Both sides must be non-empty before the model sees either of them.
        if self.a.is_empty() || self.b.is_empty() {
            return Err(crate::Error::EmptyExpression);
        }

        let u = self.a.evaluate(model)?;
        let v = self.b.evaluate(model)?;

        Ok(SimilarityResponse {
            value: model.similarity(&u, &v),
        })
    }
}

impl Endpoint for SimilarityQuery {
    const KIND: QueryKind = QueryKind::Similarity;
    const PATH: &'static str = "/sim";
}

/// Several similarity queries answered in one round trip.
///
/// Evaluation is all-or-nothing: the first failing element fails the batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchSimilarityQuery {
    #[serde(default)]
    pub queries: Vec<SimilarityQuery>,
}

impl BatchSimilarityQuery {
    /// One query per `(a, b)` pair, in order
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (Expression, Expression)>,
    {
        Self {
            queries: pairs
                .into_iter()
                .map(|(a, b)| SimilarityQuery::new(a, b))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchSimilarityResponse {
    pub values: Vec<SimilarityResponse>,
}

impl Evaluate for BatchSimilarityQuery {
    type Response = BatchSimilarityResponse;

    fn evaluate(&self, model: &dyn Model) -> Result<BatchSimilarityResponse> {
        let values = self
            .queries
            .iter()
            .map(|query| query.evaluate(model))
            .collect::<Result<Vec<_>>>()?;

        Ok(BatchSimilarityResponse { values })
    }
}

impl Endpoint for BatchSimilarityQuery {
    const KIND: QueryKind = QueryKind::BatchSimilarity;
    const PATH: &'static str = "/sim-multi";
}

/// The `n` terms closest to an expression
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopNQuery {
    #[serde(default)]
    pub expr: Expression,
    #[serde(default)]
    pub n: i64,
}

impl TopNQuery {
    pub fn new(expr: Expression, n: i64) -> Self {
        Self { expr, n }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopNResponse {
    pub matches: Vec<Match>,
}

impl Evaluate for TopNQuery {
    type Response = TopNResponse;

    fn evaluate(&self, model: &dyn Model) -> Result<TopNResponse> {
        let v = self.expr.evaluate(model)?;
        Ok(TopNResponse {
            matches: model.nearest_neighbors(&v, self.n)?,
        })
    }
}

impl Endpoint for TopNQuery {
    const KIND: QueryKind = QueryKind::TopN;
    const PATH: &'static str = "/most-sim";
}
