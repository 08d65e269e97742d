//! # wordvec Core
//!
//! Core library for the wordvec similarity service.
//!
//! This crate provides the query algebra and the contract it is evaluated against:
//!
//! - [`Expression`] - Sparse weighted combination of vocabulary terms
//! - [`Model`] - The embedding space: composition, similarity, nearest neighbors
//! - [`SimilarityQuery`], [`BatchSimilarityQuery`], [`TopNQuery`] - Self-evaluating queries
//! - [`MemoryModel`] - In-memory model loaded from word2vec text files
//!
//! ## Example
//!
//! ```rust
//! use wordvec_core::{Evaluate, Expression, MemoryModel, SimilarityQuery, Vector};
//!
//! let mut model = MemoryModel::new(2);
//! model.insert("king", Vector::new(vec![0.9, 0.8])).unwrap();
//! model.insert("queen", Vector::new(vec![0.85, 0.9])).unwrap();
//!
//! let query = SimilarityQuery::new(
//!     Expression::new().with(1.0, "king"),
//!     Expression::new().with(1.0, "queen"),
//! );
//! let response = query.evaluate(&model).unwrap();
//! assert!(response.value > 0.9);
//! ```

pub mod error;
pub mod expr;
pub mod memory;
pub mod model;
pub mod query;
pub mod vector;

/// SIMD-optimized vector kernels
///
/// - AVX2/FMA on x86_64
/// - NEON on ARM64/Apple Silicon
pub mod simd;

pub use error::{Error, ModelError, Result};
pub use expr::Expression;
pub use memory::MemoryModel;
pub use model::{Match, Model, ModelInfo};
pub use query::{
    BatchSimilarityQuery, BatchSimilarityResponse, Endpoint, Evaluate, QueryKind,
    SimilarityQuery, SimilarityResponse, TopNQuery, TopNResponse,
};
pub use vector::Vector;
