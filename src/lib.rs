//! # wordvec
//!
//! Serve a word-embedding model over HTTP.
//!
//! Clients send linear expressions over vocabulary terms (`king - man + woman`)
//! and get back similarity scores or the nearest terms in the embedding space.
//!
//! ## Quick Start
//!
//! ### As a Server
//!
//! ```bash
//! cargo install wordvec
//! wordvec --model vectors.txt --http-port 6380
//! ```
//!
//! ### As a Client
//!
//! ```rust,no_run
//! use wordvec::prelude::*;
//!
//! # async fn run() -> std::result::Result<(), ClientError> {
//! let client = Client::new("localhost:6380")?;
//! let score = client
//!     .similarity(
//!         Expression::new().with(1.0, "king").with(-1.0, "man").with(1.0, "woman"),
//!         Expression::new().with(1.0, "queen"),
//!     )
//!     .await?;
//! println!("similarity: {}", score);
//! # Ok(())
//! # }
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use wordvec::prelude::*;
//!
//! let mut model = MemoryModel::new(2);
//! model.insert("paris", Vector::new(vec![0.9, 0.1])).unwrap();
//! model.insert("rome", Vector::new(vec![0.8, 0.2])).unwrap();
//!
//! let query = TopNQuery::new(Expression::new().with(1.0, "paris"), 1);
//! let response = query.evaluate(&model).unwrap();
//! assert_eq!(response.matches[0].term, "paris");
//! ```
//!
//! ## Crate Structure
//!
//! - [`wordvec-core`](https://docs.rs/wordvec-core) - Expressions, queries, the Model contract, in-memory model
//! - [`wordvec-api`](https://docs.rs/wordvec-api) - REST service boundary
//! - [`wordvec-client`](https://docs.rs/wordvec-client) - HTTP client

// Re-export core types
pub use wordvec_core::{
    BatchSimilarityQuery, BatchSimilarityResponse, Endpoint, Error, Evaluate, Expression, Match,
    MemoryModel, Model, ModelError, ModelInfo, QueryKind, Result, SimilarityQuery,
    SimilarityResponse, TopNQuery, TopNResponse, Vector,
};

// Re-export API
pub use wordvec_api::{ApiError, NoopObserver, QueryObserver, RestApi, RestConfig, TracingObserver};

// Re-export client
pub use wordvec_client::{Client, ClientError};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        BatchSimilarityQuery, Client, ClientError, Evaluate, Expression, Match, MemoryModel,
        Model, SimilarityQuery, TopNQuery, Vector,
    };
}
