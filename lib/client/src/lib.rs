//! Client library for the wordvec similarity service.
//!
//! # Example
//!
//! ```rust,no_run
//! use wordvec_client::{Client, Expression};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::new("localhost:6380")?;
//!
//!     let mut analogy = Expression::new();
//!     analogy.accumulate_all(1.0, ["king", "woman"]);
//!     analogy.accumulate(-1.0, "man");
//!
//!     for m in client.most_similar(analogy, 5).await? {
//!         println!("{} {:.3}", m.term, m.score);
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;

pub use client::{Client, DEFAULT_ADDR};
pub use error::ClientError;

// Re-export the query types for convenience
pub use wordvec_core::{Expression, Match};
