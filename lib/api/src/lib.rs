//! # wordvec API
//!
//! HTTP service boundary for the wordvec similarity service.
//!
//! | Route        | Body                              | Response                          |
//! |--------------|-----------------------------------|-----------------------------------|
//! | `/sim`       | `{"a": {..}, "b": {..}}`          | `{"value": f}`                    |
//! | `/sim-multi` | `{"queries": [{"a":..,"b":..}]}`  | `{"values": [{"value": f}]}`      |
//! | `/most-sim`  | `{"expr": {..}, "n": int}`        | `{"matches": [{"term","score"}]}` |
//! | `/health`    |                                   | `{"title", "version", "model"}`   |
//!
//! Malformed bodies answer `400`, queries that fail evaluation answer `422`
//! and response encoding failures answer `500`. Error bodies are
//! `{"error": "<message>"}`.

pub mod error;
pub mod observer;
pub mod rest;

pub use error::ApiError;
pub use observer::{NoopObserver, QueryObserver, RejectedQuery, ServedQuery, TracingObserver};
pub use rest::{routes, AppState, RestApi, RestConfig};
