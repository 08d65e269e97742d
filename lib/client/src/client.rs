//! HTTP client for a wordvec server.
//!
//! Requests are built from the same query types the server evaluates, so the
//! two sides cannot drift apart on the wire format.

use serde::Deserialize;
use tracing::debug;

use wordvec_core::{
    BatchSimilarityQuery, Endpoint, Evaluate, Expression, Match, SimilarityQuery, TopNQuery,
};

use crate::error::ClientError;

/// Default address of a locally running server.
pub const DEFAULT_ADDR: &str = "localhost:6380";

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Client for a wordvec server.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: String,
    http: reqwest::Client,
}

impl Client {
    /// Create a client for `addr`.
    ///
    /// `addr` may be a bare `host:port` (plain HTTP is assumed) or a full
    /// `http://` / `https://` URL.
    pub fn new(addr: &str) -> Result<Self, ClientError> {
        Self::with_http_client(addr, reqwest::Client::new())
    }

    /// Create a client that reuses an existing `reqwest::Client`.
    pub fn with_http_client(addr: &str, http: reqwest::Client) -> Result<Self, ClientError> {
        Ok(Self {
            base_url: base_url(addr)?,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Similarity between two expressions.
    pub async fn similarity(&self, a: Expression, b: Expression) -> Result<f32, ClientError> {
        let response = self.execute(&SimilarityQuery::new(a, b)).await?;
        Ok(response.value)
    }

    /// Similarity for each `(a, b)` pair, in input order.
    ///
    /// The batch fails as a whole if any single pair fails on the server.
    pub async fn batch_similarity<I>(&self, pairs: I) -> Result<Vec<f32>, ClientError>
    where
        I: IntoIterator<Item = (Expression, Expression)>,
    {
        let response = self.execute(&BatchSimilarityQuery::from_pairs(pairs)).await?;
        Ok(response.values.into_iter().map(|r| r.value).collect())
    }

    /// The `n` terms closest to `expr`, best first.
    pub async fn most_similar(&self, expr: Expression, n: i64) -> Result<Vec<Match>, ClientError> {
        let response = self.execute(&TopNQuery::new(expr, n)).await?;
        Ok(response.matches)
    }

    /// Send any query to its endpoint and decode the typed response.
    pub async fn execute<Q: Endpoint>(
        &self,
        query: &Q,
    ) -> Result<<Q as Evaluate>::Response, ClientError> {
        let url = format!("{}{}", self.base_url, Q::PATH);
        let body = serde_json::to_vec(query).map_err(ClientError::Encode)?;
        debug!(query = %Q::KIND, %url, bytes = body.len(), "sending query");

        let response = self
            .http
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&bytes)
                .map(|b| b.error)
                .unwrap_or_else(|_| String::from_utf8_lossy(&bytes).into_owned());
            return Err(ClientError::Status {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_slice(&bytes).map_err(ClientError::Decode)
    }
}

fn base_url(addr: &str) -> Result<String, ClientError> {
    let addr = addr.trim().trim_end_matches('/');
    if addr.is_empty() {
        return Err(ClientError::InvalidAddress("address is empty".to_string()));
    }

    if addr.starts_with("http://") || addr.starts_with("https://") {
        Ok(addr.to_string())
    } else if addr.contains("://") {
        Err(ClientError::InvalidAddress(format!(
            "unsupported scheme in '{}'",
            addr
        )))
    } else {
        Ok(format!("http://{}", addr))
    }
}
