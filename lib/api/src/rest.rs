use crate::error::ApiError;
use crate::observer::{QueryObserver, RejectedQuery, ServedQuery};
use actix_cors::Cors;
use actix_web::http::header::ContentType;
use actix_web::{web, App, HttpResponse, HttpServer, Resource};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use wordvec_core::{
    BatchSimilarityQuery, BatchSimilarityResponse, Endpoint, Evaluate, Model, ModelInfo,
    SimilarityQuery, SimilarityResponse, TopNQuery, TopNResponse,
};

/// HTTP listener settings
#[derive(Debug, Clone)]
pub struct RestConfig {
    pub host: String,
    pub port: u16,
    /// Worker threads; `None` uses one per physical core
    pub workers: Option<usize>,
    pub max_body_bytes: usize,
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 6380,
            workers: None,
            max_body_bytes: 4 * 1024 * 1024,
        }
    }
}

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    model: Arc<dyn Model>,
    observer: Arc<dyn QueryObserver>,
}

impl AppState {
    pub fn new(model: Arc<dyn Model>, observer: Arc<dyn QueryObserver>) -> Self {
        Self { model, observer }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    title: &'static str,
    version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<ModelInfo>,
}

/// Result cardinality reported to the observer
trait ResponseSize {
    fn items(&self) -> usize;
}

impl ResponseSize for SimilarityResponse {
    fn items(&self) -> usize {
        1
    }
}

impl ResponseSize for BatchSimilarityResponse {
    fn items(&self) -> usize {
        self.values.len()
    }
}

impl ResponseSize for TopNResponse {
    fn items(&self) -> usize {
        self.matches.len()
    }
}

pub struct RestApi;

impl RestApi {
    pub async fn start(
        model: Arc<dyn Model>,
        observer: Arc<dyn QueryObserver>,
        config: RestConfig,
    ) -> std::io::Result<()> {
        let state = AppState::new(model, observer);
        let max_body_bytes = config.max_body_bytes;

        let mut server = HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(cors)
                .app_data(web::Data::new(state.clone()))
                .app_data(web::PayloadConfig::new(max_body_bytes))
                .configure(routes)
        });
        if let Some(workers) = config.workers {
            server = server.workers(workers);
        }

        server
            .bind((config.host.as_str(), config.port))?
            .run()
            .await
    }
}

/// Register the health check and the three query endpoints
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health))
        .service(endpoint::<SimilarityQuery>())
        .service(endpoint::<BatchSimilarityQuery>())
        .service(endpoint::<TopNQuery>());
}

// Queries travel in the request body; GET is kept for older clients.
fn endpoint<Q>() -> Resource
where
    Q: Endpoint + Send + 'static,
    Q::Response: ResponseSize + Send + 'static,
{
    web::resource(Q::PATH)
        .route(web::post().to(answer::<Q>))
        .route(web::get().to(answer::<Q>))
}

async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        title: "wordvec",
        version: env!("CARGO_PKG_VERSION"),
        model: state.model.info(),
    })
}

async fn answer<Q>(
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError>
where
    Q: Endpoint + Send + 'static,
    Q::Response: ResponseSize + Send + 'static,
{
    let started = Instant::now();

    match evaluate_body::<Q>(&state, body).await {
        Ok((response, items)) => {
            state.observer.served(&ServedQuery {
                kind: Q::KIND,
                items,
                elapsed: started.elapsed(),
            });
            Ok(response)
        }
        Err(error) => {
            state.observer.rejected(&RejectedQuery {
                kind: Q::KIND,
                error: &error,
                elapsed: started.elapsed(),
            });
            Err(error)
        }
    }
}

async fn evaluate_body<Q>(
    state: &AppState,
    body: web::Bytes,
) -> Result<(HttpResponse, usize), ApiError>
where
    Q: Endpoint + Send + 'static,
    Q::Response: ResponseSize + Send + 'static,
{
    let query: Q = serde_json::from_slice(&body).map_err(ApiError::Decode)?;

    // The model may block, so keep it off the async workers.
    let model = Arc::clone(&state.model);
    let response = web::block(move || Evaluate::evaluate(&query, model.as_ref()))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;

    let items = response.items();
    let encoded = serde_json::to_vec(&response).map_err(ApiError::Encode)?;

    Ok((
        HttpResponse::Ok()
            .content_type(ContentType::json())
            .body(encoded),
        items,
    ))
}
