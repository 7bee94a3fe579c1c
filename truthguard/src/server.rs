use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rocket::fairing::AdHoc;
use rocket::figment::Figment;
use rocket::http::{Header, Status};
use rocket::request::Request;
use rocket::response::{self, Responder};
use rocket::serde::json::{self, Json};
use rocket::{catch, catchers, get, options, post, routes, Build, Rocket, State};
use serde::{Deserialize, Serialize};

use common::{extract_domain, Config, SimulationConfig};

use crate::analysis::{generate_analysis, AnalysisResult};
use crate::domains::DomainLists;

/// Errors returned by the detection API. Each maps to a status code and a
/// `{"error": ...}` body.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request body")]
    InvalidBody,
    #[error("URL is required")]
    MissingUrl,
    #[error("Invalid URL format")]
    InvalidUrl,
    #[error("Service temporarily unavailable. Please try again.")]
    Unavailable,
    #[error("Internal server error")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> Status {
        match self {
            ApiError::InvalidBody | ApiError::MissingUrl | ApiError::InvalidUrl => Status::BadRequest,
            ApiError::Unavailable => Status::ServiceUnavailable,
            ApiError::Internal(_) => Status::InternalServerError,
        }
    }
}

/// JSON body of every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'static> {
        if let ApiError::Internal(detail) = &self {
            tracing::error!(%detail, "detect: internal error");
        }
        let body = ErrorBody { error: self.to_string() };
        (self.status(), Json(body)).respond_to(req)
    }
}

/// Where per-request randomness comes from.
pub enum RngSource {
    Entropy,
    /// Seeded parent generator; each request forks a child from it.
    Seeded(Mutex<StdRng>),
}

impl RngSource {
    pub fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => RngSource::Seeded(Mutex::new(StdRng::seed_from_u64(seed))),
            None => RngSource::Entropy,
        }
    }

    /// Independent generator for a single request.
    pub fn fork(&self) -> Result<StdRng, ApiError> {
        match self {
            RngSource::Entropy => Ok(StdRng::from_entropy()),
            RngSource::Seeded(parent) => {
                let mut parent = parent
                    .lock()
                    .map_err(|_| ApiError::Internal("rng lock poisoned".into()))?;
                StdRng::from_rng(&mut *parent).map_err(|e| ApiError::Internal(e.to_string()))
            }
        }
    }
}

/// Latency and outage simulation applied to every scoring request.
#[derive(Debug, Clone)]
pub struct Simulation {
    pub min_delay: Duration,
    pub max_delay: Duration,
    pub failure_rate: f64,
}

impl Simulation {
    pub fn from_config(cfg: &SimulationConfig) -> Self {
        Self {
            min_delay: Duration::from_millis(cfg.min_delay_ms),
            max_delay: Duration::from_millis(cfg.max_delay_ms),
            failure_rate: if cfg.failure_rate.is_nan() {
                0.0
            } else {
                cfg.failure_rate.clamp(0.0, 1.0)
            },
        }
    }

    /// No delay and no simulated outages.
    pub fn instant() -> Self {
        Self {
            min_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            failure_rate: 0.0,
        }
    }

    fn pick_delay<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        if self.max_delay > self.min_delay {
            rng.gen_range(self.min_delay..self.max_delay)
        } else {
            self.min_delay
        }
    }
}

/// Application state stored inside Rocket managed state.
pub struct AppState {
    pub started_at: DateTime<Utc>,
    pub domains: DomainLists,
    pub simulation: Simulation,
    pub rng: RngSource,
}

impl AppState {
    pub fn new(domains: DomainLists, simulation: Simulation, rng: RngSource) -> Self {
        Self {
            started_at: Utc::now(),
            domains,
            simulation,
            rng,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            DomainLists::from_config(&config.domains),
            Simulation::from_config(&config.simulation),
            RngSource::from_seed(config.simulation.seed),
        )
    }
}

/// Request body for `/api/detect-fake-news`.
#[derive(Debug, Deserialize)]
pub struct DetectRequest {
    pub url: Option<String>,
}

/// Check the submitted URL and return the domain to score.
pub fn validate_request(req: &DetectRequest) -> Result<String, ApiError> {
    let url = req
        .url
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or(ApiError::MissingUrl)?;

    let parsed = url::Url::parse(url).map_err(|_| ApiError::InvalidUrl)?;
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(ApiError::InvalidUrl);
    }
    Ok(extract_domain(url))
}

/// Score a news article URL.
#[post("/api/detect-fake-news", data = "<body>")]
async fn detect_fake_news(
    state: &State<AppState>,
    body: Result<Json<DetectRequest>, json::Error<'_>>,
) -> Result<Json<AnalysisResult>, ApiError> {
    let body = body.map_err(|e| {
        tracing::info!(error = %e, "detect: rejected unreadable request body");
        ApiError::InvalidBody
    })?;

    let domain = validate_request(&body).map_err(|e| {
        tracing::info!(url = ?body.url, reason = %e, "detect: rejected url");
        e
    })?;

    let mut rng = state.rng.fork()?;
    let delay = state.simulation.pick_delay(&mut rng);
    tracing::debug!(%domain, delay_ms = delay.as_millis() as u64, "detect: simulating processing time");
    tokio::time::sleep(delay).await;

    if rng.gen_bool(state.simulation.failure_rate) {
        tracing::warn!(%domain, "detect: simulated outage");
        return Err(ApiError::Unavailable);
    }

    let analysis = generate_analysis(&domain, &state.domains, Utc::now(), &mut rng);
    tracing::info!(
        %domain,
        reliable = analysis.is_reliable,
        confidence = analysis.confidence,
        "detect: analysis complete"
    );
    Ok(Json(analysis))
}

/// Response structure for `/api/health`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    status: &'static str,
    timestamp: String,
    uptime_seconds: i64,
}

#[get("/api/health")]
async fn health(state: &State<AppState>) -> Json<HealthResponse> {
    let now = Utc::now();
    Json(HealthResponse {
        status: "healthy",
        timestamp: now.to_rfc3339(),
        uptime_seconds: (now - state.started_at).num_seconds(),
    })
}

/// CORS preflight for the API routes.
#[options("/api/<_..>")]
async fn preflight() -> Status {
    Status::NoContent
}

/// Every unhandled status gets a JSON error body.
#[catch(default)]
fn json_catcher(status: Status, _req: &Request<'_>) -> (Status, Json<ErrorBody>) {
    let error = if status == Status::InternalServerError {
        ApiError::Internal(String::new()).to_string()
    } else {
        status.reason_lossy().to_string()
    };
    (status, Json(ErrorBody { error }))
}

fn cors_fairing() -> AdHoc {
    AdHoc::on_response("CORS", |_req, res| {
        Box::pin(async move {
            res.set_header(Header::new("Access-Control-Allow-Origin", "*"));
            res.set_header(Header::new(
                "Access-Control-Allow-Headers",
                "Content-Type, Authorization",
            ));
            res.set_header(Header::new(
                "Access-Control-Allow-Methods",
                "GET, POST, OPTIONS",
            ));
        })
    })
}

/// Assemble the Rocket instance without launching it.
pub fn build_rocket(state: AppState, figment: Figment, cors: bool) -> Rocket<Build> {
    let rocket = rocket::custom(figment)
        .manage(state)
        .mount("/", routes![detect_fake_news, health])
        .register("/", catchers![json_catcher]);

    if cors {
        rocket.mount("/", routes![preflight]).attach(cors_fairing())
    } else {
        rocket
    }
}

/// Build and launch the Rocket server.
///
/// `server.bind` and `server.port` from the loaded configuration are merged
/// into Rocket's own figment, so `ROCKET_*` environment variables still win
/// for anything not set there.
///
/// This function blocks until the Rocket server shuts down and returns an
/// error if Rocket fails to start.
pub async fn launch_rocket(config: Arc<Config>) -> Result<()> {
    let state = AppState::from_config(&config);
    tracing::info!(
        reliable = state.domains.reliable().len(),
        unreliable = state.domains.unreliable().len(),
        seeded = config.simulation.seed.is_some(),
        failure_rate = state.simulation.failure_rate,
        "server: scoring state initialized"
    );

    let figment = rocket::Config::figment()
        .merge(("address", config.server.bind.clone()))
        .merge(("port", config.server.port));

    let rocket = build_rocket(state, figment, config.server.cors);

    // Launch Rocket - this will run until shutdown (SIGINT/SIGTERM etc.)
    tracing::info!(bind = %config.server.bind, port = config.server.port, "Starting Rocket HTTP server");
    rocket
        .launch()
        .await
        .map_err(|e| anyhow!("Rocket failed: {}", e))?;

    tracing::info!("Rocket HTTP server has shut down");
    Ok(())
}
