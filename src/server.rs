//! Web server for the squidmap UI.
//!
//! Serves the heatmap page using:
//! - Axum for HTTP
//! - HTMX for dynamic UI without heavy JavaScript
//! - A single shared `ViewState` driven by the handlers
//!
//! Every interaction re-renders the view fragment from current state, so
//! the page is always a function of `ViewState` and nothing else.

use std::sync::Arc;

use axum::{
    Form, Router,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
};
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::client::{HttpPredictionClient, PredictionClient};
use crate::render::render_view;
use crate::view::ViewState;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub service_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "127.0.0.1".to_string(),
            service_url: crate::client::DEFAULT_SERVICE_URL.to_string(),
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// The single heatmap view, guarded so transitions run one at a time
    view: Arc<Mutex<ViewState>>,
    /// Client for the prediction service
    client: Arc<dyn PredictionClient>,
}

impl AppState {
    /// Create application state with the given prediction client.
    pub fn new(client: Arc<dyn PredictionClient>) -> Self {
        Self {
            view: Arc::new(Mutex::new(ViewState::new())),
            client,
        }
    }
}

/// Create the Axum router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/view", get(view_handler))
        .route("/select/year", post(select_year_handler))
        .route("/select/month", post(select_month_handler))
        .route("/predict", post(predict_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

/// Start the web server.
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let client = HttpPredictionClient::new(config.service_url.clone())?;
    let state = AppState::new(Arc::new(client));

    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!("🦑 squidmap UI starting at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Route Handlers
// ============================================================================

/// Main page handler - serves the HTML shell.
async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Render the view fragment for the current state.
///
/// Also what the page polls while a prediction is in flight, so a
/// concurrent viewer sees the overlay.
async fn view_handler(State(state): State<AppState>) -> Html<String> {
    let view = state.view.lock().await;
    Html(render_view(&view))
}

#[derive(Debug, Deserialize)]
struct SelectYearForm {
    year: String,
}

#[derive(Debug, Deserialize)]
struct SelectMonthForm {
    month: String,
}

/// Update the selected year. Values outside {2023, 2024, 2025} are
/// rejected and leave state untouched.
async fn select_year_handler(
    State(state): State<AppState>,
    Form(form): Form<SelectYearForm>,
) -> impl IntoResponse {
    let Ok(year) = form.year.parse() else {
        return (StatusCode::UNPROCESSABLE_ENTITY, format!("invalid year: {}", form.year))
            .into_response();
    };

    let mut view = state.view.lock().await;
    view.select_year(year);
    Html(render_view(&view)).into_response()
}

/// Update the selected month. Values outside 1..=12 are rejected and
/// leave state untouched.
async fn select_month_handler(
    State(state): State<AppState>,
    Form(form): Form<SelectMonthForm>,
) -> impl IntoResponse {
    let Ok(month) = form.month.parse() else {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("invalid month: {}", form.month),
        )
            .into_response();
    };

    let mut view = state.view.lock().await;
    view.select_month(month);
    Html(render_view(&view)).into_response()
}

/// Run a prediction for the current selection.
///
/// The lock is released for the duration of the network call, so
/// selections and further predict triggers stay responsive while a
/// request is in flight. Overlapping requests all run to completion;
/// whichever settles last wins. A failure only clears the loading flag -
/// the user keeps whatever the view showed before, and the error goes to
/// the log, not the page.
async fn predict_handler(State(state): State<AppState>) -> Html<String> {
    let (year, month) = {
        let mut view = state.view.lock().await;
        view.begin_predict();
        (view.selected_year, view.selected_month)
    };

    let result = state.client.predict(year, month).await;

    let mut view = state.view.lock().await;
    match result {
        Ok(markup) => {
            tracing::info!("prediction succeeded for {} {}", month.name(), year);
            view.settle_success(markup);
        }
        Err(e) => {
            tracing::warn!("prediction failed for {} {}: {}", month.name(), year, e);
            view.settle_failure();
        }
    }

    Html(render_view(&view))
}

/// Health check endpoint.
async fn health_handler() -> &'static str {
    "OK"
}

// ============================================================================
// HTML Template (embedded for single-binary deployment)
// ============================================================================

const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Indian Squid Heatmap Analysis</title>

    <!-- HTMX -->
    <script src="https://unpkg.com/htmx.org@1.9.10"></script>

    <style>
        * { margin: 0; padding: 0; box-sizing: border-box; }

        body {
            font-family: Arial, sans-serif;
            background-color: #f0f0f0;
        }

        .container {
            max-width: 100%;
            margin: 0 auto;
            padding: 20px;
            box-shadow: 0 2px 4px rgba(0, 0, 0, 0.1);
            border-radius: 8px;
        }

        .container h1 { margin-bottom: 10px; }
        .container > p { margin-bottom: 20px; }

        .controls {
            display: flex;
            justify-content: space-between;
            align-items: center;
            margin-bottom: 20px;
        }

        .select-container {
            flex: 1;
            margin-right: 10px;
        }

        .select-container label {
            margin-bottom: 5px;
            display: block;
            font-size: 16px;
            font-weight: bold;
        }

        .select-container select {
            width: 100%;
            padding: 10px;
            font-size: 14px;
            border-radius: 4px;
            border: 1px solid #ccc;
            background-color: #fff;
            box-shadow: 0 1px 3px rgba(0, 0, 0, 0.1);
        }

        .predict-btn {
            padding: 10px 20px;
            font-size: 16px;
            background-color: #007bff;
            color: #fff;
            border: none;
            border-radius: 4px;
            cursor: pointer;
            transition: background-color 0.3s ease;
            margin-top: 20px;
        }

        .predict-btn:hover { background-color: #0069d9; }

        .result { margin-top: 20px; }
        .result h3 { margin-bottom: 10px; }

        .map-container {
            height: 710px;
            border: none;
        }

        .map-container iframe {
            width: 100%;
            height: 100%;
            border: none;
        }

        /* Blocking overlay, layered atop the page while a request is in
           flight. Shown either by HTMX (request indicator) or by the
           server-rendered is-loading class. */
        .loading-overlay {
            display: none;
            position: fixed;
            top: 0;
            left: 0;
            width: 100%;
            height: 100%;
            background-color: rgba(0, 0, 0, 0.5);
            justify-content: center;
            align-items: center;
            flex-direction: column;
            z-index: 1000;
            color: #fff;
            font-size: 24px;
        }

        .loading-overlay.htmx-request,
        .loading-overlay.is-loading {
            display: flex;
        }

        .squid-spinner {
            width: 100px;
            height: 100px;
            margin-bottom: 10px;
            border: 8px solid rgba(255, 255, 255, 0.3);
            border-top-color: #fff;
            border-radius: 50%;
            animation: spin 1s linear infinite;
        }

        @keyframes spin {
            from { transform: rotate(0deg); }
            to { transform: rotate(360deg); }
        }
    </style>
</head>
<body>
    <div class="container">
        <h1>Indian Squid Heatmap Analysis</h1>
        <p>Select a year and month to predict the abundance of squid in various hotspots.
           This tool helps researchers and fishery managers anticipate squid population
           trends, aiding in sustainable management and conservation efforts.</p>

        <div id="heatmap-view" hx-get="/view" hx-trigger="load" hx-swap="outerHTML">
            <p>Loading...</p>
        </div>
    </div>
</body>
</html>
"##;
