use crate::catalog;
use crate::config::AppConfig;
use crate::data_structures::{ReportDisplayItem, TrackerSeries};
use crate::error::AppError;
use crate::presenter::Presenter;
use crate::view::View;
use axum::{
    Router,
    extract::{FromRef, Json, Path, State},
    http::Method,
    response::{Html, IntoResponse, Redirect},
    routing::{get, post},
};
use std::io;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::{debug, info, instrument};

pub type SharedPresenter = Arc<Presenter>;
pub type SharedConfig = Arc<AppConfig>;

#[derive(Clone)]
pub struct AppState {
    pub presenter: SharedPresenter,
    pub config: SharedConfig,
}

impl FromRef<AppState> for SharedPresenter {
    fn from_ref(app_state: &AppState) -> SharedPresenter {
        app_state.presenter.clone()
    }
}

impl FromRef<AppState> for SharedConfig {
    fn from_ref(app_state: &AppState) -> SharedConfig {
        app_state.config.clone()
    }
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods([Method::GET]);

    let api = Router::new()
        .route("/reports", get(get_reports_handler))
        .route("/tracker", get(get_tracker_data_handler))
        .layer(cors);

    Router::new()
        .route("/", get(index_handler))
        .route("/view/{name}", post(select_view_handler))
        .route("/health", get(|| async { "OK" }))
        .nest("/api", api)
        .nest_service("/reports", ServeDir::new(&state.config.reports_dir))
        .nest_service("/models", ServeDir::new(&state.config.models_dir))
        .with_state(state)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}

#[instrument(skip(presenter))]
pub async fn index_handler(State(presenter): State<SharedPresenter>) -> Html<String> {
    debug!("Rendering current view");
    Html(presenter.render().await)
}

#[instrument(skip(presenter))]
pub async fn select_view_handler(
    State(presenter): State<SharedPresenter>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let view: View = name.parse()?;
    // The fetch task is detached; navigation does not wait on it
    let _ = presenter.select(view).await;
    info!(%view, "Switched view");
    Ok(Redirect::to("/"))
}

#[instrument(skip(presenter))]
pub async fn get_reports_handler(State(presenter): State<SharedPresenter>) -> Json<Vec<ReportDisplayItem>> {
    let items = catalog::build_report_catalog(presenter.reports_dir(), &presenter.content().reports);
    Json(items)
}

/// Serves the locally published tracker series.
#[instrument(skip(config))]
pub async fn get_tracker_data_handler(State(config): State<SharedConfig>) -> Result<Json<TrackerSeries>, AppError> {
    let path = &config.tracker_data_file;
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(?path, "Tracker data file missing");
            return Err(AppError::NotFound("tracker data not published".to_string()));
        }
        Err(e) => return Err(e.into()),
    };

    let series: TrackerSeries = serde_json::from_str(&content)?;
    debug!(point_count = series.len(), "Returning tracker data");
    Ok(Json(series))
}
