//! # API REST
//!
//! REST host for PView patient detail panels.
//!
//! Handles:
//! - mounting and unmounting detail views, each with its own view session
//! - HTTP endpoints with axum for the session's read model and operations
//! - OpenAPI/Swagger documentation
//!
//! Sessions are never shared between mounted views; a view id addresses exactly one panel.

#![warn(rust_2018_idioms)]

pub mod wire;

use axum::{
    extract::{Path as AxumPath, Query, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use uuid::Uuid;

use pview_core::{
    ActivityId, PanelEvent, PatientId, PatientPanel, ViewConfig, ViewError, ViewState,
};
use wire::{
    ErrorRes, HealthRes, LayoutRes, MountViewReq, MountViewRes, NavigationEntryRes, RenderRes,
    SetPatientReq, SnapshotRes, TransitionReq,
};

/// Viewport width assumed when a render request does not supply one.
pub const DEFAULT_VIEWPORT_WIDTH: u32 = 1280;

/// Upper bound on simultaneously mounted views.
///
/// Views live until a client unmounts them; once the registry is full, mounting is refused with
/// `503` until some view is unmounted.
pub const MAX_MOUNTED_VIEWS: usize = 1024;

/// Application state shared across REST handlers.
///
/// Holds the startup configuration and the registry of mounted panels.
#[derive(Clone)]
pub struct AppState {
    cfg: Arc<ViewConfig>,
    views: Arc<Mutex<HashMap<Uuid, PatientPanel>>>,
    max_views: usize,
}

impl AppState {
    pub fn new(cfg: ViewConfig) -> Self {
        Self::with_view_limit(cfg, MAX_MOUNTED_VIEWS)
    }

    pub fn with_view_limit(cfg: ViewConfig, max_views: usize) -> Self {
        Self {
            cfg: Arc::new(cfg),
            views: Arc::new(Mutex::new(HashMap::new())),
            max_views,
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        mount_view,
        get_view,
        unmount_view,
        set_patient,
        transition,
        go_back,
        toggle_full_view,
        escape,
        reset,
    ),
    components(schemas(
        HealthRes,
        ErrorRes,
        LayoutRes,
        NavigationEntryRes,
        SnapshotRes,
        RenderRes,
        MountViewReq,
        MountViewRes,
        SetPatientReq,
        TransitionReq,
    ))
)]
pub struct ApiDoc;

type ApiError = (StatusCode, Json<ErrorRes>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorRes {
            error: message.into(),
        }),
    )
}

/// Maps core errors onto HTTP statuses.
///
/// Contract violations are `422`, malformed input is `400`.
fn view_error(err: ViewError) -> ApiError {
    let status = match &err {
        ViewError::MissingSelection { .. } | ViewError::NoActiveSelection => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        ViewError::InvalidState(_) | ViewError::InvalidIdentifier(_) => StatusCode::BAD_REQUEST,
        ViewError::InvalidConfig(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    api_error(status, err.to_string())
}

fn not_found() -> ApiError {
    api_error(StatusCode::NOT_FOUND, "view not found")
}

/// Builds the REST router over `state`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/views", post(mount_view))
        .route("/views/:id", get(get_view))
        .route("/views/:id", delete(unmount_view))
        .route("/views/:id/patient", put(set_patient))
        .route("/views/:id/transition", post(transition))
        .route("/views/:id/back", post(go_back))
        .route("/views/:id/toggle-full-view", post(toggle_full_view))
        .route("/views/:id/escape", post(escape))
        .route("/views/:id/reset", post(reset))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Runs `f` against the panel mounted under `id` while holding the registry lock.
///
/// The snapshot a handler returns is therefore taken in the same critical section as the
/// mutation.
async fn with_panel<T>(
    state: &AppState,
    id: &str,
    f: impl FnOnce(&mut PatientPanel) -> Result<T, ApiError>,
) -> Result<T, ApiError> {
    let key = Uuid::parse_str(id).map_err(|_| not_found())?;
    let mut views = state.views.lock().await;
    let panel = views.get_mut(&key).ok_or_else(not_found)?;
    f(panel)
}

fn apply_event(
    panel: &mut PatientPanel,
    event: PanelEvent,
) -> Result<Json<SnapshotRes>, ApiError> {
    panel.dispatch(event).map_err(view_error)?;
    Ok(Json(SnapshotRes::from(&panel.session().snapshot())))
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "PView REST API is alive".into(),
    })
}

#[utoipa::path(
    post,
    path = "/views",
    request_body = MountViewReq,
    responses(
        (status = 201, description = "Detail view mounted", body = MountViewRes),
        (status = 400, description = "Bad request", body = ErrorRes),
        (status = 503, description = "Too many mounted views", body = ErrorRes)
    )
)]
/// Mount a detail view for a patient
///
/// Creates a fresh session in the default state and returns the identifier that addresses it in
/// subsequent calls.
///
/// # Errors
/// Returns `400 Bad Request` if the patient identifier is blank, or `503 Service Unavailable` if
/// the registry already holds the maximum number of views.
#[axum::debug_handler]
async fn mount_view(
    State(state): State<AppState>,
    Json(req): Json<MountViewReq>,
) -> Result<(StatusCode, Json<MountViewRes>), ApiError> {
    let patient = PatientId::new(&req.patient_id)
        .map_err(ViewError::from)
        .map_err(view_error)?;

    let panel = PatientPanel::new(patient, *state.cfg);
    let snapshot = SnapshotRes::from(&panel.session().snapshot());
    let key = Uuid::new_v4();

    let mut views = state.views.lock().await;
    if views.len() >= state.max_views {
        tracing::warn!("Refused to mount view: {} views already mounted", views.len());
        return Err(api_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "too many mounted views",
        ));
    }
    tracing::info!("Mounted view {} for patient {}", key, panel.patient());
    views.insert(key, panel);
    drop(views);

    Ok((
        StatusCode::CREATED,
        Json(MountViewRes {
            view_id: key.simple().to_string(),
            snapshot,
        }),
    ))
}

#[derive(Debug, Deserialize)]
struct RenderQuery {
    viewport_width: Option<u32>,
}

#[utoipa::path(
    get,
    path = "/views/{id}",
    params(
        ("id" = String, Path, description = "View identifier"),
        ("viewport_width" = Option<u32>, Query, description = "Viewport width in logical pixels")
    ),
    responses(
        (status = 200, description = "Render model for the view", body = RenderRes),
        (status = 404, description = "Unknown view", body = ErrorRes)
    )
)]
/// Read the render model of a mounted view
///
/// The effective layout applies the narrow-viewport override for the supplied width
/// (default 1280).
#[axum::debug_handler]
async fn get_view(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
    Query(query): Query<RenderQuery>,
) -> Result<Json<RenderRes>, ApiError> {
    let width = query.viewport_width.unwrap_or(DEFAULT_VIEWPORT_WIDTH);
    with_panel(&state, &id, |panel| {
        Ok(Json(RenderRes::from(&panel.render_model(width))))
    })
    .await
}

#[utoipa::path(
    delete,
    path = "/views/{id}",
    params(("id" = String, Path, description = "View identifier")),
    responses(
        (status = 204, description = "View unmounted and its session discarded"),
        (status = 404, description = "Unknown view", body = ErrorRes)
    )
)]
/// Unmount a detail view
#[axum::debug_handler]
async fn unmount_view(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<StatusCode, ApiError> {
    let key = Uuid::parse_str(&id).map_err(|_| not_found())?;
    match state.views.lock().await.remove(&key) {
        Some(_) => {
            tracing::info!("Unmounted view {}", key);
            Ok(StatusCode::NO_CONTENT)
        }
        None => Err(not_found()),
    }
}

#[utoipa::path(
    put,
    path = "/views/{id}/patient",
    request_body = SetPatientReq,
    params(("id" = String, Path, description = "View identifier")),
    responses(
        (status = 200, description = "Session after the patient update", body = SnapshotRes),
        (status = 400, description = "Bad request", body = ErrorRes),
        (status = 404, description = "Unknown view", body = ErrorRes)
    )
)]
/// Report the patient currently selected by the surrounding page
///
/// A different patient resets the session; the same patient leaves it untouched.
#[axum::debug_handler]
async fn set_patient(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
    Json(req): Json<SetPatientReq>,
) -> Result<Json<SnapshotRes>, ApiError> {
    let patient = PatientId::new(&req.patient_id)
        .map_err(ViewError::from)
        .map_err(view_error)?;
    with_panel(&state, &id, |panel| {
        panel.set_patient(patient);
        Ok(Json(SnapshotRes::from(&panel.session().snapshot())))
    })
    .await
}

#[utoipa::path(
    post,
    path = "/views/{id}/transition",
    request_body = TransitionReq,
    params(("id" = String, Path, description = "View identifier")),
    responses(
        (status = 200, description = "Session after the transition", body = SnapshotRes),
        (status = 400, description = "Unknown view state", body = ErrorRes),
        (status = 404, description = "Unknown view", body = ErrorRes),
        (status = 422, description = "Non-default state requested without a selection", body = ErrorRes)
    )
)]
/// Move a view to a state
///
/// A blank `selectedId` counts as no selection.
#[axum::debug_handler]
async fn transition(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
    Json(req): Json<TransitionReq>,
) -> Result<Json<SnapshotRes>, ApiError> {
    let target: ViewState = req.state.parse().map_err(view_error)?;
    let selected = req
        .selected_id
        .filter(|s| !s.trim().is_empty())
        .map(ActivityId::new)
        .transpose()
        .map_err(ViewError::from)
        .map_err(view_error)?;

    with_panel(&state, &id, |panel| {
        apply_event(
            panel,
            PanelEvent::Select {
                target,
                activity: selected,
            },
        )
    })
    .await
}

#[utoipa::path(
    post,
    path = "/views/{id}/back",
    params(("id" = String, Path, description = "View identifier")),
    responses(
        (status = 200, description = "Session after going back", body = SnapshotRes),
        (status = 404, description = "Unknown view", body = ErrorRes)
    )
)]
/// Go back one step; resets when there is no history
#[axum::debug_handler]
async fn go_back(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<Json<SnapshotRes>, ApiError> {
    with_panel(&state, &id, |panel| apply_event(panel, PanelEvent::Back)).await
}

#[utoipa::path(
    post,
    path = "/views/{id}/toggle-full-view",
    params(("id" = String, Path, description = "View identifier")),
    responses(
        (status = 200, description = "Session after the toggle", body = SnapshotRes),
        (status = 404, description = "Unknown view", body = ErrorRes),
        (status = 422, description = "No active selection", body = ErrorRes)
    )
)]
/// Toggle between the note and full views
#[axum::debug_handler]
async fn toggle_full_view(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<Json<SnapshotRes>, ApiError> {
    with_panel(&state, &id, |panel| {
        apply_event(panel, PanelEvent::ToggleFullView)
    })
    .await
}

#[utoipa::path(
    post,
    path = "/views/{id}/escape",
    params(("id" = String, Path, description = "View identifier")),
    responses(
        (status = 200, description = "Session after the escape key", body = SnapshotRes),
        (status = 404, description = "Unknown view", body = ErrorRes)
    )
)]
/// Escape key: leave the full view
#[axum::debug_handler]
async fn escape(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<Json<SnapshotRes>, ApiError> {
    with_panel(&state, &id, |panel| apply_event(panel, PanelEvent::Escape)).await
}

#[utoipa::path(
    post,
    path = "/views/{id}/reset",
    params(("id" = String, Path, description = "View identifier")),
    responses(
        (status = 200, description = "Session after the reset", body = SnapshotRes),
        (status = 404, description = "Unknown view", body = ErrorRes)
    )
)]
/// Reset a view to the patient overview
#[axum::debug_handler]
async fn reset(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<Json<SnapshotRes>, ApiError> {
    with_panel(&state, &id, |panel| apply_event(panel, PanelEvent::Reset)).await
}
