//! HTTP route handlers.

use std::path::Path as FsPath;

use askama::Template;
use axum::{
    Form, Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{delete, get, post},
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::domain::{FieldErrors, SegmentForm, SegmentId};
use crate::registrar::{FetchRejection, Outcome, RegistrarError};

use super::dto::*;
use super::state::AppState;
use super::templates::*;

/// Create the application router.
///
/// `static_dir` is the path to the static assets directory.
pub fn create_router(state: AppState, static_dir: impl AsRef<FsPath>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/segments", get(segments_page).post(create_segment))
        .route("/segments/:id/delete", post(delete_segment))
        .route("/api/segments", get(list_segments).post(submit_segment))
        .route("/api/segments/:id", delete(remove_segment))
        .route("/api/reference", get(reference))
        .nest_service("/static", ServeDir::new(static_dir.as_ref()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

async fn index() -> Redirect {
    Redirect::to("/segments")
}

/// Render a template, mapping failures to an internal error.
fn render(template: &impl Template) -> Result<Html<String>, AppError> {
    template.render().map(Html).map_err(|e| AppError::Internal {
        message: format!("Template error: {}", e),
    })
}

/// Render the listing page around `form`, echoing any errors.
fn listing_page(
    state: &AppState,
    form: SegmentForm,
    errors: Option<&FieldErrors>,
    rejection: Option<FetchRejection>,
    notice: Option<&str>,
) -> Result<Html<String>, AppError> {
    let listings = state.registrar.list()?;
    let template = SegmentsTemplate::new(
        &listings,
        state.registrar.reference(),
        form,
        errors,
        rejection.map(|r| r.message()),
        notice,
    );
    render(&template)
}

/// Segment listing with the registration form.
async fn segments_page(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Html<String>, AppError> {
    let notice = notice_message(query.notice.as_deref());
    listing_page(&state, SegmentForm::default(), None, None, notice)
}

/// Check if the client asked for JSON.
fn accepts_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("application/json"))
}

/// Register a segment from the HTML form.
///
/// Success redirects back to the listing; any rejection re-renders the page
/// with the submitted input preserved. Clients accepting JSON get the same
/// responses as `POST /api/segments`.
async fn create_segment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<SegmentForm>,
) -> Result<Response, AppError> {
    let outcome = state.registrar.submit(&form).await?;

    if accepts_json(&headers) {
        return Ok(json_outcome(outcome, form));
    }

    match outcome {
        Outcome::Created(_) => Ok(Redirect::to("/segments?notice=created").into_response()),
        Outcome::ValidationRejected(errors) => {
            let page = listing_page(&state, form, Some(&errors), None, None)?;
            Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response())
        }
        Outcome::FetchRejected(rejection) => {
            let page = listing_page(&state, form, None, Some(rejection), None)?;
            Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response())
        }
    }
}

/// Delete a segment from the HTML listing.
async fn delete_segment(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Response, AppError> {
    match state.registrar.remove(SegmentId(id)) {
        Ok(_) => Ok(Redirect::to("/segments?notice=removed").into_response()),
        Err(RegistrarError::SegmentNotFound(id)) => {
            let page = render(&ErrorTemplate {
                title: "Segment not found".to_string(),
                message: format!("There is no segment with id {}.", id),
            })?;
            Ok((StatusCode::NOT_FOUND, page).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// All segments as JSON, newest first.
async fn list_segments(State(state): State<AppState>) -> Result<Json<SegmentListResponse>, AppError> {
    let segments = state
        .registrar
        .list()?
        .iter()
        .map(SegmentResult::from_listing)
        .collect();
    Ok(Json(SegmentListResponse { segments }))
}

/// Register a segment from a JSON body.
async fn submit_segment(
    State(state): State<AppState>,
    Json(payload): Json<SegmentPayload>,
) -> Result<Response, AppError> {
    let form = payload.into_form();
    let outcome = state.registrar.submit(&form).await?;
    Ok(json_outcome(outcome, form))
}

/// JSON rendering of a submission outcome.
fn json_outcome(outcome: Outcome, form: SegmentForm) -> Response {
    match outcome {
        Outcome::Created(id) => (StatusCode::CREATED, Json(CreatedResponse { id })).into_response(),
        Outcome::ValidationRejected(errors) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ValidationErrorResponse {
                errors,
                input: form,
            }),
        )
            .into_response(),
        Outcome::FetchRejected(rejection) => (
            StatusCode::BAD_GATEWAY,
            Json(FetchErrorResponse {
                error: rejection.message(),
                kind: rejection,
                input: form,
            }),
        )
            .into_response(),
    }
}

/// Delete a segment by id.
async fn remove_segment(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<StatusCode, AppError> {
    state.registrar.remove(SegmentId(id))?;
    Ok(StatusCode::NO_CONTENT)
}

/// State and route lookup lists.
async fn reference(State(state): State<AppState>) -> Json<ReferenceResponse> {
    let reference = state.registrar.reference();
    Json(ReferenceResponse {
        states: reference.states().iter().map(StateResult::from_state).collect(),
        routes: reference.routes().iter().map(RouteResult::from_route).collect(),
    })
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    NotFound { message: String },
    Internal { message: String },
}

impl From<RegistrarError> for AppError {
    fn from(e: RegistrarError) -> Self {
        match e {
            RegistrarError::SegmentNotFound(_) => AppError::NotFound {
                message: e.to_string(),
            },
            RegistrarError::Store(_) => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
