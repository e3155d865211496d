use std::path::{Component, Path as FsPath};
use std::sync::Arc;

use api_types::{
    AdminOption, AdminQuestion, AnswerRequest, AnswerResponse, LoginRequest, OverviewResponse,
    PositionRequest, PositionResponse, QuestionView, ResetResponse, SettingsUpdate,
    StatusResponse,
};
use axum::extract::{Path, Query, Request, State};
use axum::http::header;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use scavenger_core::game::{Game, Location};
use scavenger_core::stats::{self, SummaryRow};
use scavenger_core::{
    GameSettings, NextLocationMechanic, Position, PositionReport, Scavenger, TeamName,
    TeamStatus,
};
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::AppState;
use super::error::{ApiError, ApiResult};

type AppStateArc = Arc<AppState>;

pub fn create_router(state: AppStateArc) -> Router {
    Router::new()
        .merge(player_routes())
        .merge(admin_routes(state.clone()))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

// ============================================================================
// Player Routes
// ============================================================================

fn player_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/teams", post(login))
        .route("/teams/{team}", get(team_status))
        .route("/teams/{team}/position", post(report_position))
        .route("/teams/{team}/answer", post(submit_answer))
        .route("/images/{*path}", get(serve_image))
}

fn status_response(status: TeamStatus) -> StatusResponse {
    StatusResponse {
        team_name: status.team.name.to_string(),
        solved: status.team.solved.len(),
        total_locations: status.total_locations,
        finished: status.finished,
        goal: status.goal.map(|l| l.name),
        beam_available: status.beam_available,
    }
}

/// URL of the location's image, when the game ships one
fn image_url(game: &Game, location: &Location) -> Option<String> {
    if location.image.is_empty() || !game.asset_dir().join(&location.image).is_file() {
        return None;
    }
    Some(format!("/images/{}", location.image))
}

async fn login(
    State(state): State<AppStateArc>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<StatusResponse>> {
    let mut scavenger = state.scavenger.lock().await;
    let status = scavenger.login(&req.team_name)?;
    Ok(Json(status_response(status)))
}

async fn team_status(
    State(state): State<AppStateArc>,
    Path(team): Path<String>,
) -> ApiResult<Json<StatusResponse>> {
    let name = TeamName::parse(&team)?;
    let scavenger = state.scavenger.lock().await;
    Ok(Json(status_response(scavenger.status(&name)?)))
}

/// Run `f` on the blocking pool while holding the session lock.
///
/// Appending to the location log may sleep between retries.
async fn with_scavenger_blocking<T, F>(state: &AppStateArc, f: F) -> ApiResult<T>
where
    F: FnOnce(&mut Scavenger) -> ApiResult<T> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || {
        let mut scavenger = state.scavenger.blocking_lock();
        f(&mut *scavenger)
    })
    .await?
}

async fn report_position(
    State(state): State<AppStateArc>,
    Path(team): Path<String>,
    Json(req): Json<PositionRequest>,
) -> ApiResult<Json<PositionResponse>> {
    let name = TeamName::parse(&team)?;

    let response = with_scavenger_blocking(&state, move |scavenger| {
        let report = scavenger.report_position(
            &name,
            Position::new(req.latitude, req.longitude),
            req.beam,
        )?;

        Ok(match report {
            PositionReport::Finished => PositionResponse::Finished,
            PositionReport::Tracking(tracking) => {
                let question = if tracking.question_visible {
                    let game = scavenger.game();
                    let goal = game.location_by_name(&tracking.goal)?;
                    Some(QuestionView::from_location(goal, image_url(game, goal)))
                } else {
                    None
                };

                PositionResponse::Tracking {
                    latitude: tracking.position.latitude,
                    longitude: tracking.position.longitude,
                    beamed: tracking.beamed,
                    goal: tracking.goal,
                    distance_m: tracking.distance_m,
                    bearing_deg: tracking.bearing_deg,
                    radius: tracking.radius,
                    question,
                }
            }
        })
    })
    .await?;

    Ok(Json(response))
}

async fn submit_answer(
    State(state): State<AppStateArc>,
    Path(team): Path<String>,
    Json(req): Json<AnswerRequest>,
) -> ApiResult<Json<AnswerResponse>> {
    let name = TeamName::parse(&team)?;
    let mut scavenger = state.scavenger.lock().await;
    let outcome = scavenger.submit_answer(&name, &req.location, &req.answer)?;

    Ok(Json(AnswerResponse {
        location: outcome.location,
        score: outcome.score,
        next_goal: outcome.next_goal,
        finished: outcome.finished,
    }))
}

fn content_type(path: &FsPath) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Only images referenced by the catalog are served
async fn serve_image(
    State(state): State<AppStateArc>,
    Path(path): Path<String>,
) -> ApiResult<Response> {
    let relative = FsPath::new(&path);
    if !relative.components().all(|c| matches!(c, Component::Normal(_))) {
        return Err(ApiError::NotFound(path));
    }

    let file = {
        let scavenger = state.scavenger.lock().await;
        let game = scavenger.game();
        if !game.locations.iter().any(|l| l.image == path) {
            return Err(ApiError::NotFound(path));
        }
        game.asset_dir().join(relative)
    };

    match tokio::fs::read(&file).await {
        Ok(bytes) => Ok(([(header::CONTENT_TYPE, content_type(&file))], bytes).into_response()),
        Err(_) => Err(ApiError::NotFound(path)),
    }
}

async fn health() -> &'static str {
    "OK"
}

// ============================================================================
// Admin Routes
// ============================================================================

fn admin_routes(state: AppStateArc) -> Router<AppStateArc> {
    Router::new()
        .route("/admin/overview", get(overview))
        .route("/admin/settings", put(update_settings))
        .route("/admin/teams", delete(reset_teams))
        .route("/admin/questions/{index}", get(question))
        .route("/admin/summary", get(summary))
        .route("/admin/summary.csv", get(summary_csv))
        .route("/admin/log.csv", get(log_csv))
        .route("/admin/tracks.geojson", get(tracks))
        .route_layer(middleware::from_fn_with_state(state, require_admin_token))
}

async fn require_admin_token(
    State(state): State<AppStateArc>,
    request: Request,
    next: Next,
) -> Response {
    if let Some(expected) = &state.admin_token {
        let provided = request
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));

        if provided != Some(expected.as_str()) {
            tracing::warn!(path = %request.uri().path(), "rejected admin request");
            return ApiError::Unauthorized.into_response();
        }
    }

    next.run(request).await
}

async fn overview(State(state): State<AppStateArc>) -> ApiResult<Json<OverviewResponse>> {
    let scavenger = state.scavenger.lock().await;
    let game = scavenger.game();
    let teams = scavenger.store().teams()?;
    let active_teams = scavenger.store().n_active_teams()?;

    Ok(Json(OverviewResponse {
        registered_teams: active_teams,
        teams: stats::team_overview(game, &teams),
        puzzles: stats::puzzle_overview(game, &teams, active_teams),
        settings: scavenger.store().settings(),
        mechanics: NextLocationMechanic::all().collect(),
    }))
}

async fn update_settings(
    State(state): State<AppStateArc>,
    Json(update): Json<SettingsUpdate>,
) -> ApiResult<Json<GameSettings>> {
    let mut scavenger = state.scavenger.lock().await;
    let store = scavenger.store_mut();

    if let Some(visible) = update.button_beam_to_location_visible {
        store.set_beam_visible(visible)?;
    }
    if let Some(mechanic) = update.next_location_mechanic {
        store.set_mechanic(mechanic)?;
    }

    Ok(Json(store.settings()))
}

async fn reset_teams(State(state): State<AppStateArc>) -> ApiResult<Json<ResetResponse>> {
    let mut scavenger = state.scavenger.lock().await;
    let deleted_teams = scavenger.reset()?;
    Ok(Json(ResetResponse { deleted_teams }))
}

#[derive(Debug, Deserialize)]
struct QuestionQuery {
    #[serde(default)]
    show_score: bool,
}

async fn question(
    State(state): State<AppStateArc>,
    Path(index): Path<i64>,
    Query(query): Query<QuestionQuery>,
) -> ApiResult<Json<AdminQuestion>> {
    let scavenger = state.scavenger.lock().await;
    let game = scavenger.game();

    let (index, location) = game
        .location_at(index)
        .ok_or_else(|| ApiError::NotFound("the game has no locations".to_string()))?;

    let admin_option = |o: &scavenger_core::AnswerOption| AdminOption {
        option: o.option.clone(),
        score: query.show_score.then_some(o.score),
    };

    Ok(Json(AdminQuestion {
        index,
        total: game.locations.len(),
        location: location.name.clone(),
        question_type: location.question_type,
        question: location.question.clone(),
        image_url: image_url(game, location),
        options: location.answer.iter().map(admin_option).collect(),
        dont_know: location.dont_know_answer.as_ref().map(admin_option),
    }))
}

async fn summary_rows(state: &AppState) -> ApiResult<Vec<SummaryRow>> {
    let scavenger = state.scavenger.lock().await;
    let teams = scavenger.store().teams()?;
    let log = scavenger.log().read_all()?;
    Ok(stats::summary(&teams, &log))
}

async fn summary(State(state): State<AppStateArc>) -> ApiResult<Json<Vec<SummaryRow>>> {
    Ok(Json(summary_rows(&state).await?))
}

fn csv_download(filename: &str, body: String) -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
        .into_response()
}

async fn summary_csv(State(state): State<AppStateArc>) -> ApiResult<Response> {
    let rows = summary_rows(&state).await?;
    Ok(csv_download("summary.csv", stats::summary_csv(&rows)))
}

async fn log_csv(State(state): State<AppStateArc>) -> ApiResult<Response> {
    let log = state.scavenger.lock().await.log().read_all()?;
    Ok(csv_download("location_log.csv", stats::log_csv(&log)))
}

async fn tracks(State(state): State<AppStateArc>) -> ApiResult<Response> {
    let log = state.scavenger.lock().await.log().read_all()?;
    let collection = stats::tracks_geojson(&log);

    Ok((
        [(header::CONTENT_TYPE, "application/geo+json")],
        Json(collection),
    )
        .into_response())
}
