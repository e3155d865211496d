use api_types::ErrorBody;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use scavenger_core::ScavengerError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Scavenger(#[from] ScavengerError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Missing or invalid admin token")]
    Unauthorized,

    #[error("Request task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Scavenger(e) => match e {
                ScavengerError::UnknownTeam(_) | ScavengerError::UnknownLocation(_) => {
                    StatusCode::NOT_FOUND
                }
                ScavengerError::InvalidTeamName(_)
                | ScavengerError::InvalidPosition { .. }
                | ScavengerError::UnknownOption { .. } => StatusCode::BAD_REQUEST,
                ScavengerError::NotCurrentGoal { .. }
                | ScavengerError::Finished(_)
                | ScavengerError::QuestionLocked(_)
                | ScavengerError::NoUnsolvedLocations(_) => StatusCode::CONFLICT,
                ScavengerError::Io { .. }
                | ScavengerError::Yaml { .. }
                | ScavengerError::Json(_)
                | ScavengerError::InvalidGame(_)
                | ScavengerError::LogWrite { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, %status, "request rejected");
        }

        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
