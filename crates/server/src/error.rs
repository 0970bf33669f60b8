use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use pagerender::{RenderError, ResponseError};

pub struct AppError(pub anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status_code = match self.0.downcast_ref::<RenderError>() {
            Some(RenderError::Invalid(_) | RenderError::Rejected(_)) => StatusCode::BAD_REQUEST,
            Some(RenderError::Response(ResponseError::Finished)) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        tracing::error!(status = %status_code, error = %self.0, "Request failed");
        (status_code, self.0.to_string()).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
