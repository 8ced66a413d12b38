//! JSON bodies shared by the API handlers.

use salvo::http::StatusCode;
use salvo::writing::Json;
use salvo::{Request, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;

use clientbook_service::validation::FieldError;

use crate::error::{AppError, AppResult};

/// ## Summary
/// Error response payload
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    /// Per-field messages for form errors; empty otherwise.
    pub fields: Vec<FieldError>,
}

/// Outcome of a link or unlink request.
#[derive(Debug, Serialize)]
pub struct LinkResponse {
    /// Whether the link state changed.
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct DeletableResponse {
    pub deletable: bool,
}

/// ## Summary
/// Renders an error with its mapped status.
///
/// Infrastructure failures are logged and reported with a generic message.
pub fn render_error(res: &mut Response, err: &AppError) {
    let status = err.status_code();

    let body = if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!(error = ?err, "Request failed");
        ErrorResponse {
            error: "Internal server error".to_string(),
            fields: Vec::new(),
        }
    } else {
        tracing::debug!(error = %err, %status, "Request rejected");
        let fields = match err {
            AppError::ServiceError(service_err) => {
                service_err.field_errors().unwrap_or_default()
            }
            _ => Vec::new(),
        };
        ErrorResponse {
            error: err.to_string(),
            fields,
        }
    };

    res.status_code(status);
    res.render(Json(body));
}

/// ## Summary
/// Renders `result` as JSON with `status` on success, or as an error.
pub fn render_result<T>(res: &mut Response, status: StatusCode, result: AppResult<T>)
where
    T: Serialize + Send,
{
    match result {
        Ok(body) => {
            res.status_code(status);
            res.render(Json(body));
        }
        Err(err) => render_error(res, &err),
    }
}

/// ## Summary
/// Reads a numeric id from the route.
///
/// ## Errors
/// Returns `AppError::BadRequest` if the parameter is missing or not an integer.
pub fn path_id(req: &Request, name: &str) -> AppResult<i32> {
    req.param::<i32>(name)
        .ok_or_else(|| AppError::BadRequest(format!("Invalid path parameter '{name}'")))
}

/// ## Summary
/// Parses the JSON request body.
///
/// ## Errors
/// Returns `AppError::BadRequest` if the body is not valid JSON for `T`.
pub async fn parse_body<T>(req: &mut Request) -> AppResult<T>
where
    T: DeserializeOwned + Send,
{
    req.parse_json::<T>().await.map_err(|e| {
        tracing::debug!(error = %e, "Failed to parse request body");
        AppError::BadRequest("Invalid request body".to_string())
    })
}
