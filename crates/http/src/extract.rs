//! Request extractors that report failures through [`AppError`].

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// JSON request body.
///
/// A body that is not JSON, is not labelled as JSON, or does not fit the
/// target type (missing fields, wrong types such as a fractional rating) is a
/// validation error. Failures reading the body keep the extractor's status,
/// e.g. 413 when the body limit is exceeded.
#[derive(Debug, Clone)]
pub struct Payload<T>(pub T);

impl<T, S> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(JsonRejection::JsonDataError(err)) => Err(body_violation(
                err.body_text(),
                "request body does not match the expected schema",
            )),
            Err(JsonRejection::JsonSyntaxError(err)) => {
                Err(body_violation(err.body_text(), "request body is not valid JSON"))
            }
            Err(JsonRejection::MissingJsonContentType(err)) => Err(body_violation(
                err.body_text(),
                "request body must be sent as application/json",
            )),
            Err(rejection) => Err(AppError::rejected(rejection.status(), rejection.body_text())),
        }
    }
}

fn body_violation(error: String, message: &str) -> AppError {
    AppError::validation(
        vec![serde_json::json!({ "field": "body", "error": error })],
        message,
    )
}
