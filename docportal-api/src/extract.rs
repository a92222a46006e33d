/// Extractors whose rejections render as [`ApiError`] JSON bodies
///
/// Axum's stock `Json`, `Path`, `Query` and `Multipart` reject with
/// plain-text bodies. These wrappers run the same extraction and convert the
/// rejection, so a malformed UUID or body looks like every other API error.

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Multipart, Request},
};

use crate::error::ApiError;

/// JSON request body
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Path parameters
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

/// Query string
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

/// Multipart form body
pub struct ApiMultipart(pub Multipart);

#[async_trait]
impl<S> FromRequest<S> for ApiMultipart
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(Multipart::from_request(req, state).await?))
    }
}
