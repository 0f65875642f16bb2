use axum::{async_trait, extract::FromRequest, http::Request, Json, RequestExt};
use validator::Validate;

use super::AppError;

/// Json body extractor which also runs the `validator` rules of the body.
/// Rejections are reported as 400 with the generic json error body
pub struct ValidatedBody<T>(pub T);

#[async_trait]
impl<S, B, T> FromRequest<S, B> for ValidatedBody<T>
where
    B: Send + 'static,
    S: Send + Sync,
    T: Validate + 'static,
    Json<T>: FromRequest<(), B>,
{
    type Rejection = AppError;

    async fn from_request(req: Request<B>, _state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = req
            .extract::<Json<T>, _>()
            .await
            .map_err(|_| AppError::BadRequestErr("Invalid JSON body".to_owned()))?;
        data.validate().map_err(|err| {
            AppError::BadRequestErr(format!("Invalid JSON body: {}", err).replace('\n', ", "))
        })?;
        Ok(Self(data))
    }
}
