//! Query-string extractor with automatic validation using the validator crate.

use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use validator::Validate;

/// Query-string extractor with automatic validation.
///
/// Deserialization failures (missing field, non-integer number) and
/// `Validate` failures are both rejected with `422 Unprocessable Entity`
/// before the handler runs.
///
/// # Example
/// ```ignore
/// use axum::Router;
/// use axum::routing::get;
/// use axum_helpers::extractors::ValidatedQuery;
/// use serde::Deserialize;
/// use validator::Validate;
///
/// #[derive(Deserialize, Validate)]
/// struct Lookup {
///     #[validate(length(min = 1, max = 64))]
///     term: String,
/// }
///
/// async fn lookup(ValidatedQuery(params): ValidatedQuery<Lookup>) -> String {
///     params.term
/// }
///
/// let app: Router = Router::new().route("/lookup", get(lookup));
/// ```
#[derive(Debug, Clone)]
pub struct ValidatedQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        value.validate()?;
        Ok(ValidatedQuery(value))
    }
}
