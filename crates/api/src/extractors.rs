//! Request extractors.

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};
use shiftedblog_core::PageRequest;

fn query_param(parts: &Parts, name: &str) -> Option<String> {
    let query = parts.uri.query()?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

/// `?page=` of a listing. Never rejects; bad values fall back to page 1.
#[derive(Debug, Clone, Copy)]
pub struct PageParam(pub PageRequest);

impl<S> FromRequestParts<S> for PageParam
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(PageRequest::parse(
            query_param(parts, "page").as_deref(),
        )))
    }
}

/// `?query=` of the search page.
#[derive(Debug, Clone)]
pub struct SearchQuery(pub Option<String>);

impl<S> FromRequestParts<S> for SearchQuery
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(query_param(parts, "query")))
    }
}
