//! Page size / offset / page count derived from the `page` and `size` query parameters.

use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use std::collections::HashMap;
use std::convert::Infallible;
use thiserror::Error;

pub const DEFAULT_PAGE_SIZE: u64 = 20;
pub const MAXIMUM_PAGE_SIZE: u64 = 100;
pub const MINIMUM_PAGE_SIZE: u64 = 10;
pub const DEFAULT_PAGE: u64 = 1;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PageError {
    #[error("Requested page must be between 1 and {last}")]
    OutOfRange { last: u64 },
}

/// Computed fresh from the request on every call; nothing is stored between requests.
#[derive(Clone, Debug, Default)]
pub struct Pagination {
    page: Option<String>,
    size: Option<String>,
}

impl Pagination {
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        Pagination {
            page: params.get("page").cloned(),
            size: params.get("size").cloned(),
        }
    }

    /// Parse `page` and `size` from a raw query string (without the leading `?`). First value wins.
    pub fn from_query(query: &str) -> Self {
        let mut p = Pagination::default();
        for (k, v) in url::form_urlencoded::parse(query.as_bytes()) {
            match k.as_ref() {
                "page" if p.page.is_none() => p.page = Some(v.into_owned()),
                "size" if p.size.is_none() => p.size = Some(v.into_owned()),
                _ => {}
            }
        }
        p
    }

    /// Requested page size, default 20, clamped to 10..=100. Unparseable sizes clamp to the minimum.
    pub fn size(&self) -> u64 {
        match &self.size {
            Some(s) => s
                .trim()
                .parse::<u64>()
                .unwrap_or(0)
                .clamp(MINIMUM_PAGE_SIZE, MAXIMUM_PAGE_SIZE),
            None => DEFAULT_PAGE_SIZE,
        }
    }

    /// Row offset of the requested page, saturating for absurd page numbers.
    pub fn offset(&self) -> u64 {
        match &self.page {
            Some(p) => {
                let page = p.trim().parse::<u64>().unwrap_or(0).max(DEFAULT_PAGE);
                (page - 1).saturating_mul(self.size())
            }
            None => 0,
        }
    }

    pub fn total_pages(&self, count: u64) -> u64 {
        (count / self.size() + 1).max(1)
    }

    pub fn first_page(&self) -> u64 {
        DEFAULT_PAGE
    }

    pub fn current_page(&self, count: u64) -> Result<u64, PageError> {
        let requested = match &self.page {
            Some(p) => p.trim().parse::<u64>().unwrap_or(0),
            None => self.first_page(),
        };
        let last = self.total_pages(count);
        if requested < self.first_page() || requested > last {
            return Err(PageError::OutOfRange { last });
        }
        Ok(requested)
    }

    pub fn previous_page(&self, count: u64) -> Result<u64, PageError> {
        let current = self.current_page(count)?;
        Ok(if current > 1 { current - 1 } else { DEFAULT_PAGE })
    }

    pub fn next_page(&self, count: u64) -> Result<u64, PageError> {
        Ok(self.current_page(count)? + 1)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Pagination
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let params = Query::<HashMap<String, String>>::try_from_uri(&parts.uri)
            .map(|Query(p)| p)
            .unwrap_or_default();
        Ok(Pagination::from_params(&params))
    }
}
