//! Pagination extractor
//!
//! Extracts page based pagination and the optional filter expression from
//! the query string, and builds the navigation links of list responses.

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::{header, request::Parts},
};
use calorie_core::{Page, PageRequest};
use serde::Deserialize;
use url::Url;

use crate::response::{ApiError, Link, PageResponse};

/// Raw pagination query parameters
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub per_page: Option<i64>,
    #[serde(default)]
    pub filter: Option<String>,
}

/// Normalized paging of one list request
#[derive(Debug, Clone)]
pub struct Pagination {
    pub request: PageRequest,
    pub filter: Option<String>,
    url: Url,
}

impl Pagination {
    fn new(params: PaginationParams, url: Url) -> Self {
        Self {
            request: PageRequest::new(params.page, params.per_page),
            filter: params.filter.filter(|f| !f.trim().is_empty()),
            url,
        }
    }

    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    /// Request URL with `page` and `per_page` set explicitly
    fn href(&self, page: i64) -> String {
        let mut url = self.url.clone();
        let retained: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| key != "page" && key != "per_page")
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        url.query_pairs_mut()
            .clear()
            .extend_pairs(retained)
            .append_pair("page", &page.to_string())
            .append_pair("per_page", &self.request.per_page.to_string());
        url.to_string()
    }

    /// `self`, `first`, `prev`, `next` and `last` links for `total` items
    pub fn links(&self, total: i64) -> Vec<Link> {
        let page = self.request.page;
        let last = self.request.last_page(total);

        vec![
            Link {
                rel: "self",
                href: Some(self.href(page)),
            },
            Link {
                rel: "first",
                href: Some(self.href(0)),
            },
            Link {
                rel: "prev",
                href: (page > 0).then(|| self.href(page - 1)),
            },
            Link {
                rel: "next",
                href: (page < last).then(|| self.href(page + 1)),
            },
            Link {
                rel: "last",
                href: Some(self.href(last)),
            },
        ]
    }

    pub fn respond<T>(&self, page: Page<T>) -> PageResponse<T> {
        let links = self.links(page.total);
        PageResponse::new(page, links)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Pagination
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<PaginationParams>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_query(e.body_text()))?;

        let host = parts
            .headers
            .get(header::HOST)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("localhost");
        let path = parts
            .uri
            .path_and_query()
            .map_or("/", |pq| pq.as_str());

        let url = Url::parse(&format!("http://{host}{path}"))
            .map_err(|_| ApiError::invalid_query("Invalid request URL"))?;

        Ok(Pagination::new(params, url))
    }
}
