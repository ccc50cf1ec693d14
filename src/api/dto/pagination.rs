//! Query parameters for customer listing and search.

use serde::Deserialize;
use serde_with::{DisplayFromStr, serde_as};

use crate::domain::paging::{PageRequest, Sort};
use crate::error::AppError;

fn default_sort_dir() -> String {
    "asc".to_string()
}

/// Query parameters of `GET /api/customers`.
///
/// `sortDir` defaults to `"asc"` even when `sortBy` is absent.
#[serde_as]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page: Option<i64>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub size: Option<i64>,

    pub sort_by: Option<String>,

    #[serde(default = "default_sort_dir")]
    pub sort_dir: String,
}

impl ListParams {
    /// The requested ordering, if `sortBy` was given.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `sortBy` names an unknown property.
    pub fn sort(&self) -> Result<Option<Sort>, AppError> {
        self.sort_by
            .as_deref()
            .map(|sort_by| Sort::parse(sort_by, &self.sort_dir))
            .transpose()
    }

    /// A page request when both `page` and `size` were given.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the page index or size is out of range,
    /// or `sortBy` names an unknown property.
    pub fn page_request(&self) -> Result<Option<PageRequest>, AppError> {
        match (self.page, self.size) {
            (Some(page), Some(size)) => PageRequest::new(page, size, self.sort()?).map(Some),
            _ => Ok(None),
        }
    }
}

/// Query parameters of `GET /api/customers/search`.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub keyword: String,
}

/// Query parameters of `GET /api/customers/advanced-search`. All optional.
#[derive(Debug, Default, Deserialize)]
pub struct AdvancedSearchParams {
    pub name: Option<String>,
    pub email: Option<String>,
    pub status: Option<String>,
}
