pub mod categories;
pub mod genres;
pub mod health;
pub mod metrics;

use application::{ListInput, PaginatedListOutput};
use domain::SearchOrder;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Query string of every list endpoint.
///
/// Blank `search` or `sort` values count as absent.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<u32>,
    #[serde(alias = "perPage")]
    pub per_page: Option<u32>,
    pub search: Option<String>,
    pub sort: Option<String>,
    pub dir: Option<String>,
}

impl TryFrom<ListQuery> for ListInput {
    type Error = ApiError;

    fn try_from(query: ListQuery) -> Result<Self, Self::Error> {
        let defaults = ListInput::new();
        let not_blank = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

        Ok(ListInput {
            page: query.page.unwrap_or(defaults.page),
            per_page: query.per_page.unwrap_or(defaults.per_page),
            search: not_blank(query.search).unwrap_or(defaults.search),
            sort: not_blank(query.sort).unwrap_or(defaults.sort),
            dir: match not_blank(query.dir) {
                Some(dir) => dir.parse::<SearchOrder>()?,
                None => defaults.dir,
            },
        })
    }
}

/// List envelope `{data, meta}`.
#[derive(Debug, Serialize)]
pub struct ApiResponseList<T> {
    pub data: Vec<T>,
    pub meta: ApiResponseListMeta,
}

#[derive(Debug, Serialize)]
pub struct ApiResponseListMeta {
    pub current_page: u32,
    pub per_page: u32,
    pub total: u64,
}

impl<T> From<PaginatedListOutput<T>> for ApiResponseList<T> {
    fn from(output: PaginatedListOutput<T>) -> Self {
        Self {
            data: output.items,
            meta: ApiResponseListMeta {
                current_page: output.page,
                per_page: output.per_page,
                total: output.total,
            },
        }
    }
}
