//! Listing input and the paginated result shape shared by both aggregates.

use domain::{SearchInput, SearchOrder, SearchOutput, SortField, search};
use serde::Serialize;

/// Query parameters of a list request, with defaults already applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListInput {
    pub page: u32,
    pub per_page: u32,
    pub search: String,
    pub sort: String,
    pub dir: SearchOrder,
}

impl Default for ListInput {
    fn default() -> Self {
        Self {
            page: search::DEFAULT_PAGE,
            per_page: search::DEFAULT_PER_PAGE,
            search: String::new(),
            sort: String::new(),
            dir: SearchOrder::Asc,
        }
    }
}

impl ListInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn to_search_input(&self) -> SearchInput {
        SearchInput::new()
            .page(self.page)
            .per_page(self.per_page)
            .search(self.search.clone())
            .sort(SortField::parse(&self.sort))
            .dir(self.dir)
    }
}

/// One page of DTOs plus the paging metadata the caller needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginatedListOutput<T> {
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
    pub items: Vec<T>,
}

impl<T> PaginatedListOutput<T> {
    pub fn from_search<A>(output: SearchOutput<A>, to_dto: impl FnMut(A) -> T) -> Self {
        let output = output.map(to_dto);
        Self {
            page: output.current_page,
            per_page: output.per_page,
            total: output.total,
            items: output.items,
        }
    }
}
