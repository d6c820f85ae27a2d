//! Search/pagination contract shared by every listing.

use std::cmp::Ordering;
use std::str::FromStr;

use crate::aggregate::Aggregate;
use crate::error::DomainError;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PER_PAGE: u32 = 15;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchOrder {
    #[default]
    Asc,
    Desc,
}

impl SearchOrder {
    /// Orients an ascending comparison result.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SearchOrder::Asc => ordering,
            SearchOrder::Desc => ordering.reverse(),
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            SearchOrder::Asc => "ASC",
            SearchOrder::Desc => "DESC",
        }
    }
}

impl FromStr for SearchOrder {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("asc") {
            Ok(SearchOrder::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Ok(SearchOrder::Desc)
        } else {
            Err(DomainError::validation(format!(
                "Dir should be asc or desc, got '{s}'"
            )))
        }
    }
}

/// Field a search is ordered by.
///
/// `Name` breaks ties by id; `Id` and `CreatedAt` order on that field alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    Name,
    Id,
    CreatedAt,
}

impl SortField {
    /// Case-insensitive; anything unrecognized sorts by name.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "id" => SortField::Id,
            "createdat" | "created_at" => SortField::CreatedAt,
            _ => SortField::Name,
        }
    }

    /// Returns the comparator implementing this field's ordering.
    pub fn comparator<A: Aggregate>(self, dir: SearchOrder) -> impl Fn(&A, &A) -> Ordering {
        move |a: &A, b: &A| match self {
            SortField::Name => dir
                .apply(a.name().cmp(b.name()))
                .then_with(|| a.id().cmp(&b.id())),
            SortField::Id => dir.apply(a.id().cmp(&b.id())),
            SortField::CreatedAt => dir.apply(a.created_at().cmp(&b.created_at())),
        }
    }
}

/// Builder for a filtered, sorted, paged query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchInput {
    pub page: u32,
    pub per_page: u32,
    /// Substring the name must contain; empty means no filter.
    pub search: String,
    pub sort: SortField,
    pub dir: SearchOrder,
}

impl Default for SearchInput {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
            search: String::new(),
            sort: SortField::default(),
            dir: SearchOrder::default(),
        }
    }
}

impl SearchInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn sort(mut self, sort: SortField) -> Self {
        self.sort = sort;
        self
    }

    pub fn dir(mut self, dir: SearchOrder) -> Self {
        self.dir = dir;
        self
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.page < 1 {
            return Err(DomainError::validation("Page should be at least 1"));
        }
        if self.per_page < 1 {
            return Err(DomainError::validation("PerPage should be at least 1"));
        }
        Ok(())
    }

    /// Number of matching items skipped before this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.per_page)
    }

    pub fn has_filter(&self) -> bool {
        !self.search.is_empty()
    }
}

/// One page of search results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutput<T> {
    pub current_page: u32,
    pub per_page: u32,
    /// Matching count before pagination.
    pub total: u64,
    pub items: Vec<T>,
}

impl<T> SearchOutput<T> {
    pub fn new(input: &SearchInput, total: u64, items: Vec<T>) -> Self {
        Self {
            current_page: input.page,
            per_page: input.per_page,
            total,
            items,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> SearchOutput<U> {
        SearchOutput {
            current_page: self.current_page,
            per_page: self.per_page,
            total: self.total,
            items: self.items.into_iter().map(f).collect(),
        }
    }
}
