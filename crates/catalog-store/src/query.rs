//! SQL for the paged search shared by the category and genre tables.

use domain::{SearchInput, SortField};

/// Column list selected from `categories`.
pub const CATEGORY_COLUMNS: &str = "id, name, description, is_active, created_at";

/// Column list selected from `genres`.
pub const GENRE_COLUMNS: &str = "id, name, is_active, created_at";

/// Builds the count and page statements for one search.
///
/// The name filter uses `strpos`, so matching is case-sensitive and treats
/// `%` and `_` literally. Name ordering uses the "C" collation to compare
/// bytes, followed by `id ASC` to make ties deterministic.
#[derive(Debug, Clone, Copy)]
pub struct SearchQuery<'a> {
    table: &'static str,
    columns: &'static str,
    input: &'a SearchInput,
}

impl<'a> SearchQuery<'a> {
    pub fn categories(input: &'a SearchInput) -> Self {
        Self {
            table: "categories",
            columns: CATEGORY_COLUMNS,
            input,
        }
    }

    pub fn genres(input: &'a SearchInput) -> Self {
        Self {
            table: "genres",
            columns: GENRE_COLUMNS,
            input,
        }
    }

    /// Value bound to `$1` when the search has a filter.
    pub fn filter(&self) -> Option<&'a str> {
        self.input
            .has_filter()
            .then_some(self.input.search.as_str())
    }

    pub fn count_sql(&self) -> String {
        let mut sql = format!("SELECT COUNT(*) FROM {}", self.table);
        if self.input.has_filter() {
            sql.push_str(" WHERE strpos(name, $1) > 0");
        }
        sql
    }

    pub fn page_sql(&self) -> String {
        let mut sql = format!("SELECT {} FROM {}", self.columns, self.table);
        let mut param_count = 0;

        if self.input.has_filter() {
            param_count += 1;
            sql.push_str(&format!(" WHERE strpos(name, ${param_count}) > 0"));
        }

        sql.push_str(" ORDER BY ");
        sql.push_str(&self.order_by());

        param_count += 1;
        sql.push_str(&format!(" LIMIT ${param_count}"));
        param_count += 1;
        sql.push_str(&format!(" OFFSET ${param_count}"));

        sql
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.input.per_page)
    }

    pub fn offset(&self) -> i64 {
        i64::try_from(self.input.offset()).unwrap_or(i64::MAX)
    }

    fn order_by(&self) -> String {
        let dir = self.input.dir.as_sql();
        match self.input.sort {
            SortField::Name => format!("name COLLATE \"C\" {dir}, id ASC"),
            SortField::Id => format!("id {dir}"),
            SortField::CreatedAt => format!("created_at {dir}"),
        }
    }
}
