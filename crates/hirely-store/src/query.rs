//! PostgREST query parameters.

use std::fmt::Display;

/// Filters, embedded selects and row limits rendered as URL parameters.
///
/// ```
/// use hirely_store::Query;
///
/// let q = Query::new()
///     .select("*, company: companies(name,logo_url)")
///     .eq("location", "Karnataka")
///     .ilike_contains("title", "engineer");
/// assert!(q.has_filters());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    select: Option<String>,
    filters: Vec<(String, String)>,
    limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Columns and embedded relations to return.
    pub fn select(mut self, columns: impl Into<String>) -> Self {
        self.select = Some(columns.into());
        self
    }

    /// `column = value`.
    pub fn eq(mut self, column: impl Into<String>, value: impl Display) -> Self {
        self.filters.push((column.into(), format!("eq.{}", value)));
        self
    }

    /// Case-insensitive substring match.
    ///
    /// `%`, `_` and `\` in `needle` match themselves. The store reads every
    /// `*` as a wildcard, so a literal `*` widens to any single character and
    /// callers needing exact matches re-check the rows.
    pub fn ilike_contains(mut self, column: impl Into<String>, needle: &str) -> Self {
        self.filters
            .push((column.into(), format!("ilike.*{}*", escape_like(needle))));
        self
    }

    pub fn limit(mut self, rows: usize) -> Self {
        self.limit = Some(rows);
        self
    }

    pub fn has_filters(&self) -> bool {
        !self.filters.is_empty()
    }

    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::with_capacity(self.filters.len() + 3);
        if let Some(select) = &self.select {
            params.push(("select".to_string(), select.clone()));
        }
        params.extend(self.filters.iter().cloned());
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        params
    }
}

fn escape_like(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len());
    for c in needle.chars() {
        match c {
            '\\' | '%' | '_' => {
                pattern.push('\\');
                pattern.push(c);
            }
            '*' => pattern.push('_'),
            _ => pattern.push(c),
        }
    }
    pattern
}
