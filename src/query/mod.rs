//! Blog listing query construction.
//!
//! Raw query-string values are coerced into a typed [`BlogQuery`], whose
//! [`BlogFilter`] renders the storage predicate. Tag matching is OR within the
//! requested tags, search is OR across title/sub_title/content, and the two
//! filters are ANDed when both are present.

use sqlx::{QueryBuilder, Sqlite};

use crate::models::normalize_tags;

/// Page used when `page` is absent or malformed.
pub const DEFAULT_PAGE: u32 = 1;
/// Page size used when `limit` is absent or malformed.
pub const DEFAULT_LIMIT: u32 = 10;
/// Largest accepted page size.
pub const MAX_LIMIT: u32 = 100;

/// Raw `GET /api/blogs` query parameters. Everything is optional and lenient.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub tags: Option<String>,
    pub search: Option<String>,
}

impl ListParams {
    /// Collect from decoded query pairs. A repeated key keeps its first value;
    /// unknown keys are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "page" => &mut params.page,
                "limit" => &mut params.limit,
                "tags" => &mut params.tags,
                "search" => &mut params.search,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        params
    }
}

/// A coerced listing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogQuery {
    pub page: u32,
    pub limit: u32,
    pub filter: BlogFilter,
}

/// Storage predicate for blog listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlogFilter {
    /// Lowercased tags; a blog matches if it carries any of them.
    pub tags: Vec<String>,
    /// Lowercased needle matched as a substring of title, sub_title or content.
    pub search: Option<String>,
}

impl From<ListParams> for BlogQuery {
    fn from(params: ListParams) -> Self {
        let page = parse_positive(params.page.as_deref()).unwrap_or(DEFAULT_PAGE);
        let limit = parse_positive(params.limit.as_deref())
            .unwrap_or(DEFAULT_LIMIT)
            .min(MAX_LIMIT);

        let filter = BlogFilter::new(
            params.tags.as_deref().map(split_tags).unwrap_or_default(),
            params.search.as_deref(),
        );

        Self {
            page,
            limit,
            filter,
        }
    }
}

impl BlogQuery {
    /// Number of matching rows to skip before this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

impl BlogFilter {
    pub fn new(tags: Vec<String>, search: Option<&str>) -> Self {
        let mut tags = normalize_tags(tags);
        let mut seen = std::collections::HashSet::new();
        tags.retain(|t| seen.insert(t.clone()));

        let search = search.map(|s| fold_case(s.trim())).filter(|s| !s.is_empty());

        Self { tags, search }
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty() && self.search.is_none()
    }

    /// Append the `WHERE` clause (if any) for a query over `blogs b`.
    pub fn push_where(&self, qb: &mut QueryBuilder<'_, Sqlite>) {
        if self.is_empty() {
            return;
        }
        qb.push(" WHERE ");

        if !self.tags.is_empty() {
            qb.push("EXISTS (SELECT 1 FROM json_each(b.tags) WHERE json_each.value IN (");
            {
                let mut in_list = qb.separated(", ");
                for tag in &self.tags {
                    in_list.push_bind(tag.clone());
                }
            }
            qb.push("))");
        }

        if let Some(needle) = &self.search {
            if !self.tags.is_empty() {
                qb.push(" AND ");
            }
            // *_folded columns hold fold_case() of the stored text
            qb.push("(instr(b.title_folded, ");
            qb.push_bind(needle.clone());
            qb.push(") > 0 OR instr(b.sub_title_folded, ");
            qb.push_bind(needle.clone());
            qb.push(") > 0 OR instr(b.content_folded, ");
            qb.push_bind(needle.clone());
            qb.push(") > 0)");
        }
    }
}

/// Case folding shared by stored search columns and search needles.
///
/// Unicode-aware, so `Éclair` and `éclair` fold to the same text.
pub fn fold_case(text: &str) -> String {
    text.to_lowercase()
}

/// Split a comma-joined tag list.
pub fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',').map(str::to_string).collect()
}

fn parse_positive(raw: Option<&str>) -> Option<u32> {
    raw?.trim().parse::<u32>().ok().filter(|n| *n >= 1)
}
