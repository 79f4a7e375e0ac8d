//! Filter state for the blog feed.
//!
//! The state is an explicit value owned by the caller. Changing the tags, the
//! search text or the page size always moves the view back to page 1, so a
//! page number from an older filter is never requested under a new one.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::ClientError;
use crate::query::DEFAULT_LIMIT;

/// Tags, search text and page position driving the blog feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterState {
    pub selected_tags: Vec<String>,
    pub search_query: String,
    pub current_page: u32,
    pub items_per_page: u32,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            selected_tags: Vec::new(),
            search_query: String::new(),
            current_page: 1,
            items_per_page: DEFAULT_LIMIT,
        }
    }
}

/// Snapshot of a [`FilterState`] as listing request parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListQuery {
    pub page: u32,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl FilterState {
    /// Replace the selected tags. Duplicates are dropped, first occurrence wins.
    pub fn set_selected_tags<I, S>(&mut self, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected_tags.clear();
        for tag in tags {
            let tag = tag.into();
            if !self.selected_tags.contains(&tag) {
                self.selected_tags.push(tag);
            }
        }
        self.current_page = 1;
    }

    pub fn add_tag(&mut self, tag: impl Into<String>) {
        let tag = tag.into();
        if !self.selected_tags.contains(&tag) {
            self.selected_tags.push(tag);
            self.current_page = 1;
        }
    }

    pub fn remove_tag(&mut self, tag: &str) {
        self.selected_tags.retain(|t| t != tag);
        self.current_page = 1;
    }

    pub fn clear_tags(&mut self) {
        self.selected_tags.clear();
        self.current_page = 1;
    }

    pub fn set_search_query(&mut self, text: impl Into<String>) {
        self.search_query = text.into();
        self.current_page = 1;
    }

    /// Move to page `n` (used by load-more). Nothing else changes.
    pub fn set_current_page(&mut self, n: u32) {
        self.current_page = n.max(1);
    }

    pub fn set_items_per_page(&mut self, n: u32) {
        self.items_per_page = n.max(1);
        self.current_page = 1;
    }

    pub fn reset_filters(&mut self) {
        *self = Self::default();
    }

    /// Whether tags or search narrow the feed.
    pub fn has_active_filters(&self) -> bool {
        !self.selected_tags.is_empty() || !self.search_query.trim().is_empty()
    }

    pub fn to_query(&self) -> ListQuery {
        let tags = (!self.selected_tags.is_empty()).then(|| self.selected_tags.join(","));
        let search = Some(self.search_query.trim().to_string()).filter(|s| !s.is_empty());

        ListQuery {
            page: self.current_page,
            limit: self.items_per_page,
            tags,
            search,
        }
    }

    /// Load persisted state. A missing file yields the defaults.
    pub async fn load(path: &Path) -> Result<Self, ClientError> {
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn save(&self, path: &Path) -> Result<(), ClientError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, serde_json::to_vec_pretty(self)?).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn on_page(n: u32) -> FilterState {
        let mut state = FilterState::default();
        state.set_current_page(n);
        state
    }

    #[test]
    fn test_defaults() {
        let state = FilterState::default();
        assert!(state.selected_tags.is_empty());
        assert_eq!(state.search_query, "");
        assert_eq!(state.current_page, 1);
        assert_eq!(state.items_per_page, 10);
        assert!(!state.has_active_filters());
    }

    #[test]
    fn test_setting_tags_resets_page_even_when_unchanged() {
        let mut state = on_page(4);
        state.set_selected_tags(["react", "vue"]);
        assert_eq!(state.current_page, 1);

        state.set_current_page(3);
        state.set_selected_tags(["react", "vue"]);
        assert_eq!(state.current_page, 1);
        assert_eq!(state.selected_tags, vec!["react", "vue"]);
    }

    #[test]
    fn test_set_tags_drops_duplicates() {
        let mut state = FilterState::default();
        state.set_selected_tags(["b", "a", "b"]);
        assert_eq!(state.selected_tags, vec!["b", "a"]);
    }

    #[test]
    fn test_search_resets_page() {
        let mut state = on_page(5);
        state.set_search_query("rust");
        assert_eq!(state.current_page, 1);
        assert_eq!(state.search_query, "rust");
    }

    #[test]
    fn test_set_current_page_keeps_filters() {
        let mut state = FilterState::default();
        state.set_selected_tags(["rust"]);
        state.set_search_query("async");
        state.set_current_page(2);

        assert_eq!(state.current_page, 2);
        assert_eq!(state.selected_tags, vec!["rust"]);
        assert_eq!(state.search_query, "async");

        state.set_current_page(0);
        assert_eq!(state.current_page, 1);
    }

    #[test]
    fn test_add_remove_clear_tags() {
        let mut state = on_page(3);
        state.add_tag("rust");
        assert_eq!(state.current_page, 1);

        state.set_current_page(3);
        state.add_tag("rust");
        assert_eq!(state.current_page, 3, "re-adding an existing tag is a no-op");

        state.remove_tag("rust");
        assert!(state.selected_tags.is_empty());
        assert_eq!(state.current_page, 1);

        state.add_tag("a");
        state.set_current_page(2);
        state.clear_tags();
        assert!(state.selected_tags.is_empty());
        assert_eq!(state.current_page, 1);
    }

    #[test]
    fn test_items_per_page_resets_page() {
        let mut state = on_page(4);
        state.set_items_per_page(25);
        assert_eq!(state.items_per_page, 25);
        assert_eq!(state.current_page, 1);
    }

    #[test]
    fn test_reset_filters() {
        let mut state = FilterState::default();
        state.set_selected_tags(["x"]);
        state.set_search_query("y");
        state.set_items_per_page(50);
        state.set_current_page(7);

        state.reset_filters();
        assert_eq!(state, FilterState::default());
    }

    #[test]
    fn test_to_query() {
        let mut state = FilterState::default();
        assert_eq!(
            state.to_query(),
            ListQuery {
                page: 1,
                limit: 10,
                tags: None,
                search: None
            }
        );

        state.set_selected_tags(["react", "vue"]);
        state.set_search_query("  hooks ");
        state.set_current_page(2);
        let query = state.to_query();
        assert_eq!(query.tags.as_deref(), Some("react,vue"));
        assert_eq!(query.search.as_deref(), Some("hooks"));
        assert_eq!(query.page, 2);
    }

    #[test]
    fn test_whitespace_search_is_not_an_active_filter() {
        let mut state = FilterState::default();
        state.set_search_query("   ");
        assert!(!state.has_active_filters());
        assert!(state.to_query().search.is_none());
    }

    #[tokio::test]
    async fn test_persistence_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state").join("filters.json");

        let missing = FilterState::load(&path).await.unwrap();
        assert_eq!(missing, FilterState::default());

        let mut state = FilterState::default();
        state.set_selected_tags(["rust", "web"]);
        state.set_search_query("axum");
        state.set_current_page(3);
        state.save(&path).await.unwrap();

        let loaded = FilterState::load(&path).await.unwrap();
        assert_eq!(loaded, state);
    }

    #[tokio::test]
    async fn test_load_fills_missing_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("filters.json");
        tokio::fs::write(&path, br#"{"search_query":"old"}"#)
            .await
            .unwrap();

        let loaded = FilterState::load(&path).await.unwrap();
        assert_eq!(loaded.search_query, "old");
        assert_eq!(loaded.current_page, 1);
        assert_eq!(loaded.items_per_page, 10);
    }
}
