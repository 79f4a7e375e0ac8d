//! Blog model and request validation.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Public subset of a user embedded in every blog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorSummary {
    #[serde(rename = "_id")]
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
    pub profile_pic_url: String,
}

/// A blog post as returned by the API, with its author populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blog {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub sub_title: String,
    pub content: String,
    pub slug: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// `None` when the referenced user no longer exists.
    pub author: Option<AuthorSummary>,
    pub created_date: String,
    pub modified_date: String,
}

/// Request body for creating or replacing a blog.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlogRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub sub_title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    /// User id of the author
    #[serde(default)]
    pub author: Option<String>,
}

/// A validated and normalized blog write.
#[derive(Debug, Clone, PartialEq)]
pub struct BlogDraft {
    pub title: String,
    pub sub_title: String,
    pub content: String,
    /// Explicit slug, already normalized. Derived from the title on create when absent.
    pub slug: Option<String>,
    pub tags: Vec<String>,
    pub author_id: String,
}

impl BlogRequest {
    /// Validate required fields and normalize the rest.
    pub fn validate(self) -> Result<BlogDraft, AppError> {
        let title = required("title", self.title.as_deref().map(str::trim))?;
        let content = required("content", self.content.as_deref())?;
        let author_id = required("author", self.author.as_deref().map(str::trim))?;

        let slug = self
            .slug
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());

        Ok(BlogDraft {
            title,
            sub_title: self.sub_title.unwrap_or_default().trim().to_string(),
            content,
            slug,
            tags: normalize_tags(self.tags.unwrap_or_default()),
            author_id,
        })
    }
}

impl BlogDraft {
    /// The slug to store for a new blog: the explicit one, or one derived from the title.
    pub fn slug_for_create(&self) -> Result<String, AppError> {
        match &self.slug {
            Some(slug) => Ok(slug.clone()),
            None => {
                let derived = derive_slug(&self.title);
                if derived.is_empty() {
                    return Err(AppError::Validation(
                        "\"slug\" cannot be derived from title".to_string(),
                    ));
                }
                Ok(derived)
            }
        }
    }
}

fn required(field: &str, value: Option<&str>) -> Result<String, AppError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        Some(_) => Err(AppError::Validation(format!(
            "\"{}\" is not allowed to be empty",
            field
        ))),
        None => Err(AppError::Validation(format!("\"{}\" is required", field))),
    }
}

/// Trim and lowercase tags, dropping empty entries. Order is kept.
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tags.into_iter()
        .map(|t| t.as_ref().trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Derive a URL slug from a title.
///
/// Lowercases, drops everything except `a-z`, `0-9`, spaces and hyphens,
/// turns whitespace runs into a hyphen and collapses repeated hyphens.
pub fn derive_slug(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;

    for c in title.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else if c == ' ' || c == '-' {
            pending_hyphen = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_slug_basic() {
        assert_eq!(derive_slug("Hello World"), "hello-world");
        assert_eq!(derive_slug("Getting Started with React"), "getting-started-with-react");
    }

    #[test]
    fn test_derive_slug_strips_punctuation_and_collapses() {
        assert_eq!(derive_slug("Rust & C++:  a  -- comparison!"), "rust-c-a-comparison");
        assert_eq!(derive_slug("  --Leading and trailing--  "), "leading-and-trailing");
        assert_eq!(derive_slug("Version 2.0 released"), "version-20-released");
    }

    #[test]
    fn test_derive_slug_drops_non_ascii() {
        assert_eq!(derive_slug("Café Société"), "caf-socit");
        assert_eq!(derive_slug("!!!"), "");
    }

    #[test]
    fn test_normalize_tags() {
        assert_eq!(
            normalize_tags(vec![" React ", "VUE", "", "  "]),
            vec!["react", "vue"]
        );
    }

    #[test]
    fn test_validate_requires_title_content_author() {
        let err = BlogRequest::default().validate().unwrap_err();
        assert_eq!(err.message(), "\"title\" is required");

        let err = BlogRequest {
            title: Some("   ".to_string()),
            ..Default::default()
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.message(), "\"title\" is not allowed to be empty");

        let err = BlogRequest {
            title: Some("T".to_string()),
            content: Some("C".to_string()),
            ..Default::default()
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.message(), "\"author\" is required");
    }

    #[test]
    fn test_validate_normalizes_fields() {
        let draft = BlogRequest {
            title: Some("  My Post ".to_string()),
            sub_title: None,
            content: Some("Body".to_string()),
            slug: Some("  My-Custom-Slug ".to_string()),
            tags: Some(vec!["Rust".to_string(), " Web ".to_string()]),
            author: Some("user-1".to_string()),
        }
        .validate()
        .unwrap();

        assert_eq!(draft.title, "My Post");
        assert_eq!(draft.sub_title, "");
        assert_eq!(draft.slug.as_deref(), Some("my-custom-slug"));
        assert_eq!(draft.tags, vec!["rust", "web"]);
        assert_eq!(draft.slug_for_create().unwrap(), "my-custom-slug");
    }

    #[test]
    fn test_slug_for_create_derives_from_title() {
        let draft = BlogRequest {
            title: Some("Hello, World!".to_string()),
            content: Some("Body".to_string()),
            author: Some("user-1".to_string()),
            ..Default::default()
        }
        .validate()
        .unwrap();

        assert!(draft.slug.is_none());
        assert_eq!(draft.slug_for_create().unwrap(), "hello-world");
    }

    #[test]
    fn test_slug_for_create_rejects_underivable_title() {
        let draft = BlogRequest {
            title: Some("???".to_string()),
            content: Some("Body".to_string()),
            author: Some("user-1".to_string()),
            ..Default::default()
        }
        .validate()
        .unwrap();

        assert!(draft.slug_for_create().is_err());
    }
}
