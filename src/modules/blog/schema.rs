use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct BlogRequest {
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,
    /// Derived from the title when absent.
    #[validate(length(max = 200, message = "Slug is too long"))]
    pub slug: Option<String>,
    #[validate(length(max = 500, message = "Excerpt is too long"))]
    pub excerpt: Option<String>,
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    #[validate(url(message = "Invalid cover image URL"))]
    pub cover_image_url: Option<String>,
    #[validate(length(min = 1, max = 100, message = "Author name is required"))]
    pub author_name: String,
    #[serde(default)]
    pub published: bool,
}

/// Lowercase ASCII letters and digits joined by single hyphens.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_hyphen = false;

    for c in input.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    slug
}
