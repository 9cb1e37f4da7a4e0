use serde::{Deserialize, Serialize};

/// Placeholder stored when a detail page yields no description.
pub const NO_DESCRIPTION: &str = "No description available";

/// One course as scraped from the listing and its detail page.
///
/// Records carry no identifier; two records are the same course only when
/// every field is equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub title: String,
    /// Absolute URL of the detail page.
    pub link: String,
    /// Thumbnail URL, only known for records produced by the listing crawl.
    #[serde(default)]
    pub image: String,
    #[serde(default = "default_description")]
    pub description: String,
}

fn default_description() -> String { NO_DESCRIPTION.to_string() }

impl Course {
    /// A freshly listed course, before its detail page has been fetched.
    pub fn listed(title: impl Into<String>, link: impl Into<String>, image: impl Into<String>) -> Self {
        Self { title: title.into(), link: link.into(), image: image.into(), description: default_description() }
    }

    /// Text fed to the embedding model: title and description joined by one space.
    pub fn embedding_text(&self) -> String {
        format!("{} {}", self.title, self.description)
    }

    pub fn has_description(&self) -> bool { self.description != NO_DESCRIPTION }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let c: Course = serde_json::from_str(r#"{"title":"Intro to Python","link":"https://x/1"}"#).unwrap();
        assert_eq!(c.image, "");
        assert_eq!(c.description, NO_DESCRIPTION);
        assert!(!c.has_description());
    }

    #[test]
    fn embedding_text_joins_with_single_space() {
        let mut c = Course::listed("Advanced SQL", "https://x/2", "");
        c.description = "Deep dive into SQL".into();
        assert_eq!(c.embedding_text(), "Advanced SQL Deep dive into SQL");
    }
}
