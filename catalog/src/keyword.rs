use crate::persist::load_courses;
use crate::{Course, Result};
use html_escape::{encode_single_quoted_attribute, encode_text};
use std::path::{Path, PathBuf};

/// Fragment shown when a query matches nothing.
pub const NO_RESULTS_HTML: &str = "<p>No courses found with that keyword.</p>";

/// Keyword search over one data file. The file is re-read on every query.
#[derive(Debug, Clone)]
pub struct KeywordSearch {
    path: PathBuf,
}

impl KeywordSearch {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }

    pub fn path(&self) -> &Path { &self.path }

    pub fn load_courses(&self) -> Result<Vec<Course>> { load_courses(&self.path) }

    pub fn search_courses(&self, query: &str) -> Result<Vec<Course>> {
        let courses = self.load_courses()?;
        Ok(filter_courses(&courses, query))
    }

    /// Search and render the hits as one HTML block.
    pub fn find_courses(&self, query: &str) -> Result<String> {
        let hits = self.search_courses(query)?;
        tracing::info!(query, hits = hits.len(), "keyword search");
        Ok(render_results(&hits))
    }
}

/// Case-insensitive substring match on title or description, in input order.
/// Equal records are returned once. An empty query matches everything.
pub fn filter_courses(courses: &[Course], query: &str) -> Vec<Course> {
    let query = query.to_lowercase();
    let mut results: Vec<Course> = Vec::new();
    for course in courses {
        let hit = course.title.to_lowercase().contains(&query)
            || course.description.to_lowercase().contains(&query);
        // linear scan; result sets are small
        if hit && !results.contains(course) {
            results.push(course.clone());
        }
    }
    results
}

pub fn render_course(course: &Course) -> String {
    format!(
        "<h3>{}</h3><p>{}</p><a href='{}'>Link to Course</a><br>",
        encode_text(&course.title),
        encode_text(&course.description),
        encode_single_quoted_attribute(&course.link),
    )
}

pub fn render_results(courses: &[Course]) -> String {
    if courses.is_empty() {
        return NO_RESULTS_HTML.to_string();
    }
    courses.iter().map(render_course).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(title: &str, description: &str, link: &str) -> Course {
        Course { title: title.into(), link: link.into(), image: String::new(), description: description.into() }
    }

    #[test]
    fn matches_either_field_ignoring_case() {
        let courses = vec![
            course("Intro to Python", "Learn Python basics", "https://x/1"),
            course("Statistics", "Uses PYTHON notebooks", "https://x/2"),
            course("Advanced SQL", "Deep dive into SQL", "https://x/3"),
        ];
        let hits = filter_courses(&courses, "PyThOn");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].link, "https://x/1");
        assert_eq!(hits[1].link, "https://x/2");
    }

    #[test]
    fn duplicates_collapse_and_empty_query_matches_all() {
        let a = course("A", "alpha", "https://x/a");
        let b = course("B", "beta", "https://x/b");
        let courses = vec![a.clone(), b.clone(), a.clone()];
        assert_eq!(filter_courses(&courses, ""), vec![a, b]);
    }

    #[test]
    fn renders_fragment_per_hit_with_escaping() {
        let html = render_results(&[course("C & C++", "<b>fast</b>", "https://x/c?a=1&b='2'")]);
        assert!(html.starts_with("<h3>C &amp; C++</h3>"));
        assert!(html.contains("<p>&lt;b&gt;fast&lt;/b&gt;</p>"));
        assert!(!html.contains("'2'"));
        assert!(html.ends_with(">Link to Course</a><br>"));
    }

    #[test]
    fn empty_results_render_no_results_message() {
        assert_eq!(render_results(&[]), NO_RESULTS_HTML);
    }
}
