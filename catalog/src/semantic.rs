use crate::embed::Embedder;
use crate::persist::load_courses;
use crate::{Course, Result};
use std::path::Path;

/// Number of results returned by [`SemanticIndex::search_courses`].
pub const DEFAULT_TOP_K: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCourse {
    pub course: Course,
    /// Cosine similarity between the query and the course text.
    pub score: f32,
}

/// Courses with their embeddings, computed once at build time.
///
/// The index never changes after [`SemanticIndex::build`]; queries take
/// `&self` and may run from several threads if the embedder allows it.
pub struct SemanticIndex<E> {
    embedder: E,
    courses: Vec<Course>,
    embeddings: Vec<Vec<f32>>,
}

impl<E: Embedder> SemanticIndex<E> {
    pub fn build(embedder: E, courses: Vec<Course>) -> Result<Self> {
        let texts: Vec<String> = courses.iter().map(Course::embedding_text).collect();
        let embeddings = if texts.is_empty() { Vec::new() } else { embedder.embed(&texts)? };
        tracing::info!(courses = courses.len(), dim = embedder.dimension(), "embedded corpus");
        Ok(Self { embedder, courses, embeddings })
    }

    /// Load the data file and build the index from it.
    pub fn load(embedder: E, path: &Path) -> Result<Self> {
        Self::build(embedder, load_courses(path)?)
    }

    pub fn len(&self) -> usize { self.courses.len() }

    pub fn is_empty(&self) -> bool { self.courses.is_empty() }

    pub fn courses(&self) -> &[Course] { &self.courses }

    /// The [`DEFAULT_TOP_K`] closest courses, best first.
    pub fn search_courses(&self, query: &str) -> Result<Vec<Course>> {
        Ok(self.search_scored(query, DEFAULT_TOP_K)?.into_iter().map(|s| s.course).collect())
    }

    /// Up to `k` courses ranked by descending similarity. Equal scores keep
    /// corpus order.
    pub fn search_scored(&self, query: &str, k: usize) -> Result<Vec<ScoredCourse>> {
        if self.courses.is_empty() || k == 0 {
            return Ok(Vec::new());
        }
        let q = self.embedder.embed_one(query)?;
        let mut scored: Vec<(usize, f32)> = self
            .embeddings
            .iter()
            .enumerate()
            .map(|(i, v)| (i, cosine_similarity(&q, v)))
            .collect();
        // stable: ties stay in index order
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        Ok(scored
            .into_iter()
            .take(k)
            .map(|(i, score)| ScoredCourse { course: self.courses[i].clone(), score })
            .collect())
    }
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let na = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let nb = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if na == 0.0 || nb == 0.0 {
        return 0.0;
    }
    dot / (na * nb)
}
