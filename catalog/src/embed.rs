//! Text embedders used by the semantic index.
//!
//! [`FastEmbedder`] runs the pre-trained `all-MiniLM-L6-v2` sentence model.
//! [`HashEmbedder`] hashes stemmed terms into a fixed-size vector; it needs no
//! model download and gives the same vector for the same text every time.

use crate::tokenizer::{bigrams, terms};
use crate::Result;

/// Output dimension of `all-MiniLM-L6-v2`.
pub const MINILM_DIM: usize = 384;

pub trait Embedder {
    /// Length of every vector returned by [`Embedder::embed`].
    fn dimension(&self) -> usize;

    /// Encode each text into one vector, in input order.
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    fn embed_one(&self, text: &str) -> Result<Vec<f32>> {
        let mut out = self.embed(&[text.to_string()])?;
        Ok(out.pop().unwrap_or_else(|| vec![0.0; self.dimension()]))
    }
}

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET, |h, b| (h ^ *b as u64).wrapping_mul(FNV_PRIME))
}

/// Feature-hashing embedder over unigrams and bigrams, L2-normalised.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dim: usize,
}

impl HashEmbedder {
    pub fn new(dim: usize) -> Self { Self { dim: dim.max(1) } }

    fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0.0f32; self.dim];
        let unigrams = terms(text);
        let features = unigrams.iter().cloned().chain(bigrams(&unigrams));
        for feature in features {
            let h = fnv1a(feature.as_bytes());
            let slot = (h % self.dim as u64) as usize;
            // top bit picks the sign so collisions tend to cancel
            let sign = if h >> 63 == 0 { 1.0 } else { -1.0 };
            v[slot] += sign;
        }
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in v.iter_mut() { *x /= norm; }
        }
        v
    }
}

impl Default for HashEmbedder {
    fn default() -> Self { Self::new(MINILM_DIM) }
}

impl Embedder for HashEmbedder {
    fn dimension(&self) -> usize { self.dim }

    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }
}

#[cfg(feature = "fastembed")]
pub use self::minilm::FastEmbedder;

#[cfg(feature = "fastembed")]
mod minilm {
    use super::{Embedder, MINILM_DIM};
    use crate::{CatalogError, Result};
    use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
    use std::path::PathBuf;

    /// `all-MiniLM-L6-v2` through fastembed's ONNX runtime. Weights are
    /// downloaded into the cache directory on first use.
    pub struct FastEmbedder {
        model: TextEmbedding,
    }

    impl FastEmbedder {
        pub fn try_new(cache_dir: Option<PathBuf>) -> Result<Self> {
            let mut options = InitOptions::new(EmbeddingModel::AllMiniLML6V2).with_show_download_progress(false);
            if let Some(dir) = cache_dir {
                options = options.with_cache_dir(dir);
            }
            let model = TextEmbedding::try_new(options).map_err(CatalogError::embedding)?;
            tracing::info!("loaded all-MiniLM-L6-v2");
            Ok(Self { model })
        }
    }

    impl Embedder for FastEmbedder {
        fn dimension(&self) -> usize { MINILM_DIM }

        fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            if texts.is_empty() {
                return Ok(Vec::new());
            }
            self.model.embed(texts.to_vec(), None).map_err(CatalogError::embedding)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cosine(a: &[f32], b: &[f32]) -> f32 { a.iter().zip(b).map(|(x, y)| x * y).sum() }

    #[test]
    fn same_text_same_vector() {
        let e = HashEmbedder::default();
        let a = e.embed_one("Intro to Python Learn Python basics").unwrap();
        let b = e.embed_one("Intro to Python Learn Python basics").unwrap();
        assert_eq!(a.len(), MINILM_DIM);
        assert_eq!(a, b);
        assert!((cosine(&a, &a) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn related_text_scores_higher() {
        let e = HashEmbedder::default();
        let q = e.embed_one("python basics").unwrap();
        let py = e.embed_one("Intro to Python Learn Python basics").unwrap();
        let sql = e.embed_one("Advanced SQL Deep dive into SQL").unwrap();
        assert!(cosine(&q, &py) > cosine(&q, &sql));
    }

    #[test]
    fn text_without_terms_is_zero_vector() {
        let e = HashEmbedder::new(8);
        assert_eq!(e.embed_one("the of and").unwrap(), vec![0.0; 8]);
    }
}
