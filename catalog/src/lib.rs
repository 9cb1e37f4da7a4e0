pub mod config;
pub mod course;
pub mod embed;
pub mod error;
pub mod keyword;
pub mod persist;
pub mod semantic;
pub mod tokenizer;

pub use config::{DATA_PATH_ENV, DEFAULT_DATA_PATH};
pub use course::{Course, NO_DESCRIPTION};
pub use embed::{Embedder, HashEmbedder};
#[cfg(feature = "fastembed")]
pub use embed::FastEmbedder;
pub use error::{CatalogError, Result};
pub use keyword::KeywordSearch;
pub use semantic::{ScoredCourse, SemanticIndex, DEFAULT_TOP_K};
