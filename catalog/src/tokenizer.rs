use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref WORD: Regex = Regex::new(r"(?u)[\p{L}\p{N}][\p{L}\p{N}_+#']*").expect("valid regex");
    static ref STEMMER: Stemmer = Stemmer::create(Algorithm::English);
    static ref STOPWORDS: HashSet<&'static str> = [
        "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "how", "in", "into", "is", "it",
        "its", "of", "on", "or", "that", "the", "this", "to", "was", "what", "with", "you", "your",
    ]
    .into_iter()
    .collect();
}

/// Split text into stemmed terms: NFKC normalization, lowercase, stopword
/// removal. Digits and symbols common in course names (`c++`, `c#`) survive.
pub fn terms(text: &str) -> Vec<String> {
    let normalized = text.nfkc().collect::<String>().to_lowercase();
    WORD.find_iter(&normalized)
        .map(|m| m.as_str().trim_end_matches('\''))
        .filter(|t| !t.is_empty() && !STOPWORDS.contains(t))
        .map(|t| STEMMER.stem(t).into_owned())
        .collect()
}

/// Adjacent term pairs, joined by a space.
pub fn bigrams(terms: &[String]) -> impl Iterator<Item = String> + '_ {
    terms.windows(2).map(|w| format!("{} {}", w[0], w[1]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stems_and_drops_stopwords() {
        let t = terms("Learning the Basics of Python");
        assert_eq!(t, vec!["learn", "basic", "python"]);
    }

    #[test]
    fn bigrams_pair_neighbours() {
        let t = terms("deep dive sql");
        let pairs: Vec<String> = bigrams(&t).collect();
        assert_eq!(pairs, vec!["deep dive", "dive sql"]);
    }
}
