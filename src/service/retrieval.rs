//! Keyword-overlap retrieval over the policy snippet corpus
//!
//! Deterministic scoring: a fixed weight per configured keyword present in
//! both the query and the snippet, zero-score snippets dropped, stable
//! descending order, truncated to `top_k`.

use crate::model::RetrievalConfig;

/// Weight added per keyword shared by query and snippet
const KEYWORD_WEIGHT: u32 = 2;

/// Placeholder grounding text when retrieval finds nothing
pub const NO_MATCH_PLACEHOLDER: &str = "No matching policy snippets found.";

/// Built-in reference snippets, used when the corpus source is empty
pub fn fallback_policy_snippets() -> Vec<String> {
    [
        "Policy #12345: Coverage for water damage includes burst pipes and accidental leaks.",
        "Policy #67890: Deductible for water damage claims is $500.",
        "Policy #11111: Claims must be filed within 30 days of incident discovery.",
        "Policy #22222: Water damage from maintenance neglect is not covered.",
        "Policy #33333: Emergency repairs are covered up to $2,000 before approval.",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// A snippet paired with its score for one query; exists only during ranking
struct ScoredSnippet<'a> {
    score: u32,
    text: &'a str,
}

/// Scores snippets against queries by keyword overlap
pub struct SnippetRetriever {
    keywords: Vec<String>,
}

impl SnippetRetriever {
    pub fn new(config: &RetrievalConfig) -> Self {
        Self {
            keywords: config
                .keywords
                .iter()
                .map(|k| k.to_lowercase())
                .collect(),
        }
    }

    /// Return the texts of the `top_k` highest-scoring snippets
    ///
    /// Snippets sharing no keyword with the query are excluded; ties keep
    /// their input order.
    pub fn retrieve(&self, snippets: &[String], query: &str, top_k: usize) -> Vec<String> {
        let query_lower = query.to_lowercase();

        let mut scored: Vec<ScoredSnippet<'_>> = snippets
            .iter()
            .filter_map(|snippet| {
                let score = self.score(&query_lower, snippet);
                (score > 0).then_some(ScoredSnippet {
                    score,
                    text: snippet,
                })
            })
            .collect();

        // Stable sort keeps input order for equal scores
        scored.sort_by(|a, b| b.score.cmp(&a.score));

        scored
            .into_iter()
            .take(top_k)
            .map(|s| s.text.to_string())
            .collect()
    }

    fn score(&self, query_lower: &str, snippet: &str) -> u32 {
        let snippet_lower = snippet.to_lowercase();
        self.keywords
            .iter()
            .filter(|keyword| query_lower.contains(*keyword) && snippet_lower.contains(*keyword))
            .count() as u32
            * KEYWORD_WEIGHT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn retriever() -> SnippetRetriever {
        SnippetRetriever::new(&RetrievalConfig::default())
    }

    fn corpus(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_unrelated_snippets_excluded() {
        let snippets = corpus(&[
            "Coverage for water damage includes burst pipes.",
            "Policy renewals are processed within five business days.",
        ]);

        let results = retriever().retrieve(&snippets, "P-100 pipe burst in kitchen", 3);

        assert_eq!(results, vec![snippets[0].clone()]);
    }

    #[test]
    fn test_never_more_than_top_k() {
        let snippets = corpus(&[
            "water damage one",
            "water damage two",
            "water damage three",
            "water damage four",
        ]);

        let results = retriever().retrieve(&snippets, "water damage", 3);

        assert_eq!(results.len(), 3);
    }

    #[test]
    fn test_descending_score_order() {
        let snippets = corpus(&[
            "Mentions water only.",
            "Mentions water, damage, and a leak in the pipe.",
        ]);

        let results = retriever().retrieve(&snippets, "water damage from a pipe leak", 3);

        assert_eq!(results[0], snippets[1]);
        assert_eq!(results[1], snippets[0]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let snippets = corpus(&[
            "First snippet about water.",
            "Second snippet about water.",
            "Third snippet about water.",
        ]);

        let results = retriever().retrieve(&snippets, "water", 3);

        assert_eq!(results, snippets);
    }

    #[test]
    fn test_no_keyword_overlap_yields_empty() {
        let snippets = corpus(&["Coverage for water damage."]);

        let results = retriever().retrieve(&snippets, "stolen bicycle", 3);

        assert!(results.is_empty());
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let snippets = corpus(&["WATER DAMAGE is covered."]);

        let results = retriever().retrieve(&snippets, "Water Damage claim", 3);

        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_fallback_snippets_score_for_water_damage() {
        let fallback = fallback_policy_snippets();
        assert_eq!(fallback.len(), 5);

        let results = retriever().retrieve(&fallback, "water damage", 5);

        assert!(results.len() >= 2);
    }

    #[test]
    fn test_configured_keywords_replace_defaults() {
        let config = RetrievalConfig {
            keywords: vec!["fire".to_string()],
        };
        let retriever = SnippetRetriever::new(&config);
        let snippets = corpus(&["Fire damage coverage.", "Water damage coverage."]);

        let results = retriever.retrieve(&snippets, "fire in garage", 3);

        assert_eq!(results, vec![snippets[0].clone()]);
    }
}
