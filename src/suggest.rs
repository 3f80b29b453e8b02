use crate::grammar::Verb;
use colored::*;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

const SUGGESTION_THRESHOLD: f64 = 0.5;
const MAX_SUGGESTIONS: usize = 3;

/// Loose, order-insensitive overlap between two words: the number of
/// characters of `attempted` that occur anywhere in `candidate`, over the
/// longer of the two lengths.
pub fn similarity(attempted: &str, candidate: &str) -> f64 {
    if attempted.is_empty() || candidate.is_empty() {
        return 0.0;
    }

    let matches = attempted.chars().filter(|c| candidate.contains(*c)).count();
    let longest = attempted.chars().count().max(candidate.chars().count());
    matches as f64 / longest as f64
}

/// Verbs close enough to `attempted` to offer as a correction, best first.
pub fn suggest_verbs(attempted: &str) -> Vec<Verb> {
    let attempted = attempted.to_lowercase();

    let mut scored: Vec<(Verb, f64)> = Verb::ALL
        .iter()
        .map(|verb| (*verb, similarity(&attempted, verb.as_str())))
        .filter(|(_, score)| *score > SUGGESTION_THRESHOLD)
        .collect();

    // Stable sort keeps table order between equal scores.
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored.into_iter().take(MAX_SUGGESTIONS).map(|(v, _)| v).collect()
}

/// Match result with score and matched character positions (char indices).
#[derive(Debug, Clone)]
pub struct MatchResult {
    pub score: i64,
    pub indices: Vec<usize>,
}

/// Ranks tutorial titles against a search query: exact substring hits first,
/// then prefix hits, then skim-style fuzzy matches.
pub struct TitleMatcher {
    matcher: SkimMatcherV2,
}

impl TitleMatcher {
    pub fn new() -> Self {
        Self {
            matcher: SkimMatcherV2::default().ignore_case(),
        }
    }

    pub fn exact_match(&self, pattern: &str, text: &str) -> Option<MatchResult> {
        let lowered = text.to_lowercase();
        let byte_start = lowered.find(&pattern.to_lowercase())?;
        let start = lowered[..byte_start].chars().count();
        let indices = (start..start + pattern.chars().count()).collect();
        Some(MatchResult {
            score: 1000 + (pattern.len() * 10) as i64,
            indices,
        })
    }

    pub fn prefix_match(&self, pattern: &str, text: &str) -> Option<MatchResult> {
        if text.to_lowercase().starts_with(&pattern.to_lowercase()) {
            Some(MatchResult {
                score: 800 + (pattern.len() * 8) as i64,
                indices: (0..pattern.chars().count()).collect(),
            })
        } else {
            None
        }
    }

    pub fn fuzzy_match(&self, pattern: &str, text: &str) -> Option<MatchResult> {
        self.matcher
            .fuzzy_indices(text, pattern)
            .map(|(score, indices)| MatchResult { score, indices })
    }

    /// Try each strategy in priority order. An empty pattern matches anything.
    pub fn best_match(&self, pattern: &str, text: &str) -> Option<MatchResult> {
        if pattern.is_empty() {
            return Some(MatchResult {
                score: 0,
                indices: Vec::new(),
            });
        }

        self.exact_match(pattern, text)
            .or_else(|| self.prefix_match(pattern, text))
            .or_else(|| self.fuzzy_match(pattern, text))
    }

    /// Keep matching items, highest score first; ties go to the shorter text.
    pub fn match_and_sort<T>(&self, pattern: &str, items: Vec<(T, String)>) -> Vec<(T, String, MatchResult)> {
        let mut results: Vec<(T, String, MatchResult)> = items
            .into_iter()
            .filter_map(|(item, text)| {
                let m = self.best_match(pattern, &text)?;
                Some((item, text, m))
            })
            .collect();

        results.sort_by(|a, b| b.2.score.cmp(&a.2.score).then_with(|| a.1.len().cmp(&b.1.len())));
        results
    }

    /// Render `text` with the matched characters emphasised.
    pub fn highlight_matches(&self, text: &str, indices: &[usize]) -> String {
        if indices.is_empty() {
            return text.to_string();
        }

        text.chars()
            .enumerate()
            .map(|(i, c)| {
                if indices.contains(&i) {
                    c.to_string().yellow().bold().to_string()
                } else {
                    c.to_string()
                }
            })
            .collect()
    }
}

impl Default for TitleMatcher {
    fn default() -> Self {
        Self::new()
    }
}
