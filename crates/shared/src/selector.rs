use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Summary length policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthMode {
    Short,
    #[default]
    Medium,
    Long,
}

impl LengthMode {
    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug.to_ascii_lowercase().as_str() {
            "short" => Some(LengthMode::Short),
            "medium" => Some(LengthMode::Medium),
            "long" => Some(LengthMode::Long),
            _ => None,
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            LengthMode::Short => "short",
            LengthMode::Medium => "medium",
            LengthMode::Long => "long",
        }
    }

    /// Number of sentences to keep out of `sentence_count` eligible ones.
    pub fn top_n(&self, sentence_count: usize) -> usize {
        let wanted = match self {
            LengthMode::Short => 2,
            LengthMode::Medium => (sentence_count / 10).max(3),
            LengthMode::Long => (sentence_count / 8).max(5),
        };
        wanted.min(sentence_count)
    }
}

impl fmt::Display for LengthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for LengthMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_slug(s)
            .ok_or_else(|| format!("Invalid mode: {}. Use 'short', 'medium', or 'long'", s))
    }
}

/// Indices of the `top_n` highest scores, returned in document order.
///
/// Equal scores are ranked by ascending index, so the earlier sentence wins.
pub fn select(scores: &[f32], top_n: usize) -> Vec<usize> {
    let mut ranked: Vec<usize> = (0..scores.len()).collect();
    ranked.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]).then(a.cmp(&b)));
    ranked.truncate(top_n);
    ranked.sort_unstable();
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_mode_is_two() {
        assert_eq!(LengthMode::Short.top_n(40), 2);
        assert_eq!(LengthMode::Short.top_n(1), 1);
        assert_eq!(LengthMode::Short.top_n(0), 0);
    }

    #[test]
    fn test_medium_mode_policy() {
        assert_eq!(LengthMode::Medium.top_n(4), 3);
        assert_eq!(LengthMode::Medium.top_n(29), 3);
        assert_eq!(LengthMode::Medium.top_n(45), 4);
        assert_eq!(LengthMode::Medium.top_n(2), 2);
    }

    #[test]
    fn test_long_mode_policy() {
        assert_eq!(LengthMode::Long.top_n(12), 5);
        assert_eq!(LengthMode::Long.top_n(48), 6);
        assert_eq!(LengthMode::Long.top_n(3), 3);
    }

    #[test]
    fn test_top_n_never_exceeds_count() {
        for mode in [LengthMode::Short, LengthMode::Medium, LengthMode::Long] {
            for count in 0..100 {
                assert!(mode.top_n(count) <= count);
            }
        }
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("SHORT".parse::<LengthMode>().unwrap(), LengthMode::Short);
        assert_eq!(LengthMode::from_slug("long"), Some(LengthMode::Long));
        assert!("brief".parse::<LengthMode>().is_err());
        assert_eq!(LengthMode::default(), LengthMode::Medium);
        assert_eq!(LengthMode::Medium.to_string(), "medium");
    }

    #[test]
    fn test_select_restores_document_order() {
        let scores = [0.1, 0.9, 0.3, 0.8];
        assert_eq!(select(&scores, 2), vec![1, 3]);
        assert_eq!(select(&scores, 3), vec![1, 2, 3]);
    }

    #[test]
    fn test_select_breaks_ties_by_position() {
        let scores = [0.5, 0.5, 0.5, 0.5];
        assert_eq!(select(&scores, 2), vec![0, 1]);

        let scores = [0.2, 0.7, 0.7, 0.7];
        assert_eq!(select(&scores, 2), vec![1, 2]);
    }

    #[test]
    fn test_select_empty() {
        assert!(select(&[], 3).is_empty());
        assert!(select(&[0.4], 0).is_empty());
    }
}
