//! Whitespace normalisation and sentence segmentation.
//!
//! Both the trained pipeline and the positional fallback segment through
//! [`split_sentences`], so a decimal such as `15.30` is never treated as a
//! sentence boundary on either path.

/// Pieces at or below this many characters are dropped at inference time.
pub const INFERENCE_MIN_CHARS: usize = 25;

/// Threshold used when segmenting the training dataset. The dataset labels
/// were produced against this segmentation, so it differs from inference.
pub const TRAINING_MIN_CHARS: usize = 20;

/// One eligible sentence of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence {
    /// Position among the eligible sentences, in document order.
    pub index: usize,
    /// Trimmed text without its terminating punctuation.
    pub text: String,
    /// The `.`, `!` or `?` that ended the sentence, if any.
    pub terminator: Option<char>,
}

impl Sentence {
    /// Text with its original terminator restored (`.` when it had none).
    pub fn with_terminator(&self) -> String {
        format!("{}{}", self.text, self.terminator.unwrap_or('.'))
    }
}

/// Collapse whitespace runs to a single space and trim both ends.
pub fn clean(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_terminator(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

// A dot between two digits ("15.30", "1.000") belongs to a number.
fn is_numeric_dot(chars: &[char], i: usize) -> bool {
    chars[i] == '.'
        && i > 0
        && chars[i - 1].is_ascii_digit()
        && chars.get(i + 1).is_some_and(|c| c.is_ascii_digit())
}

fn push_piece(
    sentences: &mut Vec<Sentence>,
    piece: &str,
    terminator: Option<char>,
    min_chars: usize,
) {
    let trimmed = piece.trim();
    if trimmed.chars().count() > min_chars {
        sentences.push(Sentence {
            index: sentences.len(),
            text: trimmed.to_string(),
            terminator,
        });
    }
}

/// Split `text` on sentence-terminal punctuation and keep the pieces longer
/// than `min_chars` characters.
pub fn split_sentences(text: &str, min_chars: usize) -> Vec<Sentence> {
    let chars: Vec<char> = text.chars().collect();
    let mut sentences = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if is_terminator(c) && !is_numeric_dot(&chars, i) {
            push_piece(&mut sentences, &current, Some(c), min_chars);
            current.clear();
        } else {
            current.push(c);
        }
    }
    push_piece(&mut sentences, &current, None, min_chars);

    sentences
}

/// Segmentation used by the inference pipeline. Case is preserved because
/// selected sentences are rendered verbatim.
pub fn inference_sentences(text: &str) -> Vec<Sentence> {
    split_sentences(&clean(text), INFERENCE_MIN_CHARS)
}

/// Segmentation used when building the training corpus.
pub fn training_sentences(text: &str) -> Vec<Sentence> {
    split_sentences(&clean(text).to_lowercase(), TRAINING_MIN_CHARS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_collapses_whitespace() {
        assert_eq!(clean("  Banjir \n\t merendam   desa  "), "Banjir merendam desa");
        assert_eq!(clean("   "), "");
    }

    #[test]
    fn test_split_drops_short_pieces() {
        let sentences = split_sentences(
            "Judul. Banjir merendam sejumlah wilayah di Kulon Progo. Ok!",
            25,
        );
        assert_eq!(sentences.len(), 1);
        assert_eq!(sentences[0].text, "Banjir merendam sejumlah wilayah di Kulon Progo");
        assert_eq!(sentences[0].index, 0);
        assert_eq!(sentences[0].terminator, Some('.'));
    }

    #[test]
    fn test_split_threshold_is_strict() {
        // exactly 25 characters is discarded
        let piece = "a".repeat(25);
        assert!(split_sentences(&format!("{piece}."), 25).is_empty());
        let piece = "a".repeat(26);
        assert_eq!(split_sentences(&format!("{piece}."), 25).len(), 1);
    }

    #[test]
    fn test_split_counts_chars_not_bytes() {
        // 21 two-byte characters
        let piece = "é".repeat(21);
        assert_eq!(split_sentences(&piece, 20).len(), 1);
        assert!(split_sentences(&piece, 21).is_empty());
    }

    #[test]
    fn test_split_keeps_decimal_numbers_together() {
        let sentences = inference_sentences(
            "Rapat dimulai pukul 15.30 WIB di balai desa. Warga diminta hadir tepat waktu.",
        );
        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[0].text, "Rapat dimulai pukul 15.30 WIB di balai desa");
    }

    #[test]
    fn test_split_still_breaks_after_trailing_number() {
        let sentences = split_sentences(
            "Korban banjir tercatat sebanyak 120. Bantuan mulai disalurkan ke posko",
            20,
        );
        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[0].text, "Korban banjir tercatat sebanyak 120");
        assert_eq!(sentences[1].terminator, None);
    }

    #[test]
    fn test_split_indices_follow_eligible_order() {
        let sentences = split_sentences(
            "Pertama adalah kalimat yang cukup panjang! Pendek. Kedua adalah kalimat yang cukup panjang?",
            25,
        );
        let indices: Vec<usize> = sentences.iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![0, 1]);
        assert_eq!(sentences[0].terminator, Some('!'));
        assert_eq!(sentences[1].terminator, Some('?'));
        assert_eq!(sentences[1].with_terminator(), "Kedua adalah kalimat yang cukup panjang?");
    }

    #[test]
    fn test_empty_input_yields_no_sentences() {
        assert!(inference_sentences("").is_empty());
        assert!(training_sentences("   \n ").is_empty());
    }

    #[test]
    fn test_training_sentences_are_lowercased() {
        let sentences = training_sentences("Air Sungai Meluap Ke Permukiman Warga.");
        assert_eq!(sentences[0].text, "air sungai meluap ke permukiman warga");
    }
}
