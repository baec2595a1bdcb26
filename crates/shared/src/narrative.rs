//! Stitches selected sentences into connected prose.

/// Lead-in for the second sentence ("in addition").
pub const CONNECTIVE_ADDITION: &str = "Selain itu, ";
/// Lead-in for the third sentence ("as a consequence").
pub const CONNECTIVE_CONSEQUENCE: &str = "Sebagai dampaknya, ";
/// Lead-in for every sentence after the third ("furthermore").
pub const CONNECTIVE_CONTINUATION: &str = "Lebih lanjut, ";

fn lowercase_first(sentence: &str) -> String {
    let mut chars = sentence.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Render sentences (already in document order) as one paragraph.
///
/// The first sentence is the lead, the rest are joined with connectives,
/// and the result ends with exactly one period.
pub fn build_narrative<S: AsRef<str>>(sentences: &[S]) -> String {
    if sentences.is_empty() {
        return String::new();
    }

    let pieces: Vec<String> = sentences
        .iter()
        .enumerate()
        .map(|(i, sentence)| {
            let sentence = sentence.as_ref();
            let connective = match i {
                0 => return sentence.to_string(),
                1 => CONNECTIVE_ADDITION,
                2 => CONNECTIVE_CONSEQUENCE,
                _ => CONNECTIVE_CONTINUATION,
            };
            format!("{}{}", connective, lowercase_first(sentence))
        })
        .collect();

    format!("{}.", pieces.join(". ").trim_end_matches('.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_selection() {
        let none: [&str; 0] = [];
        assert_eq!(build_narrative(&none), "");
    }

    #[test]
    fn test_single_sentence_is_verbatim() {
        assert_eq!(
            build_narrative(&["Banjir merendam Kulon Progo"]),
            "Banjir merendam Kulon Progo."
        );
    }

    #[test]
    fn test_three_sentence_template() {
        let narrative = build_narrative(&[
            "Banjir merendam Kulon Progo",
            "Air sungai meluap",
            "Aktivitas warga terganggu",
        ]);
        assert_eq!(
            narrative,
            "Banjir merendam Kulon Progo. Selain itu, air sungai meluap. \
             Sebagai dampaknya, aktivitas warga terganggu."
        );
    }

    #[test]
    fn test_sentences_past_third_use_continuation() {
        let narrative = build_narrative(&["Satu", "Dua", "Tiga", "Empat", "Lima"]);
        assert_eq!(
            narrative,
            "Satu. Selain itu, dua. Sebagai dampaknya, tiga. Lebih lanjut, empat. Lebih lanjut, lima."
        );
    }

    #[test]
    fn test_trailing_periods_collapse_to_one() {
        assert_eq!(build_narrative(&["Warga mengungsi..."]), "Warga mengungsi.");
        assert_eq!(
            build_narrative(&["Hujan deras", "Sungai meluap."]),
            "Hujan deras. Selain itu, sungai meluap."
        );
    }

    #[test]
    fn test_lowercase_first_is_unicode_aware() {
        assert_eq!(lowercase_first("Éropa dilanda banjir"), "éropa dilanda banjir");
        assert_eq!(lowercase_first(""), "");
    }
}
