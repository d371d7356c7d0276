//! Attribute extraction: fixed-vocabulary substring matching over page text.

/// Scan lowercased page text for vocabulary terms.
///
/// Terms are tested in vocabulary order and appended when contained
/// anywhere in the text, so the result preserves vocabulary order — not
/// text-occurrence order — and is duplicate-free by construction. Matching
/// is plain substring containment: "beach" also matches inside
/// "beachside", which is the intended looseness.
pub fn extract_attributes(text: &str, vocabulary: &[String]) -> Vec<String> {
    vocabulary
        .iter()
        .filter(|term| text.contains(term.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab(terms: &[&str]) -> Vec<String> {
        terms.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn result_follows_vocabulary_order_not_text_order() {
        let v = vocab(&["beach", "diving"]);
        let result = extract_attributes("diving then beach", &v);
        assert_eq!(result, vec!["beach", "diving"]);
    }

    #[test]
    fn no_matches_yields_empty() {
        let v = vocab(&["skiing", "museum"]);
        assert!(extract_attributes("nothing to do here", &v).is_empty());
    }

    #[test]
    fn repeated_occurrences_contribute_once() {
        let v = vocab(&["beach"]);
        let result = extract_attributes("beach beach beach", &v);
        assert_eq!(result, vec!["beach"]);
    }

    #[test]
    fn matches_inside_larger_words() {
        let v = vocab(&["beach"]);
        assert_eq!(extract_attributes("a beachside resort", &v), vec!["beach"]);
    }

    #[test]
    fn multi_word_terms_match() {
        let v = vocab(&["historical place"]);
        assert_eq!(
            extract_attributes("visit this historical place today", &v),
            vec!["historical place"]
        );
    }

    #[test]
    fn empty_vocabulary_yields_empty() {
        assert!(extract_attributes("beach and museum", &[]).is_empty());
    }
}
