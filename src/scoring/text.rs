// Text normalization and tokenization for phrase comparison

use std::collections::HashSet;

/// Characters removed from the whole phrase before splitting into words
const STRIPPED_CHARS: [char; 4] = ['\'', '?', ',', '¿'];

/// Lowercase and trim surrounding whitespace
pub fn normalize(text: &str) -> String {
    text.to_lowercase().trim().to_string()
}

/// Length in characters (not bytes)
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Split a normalized phrase into words after stripping punctuation
pub fn tokenize(normalized: &str) -> Vec<String> {
    let stripped: String = normalized
        .chars()
        .filter(|c| !STRIPPED_CHARS.contains(c))
        .collect();

    stripped.split_whitespace().map(str::to_string).collect()
}

/// Distinct words of a normalized phrase
pub fn word_set(normalized: &str) -> HashSet<String> {
    tokenize(normalized).into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  Hello World \n"), "hello world");
        assert_eq!(normalize("¿Cómo Estás?"), "¿cómo estás?");
    }

    #[test]
    fn test_tokenize_strips_punctuation_everywhere() {
        assert_eq!(
            tokenize("¿cómo estás, amigo?"),
            vec!["cómo", "estás", "amigo"]
        );
        assert_eq!(tokenize("don't stop"), vec!["dont", "stop"]);
        assert!(tokenize("¿ ? , '").is_empty());
    }

    #[test]
    fn test_periods_are_kept() {
        // Only the four listed characters are stripped
        assert_eq!(tokenize("por favor."), vec!["por", "favor."]);
    }

    #[test]
    fn test_word_set_is_distinct_and_accent_sensitive() {
        let words = word_set("¿cómo estás hoy? hoy");
        assert_eq!(words.len(), 3);
        assert!(words.contains("cómo"));
        assert!(!words.contains("como"));
    }

    #[test]
    fn test_char_len_counts_chars() {
        assert_eq!(char_len("¿qué?"), 5);
        assert_eq!("¿qué?".len(), 7);
    }
}
