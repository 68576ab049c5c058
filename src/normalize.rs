use regex::Regex;
use std::sync::LazyLock;

/// Everything outside ASCII letters/digits, Hebrew letters, space and hyphen
static DISALLOWED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^a-zA-Z0-9א-ת \-]").expect("title filter regex should compile")
});

/// Turn raw OCR output into a title candidate.
///
/// Newlines (and the literal `\n` escape some OCR services emit) become spaces,
/// then everything outside the permitted set is dropped. An empty result means
/// the image had no usable title.
pub fn normalize(text: &str) -> String {
    let flattened = text
        .replace("\r\n", " ")
        .replace(['\n', '\r'], " ")
        .replace("\\n", " ");

    DISALLOWED
        .replace_all(flattened.trim(), "")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_permitted(c: char) -> bool {
        c.is_ascii_alphanumeric() || ('א'..='ת').contains(&c) || c == ' ' || c == '-'
    }

    #[test]
    fn test_keeps_latin_and_hebrew() {
        assert_eq!(normalize("Breaking Bad"), "Breaking Bad");
        assert_eq!(normalize("פאודה - עונה 2"), "פאודה - עונה 2");
    }

    #[test]
    fn test_newlines_become_spaces() {
        assert_eq!(normalize("Breaking\nBad\r\n"), "Breaking Bad");
        assert_eq!(normalize("Breaking\\nBad"), "Breaking Bad");
    }

    #[test]
    fn test_strips_punctuation_and_symbols() {
        assert_eq!(normalize("  «Breaking Bad!» ™ "), "Breaking Bad");
        assert_eq!(normalize("Hello, World: 2024?"), "Hello World 2024");
    }

    #[test]
    fn test_strips_hebrew_points_and_accented_letters() {
        // Niqqud and non-ASCII Latin letters are outside the permitted set
        assert_eq!(normalize("שָׁלוֹם"), "שלום");
        assert_eq!(normalize("Café"), "Caf");
    }

    #[test]
    fn test_empty_and_punctuation_only() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \n\t "), "");
        assert_eq!(normalize("!!! ??? ..."), "");
    }

    #[test]
    fn test_no_surrounding_whitespace_after_filtering() {
        assert_eq!(normalize("!  abc  ?"), "abc");
    }

    #[test]
    fn test_output_charset_and_idempotence() {
        let samples = [
            "Breaking Bad",
            "  The Office (US)\n2005 ",
            "!  לא ידוע  ?",
            "Grey's Anatomy\\nSeason 19",
            "\u{200f}שטיסל\u{200e}",
            "emoji 📺 title",
            "--a--",
            "\t\ttabs\tinside\t",
        ];

        for sample in samples {
            let once = normalize(sample);
            assert!(once.chars().all(is_permitted), "bad char in {:?}", once);
            assert_eq!(once, once.trim(), "untrimmed output for {:?}", sample);
            assert_eq!(normalize(&once), once, "not idempotent for {:?}", sample);
        }
    }
}
