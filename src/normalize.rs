use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref WHITESPACE_RUNS: Regex = Regex::new(r"\s+").unwrap();
}

/// Collapse whitespace runs to single spaces, lowercase, and trim.
/// Applied to both texts before embedding so that layout differences
/// between documents don't influence the similarity score.
pub fn normalize(text: &str) -> String {
    WHITESPACE_RUNS
        .replace_all(text, " ")
        .to_lowercase()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_whitespace_runs() {
        assert_eq!(
            normalize("Senior\t\tRust   Engineer\n\nRemote"),
            "senior rust engineer remote"
        );
    }

    #[test]
    fn lowercases_and_trims() {
        assert_eq!(normalize("  Python AND AWS  "), "python and aws");
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize(" \n\t "), "");
    }

    #[test]
    fn is_idempotent() {
        let samples = [
            "Experienced   Python\nand AWS\tdeveloper",
            "already normalized text",
            "  MIXED Case\r\nwith CRLF  ",
            "",
        ];
        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once);
        }
    }

    #[test]
    fn output_has_no_consecutive_whitespace_or_uppercase() {
        let normalized = normalize("A  B\t\tC\n\nD   E");
        assert!(!normalized.contains("  "));
        assert!(!normalized.chars().any(|c| c.is_uppercase()));
        assert_eq!(normalized, normalized.trim());
    }
}
