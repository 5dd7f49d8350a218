//! Approximate substring search for OCR-damaged text.
//!
//! A pattern "occurs" in a line when some substring of the line is within a
//! small Levenshtein distance of it. This tolerates single misread, dropped or
//! inserted characters such as "Qveens" or "Tang0".

/// Returns the smallest edit distance between `pattern` and any substring of
/// `text`, or `None` if that distance exceeds `max_dist`.
///
/// Comparison is case-sensitive and works on chars, not bytes.
pub fn find_near_match(pattern: &str, text: &str, max_dist: usize) -> Option<usize> {
    let pattern: Vec<char> = pattern.chars().collect();
    let m = pattern.len();

    // Column of the DP table for the text prefix consumed so far. Row 0 stays
    // at zero so a match may start anywhere in the text.
    let mut column: Vec<usize> = (0..=m).collect();
    let mut best = column[m];

    for c in text.chars() {
        let mut diagonal = column[0];
        column[0] = 0;
        for i in 1..=m {
            let cost = if pattern[i - 1] == c { 0 } else { 1 };
            let value = (diagonal + cost)
                .min(column[i] + 1)
                .min(column[i - 1] + 1);
            diagonal = column[i];
            column[i] = value;
        }
        best = best.min(column[m]);
        if best == 0 {
            break;
        }
    }

    (best <= max_dist).then_some(best)
}

/// True if `pattern` occurs in `text` within `max_dist` edits.
pub fn contains_near(pattern: &str, text: &str, max_dist: usize) -> bool {
    find_near_match(pattern, text, max_dist).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_substring() {
        assert_eq!(find_near_match("Queens", "Queens #17", 1), Some(0));
        assert_eq!(find_near_match("Tango", "LinkedIn Tango #482 done", 1), Some(0));
    }

    #[test]
    fn test_single_edit() {
        // substitution
        assert_eq!(find_near_match("Queens", "Qveens #17", 1), Some(1));
        // deletion
        assert_eq!(find_near_match("Queens", "Quens #17", 1), Some(1));
        // insertion
        assert_eq!(find_near_match("Tango", "Tanngo #3", 1), Some(1));
    }

    #[test]
    fn test_two_edits_rejected() {
        assert_eq!(find_near_match("Queens", "Qvcens #17", 1), None);
        assert_eq!(find_near_match("Queens", "Qvcens #17", 2), Some(2));
    }

    #[test]
    fn test_case_sensitive() {
        assert_eq!(find_near_match("Solve", "solve time", 1), Some(1));
        assert_eq!(find_near_match("Solve", "SOLVE time", 1), None);
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(find_near_match("", "anything", 0), Some(0));
        assert_eq!(find_near_match("Best", "", 1), None);
        assert!(contains_near("Best", "Bst", 1));
    }

    #[test]
    fn test_non_ascii_text() {
        assert!(contains_near("Tango", "Tangö #12", 1));
        assert!(!contains_near("Tango", "Täñgö #12", 1));
    }
}
