//! Natural title ordering
//!
//! Titles are compared run by run: digit runs by numeric value, text runs
//! case-insensitively. "문서2" sorts before "문서10" and "item1" before "Item2".
//!
//! Text runs compare lowercased code points, not locale collation. Hangul syllables
//! and ASCII come out in dictionary order, but accented Latin letters ("é") sort
//! after "z".

use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Run<'a> {
    Digits(&'a str),
    Text(&'a str),
}

fn runs(s: &str) -> impl Iterator<Item = Run<'_>> {
    let mut rest = s;
    std::iter::from_fn(move || {
        let first = rest.chars().next()?;
        let digits = first.is_ascii_digit();
        let end = rest
            .char_indices()
            .find(|(_, c)| c.is_ascii_digit() != digits)
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        let (run, tail) = rest.split_at(end);
        rest = tail;
        Some(if digits { Run::Digits(run) } else { Run::Text(run) })
    })
}

fn compare_digits(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

/// Compare two titles in natural order.
///
/// Equal-looking titles ("a01" vs "a1", "A" vs "a") fall back to plain string order so
/// the result is a total order and sorting stays deterministic.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = runs(a);
    let mut right = runs(b);
    loop {
        let ordering = match (left.next(), right.next()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(Run::Digits(x)), Some(Run::Digits(y))) => compare_digits(x, y),
            (Some(Run::Text(x)), Some(Run::Text(y))) => compare_text(x, y),
            // Digit runs sort before text, matching the digit-first code point order
            (Some(Run::Digits(_)), Some(Run::Text(_))) => Ordering::Less,
            (Some(Run::Text(_)), Some(Run::Digits(_))) => Ordering::Greater,
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(titles: &[&str]) -> Vec<String> {
        let mut titles: Vec<String> = titles.iter().map(|t| t.to_string()).collect();
        titles.sort_by(|a, b| natural_cmp(a, b));
        titles
    }

    #[test]
    fn test_numeric_runs_compare_by_value() {
        assert_eq!(sorted(&["item2", "item10", "item1"]), vec!["item1", "item2", "item10"]);
    }

    #[test]
    fn test_hangul_titles_with_numbers() {
        assert_eq!(sorted(&["문서10", "문서2", "가이드"]), vec!["가이드", "문서2", "문서10"]);
    }

    #[test]
    fn test_text_is_case_insensitive() {
        assert_eq!(sorted(&["beta", "Alpha", "alpha 2"]), vec!["Alpha", "alpha 2", "beta"]);
    }

    #[test]
    fn test_accented_letters_sort_by_code_point() {
        assert_eq!(sorted(&["école", "zèbre", "avion"]), vec!["avion", "zèbre", "école"]);
    }

    #[test]
    fn test_prefix_sorts_first() {
        assert_eq!(natural_cmp("Guide", "Guide 2"), Ordering::Less);
        assert_eq!(natural_cmp("", "a"), Ordering::Less);
    }

    #[test]
    fn test_leading_zeros_tie_break_deterministically() {
        assert_eq!(compare_digits("007", "7"), Ordering::Equal);
        assert_ne!(natural_cmp("v007", "v7"), Ordering::Equal);
        assert_eq!(natural_cmp("same", "same"), Ordering::Equal);
    }

    #[test]
    fn test_large_numbers_do_not_overflow() {
        assert_eq!(
            natural_cmp("build 99999999999999999999999", "build 100000000000000000000000"),
            Ordering::Less
        );
    }
}
