//! Levenshtein-based "did you mean" suggestions for closed vocabularies
//! (modes, weekdays, ordinals) and time zone names.

/// Find the closest candidate, ignoring case. Returns None if the best
/// distance exceeds half the longer string (too dissimilar).
pub(crate) fn fuzzy_match<'a>(input: &str, candidates: &[&'a str]) -> Option<&'a str> {
    let input_lower = input.to_lowercase();
    let mut best: Option<(&str, usize)> = None;

    for &candidate in candidates {
        let dist = levenshtein(&input_lower, &candidate.to_lowercase());
        match best {
            None => best = Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => best = Some((candidate, dist)),
            _ => {}
        }
    }

    best.and_then(|(name, dist)| {
        let max_len = input.len().max(name.len());
        (dist <= max_len / 2).then_some(name)
    })
}

/// Levenshtein edit distance between two strings.
pub(crate) fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let n = b.len();

    let mut prev = (0..=n).collect::<Vec<_>>();
    let mut curr = vec![0; n + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Mode;
    use crate::vocab::{Ordinal, Weekday};

    #[test]
    fn levenshtein_basic() {
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("abc", "abc"), 0);
    }

    #[test]
    fn suggests_vocabulary_tokens() {
        assert_eq!(fuzzy_match("WENSDAY", &Weekday::TOKENS), Some("WEDNESDAY"));
        assert_eq!(fuzzy_match("monday", &Weekday::TOKENS), Some("MONDAY"));
        assert_eq!(fuzzy_match("SECND", &Ordinal::TOKENS), Some("SECOND"));
        assert_eq!(fuzzy_match("MONTLY", &Mode::TOKENS), Some("MONTHLY"));
    }

    #[test]
    fn rejects_distant_input() {
        assert_eq!(fuzzy_match("zzzzzzzzzzzzz", &Weekday::TOKENS), None);
        assert_eq!(fuzzy_match("HOURLY", &Mode::TOKENS), None);
    }
}
