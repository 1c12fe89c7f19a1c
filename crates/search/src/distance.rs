//! Edit distance used by typo correction.

/// Calculate Levenshtein edit distance between two strings.
///
/// Operates on `char`s, so multi-byte input counts one edit per character.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    distance_chars(&a_chars, &b_chars)
}

/// Edit distance if it is at most `max`, otherwise `None`.
///
/// Skips the full computation when the length difference alone exceeds `max`.
pub fn distance_within(a: &str, b: &str, max: usize) -> Option<usize> {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    if a_chars.len().abs_diff(b_chars.len()) > max {
        return None;
    }

    let distance = distance_chars(&a_chars, &b_chars);
    (distance <= max).then_some(distance)
}

fn distance_chars(a: &[char], b: &[char]) -> usize {
    let m = a.len();
    let n = b.len();

    if m == 0 { return n; }
    if n == 0 { return m; }

    // Two rows are enough
    let mut prev: Vec<usize> = (0..=n).collect();
    let mut curr = vec![0; n + 1];

    for i in 1..=m {
        curr[0] = i;
        for j in 1..=n {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            curr[j] = (prev[j] + 1)
                .min(curr[j - 1] + 1)
                .min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}
