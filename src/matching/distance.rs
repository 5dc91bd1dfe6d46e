// src/matching/distance.rs
use ndarray::{Array2, Axis};

const EMPTY_TOKEN: [&str; 1] = [""];

/// One-way "engulfing" distance between two token sequences.
///
/// Every token is matched to its closest token on the other side by
/// Levenshtein distance. The row minima and the column minima are summed
/// separately and the smaller sum wins. This is a greedy stand-in for an
/// optimal assignment: several tokens may claim the same partner.
///
/// An empty sequence is compared as a single empty token.
pub fn token_distance<S: AsRef<str>>(x: &[S], y: &[S]) -> f64 {
    let x: Vec<&str> = as_tokens(x);
    let y: Vec<&str> = as_tokens(y);

    let matrix = Array2::from_shape_fn((x.len(), y.len()), |(i, j)| {
        strsim::levenshtein(x[i], y[j])
    });

    let row_sum = axis_min_sum(&matrix, Axis(1));
    let column_sum = axis_min_sum(&matrix, Axis(0));
    row_sum.min(column_sum) as f64
}

fn as_tokens<S: AsRef<str>>(tokens: &[S]) -> Vec<&str> {
    if tokens.is_empty() {
        EMPTY_TOKEN.to_vec()
    } else {
        tokens.iter().map(AsRef::as_ref).collect()
    }
}

/// Sum over lanes of the minimum taken along `axis`.
fn axis_min_sum(matrix: &Array2<usize>, axis: Axis) -> usize {
    matrix
        .map_axis(axis, |lane| lane.iter().copied().min().unwrap_or(0))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(s: &str) -> Vec<String> {
        s.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn test_identical_sequences() {
        let a = tokens("the corner store");
        assert_eq!(token_distance(&a, &a), 0.0);
    }

    #[test]
    fn test_reordered_tokens_cost_nothing() {
        assert_eq!(
            token_distance(&tokens("corner store"), &tokens("store corner")),
            0.0
        );
    }

    #[test]
    fn test_extra_token_on_one_side() {
        // "the" costs nothing from the shorter side's point of view
        let a = tokens("the corner store");
        let b = tokens("corner store");
        assert_eq!(token_distance(&a, &b), 0.0);
    }

    #[test]
    fn test_typo() {
        let a = tokens("main street");
        let b = tokens("mian street");
        assert_eq!(token_distance(&a, &b), 2.0);
    }

    #[test]
    fn test_takes_smaller_direction() {
        // rows: ab->ab 0, cd->cd 0, xyz->(ab 3, cd 3) 3 => 3
        // columns: ab 0, cd 0 => 0
        let a = tokens("ab cd xyz");
        let b = tokens("ab cd");
        assert_eq!(token_distance(&a, &b), 0.0);
        assert_eq!(token_distance(&b, &a), 0.0);
    }

    #[test]
    fn test_empty_sequences() {
        let empty: Vec<String> = Vec::new();
        assert_eq!(token_distance(&empty, &empty), 0.0);
        // shortest token of the other side
        assert_eq!(token_distance(&empty, &tokens("abc de")), 2.0);
        assert_eq!(token_distance(&tokens("abc de"), &empty), 2.0);
    }

    #[test]
    fn test_symmetric() {
        let a = tokens("joes pizza and subs");
        let b = tokens("joe pizzeria");
        assert_eq!(token_distance(&a, &b), token_distance(&b, &a));
    }
}
