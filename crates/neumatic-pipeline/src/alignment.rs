//! Sequence alignment for scoring recognized output against a reference
//! transcription.
//!
//! Plain Levenshtein with unit costs; the backtrack reconstructs the best
//! alignment as paired slots, `None` marking a gap. An impossible backtrack
//! step means the matrix is corrupt and panics with the offending indices.

/// One aligned slot pair: recognized element on the left, reference on the
/// right, `None` where the other side has no counterpart.
pub type AlignedPair<'a, T> = (Option<&'a T>, Option<&'a T>);

/// Edit distance plus the full DP matrix, row-major `(a.len()+1) x (b.len()+1)`.
#[must_use]
pub fn levenshtein<T: PartialEq>(a: &[T], b: &[T]) -> (usize, Vec<Vec<usize>>) {
    let m = a.len();
    let n = b.len();

    let mut d = vec![vec![0usize; n + 1]; m + 1];
    for (i, row) in d.iter_mut().enumerate() {
        row[0] = i;
    }
    for (j, cell) in d[0].iter_mut().enumerate() {
        *cell = j;
    }

    for j in 1..=n {
        for i in 1..=m {
            let substitution = usize::from(a[i - 1] != b[j - 1]);
            d[i][j] = (d[i - 1][j] + 1)
                .min(d[i][j - 1] + 1)
                .min(d[i - 1][j - 1] + substitution);
        }
    }

    (d[m][n], d)
}

/// Walks the matrix backward and pairs up the two sequences.
///
/// # Panics
///
/// Panics if the matrix does not belong to `a` and `b`.
#[must_use]
pub fn backtrack<'a, T: PartialEq>(
    a: &'a [T],
    b: &'a [T],
    d: &[Vec<usize>],
) -> Vec<AlignedPair<'a, T>> {
    let mut i = a.len();
    let mut j = b.len();
    let mut aligned: Vec<AlignedPair<'a, T>> = Vec::with_capacity(i.max(j));

    while i > 0 || j > 0 {
        if i == 0 {
            aligned.push((None, Some(&b[j - 1])));
            j -= 1;
        } else if j == 0 {
            aligned.push((Some(&a[i - 1]), None));
            i -= 1;
        } else if d[i][j] == d[i - 1][j - 1] && a[i - 1] == b[j - 1] {
            aligned.push((Some(&a[i - 1]), Some(&b[j - 1])));
            i -= 1;
            j -= 1;
        } else if d[i][j] == d[i - 1][j - 1] + 1 {
            aligned.push((Some(&a[i - 1]), Some(&b[j - 1])));
            i -= 1;
            j -= 1;
        } else if d[i][j] == d[i - 1][j] + 1 {
            aligned.push((Some(&a[i - 1]), None));
            i -= 1;
        } else if d[i][j] == d[i][j - 1] + 1 {
            aligned.push((None, Some(&b[j - 1])));
            j -= 1;
        } else {
            panic!("invalid backtrack step at i={i}, j={j}");
        }
    }

    aligned.reverse();
    aligned
}

/// Distance and complete alignment in one call.
#[must_use]
pub fn align<'a, T: PartialEq>(a: &'a [T], b: &'a [T]) -> (usize, Vec<AlignedPair<'a, T>>) {
    let (distance, d) = levenshtein(a, b);
    (distance, backtrack(a, b, &d))
}
