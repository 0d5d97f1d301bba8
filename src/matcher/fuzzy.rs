//! Approximate substring search
//!
//! Scores a query against a candidate by the smallest edit distance between
//! the query and any substring of the candidate, normalized by query length,
//! plus a small penalty for how far into the candidate that substring starts.
//! Scores live in `[0, 1]`; lower is better.

/// Fuzzy stage tuning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuzzyOptions {
    /// Maximum accepted score (inclusive)
    pub threshold: f64,
    /// Characters of offset that cost a full point of score
    pub distance: usize,
}

impl Default for FuzzyOptions {
    fn default() -> Self {
        Self {
            threshold: 0.6,
            distance: 100,
        }
    }
}

/// A candidate accepted by the fuzzy stage
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuzzyHit<'a> {
    pub name: &'a str,
    /// Position in the candidate list
    pub index: usize,
    pub score: f64,
}

/// Longest query, in chars, the fuzzy stage scores; longer ones never hit
pub const MAX_QUERY_CHARS: usize = 256;

/// Search all candidates, returning hits within the threshold, best first
///
/// Equal scores keep candidate order.
pub fn fuzzy_search<'a, S: AsRef<str>>(
    candidates: &'a [S],
    query: &str,
    options: &FuzzyOptions,
) -> Vec<FuzzyHit<'a>> {
    let pattern = lowercase_chars(query);
    if pattern.len() > MAX_QUERY_CHARS {
        return Vec::new();
    }

    let mut hits: Vec<FuzzyHit<'a>> = candidates
        .iter()
        .enumerate()
        .filter_map(|(index, candidate)| {
            let name = candidate.as_ref();
            let text = lowercase_chars(name);
            if !within_reach(pattern.len(), text.len(), options.threshold) {
                return None;
            }
            let score = score_chars(&pattern, &text, options.distance);
            (score <= options.threshold).then_some(FuzzyHit { name, index, score })
        })
        .collect();

    // sort_by is stable
    hits.sort_by(|a, b| a.score.total_cmp(&b.score));
    hits
}

/// Score `query` against `candidate`, ignoring case
///
/// Queries longer than [`MAX_QUERY_CHARS`] score 1.0.
///
/// # Examples
/// ```
/// use picfind::matcher::fuzzy_score;
///
/// assert_eq!(fuzzy_score("sunset.png", "sunset", 100), 0.0);
/// assert!(fuzzy_score("sunset.png", "sunst", 100) < fuzzy_score("sunrise.jpg", "sunst", 100));
/// assert_eq!(fuzzy_score("a.png", "zzz", 100), 1.0);
/// ```
pub fn fuzzy_score(candidate: &str, query: &str, distance: usize) -> f64 {
    let pattern = lowercase_chars(query);
    if pattern.len() > MAX_QUERY_CHARS {
        return 1.0;
    }
    score_chars(&pattern, &lowercase_chars(candidate), distance)
}

fn lowercase_chars(s: &str) -> Vec<char> {
    s.to_lowercase().chars().collect()
}

/// A pattern of `m` chars needs at least `m - n` edits against `n` chars
fn within_reach(pattern_len: usize, text_len: usize, threshold: f64) -> bool {
    if pattern_len <= text_len {
        return true;
    }
    #[allow(clippy::cast_precision_loss)]
    let floor = (pattern_len - text_len) as f64 / pattern_len as f64;
    floor <= threshold
}

fn score_chars(pattern: &[char], text: &[char], distance: usize) -> f64 {
    if pattern.is_empty() {
        return 0.0;
    }

    let (errors, start) = best_alignment(pattern, text, distance);

    #[allow(clippy::cast_precision_loss)]
    let accuracy = errors as f64 / pattern.len() as f64;
    #[allow(clippy::cast_precision_loss)]
    let proximity = if distance == 0 {
        if start == 0 {
            0.0
        } else {
            1.0
        }
    } else {
        start as f64 / distance as f64
    };

    (accuracy + proximity).min(1.0)
}

/// One DP cell: an alignment ending here, ordered by combined score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Cell {
    /// `errors / len + start / distance`, scaled to integers
    key: usize,
    start: usize,
    cost: usize,
}

/// Alignment of `pattern` to a substring of `text` with the lowest score
///
/// Returns `(errors, start)` where `start` is the text offset at which the
/// substring begins. The start offset is fixed along a path and the error
/// count is additive, so minimizing `errors * distance + start * len` per
/// cell yields the lowest combined score. With `distance == 0` any offset
/// costs more than a full mismatch at offset 0. Ties go to the earliest
/// start. Row 0 lets a match begin anywhere in the text.
fn best_alignment(pattern: &[char], text: &[char], distance: usize) -> (usize, usize) {
    let len = pattern.len();
    let (cost_weight, start_weight) = if distance == 0 {
        (1, len + 1)
    } else {
        (distance, len)
    };
    let cell = |cost: usize, start: usize| Cell {
        key: cost
            .saturating_mul(cost_weight)
            .saturating_add(start.saturating_mul(start_weight)),
        start,
        cost,
    };

    let mut prev: Vec<Cell> = (0..=text.len()).map(|j| cell(0, j)).collect();
    let mut curr: Vec<Cell> = vec![cell(0, 0); text.len() + 1];

    for (i, &p) in pattern.iter().enumerate() {
        curr[0] = cell(i + 1, 0);
        for (j, &t) in text.iter().enumerate() {
            let substitute = cell(prev[j].cost + usize::from(p != t), prev[j].start);
            let skip_pattern = cell(prev[j + 1].cost + 1, prev[j + 1].start);
            let skip_text = cell(curr[j].cost + 1, curr[j].start);
            curr[j + 1] = substitute.min(skip_pattern).min(skip_text);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev.into_iter()
        .min()
        .map_or((len, 0), |best| (best.cost, best.start))
}
