//! Genre / mechanic slices of an already scored and sorted list.
//! Filtering keeps the existing order; nothing is re-scored or re-sorted.

use crate::models::{Genre, Mechanic, ScoredGame};

pub fn top_by_genre(scored: &[ScoredGame], genre: Genre, n: usize) -> Vec<&ScoredGame> {
    take_matching(scored, n, |g| g.genres.contains(&genre))
}

pub fn top_by_mechanic(scored: &[ScoredGame], mechanic: Mechanic, n: usize) -> Vec<&ScoredGame> {
    take_matching(scored, n, |g| g.mechanics.contains(&mechanic))
}

fn take_matching<F>(scored: &[ScoredGame], n: usize, keep: F) -> Vec<&ScoredGame>
where
    F: Fn(&ScoredGame) -> bool,
{
    scored.iter().filter(|g| keep(g)).take(n).collect()
}
