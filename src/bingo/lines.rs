//! Winning lines over the 5×5 grid.

use std::collections::BTreeSet;

/// Five rows, five columns, two diagonals.
pub static WINNING_LINES: [[usize; 5]; 12] = [
    [0, 1, 2, 3, 4],
    [5, 6, 7, 8, 9],
    [10, 11, 12, 13, 14],
    [15, 16, 17, 18, 19],
    [20, 21, 22, 23, 24],
    [0, 5, 10, 15, 20],
    [1, 6, 11, 16, 21],
    [2, 7, 12, 17, 22],
    [3, 8, 13, 18, 23],
    [4, 9, 14, 19, 24],
    [0, 6, 12, 18, 24],
    [4, 8, 12, 16, 20],
];

/// Lines whose five cells are all checked.
pub fn complete_lines(checked: &BTreeSet<usize>) -> impl Iterator<Item = &'static [usize; 5]> + '_ {
    WINNING_LINES
        .iter()
        .filter(|line| line.iter().all(|p| checked.contains(p)))
}

/// Union of every position that belongs to a complete line. Empty means no bingo.
#[must_use]
pub fn winning_positions(checked: &BTreeSet<usize>) -> BTreeSet<usize> {
    complete_lines(checked).flatten().copied().collect()
}

#[must_use]
pub fn has_bingo(checked: &BTreeSet<usize>) -> bool {
    complete_lines(checked).next().is_some()
}

#[cfg(test)]
#[path = "lines_test.rs"]
mod tests;
