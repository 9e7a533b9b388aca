// src/decode/lines.rs
// =============================================================================
// This module picks the meaningful lines out of a decoded file.
//
// A line is meaningful when, after trimming surrounding whitespace:
// - it is not empty
// - it does not start with '#' (a comment in .gitignore, .dockerignore, ...)
//
// Rust concepts:
// - Iterators: nothing is collected, lines are produced one at a time
// - Lifetimes: the returned &str slices borrow from the input text
// =============================================================================

// Lines starting with this (after trimming) are comments
pub const COMMENT_MARKER: char = '#';

// Yields the meaningful lines of `text`, in file order
//
// Example input:
//   "# comment\n\nfoo\n  bar  \n"
//
// Example output:
//   "foo", "bar"
//
// The iterator is lazy: lines are trimmed and checked only as the caller
// pulls them, so a big file is never copied into a Vec first.
pub fn meaningful_lines(text: &str) -> impl Iterator<Item = &str> + '_ {
    // str::lines splits on "\n" and also strips a trailing "\r"
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with(COMMENT_MARKER))
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What does `impl Iterator<Item = &str> + '_` mean?
//    - "some iterator type yielding string slices"; we don't have to name it
//    - '_ says the iterator borrows from `text` and cannot outlive it
//
// 2. Why str::trim instead of |l| l.trim()?
//    - Same thing; a function path can be passed wherever a closure is expected
// -----------------------------------------------------------------------------
