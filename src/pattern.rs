// Cgrep - an identifier-aware egrep for C source.
// Copyright (C) 2025 Free Software Foundation, Inc.
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, either version 3 of the License, or (at your option) any later
// version.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE.  See the GNU General Public License for more
// details.
//
// You should have received a copy of the GNU General Public License along with
// this program.  If not, see <http://www.gnu.org/licenses/>.

//! Anchored whole-token pattern matching.
//!
//! A [Pattern] is the user's egrep-style pattern wrapped in `^(...)$`, so that
//! a candidate matches only if the pattern covers all of it.  `tmp` therefore
//! matches the token `tmp` but not `tmpname`, and `reg*` does not match
//! `register` (although `reg.*` does).  Candidates are byte strings because
//! input files are processed as raw bytes end to end.

use regex::bytes::Regex;
use thiserror::Error as ThisError;

/// A malformed user pattern.
#[derive(ThisError, Debug)]
#[error("invalid pattern {pattern:?}: {source}")]
pub struct InvalidPattern {
    pattern: String,
    source: regex::Error,
}

/// A compiled pattern.  Stateless and reentrant: one compiled pattern is
/// tested against every suffix of every chain, so [Pattern::matches] performs
/// no per-call allocation of its own.
#[derive(Clone, Debug)]
pub struct Pattern {
    regex: Regex,
}

impl Pattern {
    pub fn new(pattern: &str) -> Result<Self, InvalidPattern> {
        let regex = Regex::new(&format!("^(?:{pattern})$")).map_err(|source| InvalidPattern {
            pattern: pattern.into(),
            source,
        })?;
        Ok(Self { regex })
    }

    /// Whether `text`, taken as a whole, matches the pattern.
    pub fn matches(&self, text: &[u8]) -> bool {
        self.regex.is_match(text)
    }
}

#[cfg(test)]
mod tests {
    use super::Pattern;

    #[test]
    fn whole_token_only() {
        let pattern = Pattern::new("tmp").unwrap();
        assert!(pattern.matches(b"tmp"));
        assert!(!pattern.matches(b"tmpname"));
        assert!(!pattern.matches(b"mktmp"));
        assert!(!pattern.matches(b""));
    }

    #[test]
    fn alternation_is_contained() {
        // `^(...)$` must wrap the whole alternation, not just its last branch.
        let pattern = Pattern::new("x|abc|d").unwrap();
        assert!(pattern.matches(b"x"));
        assert!(pattern.matches(b"abc"));
        assert!(pattern.matches(b"d"));
        assert!(!pattern.matches(b"xabc"));
        assert!(!pattern.matches(b"ab"));
    }

    #[test]
    fn repetition_applies_to_pattern_not_prefix() {
        let reg_star = Pattern::new("reg*").unwrap();
        assert!(reg_star.matches(b"reg"));
        assert!(reg_star.matches(b"reggg"));
        assert!(!reg_star.matches(b"register"));

        let reg_dot_star = Pattern::new("reg.*").unwrap();
        assert!(reg_dot_star.matches(b"register"));
    }

    #[test]
    fn escaped_dot_matches_chain() {
        let pattern = Pattern::new(r"b\.c").unwrap();
        assert!(pattern.matches(b"b.c"));
        assert!(!pattern.matches(b"bxc"));
    }

    #[test]
    fn malformed_pattern_is_an_error() {
        assert!(Pattern::new("(").is_err());
        assert!(Pattern::new("a[").is_err());
    }
}
