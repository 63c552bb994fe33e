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

//! Token replacement.
//!
//! Replace mode rewrites standalone identifiers that match the pattern;
//! chains are not accumulated, so `ptr->val` can only be rewritten one
//! identifier at a time.  Everything that is not a matched identifier is
//! copied verbatim, byte for byte: when nothing matches, the output is
//! identical to the input.  The caller decides what to do with the rewritten
//! stream (replace the original file, or write standard output).

use std::io::{self, Write};

use crate::lex::Event;
use crate::pattern::Pattern;

/// A matched identifier's place within the current line.
#[derive(Copy, Clone, Debug)]
struct Span {
    start: usize,
    len: usize,
}

/// Rewrites one scan's worth of events into `out`.
pub struct Rewriter<'a, W: Write> {
    pattern: &'a Pattern,
    replacement: &'a [u8],
    out: W,
    spans: Vec<Span>,
    changed: bool,
}

impl<'a, W: Write> Rewriter<'a, W> {
    pub fn new(pattern: &'a Pattern, replacement: &'a [u8], out: W) -> Self {
        Self {
            pattern,
            replacement,
            out,
            spans: Vec::new(),
            changed: false,
        }
    }

    pub fn consume(&mut self, event: &Event) -> io::Result<()> {
        match event {
            Event::Word(word) if self.pattern.matches(word.text.as_bytes()) => {
                self.spans.push(Span {
                    start: word.start,
                    len: word.text.len(),
                });
                self.changed = true;
            }
            Event::Line(line) => {
                // Spans are in increasing order and never overlap.
                let mut copied = 0;
                for span in self.spans.drain(..) {
                    self.out.write_all(&line.text[copied..span.start])?;
                    self.out.write_all(self.replacement)?;
                    copied = span.start + span.len;
                }
                self.out.write_all(&line.text[copied..])?;
                if line.newline {
                    self.out.write_all(b"\n")?;
                }
            }
            _ => (),
        }
        Ok(())
    }

    /// Flushes the output and reports whether any identifier was replaced.
    pub fn finish(mut self) -> io::Result<bool> {
        self.out.flush()?;
        Ok(self.changed)
    }
}

/// Rewrites `input` into `out`, replacing every standalone identifier that
/// matches `pattern` with `replacement`.  Returns whether anything changed.
pub fn rewrite<W: Write>(
    input: &[u8],
    pattern: &Pattern,
    replacement: &[u8],
    out: W,
) -> io::Result<bool> {
    let mut rewriter = Rewriter::new(pattern, replacement, out);
    for event in crate::lex::Scanner::new(input) {
        rewriter.consume(&event)?;
    }
    rewriter.finish()
}
