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

//! Member-access chain accumulation.
//!
//! A [Chain] consumes the [Event] stream from a [Scanner](super::Scanner) and
//! accumulates sequences like `ptr->memb.val`, one identifier at a time.
//! Whenever an identifier extends the chain, the pattern is tested against
//! every trailing suffix that starts at an identifier: for `ptr->memb.val`
//! that is `ptr->memb.val`, then `memb.val`, then `val`.  Testing every
//! suffix is what lets a user target a specific member-access tail (`memb.val`
//! hits `ptr->memb.val`) without anchoring the whole chain.
//!
//! Whitespace, comments, and line boundaries are transparent, so a chain may
//! be split across lines by spaces or comments and still accumulate.  Each
//! suffix remembers the line its first identifier appeared on; that line is
//! what editor-integration reporting attributes the match to.

use crate::pattern::Pattern;
use crate::report::MatchRecord;
use smallvec::SmallVec;

use super::Event;

/// Where a tested suffix begins within the chain buffer.
#[derive(Copy, Clone, Debug)]
struct Suffix {
    /// Byte offset of the suffix's first identifier.  Offsets are strictly
    /// increasing: offset 0 is the whole chain, later entries are shorter
    /// trailing suffixes.
    offset: usize,

    /// Line the suffix's first identifier appeared on.
    line: u32,
}

/// How the next event may extend the chain.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum ChainState {
    /// The last event was an identifier; a connector may extend the chain.
    InWord,

    /// The last event was a connector; the next identifier extends the chain.
    InConnector,

    /// Nothing accumulated.
    Idle,
}

/// An accumulator for one file's chains.  Construct one per scan; state must
/// not leak between files.
pub struct Chain {
    buf: String,
    suffixes: SmallVec<[Suffix; 8]>,
    state: ChainState,
}

impl Chain {
    pub fn new() -> Self {
        Self {
            buf: String::new(),
            suffixes: SmallVec::new(),
            state: ChainState::Idle,
        }
    }

    fn reset(&mut self) {
        self.buf.clear();
        self.suffixes.clear();
        self.state = ChainState::Idle;
    }

    /// Feeds one scanner event to the accumulator.  Returns a record for
    /// every suffix that matches `pattern` after this event, longest suffix
    /// first.
    pub fn consume(&mut self, event: &Event, pattern: &Pattern) -> SmallVec<[MatchRecord; 1]> {
        let mut records = SmallVec::new();
        match event {
            Event::Word(word) => {
                match self.state {
                    ChainState::InConnector => {
                        // The connector is already in the buffer; the new
                        // identifier starts a new suffix.
                        self.suffixes.push(Suffix {
                            offset: self.buf.len(),
                            line: word.line,
                        });
                        self.buf.push_str(&word.text);
                    }
                    // Two identifiers with no connector between them: the
                    // second starts a fresh chain.
                    ChainState::InWord | ChainState::Idle => {
                        self.buf.clear();
                        self.buf.push_str(&word.text);
                        self.suffixes.clear();
                        self.suffixes.push(Suffix {
                            offset: 0,
                            line: word.line,
                        });
                    }
                }
                self.state = ChainState::InWord;

                for suffix in &self.suffixes {
                    let text = &self.buf[suffix.offset..];
                    if pattern.matches(text.as_bytes()) {
                        records.push(MatchRecord {
                            text: text.into(),
                            line: suffix.line,
                        });
                    }
                }
            }
            Event::Connector(text) => {
                if self.state == ChainState::InWord {
                    self.buf.push_str(text);
                    self.state = ChainState::InConnector;
                } else {
                    // `.` with nothing to attach to, or `a..b`.
                    self.reset();
                }
            }
            // Completed strings end chains just like any other byte.
            Event::Other | Event::Str(_) => self.reset(),
            // Comments and line boundaries are transparent.
            Event::Comment(_) | Event::Line(_) => (),
        }
        records
    }
}

impl Default for Chain {
    fn default() -> Self {
        Self::new()
    }
}
