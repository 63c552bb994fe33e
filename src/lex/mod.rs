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

//! Lexical classification of C source text.
//!
//! Searching C source for an identifier is not a substring problem: `tmp`
//! must not match `tmpname`, a mention inside a comment, or the contents of a
//! string literal.  This module implements the lexical phase that makes those
//! distinctions.  A [Scanner] labels a raw byte stream with [Event]s:
//! completed identifiers, the `.` and `->` connectors that join identifiers
//! into member-access chains, complete comment and string bodies, physical
//! line boundaries, and a catch-all [Event::Other] for everything that ends a
//! chain.  Consumers pick the events they care about; [chain] builds
//! member-access chains from words and connectors, ignoring comments (which
//! are transparent to chains) and line boundaries (chains may span lines).
//!
//! The scanner is deliberately not a C tokenizer.  It has no notion of
//! numbers, operators, or preprocessor directives; everything that is not an
//! identifier, connector, comment, or string is classified as `Other`.  One
//! consequence inherited from the traditional behavior is that a `-` not
//! followed by `>` vanishes entirely, so `a-.b` accumulates the chain `a.b`.

pub mod chain;

use std::collections::VecDeque;
use std::mem;

/// A classified lexical unit, emitted once the unit is complete.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// A completed identifier.
    Word(Word),

    /// A `.` or `->` joining two identifiers into a chain.
    Connector(&'static str),

    /// A byte with no lexical interest.  Ends any chain in progress.
    Other,

    /// A complete `/* ... */` comment body, delimiters excluded.  Comments do
    /// not end chains.
    Comment(Body),

    /// A complete double-quoted string body, quotes excluded.  An unescaped
    /// newline also completes a string.  Strings end chains.
    Str(Body),

    /// A physical line boundary, carrying the raw bytes of the line just
    /// finished (line terminator excluded).
    Line(Line),
}

/// A completed identifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Word {
    /// The identifier itself.  Identifiers are ASCII by construction.
    pub text: String,

    /// 1-based line number the identifier appeared on.
    pub line: u32,

    /// Byte offset of the identifier within its line.
    pub start: usize,
}

/// A completed comment or string body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Body {
    /// The body bytes, verbatim.  Comment bodies may contain newlines.
    pub text: Vec<u8>,

    /// 1-based line number the body was completed on.
    pub line: u32,
}

/// A completed physical line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Line {
    /// 1-based line number.
    pub number: u32,

    /// The raw bytes of the line, line terminator excluded.
    pub text: Vec<u8>,

    /// False only for a final line not terminated by a newline.
    pub newline: bool,
}

/// Lexical state.  `Backslash` remembers the state to resume once the escaped
/// byte has been consumed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum State {
    Start,
    SlashSeen,
    Comment,
    StarSeen,
    Backslash(Resume),
    DoubleQuoted,
    SingleQuoted,
    InToken,
    MinusSeen,
}

/// The states a `\` escape can occur in and return to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Resume {
    Start,
    DoubleQuoted,
    SingleQuoted,
}

/// A one-pass scanner over a byte buffer.
///
/// Construct one per input; the event sequence is finite and the scanner is
/// not restartable.  All internal buffers grow as needed, so line length and
/// chain length are unbounded.
pub struct Scanner<'a> {
    input: &'a [u8],
    state: State,
    line: Vec<u8>,
    line_number: u32,
    token_start: usize,
    body: Vec<u8>,
    pending: VecDeque<Event>,
    done: bool,
}

impl<'a> Scanner<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            state: State::Start,
            line: Vec::new(),
            line_number: 1,
            token_start: 0,
            body: Vec::new(),
            pending: VecDeque::with_capacity(2),
            done: false,
        }
    }

    fn emit(&mut self, event: Event) {
        self.pending.push_back(event);
    }

    /// Runs the state machine over one input byte.  The byte has not yet been
    /// appended to the line buffer, so `self.line.len()` is the byte's offset
    /// within the current line.
    ///
    /// Several transitions hand the byte back to another state for
    /// reprocessing; those loop instead of returning.
    fn feed(&mut self, c: u8) {
        loop {
            match self.state {
                State::Start => {
                    match c {
                        b'.' => self.emit(Event::Connector(".")),
                        b'-' => self.state = State::MinusSeen,
                        b'/' => self.state = State::SlashSeen,
                        b'\\' => self.state = State::Backslash(Resume::Start),
                        b'"' => {
                            self.body.clear();
                            self.state = State::DoubleQuoted;
                        }
                        b'\'' => self.state = State::SingleQuoted,
                        c if c.is_ascii_alphabetic() => {
                            self.token_start = self.line.len();
                            self.state = State::InToken;
                        }
                        c if c.is_ascii_whitespace() => (),
                        _ => self.emit(Event::Other),
                    }
                    return;
                }
                State::MinusSeen => {
                    self.state = State::Start;
                    if c == b'>' {
                        self.emit(Event::Connector("->"));
                        return;
                    }
                    // The dash itself emits nothing.
                    continue;
                }
                State::InToken => {
                    if c.is_ascii_alphanumeric() || c == b'_' {
                        return;
                    }
                    let text = String::from_utf8_lossy(&self.line[self.token_start..]).into_owned();
                    self.emit(Event::Word(Word {
                        text,
                        line: self.line_number,
                        start: self.token_start,
                    }));
                    self.state = State::Start;
                    continue;
                }
                State::SlashSeen => {
                    if c == b'*' {
                        self.body.clear();
                        self.state = State::Comment;
                        return;
                    }
                    // The slash emits nothing either.
                    self.state = State::Start;
                    continue;
                }
                State::Comment => {
                    if c == b'*' {
                        self.state = State::StarSeen;
                    } else {
                        self.body.push(c);
                    }
                    return;
                }
                State::StarSeen => {
                    if c == b'/' {
                        let text = mem::take(&mut self.body);
                        self.emit(Event::Comment(Body {
                            text,
                            line: self.line_number,
                        }));
                        self.state = State::Start;
                        return;
                    }
                    // Not the end after all: the star was part of the body.
                    self.body.push(b'*');
                    self.state = State::Comment;
                    continue;
                }
                State::Backslash(resume) => {
                    match resume {
                        Resume::Start => self.state = State::Start,
                        Resume::DoubleQuoted => {
                            self.body.push(c);
                            self.state = State::DoubleQuoted;
                        }
                        Resume::SingleQuoted => self.state = State::SingleQuoted,
                    }
                    return;
                }
                State::DoubleQuoted => {
                    match c {
                        b'"' | b'\n' => {
                            let text = mem::take(&mut self.body);
                            self.emit(Event::Str(Body {
                                text,
                                line: self.line_number,
                            }));
                            self.state = State::Start;
                        }
                        b'\\' => {
                            self.body.push(c);
                            self.state = State::Backslash(Resume::DoubleQuoted);
                        }
                        _ => self.body.push(c),
                    }
                    return;
                }
                State::SingleQuoted => {
                    match c {
                        b'\'' | b'\n' => {
                            // Character constants are never reported, but
                            // completing one still ends any chain.
                            self.emit(Event::Other);
                            self.state = State::Start;
                        }
                        b'\\' => self.state = State::Backslash(Resume::SingleQuoted),
                        _ => (),
                    }
                    return;
                }
            }
        }
    }
}

impl Iterator for Scanner<'_> {
    type Item = Event;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Some(event);
            }

            let Some((&c, rest)) = self.input.split_first() else {
                if self.done {
                    return None;
                }
                self.done = true;

                // End of input in any state other than `Start` drops the
                // dangling token, comment, or string, but a nonempty final
                // line is still a line.
                if !self.line.is_empty() {
                    let text = mem::take(&mut self.line);
                    self.emit(Event::Line(Line {
                        number: self.line_number,
                        text,
                        newline: false,
                    }));
                }
                continue;
            };
            self.input = rest;

            self.feed(c);

            // Every newline byte counts as a line boundary, whatever the
            // lexical state; escapes and comments only affect classification.
            if c == b'\n' {
                let text = mem::take(&mut self.line);
                self.emit(Event::Line(Line {
                    number: self.line_number,
                    text,
                    newline: true,
                }));
                self.line_number += 1;
            } else {
                self.line.push(c);
            }
        }
    }
}
