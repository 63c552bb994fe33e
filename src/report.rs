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

//! Result formatting.
//!
//! All reporting goes through a [Reporter]: matched lines, comment bodies,
//! and string bodies use the same `file: line: text` shape, so presentation
//! stays out of the scanning code.  The filename prefix appears only when
//! more than one input file was named; the line-number prefix only under
//! `-n`.

use std::io::{self, Write};
use std::path::Path;

/// One matching suffix (or, for comment/string reporting, one body).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchRecord {
    /// The matched text.
    pub text: String,

    /// The line the matched suffix's first identifier appeared on.  Default
    /// reporting does not use this; it attributes a hit to the physical line
    /// being flushed.  Editor-integration reporting uses it verbatim.
    pub line: u32,
}

pub struct Reporter<W: Write> {
    out: W,
    file_name: Option<String>,
    line_numbers: bool,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W, line_numbers: bool) -> Self {
        Self {
            out,
            file_name: None,
            line_numbers,
        }
    }

    /// Sets or clears the filename prefix for subsequent reports.
    pub fn set_file_name(&mut self, file_name: Option<String>) {
        self.file_name = file_name;
    }

    /// Reports one line's worth of text: a matched physical line, a comment
    /// body, or a string body.
    pub fn report(&mut self, line: u32, text: &[u8]) -> io::Result<()> {
        if let Some(file_name) = &self.file_name {
            write!(self.out, "{file_name}: ")?;
        }
        if self.line_numbers {
            write!(self.out, "{line:4}: ")?;
        }
        self.out.write_all(text)?;
        self.out.write_all(b"\n")
    }

    /// Reports just a filename, for list mode.
    pub fn file_name_only(&mut self, path: &Path) -> io::Result<()> {
        writeln!(self.out, "{}", path.display())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
