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

//! Editor integration.
//!
//! Under `-A`, matches are not printed.  Instead, each file's match records
//! are handed to an [Annotator] once the file has been scanned, in the style
//! of a compiler's error list: one record per matching suffix, attributed to
//! the line of the suffix's own first identifier, so that an editor script
//! can visit every hit on a line in order.  The scanning core only knows this
//! trait; the process-spawning implementation lives in the binary.

use std::io::{self, Write};
use std::path::Path;

use anyhow::Result;

use crate::report::MatchRecord;

/// What to do after an [Annotator] has seen one file's matches.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Disposition {
    /// Go on to the next file.
    Continue,

    /// The user is done; skip the remaining files.
    Stop,
}

/// A consumer for one file's accumulated match records.  Called once per
/// scanned file that produced at least one record.
pub trait Annotator {
    fn notify(&mut self, file: &Path, records: &[MatchRecord]) -> Result<Disposition>;
}

/// Writes `records` in the hand-off format, one line per record:
/// `<line>: <filename>: found '<text>'`.
pub fn write_records<W: Write>(
    mut out: W,
    file: &Path,
    records: &[MatchRecord],
) -> io::Result<()> {
    for record in records {
        writeln!(
            out,
            "{}: {}: found '{}'",
            record.line,
            file.display(),
            record.text
        )?;
    }
    Ok(())
}
