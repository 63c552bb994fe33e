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

//! The per-file drive loop.
//!
//! An [Engine] scans each input in command-line order, feeding the scanner's
//! events to whichever consumer the mode calls for: the chain accumulator
//! for pattern matching, the body events for comment/string reporting, or
//! the rewriter for replacement.  Scanner and chain state are constructed
//! fresh for every file; nothing accumulated in one file can leak into the
//! next.
//!
//! Reporting semantics differ by mode.  Default reporting sets a flag when
//! any suffix matches and prints the enclosing physical line once, at its
//! boundary, so a chain split across lines is attributed to its last line.
//! Editor-integration reporting instead collects a record per matching
//! suffix, attributed to that suffix's own first line, and hands the batch
//! to the [Annotator] after the file's scan.  List mode prints the filename
//! at the first flagged line and abandons the rest of the file.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::NamedTempFile;

use crate::annotate::{Annotator, Disposition};
use crate::lex::chain::Chain;
use crate::lex::{Body, Event, Scanner};
use crate::pattern::Pattern;
use crate::replace::rewrite;
use crate::report::{MatchRecord, Reporter};

/// What to do with each input.
#[derive(Copy, Clone, Debug)]
pub enum Mode<'a> {
    /// Report lines containing an identifier or chain suffix that matches
    /// the pattern.
    Match(&'a Pattern),

    /// Report every complete double-quoted string body; no pattern.
    Strings,

    /// Report every complete comment body; no pattern.
    Comments,

    /// Rewrite identifiers matching the pattern.
    Replace {
        pattern: &'a Pattern,
        replacement: &'a str,
    },
}

pub struct Engine<'a, W: Write> {
    mode: Mode<'a>,
    list_files: bool,
    reporter: Reporter<W>,
    annotator: Option<&'a mut dyn Annotator>,
}

impl<'a, W: Write> Engine<'a, W> {
    pub fn new(
        mode: Mode<'a>,
        list_files: bool,
        reporter: Reporter<W>,
        annotator: Option<&'a mut dyn Annotator>,
    ) -> Self {
        Self {
            mode,
            list_files,
            reporter,
            annotator,
        }
    }

    /// Processes the named files in order, or standard input if `files` is
    /// empty.  A file that cannot be read gets a warning and is skipped.
    pub fn run(&mut self, files: &[PathBuf]) -> Result<()> {
        if files.is_empty() {
            let mut input = Vec::new();
            io::stdin()
                .lock()
                .read_to_end(&mut input)
                .context("cannot read standard input")?;
            match self.mode {
                Mode::Replace {
                    pattern,
                    replacement,
                } => {
                    // With no named file the rewritten stream always goes to
                    // standard output, changed or not.
                    let stdout = io::stdout();
                    rewrite(&input, pattern, replacement.as_bytes(), stdout.lock())
                        .context("cannot write standard output")?;
                }
                _ => {
                    self.search(&input, None)?;
                }
            }
            return Ok(());
        }

        let show_names = files.len() > 1;
        for path in files {
            let input = match fs::read(path) {
                Ok(input) => input,
                Err(error) => {
                    eprintln!("cgrep: warning: cannot open {}: {error}", path.display());
                    continue;
                }
            };
            match self.mode {
                Mode::Replace {
                    pattern,
                    replacement,
                } => self.replace_file(path, &input, pattern, replacement)?,
                _ => {
                    self.reporter
                        .set_file_name(show_names.then(|| path.display().to_string()));
                    if self.search(&input, Some(path))? == Disposition::Stop {
                        break;
                    }
                }
            }
        }
        Ok(())
    }

    /// Scans one input in a reporting mode.  `path` is `None` for standard
    /// input.
    pub fn search(&mut self, input: &[u8], path: Option<&Path>) -> Result<Disposition> {
        let mut chain = Chain::new();
        let mut records: Vec<MatchRecord> = Vec::new();
        let mut marked = false;

        for event in Scanner::new(input) {
            match self.mode {
                Mode::Match(pattern) => {
                    let hits = chain.consume(&event, pattern);
                    if self.annotator.is_some() {
                        records.extend(hits);
                    } else if !hits.is_empty() {
                        marked = true;
                    }
                }
                Mode::Strings => {
                    if let Event::Str(body) = &event {
                        self.emit_body(body, &mut records)?;
                    }
                }
                Mode::Comments => {
                    if let Event::Comment(body) = &event {
                        self.emit_body(body, &mut records)?;
                    }
                }
                Mode::Replace { .. } => unreachable!("replace mode does not search"),
            }

            if let Event::Line(line) = &event {
                if marked {
                    marked = false;
                    if self.list_files {
                        if let Some(path) = path {
                            self.reporter.file_name_only(path)?;
                        }
                        return Ok(Disposition::Continue);
                    }
                    self.reporter.report(line.number, &line.text)?;
                }
            }
        }

        if let (Some(annotator), Some(path)) = (self.annotator.as_deref_mut(), path) {
            if !records.is_empty() {
                return annotator.notify(path, &records);
            }
        }
        Ok(Disposition::Continue)
    }

    /// Routes a comment or string body to the annotator or the reporter.
    fn emit_body(&mut self, body: &Body, records: &mut Vec<MatchRecord>) -> Result<()> {
        if self.annotator.is_some() {
            records.push(MatchRecord {
                text: String::from_utf8_lossy(&body.text).into_owned(),
                line: body.line,
            });
        } else {
            self.reporter.report(body.line, &body.text)?;
        }
        Ok(())
    }

    /// Rewrites one named file through a temporary in the same directory.
    /// The temporary replaces the original only if something was rewritten;
    /// otherwise it is discarded and the original is left untouched.
    fn replace_file(
        &self,
        path: &Path,
        input: &[u8],
        pattern: &Pattern,
        replacement: &str,
    ) -> Result<()> {
        let directory = path
            .parent()
            .filter(|directory| !directory.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let mut temp = NamedTempFile::new_in(directory).with_context(|| {
            format!("cannot create temporary file in {}", directory.display())
        })?;
        let changed = rewrite(
            input,
            pattern,
            replacement.as_bytes(),
            io::BufWriter::new(&mut temp),
        )
        .with_context(|| format!("cannot rewrite {}", path.display()))?;
        if changed {
            temp.persist(path)
                .map_err(|error| error.error)
                .with_context(|| format!("cannot replace {}", path.display()))?;
        }
        Ok(())
    }

    pub fn into_output(self) -> W {
        self.reporter.into_inner()
    }
}
