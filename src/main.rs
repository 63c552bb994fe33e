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

use std::env;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{self, Command};

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use tempfile::NamedTempFile;

use cgrep::annotate::{write_records, Annotator, Disposition};
use cgrep::engine::{Engine, Mode};
use cgrep::pattern::Pattern;
use cgrep::report::{MatchRecord, Reporter};

/// Search C source for identifiers and member-access chains that match an
/// egrep-style pattern.
///
/// The pattern is matched against whole lexical tokens, never against text
/// inside comments or string literals: `cgrep tmp *.c` finds the identifier
/// `tmp` but not `tmpname`.  The pattern is implicitly wrapped in `^(...)$`,
/// so `reg*` does not match `register` (`reg.*` does).  Identifiers joined by
/// `.` or `->` accumulate into chains, and every trailing suffix of a chain
/// is tested: `cgrep 'memb\.val' x.c` finds `ptr->memb.val`, even when the
/// chain is split across lines by spaces or comments.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// List the names of files with matches, not the matching lines.
    #[arg(short = 'l')]
    list_files: bool,

    /// Prefix each reported line with its line number.
    #[arg(short = 'n')]
    line_numbers: bool,

    /// Report every string literal; no pattern is taken.
    #[arg(short = 's', conflicts_with = "comments")]
    strings: bool,

    /// Report every comment; no pattern is taken.
    #[arg(short = 'c')]
    comments: bool,

    /// Hand matches to the editor as an error list instead of printing them.
    #[arg(short = 'A')]
    annotate: bool,

    /// Replace every identifier matching the pattern with NEW.
    ///
    /// Replacement works on simple identifiers only, not chains.  A named
    /// file is rewritten in place only if something matched; with standard
    /// input the rewritten text is written to standard output.
    #[arg(
        short = 'r',
        value_name = "NEW",
        conflicts_with_all = ["list_files", "line_numbers", "strings", "comments", "annotate"]
    )]
    replacement: Option<String>,

    /// Pattern (omitted under -s or -c), then input files.
    ///
    /// With no files, standard input is read.
    #[arg(value_name = "PATTERN | FILE")]
    args: Vec<String>,
}

impl Cli {
    fn run(self) -> Result<()> {
        let mut positionals = self.args.into_iter();
        let pattern = if self.strings || self.comments {
            None
        } else {
            let raw = positionals
                .next()
                .ok_or_else(|| anyhow!("a pattern is required unless -s or -c is given"))?;
            Some(Pattern::new(&raw)?)
        };
        let files: Vec<PathBuf> = positionals.map(PathBuf::from).collect();
        if (self.annotate || self.list_files) && files.is_empty() {
            bail!("-A and -l require a file name");
        }

        let mode = match (&self.replacement, &pattern) {
            (Some(replacement), Some(pattern)) => Mode::Replace {
                pattern,
                replacement: replacement.as_str(),
            },
            (None, _) if self.strings => Mode::Strings,
            (None, _) if self.comments => Mode::Comments,
            (None, Some(pattern)) => Mode::Match(pattern),
            (Some(_), None) => unreachable!("-r conflicts with -s and -c"),
            (None, None) => unreachable!("no pattern implies -s or -c"),
        };

        let mut annotator = self.annotate.then(EditorAnnotator::from_env);
        let annotator = annotator
            .as_mut()
            .map(|annotator| annotator as &mut dyn Annotator);

        let stdout = io::stdout();
        let reporter = Reporter::new(stdout.lock(), self.line_numbers);
        Engine::new(mode, self.list_files, reporter, annotator).run(&files)
    }
}

/// Hands each file's match list to an editor, in the style of a compiler
/// error list: the editor is run with the hand-off file and the source file
/// as its final two arguments and the scan of further files waits for it to
/// exit.  An unsuccessful exit status means the user is done.
struct EditorAnnotator {
    command: Vec<String>,
}

impl EditorAnnotator {
    /// The editor command comes from `CGREP_EDITOR` (split on whitespace),
    /// falling back to `emacs -e`.
    fn from_env() -> Self {
        let command = env::var("CGREP_EDITOR")
            .ok()
            .map(|value| value.split_whitespace().map(String::from).collect())
            .filter(|command: &Vec<String>| !command.is_empty())
            .unwrap_or_else(|| vec!["emacs".into(), "-e".into()]);
        Self { command }
    }
}

impl Annotator for EditorAnnotator {
    fn notify(&mut self, file: &Path, records: &[MatchRecord]) -> Result<Disposition> {
        let mut temp = NamedTempFile::new().context("cannot create hand-off file")?;
        write_records(&mut temp, file, records).context("cannot write hand-off file")?;
        temp.flush().context("cannot write hand-off file")?;

        let status = Command::new(&self.command[0])
            .args(&self.command[1..])
            .arg(temp.path())
            .arg(file)
            .status()
            .with_context(|| format!("cannot run {}", self.command[0]))?;
        Ok(if status.success() {
            Disposition::Continue
        } else {
            Disposition::Stop
        })
    }
}

fn main() -> Result<()> {
    let cli = Cli::try_parse().unwrap_or_else(|error| {
        // Usage errors exit with status 1; --help and --version are not
        // errors.
        let code = if error.use_stderr() { 1 } else { 0 };
        let _ = error.print();
        process::exit(code);
    });
    cli.run()
}
