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

//! End-to-end runs of the engine over real files.

use std::fs;
use std::path::PathBuf;

use cgrep::engine::{Engine, Mode};
use cgrep::pattern::Pattern;
use cgrep::report::Reporter;

fn run(mode: Mode, list_files: bool, line_numbers: bool, files: &[PathBuf]) -> String {
    let reporter = Reporter::new(Vec::new(), line_numbers);
    let mut engine = Engine::new(mode, list_files, reporter, None);
    engine.run(files).unwrap();
    String::from_utf8(engine.into_output()).unwrap()
}

#[test]
fn file_names_appear_only_with_several_files() {
    let dir = tempfile::tempdir().unwrap();
    let one = dir.path().join("one.c");
    let two = dir.path().join("two.c");
    fs::write(&one, "int tmp;\n").unwrap();
    fs::write(&two, "x = tmp;\nno hit here;\n").unwrap();

    let pattern = Pattern::new("tmp").unwrap();

    let out = run(Mode::Match(&pattern), false, false, &[one.clone()]);
    assert_eq!(out, "int tmp;\n");

    let out = run(
        Mode::Match(&pattern),
        false,
        false,
        &[one.clone(), two.clone()],
    );
    assert_eq!(
        out,
        format!("{}: int tmp;\n{}: x = tmp;\n", one.display(), two.display())
    );
}

#[test]
fn list_mode_names_each_matching_file_once() {
    let dir = tempfile::tempdir().unwrap();
    let hits = dir.path().join("hits.c");
    let quiet = dir.path().join("quiet.c");
    fs::write(&hits, "tmp;\ntmp;\ntmp;\n").unwrap();
    fs::write(&quiet, "none;\n").unwrap();

    let pattern = Pattern::new("tmp").unwrap();
    let out = run(
        Mode::Match(&pattern),
        true,
        false,
        &[hits.clone(), quiet.clone()],
    );
    assert_eq!(out, format!("{}\n", hits.display()));
}

#[test]
fn unreadable_files_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.c");
    let present = dir.path().join("present.c");
    fs::write(&present, "tmp;\n").unwrap();

    let pattern = Pattern::new("tmp").unwrap();
    let out = run(Mode::Match(&pattern), false, false, &[missing, present.clone()]);
    assert_eq!(out, format!("{}: tmp;\n", present.display()));
}

#[test]
fn replace_rewrites_a_file_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("prog.c");
    fs::write(&file, "int tmp;\nchar tmpname;\ntmp = 1;\n").unwrap();

    let pattern = Pattern::new("tmp").unwrap();
    let out = run(
        Mode::Replace {
            pattern: &pattern,
            replacement: "temp",
        },
        false,
        false,
        &[file.clone()],
    );
    assert_eq!(out, "");
    assert_eq!(
        fs::read_to_string(&file).unwrap(),
        "int temp;\nchar tmpname;\ntemp = 1;\n"
    );
}

#[test]
fn replace_without_a_match_leaves_the_file_alone() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("prog.c");
    let original = "int tmp; /* absent */\n";
    fs::write(&file, original).unwrap();

    let pattern = Pattern::new("absent").unwrap();
    run(
        Mode::Replace {
            pattern: &pattern,
            replacement: "anything",
        },
        false,
        false,
        &[file.clone()],
    );
    assert_eq!(fs::read_to_string(&file).unwrap(), original);

    // The temporary was discarded, not left behind.
    let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
}
