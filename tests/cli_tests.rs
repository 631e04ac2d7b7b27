//! CLI tests: index a source file with cdex-index, query the database
//! with cdex-query, assert on the exact output lines.

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

use tempfile::TempDir;

fn index_bin() -> &'static str {
    env!("CARGO_BIN_EXE_cdex-index")
}

fn query_bin() -> &'static str {
    env!("CARGO_BIN_EXE_cdex-query")
}

fn run(bin: &str, args: &[&str]) -> Output {
    Command::new(bin)
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("failed to execute {}: {}", bin, e))
}

struct Fixture {
    _dir: TempDir,
    src: PathBuf,
    db: PathBuf,
}

impl Fixture {
    /// Write `source` to a temp `.c` file and index it.
    fn indexed(source: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("test.c");
        let db = dir.path().join("cf.db");
        fs::write(&src, source).unwrap();

        let output = run(
            index_bin(),
            &["-o", db.to_str().unwrap(), src.to_str().unwrap()],
        );
        assert!(
            output.status.success(),
            "cdex-index failed\nstdout: {}\nstderr: {}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );

        Fixture {
            _dir: dir,
            src,
            db,
        }
    }

    fn query(&self, command: &str) -> Output {
        run(
            query_bin(),
            &["-c", command, self.db.to_str().unwrap()],
        )
    }

    /// The path the indexer stored: the canonicalized source path.
    fn stored_path(&self) -> String {
        fs::canonicalize(&self.src)
            .unwrap()
            .to_string_lossy()
            .into_owned()
    }
}

#[test]
fn typedecl_by_elaborated_name() {
    let fx = Fixture::indexed("struct foo { int a; };\n");
    let output = fx.query("td struct foo");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout, format!("1 struct at {}:1:1\n", fx.stored_path()));
}

#[test]
fn typedecl_by_bare_name() {
    let fx = Fixture::indexed("typedef struct { int a; } foo_t;\n");
    let output = fx.query("td foo_t");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout, format!("1 struct at {}:1:9\n", fx.stored_path()));
}

#[test]
fn typedecl_by_id() {
    let fx = Fixture::indexed("union u { int i; };\n");
    let output = fx.query("typedecl 1");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout, format!("1 union at {}:1:1\n", fx.stored_path()));
}

#[test]
fn typename_lists_matches() {
    let fx = Fixture::indexed("struct foo { int a; };\ntypedef struct foo foo;\n");
    let output = fx.query("tn foo");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let path = fx.stored_path();
    assert_eq!(
        stdout,
        format!("1 'foo' at {path}:1:1\n1 'foo' at {path}:2:20\n")
    );
}

#[test]
fn typename_supports_wildcards() {
    let fx = Fixture::indexed("typedef struct { int a; } foo_t;\ntypedef struct { int b; } bar_t;\n");
    let output = fx.query("tn %_t");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("'foo_t'"));
    assert!(stdout.contains("'bar_t'"));
}

#[test]
fn memberdecl_prints_member_site() {
    let fx = Fixture::indexed("struct foo { int a; };\n");
    let output = fx.query("md struct foo a");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(
        stdout,
        format!("1.'a', type 0, at {}:1:14\n", fx.stored_path())
    );
}

#[test]
fn memberdecl_with_aggregate_member_type() {
    let fx = Fixture::indexed("struct inner { int a; };\nstruct outer { struct inner i; };\n");
    let output = fx.query("md struct outer i");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(
        stdout,
        format!("2.'i', type 1, at {}:2:16\n", fx.stored_path())
    );
}

#[test]
fn missing_type_reports_no_match() {
    let fx = Fixture::indexed("struct foo { int a; };\n");
    let output = fx.query("td struct missing");

    assert!(!output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout, "no matching type\n");
}

#[test]
fn ambiguous_name_lists_candidates() {
    // the same typedef name bound to two different types in two files
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("cf.db");
    for (name, source) in [
        ("a.c", "typedef struct { int x; } twin;\n"),
        ("b.c", "typedef struct { int y; } twin;\n"),
    ] {
        let src = dir.path().join(name);
        fs::write(&src, source).unwrap();
        let output = run(
            index_bin(),
            &["-o", db.to_str().unwrap(), src.to_str().unwrap()],
        );
        assert!(output.status.success());
    }

    let output = run(query_bin(), &["-c", "td twin", db.to_str().unwrap()]);
    assert!(!output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("ambiguous typename\n"));
    assert_eq!(stdout.matches("'twin'").count(), 2);
}

#[test]
fn dry_run_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("test.c");
    fs::write(&src, "struct foo { int a; };\n").unwrap();

    let output = run(index_bin(), &["-n", src.to_str().unwrap()]);
    assert!(output.status.success());
    assert!(!dir.path().join("cf.db").exists());
}

#[test]
fn usage_errors_exit_64() {
    let output = run(index_bin(), &[]);
    assert_eq!(output.status.code(), Some(64), "missing input file");

    let output = run(query_bin(), &[]);
    assert_eq!(output.status.code(), Some(64), "missing database file");

    let output = run(query_bin(), &["--bogus", "x.db"]);
    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn interactive_mode_is_unavailable() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("cf.db");
    fs::write(dir.path().join("test.c"), "struct foo { int a; };\n").unwrap();
    let output = run(
        index_bin(),
        &[
            "-o",
            db.to_str().unwrap(),
            dir.path().join("test.c").to_str().unwrap(),
        ],
    );
    assert!(output.status.success());

    let output = run(query_bin(), &["-i", db.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(69));
}

#[test]
fn version_flags_print_tool_version() {
    for bin in [index_bin(), query_bin()] {
        let output = run(bin, &["--version"]);
        assert!(output.status.success());
        let stdout = String::from_utf8(output.stdout).unwrap();
        assert!(stdout.starts_with("cdex "), "got: {}", stdout);
    }
}

#[test]
fn help_flags_print_usage() {
    for bin in [index_bin(), query_bin()] {
        let output = run(bin, &["-h"]);
        assert!(output.status.success());
        let stdout = String::from_utf8(output.stdout).unwrap();
        assert!(stdout.contains("Usage:"));
    }
}

#[test]
fn query_rejects_malformed_commands() {
    let fx = Fixture::indexed("struct foo { int a; };\n");
    for bad in ["", "frobnicate foo", "td struct", "md foo"] {
        let output = fx.query(bad);
        assert!(
            !output.status.success(),
            "command '{}' should have failed",
            bad
        );
    }
}

#[test]
fn default_database_path_is_cf_db() {
    // run the indexer with no -o from inside a temp dir
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("test.c");
    fs::write(&src, "struct foo { int a; };\n").unwrap();

    let output = Command::new(index_bin())
        .current_dir(dir.path())
        .arg("test.c")
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(dir.path().join("cf.db").exists());
}
