//! Integration tests that drive the pdfline binary.

mod fixtures;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

struct Fixture {
    dir: TempDir,
    pdf: PathBuf,
    cache: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let pdf = dir.path().join("sample.pdf");
        fixtures::write_sample(&pdf);
        let cache = dir.path().join("pdf_index.bin");
        Self { dir, pdf, cache }
    }
}

/// Run pdfline with an isolated home, a private cache and the given stdin
fn run_pdfline(fixture: &Fixture, args: &[&str], stdin: &str) -> Output {
    let home = fixture.dir.path().join("home");
    let mut child = Command::new(env!("CARGO_BIN_EXE_pdfline"))
        .arg("--no-color")
        .arg("--cache")
        .arg(&fixture.cache)
        .args(args)
        .current_dir(fixture.dir.path())
        .env("HOME", &home)
        .env("XDG_DATA_HOME", home.join("data"))
        .env_remove("PDFLINE_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to run pdfline");

    child.stdin.take().unwrap().write_all(stdin.as_bytes()).unwrap();
    child.wait_with_output().unwrap()
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn path_arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn test_interactive_session_then_reuse() {
    let fixture = Fixture::new();

    let first = run_pdfline(&fixture, &[path_arg(&fixture.pdf)], "world\nzzz\n");
    assert!(first.status.success());
    let text = stdout_of(&first);
    assert!(text.contains("Indexing PDF..."));
    assert!(text.contains("Page 1, Line 1: Hello world\n"));
    assert!(text.contains("Page 2, Line 1: world peace\n"));
    assert!(text.contains("No matches found.\n"));
    assert!(fixture.cache.exists());

    let second = run_pdfline(&fixture, &[path_arg(&fixture.pdf)], "Bar\n");
    assert!(second.status.success());
    let text = stdout_of(&second);
    assert!(text.contains("Using saved index..."));
    assert!(!text.contains("Indexing PDF..."));
    assert!(text.contains("Page 2, Line 2: Bar none\n"));
}

#[test]
fn test_prompts_for_path() {
    let fixture = Fixture::new();
    let stdin = format!("{}\npeace\n", fixture.pdf.display());

    let output = run_pdfline(&fixture, &[], &stdin);
    assert!(output.status.success());
    let text = stdout_of(&output);
    assert!(text.starts_with("Enter PDF file path: "));
    assert!(text.contains("Enter search term: "));
    assert!(text.contains("Page 2, Line 1: world peace\n"));
}

#[test]
fn test_one_shot_json_search() {
    let fixture = Fixture::new();

    let output = run_pdfline(&fixture, &["search", path_arg(&fixture.pdf), "world", "--json"], "");
    assert!(output.status.success());

    let rows: Vec<serde_json::Value> = stdout_of(&output)
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["page"], 1);
    assert_eq!(rows[0]["text"], "Hello world");
    assert_eq!(rows[1]["page"], 2);
    assert_eq!(rows[1]["match_start"], 0);
}

#[test]
fn test_json_search_without_hits() {
    let fixture = Fixture::new();

    let output = run_pdfline(&fixture, &["search", path_arg(&fixture.pdf), "zzz", "--json"], "");
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("No matches found."));
}

#[test]
fn test_search_lines_inside_one_text_block() {
    let fixture = Fixture::new();
    fixtures::write_flowing_sample(&fixture.pdf);

    let output = run_pdfline(&fixture, &["search", path_arg(&fixture.pdf), "line"], "");
    assert!(output.status.success());
    let text = stdout_of(&output);
    assert!(text.contains("Page 1, Line 3: Third line\n"));
    assert!(text.contains("Page 2, Line 3: last line\n"));
}

#[test]
fn test_index_stats_clear() {
    let fixture = Fixture::new();

    let indexed = run_pdfline(&fixture, &["index", path_arg(&fixture.pdf)], "");
    assert!(indexed.status.success());
    assert!(stdout_of(&indexed).contains("Indexed 4 lines from 2 pages"));

    let again = run_pdfline(&fixture, &["index", path_arg(&fixture.pdf)], "");
    assert!(stdout_of(&again).contains("Index is up to date"));

    let stats = run_pdfline(&fixture, &["stats"], "");
    let text = stdout_of(&stats);
    assert!(text.contains("Lines:            4"));
    assert!(text.contains("Pages with text:  2"));

    let cleared = run_pdfline(&fixture, &["clear"], "");
    assert!(stdout_of(&cleared).contains("Removed cache artifact"));
    assert!(!fixture.cache.exists());
}

#[test]
fn test_missing_document_fails() {
    let fixture = Fixture::new();
    let missing = fixture.dir.path().join("missing.pdf");

    let output = run_pdfline(&fixture, &["search", path_arg(&missing), "x"], "");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("missing.pdf"));
    assert!(!fixture.cache.exists());
}

#[test]
fn test_corrupt_cache_needs_opt_in() {
    let fixture = Fixture::new();
    std::fs::write(&fixture.cache, b"not an index").unwrap();

    let strict = run_pdfline(&fixture, &["search", path_arg(&fixture.pdf), "world"], "");
    assert!(!strict.status.success());

    let lenient = run_pdfline(
        &fixture,
        &["--rebuild-on-corrupt", "search", path_arg(&fixture.pdf), "world"],
        "",
    );
    assert!(lenient.status.success());
    assert!(stdout_of(&lenient).contains("Page 1, Line 1: Hello world"));
}
