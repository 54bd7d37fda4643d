use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write_file(path: &Path, content: impl AsRef<[u8]>) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn combiner() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_file-combiner"));
    cmd.env_remove("RUST_LOG");
    for var in [
        "FILE_COMBINER_MODE",
        "FILE_COMBINER_HEADER_FORMAT",
        "FILE_COMBINER_SEPARATOR",
        "FILE_COMBINER_MAX_KB",
        "FILE_COMBINER_INCLUDE_BINARY",
        "FILE_COMBINER_RAM_DIR",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

fn request_json(paths: &[&Path], root: Option<&Path>) -> String {
    let paths: Vec<String> = paths
        .iter()
        .map(|p| p.to_string_lossy().into_owned())
        .collect();
    let mut value = serde_json::json!({ "paths": paths });
    if let Some(root) = root {
        value["workspace_root"] = serde_json::json!(root.to_string_lossy());
    }
    value.to_string()
}

fn clipboard_output(json: &str, args: &[&str]) -> String {
    let assert = combiner()
        .args(["--mode", "clipboard"])
        .args(args)
        .write_stdin(json)
        .assert()
        .success();
    String::from_utf8(assert.get_output().stdout.clone()).unwrap()
}

#[test]
fn single_file_with_relative_root() {
    let temp = tempdir().unwrap();
    write_file(&temp.path().join("README.md"), "# Hello\nworld\n");

    combiner()
        .current_dir(temp.path())
        .args([
            "--mode",
            "clipboard",
            "--header-format",
            "File ${index}: ${relpath}",
            "--separator",
            "\\n---\\n",
        ])
        .write_stdin(r#"{"paths":["README.md"],"workspace_root":"."}"#)
        .assert()
        .success()
        .stdout("File 1: README.md\n# Hello\nworld");
}

#[test]
fn two_files_joined_with_decoded_separator() {
    let temp = tempdir().unwrap();
    let a = temp.path().join("a.txt");
    let b = temp.path().join("b.txt");
    write_file(&a, "alpha");
    write_file(&b, "beta");

    let out = clipboard_output(
        &request_json(&[&a, &b], Some(temp.path())),
        &[
            "--header-format",
            "File ${index}: ${relpath}",
            "--separator",
            "\\n---\\n",
        ],
    );

    assert_eq!(out, "File 1: a.txt\nalpha\n---\nFile 2: b.txt\nbeta");
}

#[test]
fn empty_input_shows_helpful_error() {
    combiner()
        .args(["--mode", "clipboard"])
        .write_stdin("")
        .assert()
        .failure()
        .code(2)
        .stdout("")
        .stderr(predicate::str::contains("No input provided"))
        .stderr(predicate::str::contains("Expected JSON"))
        .stderr(predicate::str::contains("panicked").not());
}

#[test]
fn invalid_json_shows_helpful_error() {
    combiner()
        .args(["--mode", "clipboard"])
        .write_stdin("not-json")
        .assert()
        .failure()
        .code(2)
        .stdout("")
        .stderr(predicate::str::contains("Failed to parse JSON"))
        .stderr(predicate::str::contains("Expected format"))
        .stderr(predicate::str::contains("panicked").not());
}

#[test]
fn empty_paths_is_input_error() {
    combiner()
        .args(["--mode", "clipboard"])
        .write_stdin(r#"{"paths":[]}"#)
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("No paths"));
}

#[test]
fn nothing_resolvable_is_validation_error() {
    let temp = tempdir().unwrap();
    let missing = temp.path().join("missing.txt");

    combiner()
        .args(["--mode", "clipboard"])
        .write_stdin(request_json(&[&missing], None))
        .assert()
        .failure()
        .code(3)
        .stdout("")
        .stderr(predicate::str::contains("No files found"));
}

#[test]
fn missing_entry_alongside_real_file_is_not_fatal() {
    let temp = tempdir().unwrap();
    let present = temp.path().join("present.txt");
    write_file(&present, "here");

    let out = clipboard_output(
        &request_json(&[&temp.path().join("gone.txt"), &present], Some(temp.path())),
        &["--header-format", "${index}. ${relpath}"],
    );

    assert_eq!(out, "1. present.txt\nhere");
}

#[test]
fn directory_expansion_is_ordered_and_deduplicated() {
    let temp = tempdir().unwrap();
    write_file(&temp.path().join("b.txt"), "b");
    write_file(&temp.path().join("a.txt"), "a");
    write_file(&temp.path().join("sub/zz.md"), "z");

    let out = clipboard_output(
        &request_json(
            &[&temp.path().join("sub/zz.md"), temp.path()],
            Some(temp.path()),
        ),
        &["--header-format", "${index}:${relpath}", "--separator", "|"],
    );

    assert_eq!(out, "1:sub/zz.md\nz|2:a.txt\na|3:b.txt\nb");
}

#[test]
fn basename_placeholder_and_unknown_placeholder() {
    let temp = tempdir().unwrap();
    let file = temp.path().join("deep/nested/file.rs");
    write_file(&file, "fn f() {}");

    let out = clipboard_output(
        &request_json(&[&file], Some(temp.path())),
        &["--header-format", "${basename} ${nope}"],
    );

    assert_eq!(out, "file.rs ${nope}\nfn f() {}");
}

#[test]
fn size_ceiling_boundary() {
    let temp = tempdir().unwrap();
    let exact = temp.path().join("exact.txt");
    let over = temp.path().join("over.txt");
    write_file(&exact, "e".repeat(1024));
    write_file(&over, "o".repeat(1025));

    let out = clipboard_output(
        &request_json(&[&exact, &over], Some(temp.path())),
        &["--max-kb", "1", "--header-format", "${index} ${relpath}"],
    );

    assert!(out.starts_with("1 exact.txt\n"));
    assert!(out.contains(&"e".repeat(1024)));
    assert!(!out.contains("over.txt"));
    assert!(!out.contains('o'));
}

#[test]
fn binary_files_skipped_by_default() {
    let temp = tempdir().unwrap();
    let text = temp.path().join("text.txt");
    let binary = temp.path().join("binary.bin");
    write_file(&text, "This is text content");
    write_file(&binary, [0u8, 1, 2, 0, 255]);

    let out = clipboard_output(&request_json(&[&binary, &text], Some(temp.path())), &[]);

    assert_eq!(out, "file 1: text.txt\nThis is text content");
}

#[test]
fn include_binary_decodes_lossily() {
    let temp = tempdir().unwrap();
    let binary = temp.path().join("mixed.bin");
    write_file(&binary, b"abc\0def\xff");

    let out = clipboard_output(
        &request_json(&[&binary], Some(temp.path())),
        &["--include-binary"],
    );

    assert_eq!(out, "file 1: mixed.bin\nabc\0def\u{fffd}");
}

#[test]
fn last_binary_flag_wins() {
    let temp = tempdir().unwrap();
    let binary = temp.path().join("blob.bin");
    let text = temp.path().join("t.txt");
    write_file(&binary, [0u8; 8]);
    write_file(&text, "t");
    let json = request_json(&[&binary, &text], Some(temp.path()));

    let skipped = clipboard_output(&json, &["--include-binary", "--skip-binary"]);
    assert_eq!(skipped, "file 1: t.txt\nt");

    let included = clipboard_output(&json, &["--skip-binary", "--include-binary"]);
    assert!(included.starts_with("file 1: blob.bin\n"));
}

#[test]
fn temp_mode_prints_path_with_same_content_as_clipboard() {
    let temp = tempdir().unwrap();
    let out_dir = tempdir().unwrap();
    let a = temp.path().join("a.txt");
    let b = temp.path().join("sub/b.txt");
    write_file(&a, "hello\n");
    write_file(&b, "world\n");
    let json = request_json(&[temp.path()], Some(temp.path()));

    let clipboard = clipboard_output(&json, &[]);

    let assert = combiner()
        .args(["--mode", "temp", "--ram-dir"])
        .arg(out_dir.path())
        .write_stdin(json)
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(stdout.ends_with('\n'));
    assert_eq!(stdout.lines().count(), 1);

    let path = Path::new(stdout.trim());
    assert!(path.is_absolute());
    assert!(path.starts_with(out_dir.path()));
    assert_eq!(fs::read_to_string(path).unwrap(), clipboard);
    assert_eq!(clipboard, "file 1: a.txt\nhello\n\nfile 2: sub/b.txt\nworld");
}

#[test]
fn identical_requests_give_identical_output() {
    let temp = tempdir().unwrap();
    for name in ["z.txt", "m/1.txt", "m/2.txt", "a/deep/x.txt"] {
        write_file(&temp.path().join(name), name);
    }
    let json = request_json(&[temp.path()], None);

    let first = clipboard_output(&json, &[]);
    let second = clipboard_output(&json, &[]);

    assert_eq!(first, second);
    assert_eq!(first.matches("file ").count(), 4);
}

#[test]
fn camel_case_workspace_root_and_unknown_fields() {
    let temp = tempdir().unwrap();
    let file = temp.path().join("x.txt");
    write_file(&file, "x");

    let json = serde_json::json!({
        "paths": [file.to_string_lossy()],
        "workspaceRoot": temp.path().to_string_lossy(),
        "client": "editor",
    })
    .to_string();

    assert_eq!(clipboard_output(&json, &[]), "file 1: x.txt\nx");
}

#[test]
fn environment_supplies_configuration() {
    let temp = tempdir().unwrap();
    let file = temp.path().join("x.txt");
    write_file(&file, "x");

    combiner()
        .env("FILE_COMBINER_MODE", "clipboard")
        .env("FILE_COMBINER_HEADER_FORMAT", "## ${relpath}")
        .write_stdin(request_json(&[&file], Some(temp.path())))
        .assert()
        .success()
        .stdout("## x.txt\nx");
}

#[test]
fn zero_max_kb_is_rejected() {
    let temp = tempdir().unwrap();
    let file = temp.path().join("x.txt");
    write_file(&file, "x");

    combiner()
        .args(["--mode", "clipboard", "--max-kb", "0"])
        .write_stdin(request_json(&[&file], None))
        .assert()
        .failure()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("max_kb"));
}

#[test]
fn debug_flag_writes_diagnostics_to_stderr_only() {
    let temp = tempdir().unwrap();
    let file = temp.path().join("x.txt");
    write_file(&file, "x");
    let json = request_json(&[&file], Some(temp.path()));

    combiner()
        .args(["--mode", "clipboard", "--debug"])
        .write_stdin(json)
        .assert()
        .success()
        .stdout("file 1: x.txt\nx")
        .stderr(predicate::str::contains("Resolving entry"));
}

#[test]
fn quiet_by_default() {
    let temp = tempdir().unwrap();
    let file = temp.path().join("x.txt");
    write_file(&file, "x");

    combiner()
        .args(["--mode", "clipboard"])
        .write_stdin(request_json(&[&file], None))
        .assert()
        .success()
        .stderr("");
}
