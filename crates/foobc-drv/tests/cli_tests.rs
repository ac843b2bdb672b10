//! CLI end-to-end tests.
//!
//! Failure paths (missing files, syntax errors, cycles, duplicates) run
//! everywhere; the native round trips only run when a host C compiler is
//! available.

use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

fn foobc() -> Command {
    Command::new(env!("CARGO_BIN_EXE_foobc"))
}

/// True when a host C compiler is reachable.
fn has_cc() -> bool {
    let cc = std::env::var("CC").unwrap_or_else(|_| "cc".to_string());
    std::process::Command::new(cc)
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("failed to write fixture");
    path
}

#[test]
fn test_cli_help() {
    foobc()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("compile"));
}

#[test]
fn test_cli_version() {
    foobc()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("foobc"));
}

#[test]
fn test_missing_input_file_fails() {
    let temp = TempDir::new().unwrap();
    foobc()
        .arg("compile")
        .arg(temp.path().join("nope.foob"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot read file"));
}

#[test]
fn test_syntax_error_reports_position_and_hint() {
    let temp = TempDir::new().unwrap();
    let input = write(&temp, "bad.foob", "Main() { return true }");

    foobc()
        .arg("compile")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("1:"))
        .stderr(predicate::str::contains("semicolon"));
}

#[test]
fn test_missing_import_names_both_paths() {
    let temp = TempDir::new().unwrap();
    let input = write(
        &temp,
        "main.foob",
        "import \"ghost\";\nMain() { return true; }",
    );

    foobc()
        .arg("compile")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot find imported file: 'ghost'"))
        .stderr(predicate::str::contains("main.foob"))
        .stderr(predicate::str::contains("ghost.foob"));
}

#[test]
fn test_import_cycle_is_fatal_and_names_the_cycle() {
    let temp = TempDir::new().unwrap();
    write(&temp, "lib.foob", "import \"main\";\nclass P {}");
    let input = write(&temp, "main.foob", "import \"lib\";\nMain() { return true; }");

    foobc()
        .arg("compile")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("circular import detected"))
        .stderr(predicate::str::contains("main.foob"))
        .stderr(predicate::str::contains("lib.foob"));
}

#[test]
fn test_duplicate_class_names_both_files() {
    let temp = TempDir::new().unwrap();
    write(&temp, "a.foob", "class Dog {}");
    write(&temp, "b.foob", "class Dog {}");
    let input = write(
        &temp,
        "main.foob",
        "import \"a\";\nimport \"b\";\nMain() { return true; }",
    );

    foobc()
        .arg("compile")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("duplicate class definition: 'Dog'"))
        .stderr(predicate::str::contains("a.foob"))
        .stderr(predicate::str::contains("b.foob"));
}

#[test]
fn test_missing_main_is_fatal() {
    let temp = TempDir::new().unwrap();
    let input = write(&temp, "main.foob", "class Lonely {}");

    foobc()
        .arg("compile")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no Main() function found"));
}

#[test]
fn test_compile_and_run_hello_world() {
    if !has_cc() {
        eprintln!("skipping: no host C compiler available");
        return;
    }

    let temp = TempDir::new().unwrap();
    let output = temp.path().join("hello");

    foobc()
        .arg("compile")
        .arg(fixtures_dir().join("hello_world.foob"))
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Successfully compiled"));

    assert!(output.exists(), "executable should exist");
    // intermediate C file is removed by default
    assert!(!temp.path().join("hello.c").exists());

    let run = std::process::Command::new(&output).output().unwrap();
    assert_eq!(run.status.code(), Some(0));
    assert_eq!(String::from_utf8_lossy(&run.stdout), "Hello\n");
}

#[test]
fn test_keep_c_retains_intermediate() {
    if !has_cc() {
        eprintln!("skipping: no host C compiler available");
        return;
    }

    let temp = TempDir::new().unwrap();
    let output = temp.path().join("hello");

    foobc()
        .arg("compile")
        .arg(fixtures_dir().join("hello_world.foob"))
        .arg("-o")
        .arg(&output)
        .arg("--keep-c")
        .assert()
        .success();

    assert!(temp.path().join("hello.c").exists());
}

#[test]
fn test_arithmetic_prints_1024() {
    if !has_cc() {
        eprintln!("skipping: no host C compiler available");
        return;
    }

    let temp = TempDir::new().unwrap();
    let output = temp.path().join("arithmetic");

    foobc()
        .arg("compile")
        .arg(fixtures_dir().join("arithmetic.foob"))
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    let run = std::process::Command::new(&output).output().unwrap();
    assert_eq!(String::from_utf8_lossy(&run.stdout), "1024\n");
}

#[test]
fn test_array_pipeline_prints_18() {
    if !has_cc() {
        eprintln!("skipping: no host C compiler available");
        return;
    }

    let temp = TempDir::new().unwrap();
    let output = temp.path().join("pipeline");

    foobc()
        .arg("compile")
        .arg(fixtures_dir().join("pipeline.foob"))
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    let run = std::process::Command::new(&output).output().unwrap();
    assert_eq!(String::from_utf8_lossy(&run.stdout), "18\n");
}

#[test]
fn test_multi_file_compile_and_run() {
    if !has_cc() {
        eprintln!("skipping: no host C compiler available");
        return;
    }

    let temp = TempDir::new().unwrap();
    write(
        &temp,
        "lib.foob",
        r#"
        class P {
            string Greet() {
                return "hello from P";
            }
        }
        "#,
    );
    let input = write(
        &temp,
        "entry.foob",
        r#"
        import "lib";
        Main() {
            P p = new P();
            CONSOLE.Print(p.Greet());
            return true;
        }
        "#,
    );
    let output = temp.path().join("entry_bin");

    foobc()
        .arg("compile")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    let run = std::process::Command::new(&output).output().unwrap();
    assert_eq!(String::from_utf8_lossy(&run.stdout), "hello from P\n");
}

#[test]
fn test_inheritance_isa_prints_true() {
    if !has_cc() {
        eprintln!("skipping: no host C compiler available");
        return;
    }

    let temp = TempDir::new().unwrap();
    let input = write(
        &temp,
        "isa.foob",
        r#"
        class A {}
        class B inherits A {}
        Main() {
            B b = new B();
            CONSOLE.PrintBoolean(b isa A);
            return true;
        }
        "#,
    );
    let output = temp.path().join("isa_bin");

    foobc()
        .arg("compile")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    let run = std::process::Command::new(&output).output().unwrap();
    assert_eq!(String::from_utf8_lossy(&run.stdout), "true\n");
}
