use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

#[test]
fn test_cli_build_extract_cycle() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Setup: texts/ folder with two single-line files
    let work = tempdir()?;
    let texts = work.path().join("texts");
    fs::create_dir(&texts)?;
    fs::write(texts.join("a.txt"), "hello")?;
    fs::write(texts.join("b.txt"), "world")?;

    // 2. Build with relative paths and an explicit output
    let mut cmd = Command::cargo_bin("tarsau")?;
    cmd.current_dir(work.path())
        .arg("-b")
        .arg("-o")
        .arg("test.sau")
        .arg("texts/a.txt")
        .arg("texts/b.txt");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Archive created successfully: test.sau"));

    let bytes = fs::read(work.path().join("test.sau"))?;
    assert!(bytes.starts_with(b"2         |texts/a.txt,"));
    assert_eq!(*bytes.last().unwrap(), 0x1a);

    // 3. Extract
    let mut cmd = Command::cargo_bin("tarsau")?;
    cmd.current_dir(work.path()).arg("-a").arg("test.sau").arg("out");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Files extracted to out"));

    assert_eq!(fs::read_to_string(work.path().join("out/a.txt"))?, "hello");
    assert_eq!(fs::read_to_string(work.path().join("out/b.txt"))?, "world");
    Ok(())
}

#[test]
fn test_cli_default_output_name() -> Result<(), Box<dyn std::error::Error>> {
    let work = tempdir()?;
    fs::create_dir(work.path().join("texts"))?;
    fs::write(work.path().join("texts/a.txt"), "hello")?;

    let mut cmd = Command::cargo_bin("tarsau")?;
    cmd.current_dir(work.path()).arg("-b").arg("texts/a.txt");
    cmd.assert().success();

    assert!(work.path().join("a.sau").is_file());
    Ok(())
}

#[test]
fn test_cli_strict_keeps_multiline_content() -> Result<(), Box<dyn std::error::Error>> {
    let work = tempdir()?;
    fs::create_dir(work.path().join("texts"))?;
    fs::write(work.path().join("texts/a.txt"), "line1\nline2")?;

    Command::cargo_bin("tarsau")?
        .current_dir(work.path())
        .args(["-b", "texts/a.txt"])
        .assert()
        .success();

    Command::cargo_bin("tarsau")?
        .current_dir(work.path())
        .args(["-a", "a.sau", "lines"])
        .assert()
        .success();
    assert_eq!(fs::read_to_string(work.path().join("lines/a.txt"))?, "line1");

    Command::cargo_bin("tarsau")?
        .current_dir(work.path())
        .args(["-a", "--strict", "a.sau", "exact"])
        .assert()
        .success();
    assert_eq!(
        fs::read_to_string(work.path().join("exact/a.txt"))?,
        "line1\nline2"
    );
    Ok(())
}

#[test]
fn test_cli_invalid_option() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("tarsau")?;
    cmd.arg("-x").arg("whatever");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
    Ok(())
}

#[test]
fn test_cli_missing_arguments() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("tarsau")?;
    cmd.arg("-a").arg("only-archive.sau");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));

    let mut cmd = Command::cargo_bin("tarsau")?;
    cmd.arg("-b");
    cmd.assert().failure();
    Ok(())
}

#[test]
fn test_cli_extract_requires_regular_file() -> Result<(), Box<dyn std::error::Error>> {
    let work = tempdir()?;

    let mut cmd = Command::cargo_bin("tarsau")?;
    cmd.current_dir(work.path()).args(["-a", "missing.sau", "out"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Not a regular archive file"));

    let mut cmd = Command::cargo_bin("tarsau")?;
    cmd.current_dir(work.path()).args(["-a", ".", "out"]);
    cmd.assert().failure();

    assert!(!work.path().join("out").exists());
    Ok(())
}

#[test]
fn test_cli_too_many_files() -> Result<(), Box<dyn std::error::Error>> {
    let work = tempdir()?;
    fs::create_dir(work.path().join("texts"))?;

    let mut cmd = Command::cargo_bin("tarsau")?;
    cmd.current_dir(work.path()).arg("-b");
    for i in 0..33 {
        let name = format!("texts/{}.txt", i);
        fs::write(work.path().join(&name), "x")?;
        cmd.arg(name);
    }
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("maximum number of input files"));

    assert!(!work.path().join("a.sau").exists());
    Ok(())
}

#[test]
fn test_cli_unreadable_input_leaves_no_archive() -> Result<(), Box<dyn std::error::Error>> {
    let work = tempdir()?;
    fs::create_dir(work.path().join("texts"))?;
    fs::write(work.path().join("texts/a.txt"), "hello")?;

    let mut cmd = Command::cargo_bin("tarsau")?;
    cmd.current_dir(work.path())
        .args(["-b", "-o", "out.sau", "texts/a.txt", "texts/missing.txt"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("texts/missing.txt"));

    assert!(!work.path().join("out.sau").exists());
    Ok(())
}

#[test]
fn test_cli_output_cannot_be_input() -> Result<(), Box<dyn std::error::Error>> {
    let work = tempdir()?;
    fs::create_dir(work.path().join("texts"))?;
    fs::write(work.path().join("texts/a.txt"), "hello")?;

    let mut cmd = Command::cargo_bin("tarsau")?;
    cmd.current_dir(work.path())
        .args(["-b", "-o", "texts/a.txt", "texts/a.txt"]);
    cmd.assert().failure();

    assert_eq!(fs::read_to_string(work.path().join("texts/a.txt"))?, "hello");
    Ok(())
}
