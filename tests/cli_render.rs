use std::io::Write;

use assert_cmd::Command;
use predicates::str::contains;
use tempfile::NamedTempFile;

fn markdown_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("tmp file");
    file.write_all(contents.as_bytes()).expect("write markdown");
    file
}

fn md2html() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("md2html"));
    cmd.env_remove("PORT")
        .env_remove("FUNCTION_TARGET")
        .env_remove("MD2HTML_CONFIG_FILE")
        .env("RUST_LOG", "error");
    cmd
}

#[test]
fn render_reads_stdin_and_prints_html() {
    md2html()
        .arg("render")
        .write_stdin("# Hello")
        .assert()
        .success()
        .stdout("<h1 id=\"hello\">Hello</h1>\n");
}

#[test]
fn render_reads_a_file_and_wraps_json() {
    let file = markdown_file("# Hello");

    md2html()
        .arg("render")
        .arg(file.path())
        .arg("--json")
        .assert()
        .success()
        .stdout("{\"Result\":\"<h1 id=\\\"hello\\\">Hello</h1>\\n\"}\n");
}

#[test]
fn render_dash_means_stdin() {
    md2html()
        .args(["render", "-"])
        .write_stdin("[docs](https://example.com)")
        .assert()
        .success()
        .stdout(contains("target=\"_blank\""));
}

#[test]
fn missing_input_file_fails() {
    md2html()
        .args(["render", "definitely/not/here.md"])
        .assert()
        .failure()
        .stderr(contains("application error"));
}

#[test]
fn unknown_target_fails_before_binding() {
    md2html()
        .env("FUNCTION_TARGET", "nope")
        .args(["serve", "--port", "1"])
        .assert()
        .failure()
        .stderr(contains("not registered"));
}
