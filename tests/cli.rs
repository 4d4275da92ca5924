use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::io::Write;
use std::path::PathBuf;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn files_as_json() {
    let mut cmd = cargo_bin_cmd!("codeparser");
    cmd.arg("files")
        .arg("任务列表")
        .arg(fixture_path("tasks.md"))
        .arg("--format")
        .arg("json");

    let output_pred = predicate::str::starts_with("[")
        .and(predicate::str::contains("\"smart_search_engine/knowledge_base.py\""))
        .and(predicate::str::contains("\"smart_search_engine/monitoring.py\""));

    cmd.assert().success().stdout(output_pred);
}

#[test]
fn missing_section_fails() {
    let mut cmd = cargo_bin_cmd!("codeparser");
    cmd.arg("files")
        .arg("Data structures")
        .arg(fixture_path("tasks.md"));

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("no section matches heading 'Data structures'"));
}

#[test]
fn code_from_stdin() {
    let mut cmd = cargo_bin_cmd!("codeparser");
    cmd.arg("code")
        .arg("Task list")
        .arg("-")
        .arg("--lang")
        .arg("python")
        .write_stdin("## Task list\n```python\nfiles = [\"a.py\"]\n```\n");

    cmd.assert().success().stdout("files = [\"a.py\"]\n");
}

#[test]
fn blocks_as_yaml() {
    let mut cmd = cargo_bin_cmd!("codeparser");
    cmd.arg("blocks")
        .arg(fixture_path("tomato_clock.md"))
        .arg("--format")
        .arg("yaml");

    cmd.assert().success().stdout(
        predicate::str::contains("Task list:").and(predicate::str::contains("Anything UNCLEAR:")),
    );
}

#[test]
fn str_of_numbered_section() {
    let mut cmd = cargo_bin_cmd!("codeparser");
    cmd.arg("str")
        .arg("2")
        .arg("-")
        .write_stdin("## 1\nname = 'x'\n## 2\nname = 'a'\n");

    cmd.assert().success().stdout("a\n");
}

#[test]
fn fence_falls_back_to_whole_text() {
    let mut cmd = cargo_bin_cmd!("codeparser");
    cmd.arg("fence").arg("-").write_stdin("print('hi')\n");

    cmd.assert().success().stdout("print('hi')\n");
}

#[test]
fn config_file_disables_code_fallback() {
    let mut config = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("temp file");
    writeln!(config, "[code]\nfallback_to_body = false").expect("write config");

    let mut cmd = cargo_bin_cmd!("codeparser");
    cmd.arg("code")
        .arg("Anything UNCLEAR")
        .arg(fixture_path("tomato_clock.md"))
        .arg("--config")
        .arg(config.path());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("contains no code"));
}

#[test]
fn unknown_format_is_rejected() {
    let mut cmd = cargo_bin_cmd!("codeparser");
    cmd.arg("blocks")
        .arg(fixture_path("tasks.md"))
        .arg("--format")
        .arg("toml");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("unknown format 'toml'"));
}

#[test]
fn local_config_file_is_picked_up() {
    let dir = tempfile::tempdir().expect("temp dir");
    std::fs::write(
        dir.path().join("codeparser.toml"),
        "[code]\nfallback_to_body = false\n",
    )
    .expect("write config");

    let mut cmd = cargo_bin_cmd!("codeparser");
    cmd.current_dir(dir.path())
        .arg("code")
        .arg("Anything UNCLEAR")
        .arg(fixture_path("tomato_clock.md"));
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("contains no code"));

    let mut cmd = cargo_bin_cmd!("codeparser");
    cmd.arg("code")
        .arg("Anything UNCLEAR")
        .arg(fixture_path("tomato_clock.md"));
    cmd.assert().success().stdout("Nothing is unclear.");
}
