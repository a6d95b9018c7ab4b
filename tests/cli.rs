/*!
 * End-to-end tests through the public API and the binary
 */

use std::fs;
use std::process::Command;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use repo2tree::{convert_directory, Config, OutputFormat, Repo2TreeError};
use tempfile::tempdir;

fn sample_repo() -> tempfile::TempDir {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("app.ts"), "const greeting: string = \"hi\";\n").unwrap();
    fs::write(dir.path().join("notes.md"), "notes").unwrap();
    fs::create_dir(dir.path().join("dist")).unwrap();
    fs::write(dir.path().join("dist").join("bundle.js"), "var a=1;").unwrap();
    dir
}

#[test]
fn test_config_file_is_honoured() {
    let dir = sample_repo();
    fs::write(
        dir.path().join(".repo2treerc"),
        r#"{"acceptedFileExtensions": [".ts", ".md"], "ignoredDirectories": ["dist"]}"#,
    )
    .unwrap();

    let output = convert_directory(&Config::for_directory(dir.path())).unwrap();
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    let paths: Vec<&str> = value["tree"]
        .as_array()
        .unwrap()
        .iter()
        .map(|node| node["path"].as_str().unwrap())
        .collect();

    assert!(paths.contains(&"app.ts"));
    assert!(paths.contains(&"notes.md"));
    assert!(!paths.contains(&"dist"));
    assert!(!paths.contains(&".repo2treerc"));
}

#[test]
fn test_malformed_config_file_stops_the_run() {
    let dir = sample_repo();
    fs::write(dir.path().join(".repo2treerc"), "{ oops").unwrap();

    let err = convert_directory(&Config::for_directory(dir.path())).unwrap_err();
    assert!(matches!(err, Repo2TreeError::Configuration(_)));
}

#[test]
fn test_base64_round_trip() {
    let dir = sample_repo();
    let mut config = Config::for_directory(dir.path());
    let plain = convert_directory(&config).unwrap();

    config.format = OutputFormat::Base64;
    config.max_line_length = 16;
    let encoded = convert_directory(&config).unwrap();

    let lines: Vec<&str> = encoded.lines().collect();
    assert!(lines.iter().all(|line| !line.is_empty() && line.len() <= 16));
    let decoded = STANDARD.decode(lines.concat()).unwrap();
    assert_eq!(String::from_utf8(decoded).unwrap(), plain);
}

#[test]
fn test_binary_writes_json_to_stdout() {
    let dir = sample_repo();
    let output = Command::new(env!("CARGO_BIN_EXE_repo2tree"))
        .arg(dir.path())
        .arg("--quiet")
        .output()
        .unwrap();

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["description"], "Formatted repository tree for AI models");
    let tree = value["tree"].as_array().unwrap();
    assert!(tree.iter().any(|node| node["path"] == "app.ts"));
    assert!(tree.iter().any(|node| node["path"] == "dist"));
}

#[test]
fn test_binary_rejects_degenerate_line_length() {
    let dir = sample_repo();
    let output = Command::new(env!("CARGO_BIN_EXE_repo2tree"))
        .arg(dir.path())
        .args(["--quiet", "--format", "base64", "--max-line-length", "2"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid line length 2"));
}

#[test]
fn test_binary_missing_directory() {
    let output = Command::new(env!("CARGO_BIN_EXE_repo2tree"))
        .args(["/no/such/dir/for/repo2tree", "--quiet"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Target directory not found"));
}
