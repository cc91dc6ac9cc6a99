use std::fs;
use std::process::Command;
use tempfile::TempDir;

const EXE: &str = env!("CARGO_BIN_EXE_openapi-typegen");

#[test]
fn test_cli_generate_writes_units() {
    let dir = TempDir::new().unwrap();
    let status = Command::new(EXE)
        .arg("generate")
        .arg("--input")
        .arg("tests/fixtures/petstore.yaml")
        .arg("--output")
        .arg(dir.path())
        .arg("--package-name")
        .arg("petstore")
        .status()
        .expect("run cli");
    assert!(status.success());

    let out = dir.path().join("petstore");
    for unit in ["mod.rs", "pet.rs", "tag.rs", "add_pet.rs", "find_pets.rs"] {
        assert!(out.join(unit).exists(), "missing {unit}");
    }
    assert!(!out.join("delete_pet.rs").exists());
}

#[test]
fn test_cli_skip_types() {
    let dir = TempDir::new().unwrap();
    let status = Command::new(EXE)
        .args(["generate", "--input", "tests/fixtures/petstore.yaml", "--skip-types"])
        .arg("--output")
        .arg(dir.path())
        .status()
        .expect("run cli");
    assert!(status.success());

    assert!(!dir.path().join("types").exists());
}

#[test]
fn test_cli_missing_input_fails() {
    let dir = TempDir::new().unwrap();
    let output = Command::new(EXE)
        .arg("generate")
        .arg("--input")
        .arg(dir.path().join("nope.yaml"))
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to read definitions"), "{stderr}");
}

#[test]
fn test_cli_templates_show() {
    let output = Command::new(EXE)
        .args(["templates", "show", "request-bodies"])
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("RequestBody"));
}

#[test]
fn test_cli_bad_override_fails() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("typegen.toml");
    fs::write(&config, "[user_templates]\ntype = \"{{ unclosed \"\n").unwrap();
    let output = Command::new(EXE)
        .args(["generate", "--input", "tests/fixtures/petstore.yaml"])
        .arg("--config")
        .arg(&config)
        .arg("--output")
        .arg(dir.path())
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    assert!(!dir.path().join("types").join("pet.rs").exists());
}
