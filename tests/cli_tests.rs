use std::fs;
use std::process::Command;

const EXE: &str = env!("CARGO_BIN_EXE_gsc");

#[test]
fn cli_roundtrip_cpu() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.dat");
    fs::write(&input, [0xAC]).unwrap();

    let status = Command::new(EXE)
        .args(["compress", input.to_str().unwrap(), "--limit", "1048576", "--quiet"])
        .status()
        .expect("compress failed");
    assert!(status.success());

    let artifact = dir.path().join("input.dat.bin");
    assert_eq!(fs::read(&artifact).unwrap().len(), 16);

    let restored = dir.path().join("restored.dat");
    let status = Command::new(EXE)
        .args([
            "decompress",
            artifact.to_str().unwrap(),
            restored.to_str().unwrap(),
        ])
        .status()
        .expect("decompress failed");
    assert!(status.success());
    assert_eq!(fs::read(restored).unwrap(), vec![0xAC]);
}

#[test]
fn decompress_default_name_strips_suffix() {
    let dir = tempfile::tempdir().unwrap();
    let artifact = dir.path().join("note.bin");
    let mut record = 42u64.to_le_bytes().to_vec();
    record.extend_from_slice(&8u64.to_le_bytes());
    fs::write(&artifact, &record).unwrap();

    for _ in 0..2 {
        let status = Command::new(EXE)
            .args(["decompress", artifact.to_str().unwrap()])
            .status()
            .unwrap();
        assert!(status.success());
        assert_eq!(fs::read(dir.path().join("note")).unwrap(), vec![0xce]);
    }
}

#[test]
fn json_summary_host_batches() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in");
    let artifact = dir.path().join("in.gsc");
    fs::write(&input, [0xAC]).unwrap();

    let out = Command::new(EXE)
        .args([
            "compress-cl",
            input.to_str().unwrap(),
            artifact.to_str().unwrap(),
            "100",
            "--host",
            "--limit",
            "65536",
            "--quiet",
            "--json",
        ])
        .output()
        .unwrap();
    assert!(out.status.success());
    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(json["seed"], 164);
    assert_eq!(json["bit_count"], 8);
    assert_eq!(json["backend"], "host");
}

#[test]
fn truncated_artifact_error() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("bad.bin");
    fs::write(&input, b"baddata").unwrap();
    let out = dir.path().join("out");
    let output = Command::new(EXE)
        .args(["decompress", input.to_str().unwrap(), out.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Verify the file is intact"));
    assert!(!out.exists());
}

#[test]
fn oversized_bit_count_artifact_error() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("huge.bin");
    let mut record = 1u64.to_le_bytes().to_vec();
    record.extend_from_slice(&(1u64 << 40).to_le_bytes());
    fs::write(&input, record).unwrap();
    let out = dir.path().join("out");
    let output = Command::new(EXE)
        .args(["decompress", input.to_str().unwrap(), out.to_str().unwrap()])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("bit count"));
    assert!(stderr.contains("Verify the file is intact"));
    assert!(!out.exists());
}

#[test]
fn missing_input_error() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("absent");
    let output = Command::new(EXE)
        .args(["compress", input.to_str().unwrap(), "--quiet"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Check that the file exists"));
}

#[test]
fn exhausted_limit_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in");
    fs::write(&input, [0xAC]).unwrap();
    let output = Command::new(EXE)
        .args(["compress", input.to_str().unwrap(), "--limit", "100", "--quiet"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no seed below 100"));
    assert!(!stderr.contains("Invalid configuration"));
    assert!(!dir.path().join("in.bin").exists());
}

#[cfg(not(feature = "gpu"))]
#[test]
fn device_path_reports_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in");
    fs::write(&input, [1]).unwrap();
    let output = Command::new(EXE)
        .args(["compress-cl", input.to_str().unwrap(), "--quiet"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Install an OpenCL runtime"));
}
