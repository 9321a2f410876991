//! Smoke tests over the clap argument surface, run as an external
//! process so they exercise the same parsing path a real invocation
//! would.

use std::process::Command;

fn wfsk_bin() -> &'static str {
    env!("CARGO_BIN_EXE_wfsk")
}

#[test]
fn help_lists_all_subcommands() {
    let output = Command::new(wfsk_bin()).arg("--help").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for sub in ["send", "decode", "analyze", "serve"] {
        assert!(stdout.contains(sub), "missing subcommand {sub} in help text");
    }
}

#[test]
fn send_then_decode_round_trips_through_the_cli() {
    let dir = std::env::temp_dir().join(format!("wfsk-cli-test-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let wav_path = dir.join("message.wav");

    let send_status = Command::new(wfsk_bin())
        .args(["send", "cli round trip", wav_path.to_str().unwrap(), "--mode", "DEFAULT"])
        .status()
        .unwrap();
    assert!(send_status.success());
    assert!(wav_path.exists());

    let decode_output = Command::new(wfsk_bin())
        .args(["decode", wav_path.to_str().unwrap(), "--mode", "DEFAULT"])
        .output()
        .unwrap();
    assert!(decode_output.status.success());
    let stdout = String::from_utf8_lossy(&decode_output.stdout);
    assert!(stdout.contains("cli round trip"));

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn missing_input_file_fails_cleanly() {
    let output = Command::new(wfsk_bin())
        .args(["decode", "/nonexistent/path/to/file.wav"])
        .output()
        .unwrap();
    assert!(!output.status.success());
}
