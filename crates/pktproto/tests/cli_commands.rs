#![cfg(feature = "cli")]

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

use pktproto_frame::{encode_frame, LOG, SENSOR};

const HELLO_FRAME_HEX: &str = "55 AA 01 0A 00 68 65 6C 6C 6F 77 6F 72 6C 64 84 DA AA 55";

fn pktproto() -> Command {
    Command::new(env!("CARGO_BIN_EXE_pktproto"))
}

fn run(args: &[&str]) -> Output {
    pktproto()
        .args(args)
        .output()
        .expect("pktproto should start")
}

fn run_with_stdin(args: &[&str], input: &[u8]) -> Output {
    let mut child = pktproto()
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("pktproto should start");
    child
        .stdin
        .take()
        .expect("stdin should be piped")
        .write_all(input)
        .expect("stdin write should succeed");
    child.wait_with_output().expect("pktproto should exit")
}

fn json_lines(output: &Output) -> Vec<serde_json::Value> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).expect("stdout line should be JSON"))
        .collect()
}

fn unique_temp_file(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "pktproto-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ))
}

#[test]
fn encode_prints_known_frame() {
    let output = run(&[
        "--format",
        "json",
        "encode",
        "--type",
        "sensor",
        "--data",
        "helloworld",
    ]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let lines = json_lines(&output);
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["frame_type"], 1);
    assert_eq!(lines[0]["type_name"], "SENSOR");
    assert_eq!(lines[0]["payload_size"], 10);
    assert_eq!(lines[0]["frame_size"], 19);
    assert_eq!(lines[0]["frame_hex"], HELLO_FRAME_HEX);
}

#[test]
fn encode_raw_writes_wire_bytes() {
    let output = run(&["--format", "raw", "encode", "--type", "log"]);
    assert!(output.status.success());
    assert_eq!(
        output.stdout,
        vec![0x55, 0xAA, 0x03, 0x00, 0x00, 0xE4, 0xFC, 0xAA, 0x55]
    );
}

#[test]
fn encode_rejects_oversized_payload() {
    let payload = "x".repeat(109);
    let output = run(&["--format", "json", "encode", "--type", "1", "--data", &payload]);
    assert_eq!(output.status.code(), Some(60));
    assert!(output.stdout.is_empty());
}

#[test]
fn encode_rejects_bad_hex() {
    let output = run(&["encode", "--type", "sensor", "--hex", "0G"]);
    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn decode_hex_input_in_small_chunks() {
    let output = run(&[
        "--format",
        "json",
        "decode",
        "--hex",
        &format!("01 02 03 04 {HELLO_FRAME_HEX}"),
        "--chunk",
        "3",
    ]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let lines = json_lines(&output);
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["index"], 0);
    assert_eq!(lines[0]["frame_type"], 1);
    assert_eq!(lines[0]["payload"], "helloworld");
    assert_eq!(lines[0]["payload_hex"], "68 65 6C 6C 6F 77 6F 72 6C 64");
}

#[test]
fn decode_reads_stdin_stream() {
    let mut stream = encode_frame(SENSOR, &[1, 2, 3, 4])
        .expect("encode should succeed")
        .to_vec();
    stream.extend_from_slice(&[0xFF, 0x00]);
    stream.extend_from_slice(&encode_frame(LOG, b"boot ok").expect("encode should succeed"));

    let output = run_with_stdin(&["--format", "json", "decode"], &stream);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let lines = json_lines(&output);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["type_name"], "SENSOR");
    assert_eq!(lines[0]["payload_hex"], "01 02 03 04");
    assert_eq!(lines[1]["type_name"], "LOG");
    assert_eq!(lines[1]["payload"], "boot ok");
}

#[test]
fn decode_reads_file_and_grows_buffer() {
    let path = unique_temp_file("decode");
    let payload = vec![0x42u8; 100];
    let mut stream = Vec::new();
    for _ in 0..3 {
        stream.extend_from_slice(&encode_frame(SENSOR, &payload).expect("encode should succeed"));
    }
    std::fs::write(&path, &stream).expect("temp file should be writable");

    let output = run(&[
        "--format",
        "json",
        "decode",
        "--file",
        path.to_str().expect("temp path should be UTF-8"),
        "--buffer-size",
        "200",
    ]);
    let _ = std::fs::remove_file(&path);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let lines = json_lines(&output);
    assert_eq!(lines.len(), 3);
    assert!(lines.iter().all(|line| line["payload_size"] == 100));
}

#[test]
fn decode_without_frames_is_data_invalid() {
    let output = run(&["--format", "json", "decode", "--hex", "01 02 03 04"]);
    assert_eq!(output.status.code(), Some(60));
    assert!(output.stdout.is_empty());
}

#[test]
fn decode_rejects_zero_chunk() {
    let output = run(&["decode", "--hex", HELLO_FRAME_HEX, "--chunk", "0"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn version_prints_package_version() {
    let output = run(&["version"]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        format!("pktproto {}", env!("CARGO_PKG_VERSION"))
    );
}
