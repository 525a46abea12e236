use std::path::{Path, PathBuf};

use assert_cmd::Command;
use lifxwire_core::payloads::Payload;
use lifxwire_core::protocol::{
    ByteOrder, Frame, FrameAddress, Header, MessageType, Packet, ProtocolHeader,
};
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use serde_json::Value;
use tempfile::TempDir;

const GET_SERVICE_HEX: &str = "24:00:00:34:02:00:00:00:00:00:00:00:00:00:00:00:00:00:00:00:00:00:00:00:00:00:00:00:00:00:00:00:02:00:00:00";

fn cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("lifxwire"))
}

fn light_get() -> Vec<u8> {
    let header = Header::new(
        Frame {
            source: 42,
            ..Frame::default()
        },
        FrameAddress {
            target: "d0:73:d5:00:00:01".parse().expect("address"),
            sequence: 1,
            ..FrameAddress::default()
        },
        ProtocolHeader::new(MessageType::LightGet),
    );
    Packet::new(header, Payload::Empty)
        .encode(ByteOrder::Little)
        .expect("encode")
}

fn ipv4_checksum(header: &[u8]) -> u16 {
    let mut sum = 0u32;
    for chunk in header.chunks(2) {
        sum += u32::from(u16::from_be_bytes([chunk[0], chunk[1]]));
    }
    while sum > 0xffff {
        sum = (sum & 0xffff) + (sum >> 16);
    }
    !(sum as u16)
}

fn udp_frame(src_port: u16, dst_port: u16, payload: &[u8]) -> Vec<u8> {
    let mut frame = Vec::new();
    frame.extend_from_slice(&[0xff; 6]);
    frame.extend_from_slice(&[0x02, 0, 0, 0, 0, 0x01]);
    frame.extend_from_slice(&0x0800u16.to_be_bytes());

    let udp_len = 8 + payload.len() as u16;
    let mut ip = Vec::with_capacity(20);
    ip.extend_from_slice(&[0x45, 0]);
    ip.extend_from_slice(&(20 + udp_len).to_be_bytes());
    ip.extend_from_slice(&[0, 0, 0, 0, 64, 17, 0, 0]);
    ip.extend_from_slice(&[192, 168, 1, 10]);
    ip.extend_from_slice(&[192, 168, 1, 255]);
    let checksum = ipv4_checksum(&ip);
    ip[10..12].copy_from_slice(&checksum.to_be_bytes());
    frame.extend_from_slice(&ip);

    frame.extend_from_slice(&src_port.to_be_bytes());
    frame.extend_from_slice(&dst_port.to_be_bytes());
    frame.extend_from_slice(&udp_len.to_be_bytes());
    frame.extend_from_slice(&0u16.to_be_bytes());
    frame.extend_from_slice(payload);
    frame
}

fn pcapng_block(block_type: u32, body: &[u8]) -> Vec<u8> {
    let total_len = (12 + body.len()) as u32;
    let mut block = Vec::new();
    block.extend_from_slice(&block_type.to_le_bytes());
    block.extend_from_slice(&total_len.to_le_bytes());
    block.extend_from_slice(body);
    block.extend_from_slice(&total_len.to_le_bytes());
    block
}

fn write_capture(path: &Path, frames: &[Vec<u8>]) {
    let mut shb = Vec::new();
    shb.extend_from_slice(&0x1A2B3C4Du32.to_le_bytes());
    shb.extend_from_slice(&1u16.to_le_bytes());
    shb.extend_from_slice(&0u16.to_le_bytes());
    shb.extend_from_slice(&(-1i64).to_le_bytes());
    let mut idb = Vec::new();
    idb.extend_from_slice(&1u16.to_le_bytes());
    idb.extend_from_slice(&0u16.to_le_bytes());
    idb.extend_from_slice(&65535u32.to_le_bytes());

    let mut output = pcapng_block(0x0A0D0D0A, &shb);
    output.extend_from_slice(&pcapng_block(1, &idb));
    for (idx, frame) in frames.iter().enumerate() {
        let ts_us = 1_700_000_000_000_000u64 + idx as u64 * 50_000;
        let mut epb = Vec::new();
        epb.extend_from_slice(&0u32.to_le_bytes());
        epb.extend_from_slice(&((ts_us >> 32) as u32).to_le_bytes());
        epb.extend_from_slice(&(ts_us as u32).to_le_bytes());
        epb.extend_from_slice(&(frame.len() as u32).to_le_bytes());
        epb.extend_from_slice(&(frame.len() as u32).to_le_bytes());
        epb.extend_from_slice(frame);
        epb.resize(epb.len().next_multiple_of(4), 0);
        output.extend_from_slice(&pcapng_block(6, &epb));
    }
    std::fs::write(path, output).expect("write capture");
}

fn sample_capture(dir: &Path) -> PathBuf {
    let path = dir.join("input.pcapng");
    write_capture(
        &path,
        &[
            udp_frame(50000, 56700, &light_get()),
            udp_frame(50000, 56700, &light_get()[..20]),
            udp_frame(50001, 56800, &light_get()),
        ],
    );
    path
}

#[test]
fn help_supports_analyse_and_analyze() {
    cmd().args(["pcap", "analyse", "--help"]).assert().success();
    cmd().args(["pcap", "analyze", "--help"]).assert().success();
    cmd()
        .args(["decode", "--help"])
        .assert()
        .success()
        .stdout(contains("--byte-order"));
}

#[test]
fn version_reports_package_version() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn decode_prints_packet_json() {
    let assert = cmd().args(["decode", GET_SERVICE_HEX]).assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout");
    let value: Value = serde_json::from_str(&stdout).expect("valid json");
    assert_eq!(value["header"]["frame"]["size"], 36);
    assert_eq!(value["header"]["frame"]["tagged"], true);
    assert_eq!(value["header"]["frame"]["source"], 2);
    assert_eq!(value["header"]["protocol_header"]["type"], 2);
    assert_eq!(value["payload"]["kind"], "empty");
}

#[test]
fn decode_accepts_split_arguments_and_big_endian() {
    let bytes = light_get();
    let header = Header::decode(&mut &bytes[..], ByteOrder::Little).expect("header");
    let big = Packet::new(header, Payload::Empty)
        .encode(ByteOrder::Big)
        .expect("encode");
    let hex: Vec<String> = big.chunks(4).map(|chunk| {
        chunk.iter().map(|b| format!("{b:02x}")).collect::<String>()
    }).collect();

    cmd()
        .arg("decode")
        .args(["--byte-order", "big", "--pretty"])
        .args(&hex)
        .assert()
        .success()
        .stdout(contains("\"target\": \"d0:73:d5:00:00:01\""));
}

#[test]
fn decode_unknown_type_shows_hint() {
    let mut hex = GET_SERVICE_HEX.to_string();
    hex.replace_range(hex.len() - 11.., "e7:03:00:00");

    cmd()
        .args(["decode", &hex])
        .assert()
        .code(2)
        .stderr(contains("error: decode failed").and(contains("hint: header decoded")));
}

#[test]
fn decode_rejects_bad_hex() {
    cmd()
        .args(["decode", "24:0"])
        .assert()
        .failure()
        .stderr(contains("odd number of hex digits"));
    cmd()
        .args(["decode", "24:00:00"])
        .assert()
        .failure()
        .stderr(contains("error:").and(contains("hint:")));
}

#[test]
fn missing_input_shows_error_and_hint() {
    let temp = TempDir::new().expect("tempdir");
    let missing = temp.path().join("missing.pcapng");
    let report = temp.path().join("report.json");

    cmd()
        .args(["pcap", "analyze"])
        .arg(missing)
        .arg("-o")
        .arg(report)
        .assert()
        .failure()
        .stderr(contains("error:").and(contains("hint:")));
}

#[test]
fn stdout_outputs_report_json() {
    let temp = TempDir::new().expect("tempdir");
    let input = sample_capture(temp.path());
    let assert = cmd()
        .args(["pcap", "analyze"])
        .arg(input)
        .arg("--stdout")
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout");
    let value: Value = serde_json::from_str(&stdout).expect("valid json");
    assert_eq!(value["tool"]["name"], "lifxwire");
    assert_eq!(value["capture_summary"]["packets_total"], 3);
    assert_eq!(value["capture_summary"]["lifx_packets"], 2);
    assert_eq!(value["messages"][0]["name"], "LightGet");
    assert_eq!(value["clients"][0]["source"], 42);
}

#[test]
fn any_port_includes_other_ports() {
    let temp = TempDir::new().expect("tempdir");
    let input = sample_capture(temp.path());
    let assert = cmd()
        .args(["pcap", "analyse"])
        .arg(input)
        .args(["--stdout", "--any-port"])
        .assert()
        .success();
    let value: Value = serde_json::from_slice(&assert.get_output().stdout).expect("valid json");
    assert_eq!(value["capture_summary"]["lifx_packets"], 3);
    assert_eq!(value["messages"][0]["count"], 2);
}

#[test]
fn port_and_any_port_conflict() {
    let temp = TempDir::new().expect("tempdir");
    let input = sample_capture(temp.path());

    cmd()
        .args(["pcap", "analyze"])
        .arg(input)
        .args(["--stdout", "--port", "56800", "--any-port"])
        .assert()
        .failure()
        .stderr(contains("error:"));
}

#[test]
fn stdout_and_report_conflict() {
    let temp = TempDir::new().expect("tempdir");
    let input = sample_capture(temp.path());
    let report = temp.path().join("report.json");

    cmd()
        .args(["pcap", "analyze"])
        .arg(input)
        .arg("--stdout")
        .arg("-o")
        .arg(report)
        .assert()
        .failure()
        .stderr(contains("error:"));
}

#[test]
fn report_written_and_quiet_suppresses_ok_message() {
    let temp = TempDir::new().expect("tempdir");
    let input = sample_capture(temp.path());
    let report = temp.path().join("out").join("report.json");

    cmd()
        .args(["pcap", "analyze"])
        .arg(&input)
        .arg("-o")
        .arg(&report)
        .arg("--quiet")
        .assert()
        .success()
        .stderr(contains("OK:").not());
    let value: Value =
        serde_json::from_str(&std::fs::read_to_string(&report).expect("report")).expect("json");
    assert_eq!(value["report_version"], 1);
}

#[test]
fn report_path_must_differ_from_input() {
    let temp = TempDir::new().expect("tempdir");
    let input = sample_capture(temp.path());

    cmd()
        .args(["pcap", "analyze"])
        .arg(&input)
        .arg("-o")
        .arg(&input)
        .assert()
        .failure()
        .stderr(contains("report path must differ from input"));
}

#[test]
fn list_violations_outputs_ids() {
    let temp = TempDir::new().expect("tempdir");
    let input = sample_capture(temp.path());
    let report = temp.path().join("report.json");

    cmd()
        .args(["pcap", "analyze"])
        .arg(input)
        .arg("-o")
        .arg(report)
        .arg("--list-violations")
        .assert()
        .success()
        .stderr(contains("Compliance violations:").and(contains("lifx LX-TOO-SHORT [error] (1)")));
}

#[test]
fn strict_fails_when_violations_present() {
    let temp = TempDir::new().expect("tempdir");
    let input = sample_capture(temp.path());
    let report = temp.path().join("report.json");

    cmd()
        .args(["pcap", "analyze"])
        .arg(input)
        .arg("-o")
        .arg(report)
        .arg("--strict")
        .assert()
        .code(2)
        .stderr(contains("compliance violations detected"));
}

#[test]
fn glob_pattern_resolves_single_capture() {
    let temp = TempDir::new().expect("tempdir");
    sample_capture(temp.path());
    let pattern = temp.path().join("*.pcapng");

    cmd()
        .args(["pcap", "analyze"])
        .arg(pattern)
        .arg("--stdout")
        .assert()
        .success();
}

#[test]
fn json_log_format_writes_to_stderr() {
    let temp = TempDir::new().expect("tempdir");
    let input = sample_capture(temp.path());

    let assert = cmd()
        .args(["--log-level", "info", "--log-format", "json", "pcap", "analyze"])
        .arg(input)
        .arg("--stdout")
        .assert()
        .success()
        .stderr(contains("\"capture analysed\""));
    let _: Value = serde_json::from_slice(&assert.get_output().stdout).expect("stdout stays json");
}
