use std::env;
use std::process::Command;

const UNKNOWN: &str = "unknown";

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=GITHUB_SHA");
    println!("cargo:rerun-if-env-changed=SOURCE_DATE_EPOCH");

    let commit_full = env::var("GITHUB_SHA")
        .ok()
        .filter(|v| !v.is_empty())
        .or_else(|| git(&["rev-parse", "HEAD"]))
        .unwrap_or_else(|| UNKNOWN.to_string());
    let commit_short = if commit_full == UNKNOWN {
        UNKNOWN.to_string()
    } else {
        commit_full.chars().take(7).collect()
    };
    let build_date = env::var("SOURCE_DATE_EPOCH")
        .ok()
        .filter(|v| !v.is_empty())
        .map(|epoch| format!("@{epoch}"))
        .or_else(|| git(&["log", "-1", "--format=%cI"]))
        .unwrap_or_else(|| UNKNOWN.to_string());

    println!("cargo:rustc-env=LIFXWIRE_BUILD_COMMIT={commit_short}");
    println!("cargo:rustc-env=LIFXWIRE_BUILD_COMMIT_FULL={commit_full}");
    println!("cargo:rustc-env=LIFXWIRE_BUILD_DATE={build_date}");
}

fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!value.is_empty()).then_some(value)
}
