use std::env;
use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=GITHUB_SHA");
    println!("cargo:rerun-if-env-changed=DMXSYNC_BUILD_DATE");

    let commit_full = env::var("GITHUB_SHA")
        .ok()
        .filter(|v| !v.is_empty())
        .or_else(|| run_git(&["rev-parse", "HEAD"]));
    let commit_short = match commit_full.as_deref() {
        Some(full) => full.chars().take(7).collect(),
        None => "unknown".to_string(),
    };
    let commit_full = commit_full.unwrap_or_else(|| "unknown".to_string());

    // Reproducible builds pin the date from the environment.
    let build_date = env::var("DMXSYNC_BUILD_DATE")
        .ok()
        .filter(|v| !v.is_empty())
        .or_else(|| run_git(&["log", "-1", "--format=%cI"]))
        .unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env=DMXSYNC_BUILD_COMMIT={commit_short}");
    println!("cargo:rustc-env=DMXSYNC_BUILD_COMMIT_FULL={commit_full}");
    println!("cargo:rustc-env=DMXSYNC_BUILD_DATE={build_date}");
}

fn run_git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if value.is_empty() { None } else { Some(value) }
}
