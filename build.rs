use std::process::Command;

fn main() {
    // Short commit hash reported by the `/` endpoint
    let build_hash = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|hash| hash.trim().to_string())
        .filter(|hash| !hash.is_empty())
        .unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env=BUILD_HASH={}", build_hash);
    println!("cargo:rerun-if-changed=.git/HEAD");
}
