// SPDX-License-Identifier: GPL-3.0-only

use std::process::Command;

fn main() {
    println!("cargo::rerun-if-changed=.git/HEAD");
    println!("cargo::rerun-if-changed=.git/refs/tags");
    println!("cargo::rerun-if-env-changed=KAMERA_VERSION");

    // Packagers (flatpak, distro builds) pin the version explicitly
    let version = std::env::var("KAMERA_VERSION").unwrap_or_else(|_| describe_version());

    println!("cargo::rustc-env=GIT_VERSION={}", version);
}

/// Version string shown on the About page.
///
/// - exact tag `v0.1.0` becomes `0.1.0-abcdef1`
/// - `v0.1.0-5-gabcdef1` (commits after a tag) becomes `0.1.0-dirty-abcdef1`
/// - no tags at all falls back to the package version plus the commit hash
fn describe_version() -> String {
    let commit = git(&["rev-parse", "--short", "HEAD"]).unwrap_or_else(|| "unknown".to_string());

    let Some(described) = git(&["describe", "--tags", "--match", "v*"]) else {
        return format!("{}-{}", env!("CARGO_PKG_VERSION"), commit);
    };
    let described = described.strip_prefix('v').unwrap_or(&described);

    let parts: Vec<&str> = described.rsplitn(3, '-').collect();
    match parts.as_slice() {
        [hash, _commits, base] => {
            let hash = hash.strip_prefix('g').unwrap_or(hash);
            format!("{}-dirty-{}", base, hash)
        }
        _ => format!("{}-{}", described, commit),
    }
}

fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!text.is_empty()).then_some(text)
}
