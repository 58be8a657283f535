use std::path::Path;
use std::process::Command;

/// Run git against the workspace root; `None` if git is missing or fails.
fn git(root: &Path, args: &[&str]) -> Option<String> {
    let out = Command::new("git").arg("-C").arg(root).args(args).output().ok()?;
    if !out.status.success() {
        return None;
    }
    Some(String::from_utf8_lossy(&out.stdout).trim().to_string())
}

fn main() {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let root = Path::new(&manifest_dir).join("..");

    // "<sha>" or "<sha>-dirty"; "unknown" outside a checkout (e.g. from a tarball).
    let build_id = match git(&root, &["rev-parse", "--short", "HEAD"]).filter(|s| !s.is_empty()) {
        Some(sha) => {
            let dirty = git(&root, &["status", "--porcelain", "--untracked-files=no"])
                .is_some_and(|s| !s.is_empty());
            if dirty { format!("{sha}-dirty") } else { sha }
        }
        None => "unknown".to_string(),
    };

    println!("cargo:rustc-env=CHAIRSIDE_BUILD_SHA={build_id}");
    println!("cargo:rerun-if-changed=../.git/HEAD");
    println!("cargo:rerun-if-changed=../.git/index");
}
