fn main() {
    println!("cargo:rerun-if-env-changed=RAINSTORM_BUILD");
    println!("cargo:rerun-if-env-changed=GITHUB_SHA");

    let build_id = match std::env::var("RAINSTORM_BUILD") {
        Ok(v) if !v.is_empty() => v,
        _ => infer_build_id(),
    };

    println!("cargo:rustc-env=RAINSTORM_BUILD={}", build_id);
}

fn short_sha() -> Option<String> {
    let v = std::env::var("GITHUB_SHA").ok()?;
    let short: String = v.trim().chars().take(7).collect();
    if !short.is_empty() && short.chars().all(|c| c.is_ascii_hexdigit()) {
        Some(short.to_ascii_lowercase())
    } else {
        None
    }
}

fn infer_build_id() -> String {
    let os = std::env::var("CARGO_CFG_TARGET_OS").unwrap_or_else(|_| "unknown".to_string());
    let arch = std::env::var("CARGO_CFG_TARGET_ARCH").unwrap_or_else(|_| "unknown".to_string());
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string());

    match short_sha() {
        Some(sha) => format!("{os}-{arch}-{profile}-{sha}"),
        None => format!("{os}-{arch}-{profile}"),
    }
}
