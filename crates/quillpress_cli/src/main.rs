//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `quillpress_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    println!("quillpress_core ping={}", quillpress_core::ping());
    println!("quillpress_core version={}", quillpress_core::core_version());
}
