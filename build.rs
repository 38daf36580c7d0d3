/// Bake the compilation target triple into the binary.
///
/// `coderefine version` prints it next to the crate version.
fn main() {
    let target = std::env::var("TARGET").unwrap_or_else(|_| "unknown".to_string());
    println!("cargo:rustc-env=CODEREFINE_TARGET={target}");
    println!("cargo:rerun-if-changed=build.rs");
}
