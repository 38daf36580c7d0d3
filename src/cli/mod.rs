//! CLI command definitions and input helpers.
//!
//! Uses clap derive macros for argument definitions.

pub mod args;

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

/// Language name for a file extension, as the backend expects it.
pub fn language_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let language = match ext.as_str() {
        "py" | "pyw" => "python",
        "js" | "mjs" | "cjs" | "jsx" => "javascript",
        "ts" | "tsx" => "typescript",
        "java" => "java",
        "c" | "h" => "c",
        "cpp" | "cc" | "cxx" | "hpp" | "hh" => "cpp",
        "cs" => "csharp",
        "go" => "go",
        "rs" => "rust",
        "rb" => "ruby",
        "php" => "php",
        "swift" => "swift",
        "kt" | "kts" => "kotlin",
        _ => return None,
    };
    Some(language)
}

/// Read a source file, or stdin when the path is `-`.
pub async fn read_source(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let code = tokio::task::spawn_blocking(|| {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf).map(|_| buf)
        })
        .await
        .context("stdin reader panicked")?
        .context("failed to read code from stdin")?;
        return Ok(code);
    }
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))
}

/// Read one line from stdin without blocking the runtime. `None` at end of input.
pub async fn read_line() -> Result<Option<String>> {
    let line = tokio::task::spawn_blocking(|| {
        let mut buf = String::new();
        std::io::stdin().read_line(&mut buf).map(|n| (n > 0).then_some(buf))
    })
    .await
    .context("stdin reader panicked")?
    .context("failed to read from stdin")?;
    Ok(line)
}
