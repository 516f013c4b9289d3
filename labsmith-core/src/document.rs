//! Requirement document loading
//!
//! Plain-text files are read as UTF-8. Word documents (`.docx`) are handed to
//! the external `pandoc` converter, which prints their body text.

use crate::error::{Error, Result};
use std::path::Path;
use std::process::Command;
use tracing::debug;

const CONVERTER: &str = "pandoc";

/// Read the experiment description stored at `path`.
pub fn read_requirement(path: &Path) -> Result<String> {
    if is_docx(path) {
        extract_docx_text(path)
    } else {
        std::fs::read_to_string(path).map_err(|e| {
            Error::from(e)
                .with_operation("document::read_requirement")
                .with_context("path", path.display().to_string())
        })
    }
}

fn is_docx(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| ext.eq_ignore_ascii_case("docx"))
}

fn extract_docx_text(path: &Path) -> Result<String> {
    let display = path.display().to_string();
    debug!(path = %path.display(), converter = CONVERTER, "extracting text from Word document");

    let output = Command::new(CONVERTER)
        .args(["--to", "plain", "--wrap", "none"])
        .arg(path)
        .output()
        .map_err(|e| {
            Error::extraction_failed(display.clone(), format!("failed to run {}", CONVERTER))
                .with_operation("document::extract_docx_text")
                .set_source(e)
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(Error::extraction_failed(
            display,
            format!("{} exited with {}", CONVERTER, output.status),
        )
        .with_operation("document::extract_docx_text")
        .with_context("stderr", stderr));
    }

    String::from_utf8(output.stdout).map_err(|e| {
        Error::extraction_failed(display, "converter output is not valid UTF-8")
            .with_operation("document::extract_docx_text")
            .set_source(e)
    })
}
