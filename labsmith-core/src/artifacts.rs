//! Artifact splitting
//!
//! Writes the solution document to disk and pulls every fenced code block out
//! into its own source file, named by position and extension by language tag.

use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// File name of the full solution document
pub const SOLUTION_FILE: &str = "solution.md";
/// Subdirectory holding extracted source files
pub const SOURCE_DIR: &str = "src";

// Opening fence with an optional tag, lazily matched body, closing fence on its own line.
static CODE_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*```([^\s`]*)[^\n]*\n([\s\S]*?)^[ \t]*```[ \t]*\r?$")
        .expect("invalid code fence regex")
});

/// A fenced code region found in a solution document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    /// Tag as written after the opening fence (may be empty)
    pub language: String,
    pub body: String,
}

/// Paths written by [`save`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedSolution {
    /// The full solution document
    pub document: PathBuf,
    /// One file per code block, in order of appearance
    pub sources: Vec<PathBuf>,
}

/// Find every fenced code block in `text`, in order of appearance.
pub fn extract_code_blocks(text: &str) -> Vec<CodeBlock> {
    CODE_FENCE
        .captures_iter(text)
        .map(|caps| {
            let body = caps.get(2).map_or("", |m| m.as_str());
            let body = body
                .strip_suffix('\n')
                .map(|b| b.strip_suffix('\r').unwrap_or(b))
                .unwrap_or(body);
            CodeBlock {
                language: caps.get(1).map_or("", |m| m.as_str()).to_string(),
                body: body.to_string(),
            }
        })
        .collect()
}

/// File extension for a language tag, matched case-insensitively.
pub fn extension_for(language: &str) -> &'static str {
    match language.to_lowercase().as_str() {
        "python" | "py" => ".py",
        "c" => ".c",
        "cpp" | "c++" => ".cpp",
        "java" => ".java",
        "javascript" | "js" => ".js",
        "bash" | "shell" | "sh" => ".sh",
        _ => ".txt",
    }
}

/// File name for the block at `index`.
///
/// The first block becomes the `main` entry point unless its body already
/// mentions "main"; every other block is `module_{index + 1}`.
pub fn file_name_for(index: usize, block: &CodeBlock) -> String {
    let extension = extension_for(&block.language);
    if index == 0 && !block.body.to_lowercase().contains("main") {
        format!("main{}", extension)
    } else {
        format!("module_{}{}", index + 1, extension)
    }
}

/// Write `solution` and its code blocks under `output_dir`.
///
/// Zero code blocks is a normal outcome: only the document is written and no
/// source directory is created. Filesystem errors propagate.
pub fn save(solution: &str, output_dir: &Path, experiment_type: &str) -> Result<SavedSolution> {
    fs::create_dir_all(output_dir).map_err(|e| io_error(e, output_dir))?;

    let document = output_dir.join(SOLUTION_FILE);
    write_file(&document, solution)?;

    let blocks = extract_code_blocks(solution);
    let mut sources = Vec::with_capacity(blocks.len());
    if !blocks.is_empty() {
        let source_dir = output_dir.join(SOURCE_DIR);
        fs::create_dir_all(&source_dir).map_err(|e| io_error(e, &source_dir))?;

        for (index, block) in blocks.iter().enumerate() {
            let path = source_dir.join(file_name_for(index, block));
            write_file(&path, &block.body)?;
            info!(path = %path.display(), language = %block.language, "source file written");
            sources.push(path);
        }
    }

    info!(
        path = %document.display(),
        experiment_type,
        source_files = sources.len(),
        "solution saved"
    );
    Ok(SavedSolution { document, sources })
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).map_err(|e| io_error(e, path))
}

fn io_error(err: std::io::Error, path: &Path) -> Error {
    Error::from(err)
        .with_operation("artifacts::save")
        .with_context("path", path.display().to_string())
}
