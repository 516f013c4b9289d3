//! # Labsmith Core
//!
//! Turns a free-text experiment description into a solution on disk.
//!
//! ## Pipeline
//! - **Document**: read the requirement text (plain text or `.docx`)
//! - **Analysis**: ask the model to classify the requirement, recovering JSON
//!   from unstructured answers
//! - **Generation**: ask the model for a full solution document
//! - **Artifacts**: write the document and split its code blocks into files
//!
//! Every stage runs sequentially; the two model calls share one
//! [`ChatClient`].

pub mod analysis;
pub mod artifacts;
pub mod client;
pub mod config;
pub mod document;
pub mod error;
pub mod generator;
pub mod recovery;

pub use analysis::{parse_analysis, AnalysisRecord, Analyzer};
pub use artifacts::{extract_code_blocks, save, CodeBlock, SavedSolution};
pub use client::ChatClient;
pub use config::{ClientConfig, ConfigOverrides};
pub use document::read_requirement;
pub use error::{Error, ErrorKind, Result};
pub use generator::Generator;
pub use recovery::recover_json;
