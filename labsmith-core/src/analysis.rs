//! Requirement analysis
//!
//! Asks the model to classify an experiment description and coerces whatever
//! comes back into an [`AnalysisRecord`].

use crate::client::ChatClient;
use crate::error::Result;
use crate::recovery::recover_json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::{info, warn};

pub const ANALYSIS_TEMPERATURE: f32 = 0.3;
pub const ANALYSIS_MAX_TOKENS: u32 = 2000;

/// Language used when the analysis does not name one
pub const DEFAULT_LANGUAGE: &str = "Python";

/// Structured classification of an experiment description.
///
/// All four fields are always populated; decoding fills gaps from
/// [`AnalysisRecord::fallback`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub experiment_type: String,
    pub main_goal: String,
    pub key_requirements: Vec<String>,
    pub programming_language: String,
}

impl AnalysisRecord {
    /// Placeholder record used when the model's answer cannot be read.
    pub fn fallback() -> Self {
        Self {
            experiment_type: "Unable to determine".into(),
            main_goal: "Complete the experiment requirements".into(),
            key_requirements: vec!["Implement the required functionality".into()],
            programming_language: DEFAULT_LANGUAGE.into(),
        }
    }

    /// Decode a parsed JSON value field by field.
    ///
    /// Missing, empty or wrongly-typed fields take the fallback value; a
    /// non-object decodes to the full fallback.
    pub fn from_value(value: &Value) -> Self {
        let fallback = Self::fallback();
        let Some(obj) = value.as_object() else {
            return fallback;
        };

        Self {
            experiment_type: text_field(obj, "experiment_type").unwrap_or(fallback.experiment_type),
            main_goal: text_field(obj, "main_goal").unwrap_or(fallback.main_goal),
            key_requirements: list_field(obj, "key_requirements")
                .unwrap_or(fallback.key_requirements),
            programming_language: text_field(obj, "programming_language")
                .unwrap_or(fallback.programming_language),
        }
    }

    pub fn to_value(&self) -> Value {
        json!({
            "experiment_type": self.experiment_type,
            "main_goal": self.main_goal,
            "key_requirements": self.key_requirements,
            "programming_language": self.programming_language,
        })
    }

    /// The language to implement in, defaulting to Python when blank.
    pub fn language_or_default(&self) -> &str {
        let language = self.programming_language.trim();
        if language.is_empty() {
            DEFAULT_LANGUAGE
        } else {
            language
        }
    }
}

fn text_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(String::from)
}

fn list_field(obj: &Map<String, Value>, key: &str) -> Option<Vec<String>> {
    let items: Vec<String> = match obj.get(key)? {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                Value::Bool(b) => Some(b.to_string()),
                _ => None,
            })
            .filter(|s| !s.trim().is_empty())
            .collect(),
        Value::String(s) => vec![s.clone()],
        _ => return None,
    };

    if items.iter().all(|s| s.trim().is_empty()) {
        None
    } else {
        Some(items)
    }
}

/// Build the classification prompt for `experiment_text`.
pub fn analysis_prompt(experiment_text: &str) -> String {
    format!(
        r#"Analyze the following experiment requirements and identify the experiment type, goal and key requirements.

Experiment requirements:
{}

Respond with a JSON object containing the following fields:
- experiment_type: the type of experiment (for example: data structures, algorithms, network programming)
- main_goal: the main goal of the experiment
- key_requirements: the key requirements (an array of strings)
- programming_language: the recommended programming language"#,
        experiment_text
    )
}

/// Turn a raw model answer into a record, recovering JSON when needed.
pub fn parse_analysis(raw: &str) -> AnalysisRecord {
    let value = match serde_json::from_str::<Value>(raw) {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "analysis response is not valid JSON, attempting recovery");
            recover_json(raw)
        }
    };
    AnalysisRecord::from_value(&value)
}

/// Classifies experiment descriptions through the chat-completion API
pub struct Analyzer<'a> {
    client: &'a ChatClient,
}

impl<'a> Analyzer<'a> {
    pub fn new(client: &'a ChatClient) -> Self {
        Self { client }
    }

    /// Classify `experiment_text`.
    ///
    /// Transport errors propagate; an unreadable answer degrades to the
    /// fallback record instead of failing.
    pub async fn analyze(&self, experiment_text: &str) -> Result<AnalysisRecord> {
        info!("analyzing experiment requirements");
        let prompt = analysis_prompt(experiment_text);
        let raw = self
            .client
            .complete(&prompt, ANALYSIS_MAX_TOKENS, ANALYSIS_TEMPERATURE)
            .await
            .map_err(|e| e.with_operation("analysis::analyze"))?;

        let record = parse_analysis(&raw);
        info!(experiment_type = %record.experiment_type, "analysis complete");
        Ok(record)
    }
}
