//! Solution generation
//!
//! Turns the original requirement text plus its analysis into a generation
//! prompt and returns the model's solution document untouched.

use crate::analysis::AnalysisRecord;
use crate::client::ChatClient;
use crate::error::Result;
use tracing::info;

pub const GENERATION_TEMPERATURE: f32 = 0.3;
pub const GENERATION_MAX_TOKENS: u32 = 4000;

/// Build the generation prompt.
pub fn generation_prompt(analysis: &AnalysisRecord, experiment_text: &str) -> String {
    format!(
        r#"Based on the following experiment requirements and analysis, generate a complete experiment solution with code and explanations.

Experiment requirements:
{}

Experiment analysis:
{}

The solution must include:
1. Complete implementation code
2. An explanation of the code structure
3. A description of the implementation approach
4. Usage examples
5. Test cases

Implement the solution in {}. The code should follow modern conventions and include appropriate comments and documentation."#,
        experiment_text,
        analysis.to_value(),
        analysis.language_or_default()
    )
}

/// Generates solution documents through the chat-completion API
pub struct Generator<'a> {
    client: &'a ChatClient,
}

impl<'a> Generator<'a> {
    pub fn new(client: &'a ChatClient) -> Self {
        Self { client }
    }

    /// Generate a solution document. The text is returned as the model wrote it.
    pub async fn generate(&self, analysis: &AnalysisRecord, experiment_text: &str) -> Result<String> {
        info!(language = analysis.language_or_default(), "generating solution");
        let prompt = generation_prompt(analysis, experiment_text);
        let solution = self
            .client
            .complete(&prompt, GENERATION_MAX_TOKENS, GENERATION_TEMPERATURE)
            .await
            .map_err(|e| e.with_operation("generator::generate"))?;

        info!(chars = solution.chars().count(), "solution generated");
        Ok(solution)
    }
}
