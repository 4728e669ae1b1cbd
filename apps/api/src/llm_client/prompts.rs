// Prompt text for the assistant. Kept deliberately plain; response handling
// does not rely on the model following it.

use serde_json::Value;

pub const ENHANCE_SYSTEM: &str =
    "You are a helpful assistant that enhances resume content and returns valid JSON.";

pub const EDIT_SYSTEM: &str = "You are a helpful assistant that modifies LaTeX code.";

pub const ENHANCE_TEMPERATURE: f32 = 0.7;
/// Code edits want less variation.
pub const EDIT_TEMPERATURE: f32 = 0.3;

pub fn enhance_prompt(template_description: &str, record: &Value) -> String {
    let data = serde_json::to_string_pretty(record).unwrap_or_else(|_| record.to_string());
    format!(
        "Review the resume data below and make it more professional, impactful and ATS-friendly.\n\
         Selected template: {template_description}\n\
         Target: a single page.\n\n\
         Resume data:\n{data}\n\n\
         Write a 2-3 sentence summary if it is missing. Give each role 3-4 bullet points \
         with strong action verbs. Group skills into 2-4 categories. Avoid characters that \
         break LaTeX.\n\
         Return ONLY raw JSON with exactly the same structure as the input. No markdown."
    )
}

pub fn edit_prompt(markup: &str, instruction: &str) -> String {
    format!(
        "Modify the LaTeX resume below according to the request.\n\n\
         Request:\n\"{instruction}\"\n\n\
         Current LaTeX:\n{markup}\n\n\
         Keep the template's layout and header structure. Do not remove sections unless asked. \
         The result must compile.\n\
         Return ONLY the raw LaTeX, starting at \\documentclass. No markdown."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_prompts_embed_their_inputs() {
        let prompt = enhance_prompt("Classic", &json!({"personalInfo": {"name": "Ada"}}));
        assert!(prompt.contains("Selected template: Classic"));
        assert!(prompt.contains("\"name\": \"Ada\""));

        let prompt = edit_prompt("\\documentclass{article}", "shorten it");
        assert!(prompt.contains("\"shorten it\""));
        assert!(prompt.contains("\\documentclass{article}"));
    }
}
