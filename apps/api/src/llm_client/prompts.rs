// Shared prompt fragments.
// Each service that needs AI calls defines its own prompts.rs alongside it.
// This file contains cross-cutting fragments only.

/// Placeholder that service templates use for [`JSON_ONLY_INSTRUCTION`].
pub const JSON_ONLY_PLACEHOLDER: &str = "{json_only_instruction}";

/// Instruction that enforces a bare JSON object reply.
pub const JSON_ONLY_INSTRUCTION: &str =
    "Respond with ONLY a JSON object. No explanations, no markdown, just the JSON.";

/// Fills the JSON-only placeholder in a system prompt template.
pub fn with_json_only(template: &str) -> String {
    template.replace(JSON_ONLY_PLACEHOLDER, JSON_ONLY_INSTRUCTION)
}
