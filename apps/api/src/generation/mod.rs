// Job-description generation and analysis.
// Every AI call goes through llm_client; any failure there ends in fallback.

pub mod fallback;
pub mod handlers;
pub mod models;
pub mod normalizer;
pub mod orchestrator;
pub mod prompts;
