// Feedback Scoring — rates one transcribed answer against its question.
// All LLM calls go through llm_client — no direct API calls here.

pub mod prompts;
pub mod scorer;
