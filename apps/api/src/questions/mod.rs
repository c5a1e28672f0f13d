// Question Generation — turns job metadata into the interview question set.
// All LLM calls go through llm_client — no direct API calls here.

pub mod generator;
pub mod prompts;
