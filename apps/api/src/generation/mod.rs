// Activity generation: prompt building, the upstream call, and output normalization.
// All LLM calls go through llm_client; nothing here talks to OpenAI directly.

pub mod generator;
pub mod handlers;
pub mod limits;
pub mod models;
pub mod prompts;
pub mod schema;
