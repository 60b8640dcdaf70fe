// Proposals: persistence, edits and co-pilot refinement around the timeline engine.
// All LLM calls go through llm_client via the ProposalCopilot seam.

pub mod copilot;
pub mod handlers;
pub mod models;
pub mod prompts;
pub mod repository;
pub mod service;
