//! Proposal co-pilot — the chat seam used to refine proposal sections.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::llm_client::{ChatMessage, LlmClient};
use crate::proposals::models::{ProposalContent, CORE_SECTIONS};
use crate::proposals::prompts::COPILOT_SYSTEM_TEMPLATE;

/// The co-pilot's answer: a message for the user plus replacement section texts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CopilotReply {
    pub reply: String,
    #[serde(default)]
    pub updates: BTreeMap<String, String>,
}

/// Pluggable co-pilot. Default: `LlmCopilot`.
#[async_trait]
pub trait ProposalCopilot: Send + Sync {
    /// `history` holds earlier turns of the same conversation, oldest first.
    async fn refine(
        &self,
        content: &ProposalContent,
        history: &[ChatMessage],
        message: &str,
    ) -> Result<CopilotReply, AppError>;
}

pub struct LlmCopilot {
    llm: LlmClient,
}

impl LlmCopilot {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl ProposalCopilot for LlmCopilot {
    async fn refine(
        &self,
        content: &ProposalContent,
        history: &[ChatMessage],
        message: &str,
    ) -> Result<CopilotReply, AppError> {
        let system = build_system_prompt(content)?;

        let mut messages = history.to_vec();
        messages.push(ChatMessage::user(message));

        self.llm
            .chat_json::<CopilotReply>(&system, &messages)
            .await
            .map_err(|e| AppError::Llm(format!("Co-pilot refinement failed: {e}")))
    }
}

/// Fills the system template with every core section plus any custom sections.
fn build_system_prompt(content: &ProposalContent) -> Result<String, AppError> {
    let mut sections: BTreeMap<&str, &str> = CORE_SECTIONS
        .iter()
        .filter_map(|key| content.section(key).map(|text| (*key, text)))
        .collect();
    for (key, text) in &content.additional_sections {
        sections.insert(key, text);
    }

    let proposal_json = serde_json::to_string_pretty(&sections)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize sections: {e}")))?;

    Ok(COPILOT_SYSTEM_TEMPLATE.replace("{proposal_json}", &proposal_json))
}
