//! Compiled-in prompt texts and prompt assembly.

use std::str::FromStr;

use metaphora_core::{enhance_system_prompt, generate_prompt_section, MetaphorHints};

/// System prompt with the full metaphor-level taxonomy written in.
pub const ENHANCED_SYSTEM_PROMPT: &str = include_str!("../prompts/enhanced_system.txt");

/// Plain classifier prompt; the analyzer's section is spliced into it in
/// [`PromptMode::Augmented`].
pub const BASE_SYSTEM_PROMPT: &str = include_str!("../prompts/base_system.txt");

pub const USER_PROMPT_TEMPLATE: &str = include_str!("../prompts/user_template.txt");

const DESCRIPTION_SLOT: &str = "{description}";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PromptMode {
    #[default]
    Enhanced,
    Augmented,
}

impl PromptMode {
    pub fn system_prompt(self) -> String {
        match self {
            PromptMode::Enhanced => ENHANCED_SYSTEM_PROMPT.to_string(),
            PromptMode::Augmented => {
                enhance_system_prompt(BASE_SYSTEM_PROMPT, &generate_prompt_section())
            }
        }
    }
}

impl FromStr for PromptMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "enhanced" => Ok(PromptMode::Enhanced),
            "augmented" => Ok(PromptMode::Augmented),
            other => Err(format!("unknown prompt mode '{other}' (expected enhanced or augmented)")),
        }
    }
}

/// User message for one description, with a hint line when the analyzer saw a
/// meta-metaphor.
pub fn build_user_prompt(description: &str, hints: &MetaphorHints) -> String {
    let mut prompt = USER_PROMPT_TEMPLATE.trim_end().replace(DESCRIPTION_SLOT, description);
    if hints.meta_metaphor_present {
        let dominant = hints
            .dominant_theory
            .map(|t| t.tag().to_string())
            .unwrap_or_else(|| "None".to_string());
        prompt.push_str(&format!(
            "\n\nПОДСКАЗКА: Обнаружены метафоры метафоры. Доминирующая теория: {dominant}"
        ));
    }
    prompt
}
