//! Prompt assembly and response clean-up

/// Instruction that opens every prompt
pub const DEFAULT_INSTRUCTION: &str =
    "You are a helpful chatbot answers questions from 'User' about Washington and Lee University.";

/// Prompt sent instead of the conversation when it does not fit the context
pub const OVERFLOW_PROMPT: &str = "Instruction: Say 'Input exceeded context size, please clear the chat history and retry!' Output:";

pub const MIN_NEW_TOKENS: usize = 8;
pub const MAX_NEW_TOKENS: usize = 128;
pub const DEFAULT_MAX_NEW_TOKENS: usize = 25;
pub const DEFAULT_CONTEXT_LENGTH: usize = 2048;

/// Chat settings
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Text placed after `Instruction:` at the top of the prompt
    pub instruction: String,

    /// Upper bound on generated tokens, kept within `MIN_NEW_TOKENS..=MAX_NEW_TOKENS`
    pub max_new_tokens: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            instruction: DEFAULT_INSTRUCTION.to_string(),
            max_new_tokens: DEFAULT_MAX_NEW_TOKENS,
        }
    }
}

impl ChatConfig {
    /// Set the instruction
    pub fn instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instruction = instruction.into();
        self
    }

    /// Set the reply length, clamped to the supported range
    pub fn max_new_tokens(mut self, max_new_tokens: usize) -> Self {
        self.max_new_tokens = max_new_tokens.clamp(MIN_NEW_TOKENS, MAX_NEW_TOKENS);
        self
    }
}

/// One completed exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub user: String,
    pub assistant: String,
}

/// Assemble the plain-text prompt for `message` after `history`
pub fn build_prompt(instruction: &str, history: &[ChatTurn], message: &str) -> String {
    let mut prompt = format!("Instruction: {}\n", instruction);
    for turn in history {
        prompt.push_str("User: ");
        prompt.push_str(&turn.user);
        prompt.push('\n');
        prompt.push_str("Assistant: ");
        prompt.push_str(&turn.assistant);
        prompt.push('\n');
    }
    prompt.push_str("User: ");
    prompt.push_str(message);
    prompt.push('\n');
    prompt.push_str("Output:");
    prompt
}

/// Replace `prompt` with [`OVERFLOW_PROMPT`] when it leaves no room for the reply
pub fn guard_prompt(
    prompt: String,
    prompt_tokens: usize,
    context_length: usize,
    max_new_tokens: usize,
) -> String {
    if prompt_tokens >= context_length.saturating_sub(max_new_tokens) {
        OVERFLOW_PROMPT.to_string()
    } else {
        prompt
    }
}

/// Strip role echoes from accumulated model output
///
/// Anything from the first `User:` on is dropped. When `Assistant:` remains,
/// only the text between its first and second occurrence is kept.
pub fn clean_response(text: &str) -> String {
    let mut response = text.trim();

    if let Some(index) = response.find("User:") {
        response = response[..index].trim();
    }

    if let Some(index) = response.find("Assistant:") {
        let after = &response[index + "Assistant:".len()..];
        response = after.split("Assistant:").next().unwrap_or(after).trim();
    }

    response.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn(user: &str, assistant: &str) -> ChatTurn {
        ChatTurn {
            user: user.to_string(),
            assistant: assistant.to_string(),
        }
    }

    #[test]
    fn test_build_prompt_without_history() {
        let prompt = build_prompt("Be brief.", &[], "What is W&L?");
        assert_eq!(prompt, "Instruction: Be brief.\nUser: What is W&L?\nOutput:");
    }

    #[test]
    fn test_build_prompt_with_history() {
        let history = vec![turn("Hi", "Hello!"), turn("Where is it?", "Lexington.")];
        let prompt = build_prompt(DEFAULT_INSTRUCTION, &history, "When was it founded?");

        assert_eq!(
            prompt,
            format!(
                "Instruction: {}\nUser: Hi\nAssistant: Hello!\nUser: Where is it?\nAssistant: Lexington.\nUser: When was it founded?\nOutput:",
                DEFAULT_INSTRUCTION
            )
        );
    }

    #[test]
    fn test_guard_prompt() {
        let prompt = "Instruction: x\nUser: y\nOutput:".to_string();

        assert_eq!(guard_prompt(prompt.clone(), 10, 2048, 25), prompt);
        assert_eq!(guard_prompt(prompt.clone(), 2023, 2048, 25), OVERFLOW_PROMPT);
        assert_eq!(guard_prompt(prompt.clone(), 2022, 2048, 25), prompt);
        assert_eq!(guard_prompt(prompt, 0, 16, 25), OVERFLOW_PROMPT);
    }

    #[test]
    fn test_clean_response() {
        assert_eq!(clean_response("  It is in Virginia.  "), "It is in Virginia.");
        assert_eq!(
            clean_response(" It is in Virginia.\nUser: and then?"),
            "It is in Virginia."
        );
        assert_eq!(
            clean_response("Assistant: Founded in 1749. Assistant: again"),
            "Founded in 1749."
        );
        assert_eq!(clean_response("noise Assistant: Lexington"), "Lexington");
        assert_eq!(clean_response("Assistant: ok\nUser: more Assistant: x"), "ok");
        assert_eq!(clean_response(""), "");
    }

    #[test]
    fn test_max_new_tokens_is_clamped() {
        assert_eq!(ChatConfig::default().max_new_tokens, 25);
        assert_eq!(ChatConfig::default().max_new_tokens(1).max_new_tokens, 8);
        assert_eq!(ChatConfig::default().max_new_tokens(500).max_new_tokens, 128);
        assert_eq!(ChatConfig::default().max_new_tokens(64).max_new_tokens, 64);
    }
}
