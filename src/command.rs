//! Caption command parsing.
//!
//! A caption triggers the pipeline only when its first token is `/explain`
//! or `/ai` (case-insensitive). Whatever follows the token becomes the
//! prompt, case preserved.

/// Prompt used when a command carries no text of its own.
pub const DEFAULT_PROMPT: &str = "describe this image";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Explain,
    Ai,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub kind: CommandKind,
    pub prompt: String,
}

/// Parse a caption. Returns `None` for anything that is not a command,
/// in which case the message is ignored entirely.
pub fn parse(caption: &str) -> Option<ParsedCommand> {
    let trimmed = caption.trim();
    let token = trimmed.split_whitespace().next()?;

    let kind = match token.to_lowercase().as_str() {
        "/explain" => CommandKind::Explain,
        "/ai" => CommandKind::Ai,
        _ => return None,
    };

    let rest = trimmed[token.len()..].trim();
    let prompt = if rest.is_empty() {
        DEFAULT_PROMPT.to_string()
    } else {
        rest.to_string()
    };

    Some(ParsedCommand { kind, prompt })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ai_with_prompt() {
        let cmd = parse("/ai describe cats").unwrap();
        assert_eq!(cmd.kind, CommandKind::Ai);
        assert_eq!(cmd.prompt, "describe cats");
    }

    #[test]
    fn test_explain_without_prompt_uses_default() {
        let cmd = parse("/EXPLAIN").unwrap();
        assert_eq!(cmd.kind, CommandKind::Explain);
        assert_eq!(cmd.prompt, DEFAULT_PROMPT);
    }

    #[test]
    fn test_plain_text_is_not_a_command() {
        assert!(parse("hello").is_none());
        assert!(parse("what is /ai").is_none());
        assert!(parse("").is_none());
        assert!(parse("   ").is_none());
    }

    #[test]
    fn test_case_insensitive_match_preserves_prompt_case() {
        let cmd = parse("/Ai What Is This").unwrap();
        assert_eq!(cmd.kind, CommandKind::Ai);
        assert_eq!(cmd.prompt, "What Is This");
    }

    #[test]
    fn test_surrounding_whitespace_is_trimmed() {
        let cmd = parse("  /explain   the sky  ").unwrap();
        assert_eq!(cmd.kind, CommandKind::Explain);
        assert_eq!(cmd.prompt, "the sky");
    }

    #[test]
    fn test_command_must_be_its_own_token() {
        // "/aix" is not "/ai" followed by a prompt.
        assert!(parse("/aix").is_none());
        assert!(parse("/explainer please").is_none());
    }
}
