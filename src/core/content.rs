/// Longest message accepted in a match conversation
pub const MAX_MATCH_MESSAGE_CHARS: usize = 1000;
/// Longest message accepted in the direct channel
pub const MAX_DIRECT_MESSAGE_CHARS: usize = 2000;

/// Default and maximum page sizes when listing match messages
pub const DEFAULT_MESSAGE_LIMIT: i64 = 50;
pub const MAX_MESSAGE_LIMIT: i64 = 200;

/// Why message content was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentError {
    Empty,
    TooLong { max_chars: usize },
}

impl ContentError {
    pub fn message(&self) -> String {
        match self {
            ContentError::Empty => "Write a message before sending.".to_string(),
            ContentError::TooLong { max_chars } => {
                format!("Messages must be at most {} characters.", max_chars)
            }
        }
    }
}

/// Trim message content and check it against a channel's length limit
///
/// Length is counted in characters, not bytes, after trimming.
pub fn normalize_content(content: &str, max_chars: usize) -> Result<&str, ContentError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(ContentError::Empty);
    }
    if trimmed.chars().count() > max_chars {
        return Err(ContentError::TooLong { max_chars });
    }
    Ok(trimmed)
}

/// Clamp a requested page size into 1..=200, defaulting to 50
#[inline]
pub fn clamp_limit(requested: Option<i64>) -> i64 {
    match requested {
        Some(limit) if limit > 0 => limit.min(MAX_MESSAGE_LIMIT),
        _ => DEFAULT_MESSAGE_LIMIT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trims_content() {
        assert_eq!(normalize_content("  hello \n", 10), Ok("hello"));
    }

    #[test]
    fn test_rejects_blank() {
        assert_eq!(normalize_content("", 10), Err(ContentError::Empty));
        assert_eq!(normalize_content(" \t\n ", 10), Err(ContentError::Empty));
    }

    #[test]
    fn test_counts_characters() {
        let accented = "é".repeat(MAX_MATCH_MESSAGE_CHARS);
        assert!(normalize_content(&accented, MAX_MATCH_MESSAGE_CHARS).is_ok());
        let too_long = "a".repeat(MAX_MATCH_MESSAGE_CHARS + 1);
        assert_eq!(
            normalize_content(&too_long, MAX_MATCH_MESSAGE_CHARS),
            Err(ContentError::TooLong { max_chars: MAX_MATCH_MESSAGE_CHARS })
        );
    }

    #[test]
    fn test_clamp_limit() {
        assert_eq!(clamp_limit(None), 50);
        assert_eq!(clamp_limit(Some(0)), 50);
        assert_eq!(clamp_limit(Some(-3)), 50);
        assert_eq!(clamp_limit(Some(10)), 10);
        assert_eq!(clamp_limit(Some(5000)), 200);
    }
}
