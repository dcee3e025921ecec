use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

macro_rules! regex {
    ($pattern:expr) => {{
        static REGEX: Lazy<Regex> = Lazy::new(|| Regex::new($pattern).unwrap());
        &REGEX
    }};
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TitleError {
    #[error("meeting title is empty")]
    Empty,
    #[error("meeting title contains illegal character `{0}`")]
    IllegalCharacter(char),
}

/// Checks a meeting title against the allowed character set.
///
/// Letters (including the French accented ones), digits, apostrophes, commas
/// and spaces are accepted. Anything else is reported, never stripped.
pub fn validate_title(title: &str) -> Result<(), TitleError> {
    if title.is_empty() {
        return Err(TitleError::Empty);
    }

    match regex!("[^a-zA-Z0-9éèàêùç', ]").find(title) {
        Some(illegal) => Err(TitleError::IllegalCharacter(
            illegal.as_str().chars().next().unwrap_or_default(),
        )),
        None => Ok(()),
    }
}
