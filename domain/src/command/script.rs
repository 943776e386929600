//! Format contract for proposed generation scripts.

use thiserror::Error;

pub const SCRIPT_OPEN: &str = "```python";
pub const SCRIPT_CLOSE: &str = "```";
pub const ENTRY_POINT: &str = "def generate_experiments():";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScriptFormatError {
    #[error("Code must start with '```python'")]
    MissingOpen,

    #[error("Code must end with '```'")]
    MissingClose,

    #[error("Code must contain 'def generate_experiments():' function")]
    MissingEntryPoint,
}

/// Check the fence markers and entry point of a proposal
pub fn check_format(code: &str) -> Result<(), ScriptFormatError> {
    if !code.starts_with(SCRIPT_OPEN) {
        return Err(ScriptFormatError::MissingOpen);
    }
    if !code.ends_with(SCRIPT_CLOSE) || code.len() < SCRIPT_OPEN.len() + SCRIPT_CLOSE.len() {
        return Err(ScriptFormatError::MissingClose);
    }
    if !code.contains(ENTRY_POINT) {
        return Err(ScriptFormatError::MissingEntryPoint);
    }
    Ok(())
}

/// The script body between the opening fence and the next closing fence
pub fn extract_script(code: &str) -> Result<&str, ScriptFormatError> {
    let start = code.find(SCRIPT_OPEN).ok_or(ScriptFormatError::MissingOpen)? + SCRIPT_OPEN.len();
    let end = code[start..]
        .find(SCRIPT_CLOSE)
        .ok_or(ScriptFormatError::MissingClose)?;
    Ok(&code[start..start + end])
}

#[cfg(test)]
mod tests {
    use super::*;

    const CODE: &str = "```python\nimport random\n\ndef generate_experiments():\n    return [{\"lr\": 0.1}]\n```";

    #[test]
    fn test_check_format() {
        assert_eq!(check_format(CODE), Ok(()));
        assert_eq!(check_format("def generate_experiments():"), Err(ScriptFormatError::MissingOpen));
        assert_eq!(
            check_format("```python\ndef generate_experiments():"),
            Err(ScriptFormatError::MissingClose)
        );
        assert_eq!(
            check_format("```python\ndef main(): pass\n```"),
            Err(ScriptFormatError::MissingEntryPoint)
        );
        assert_eq!(check_format("```python"), Err(ScriptFormatError::MissingClose));
    }

    #[test]
    fn test_extract_script() {
        let body = extract_script(CODE).unwrap();
        assert!(body.starts_with("\nimport random"));
        assert!(body.ends_with("return [{\"lr\": 0.1}]\n"));
    }
}
