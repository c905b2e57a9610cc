//! Shared helper functions for CLI commands.

use std::io::{BufRead, Write};

use cep_race::RaceResult;

/// Prompt shown when no CEP is given on the command line.
pub const CEP_PROMPT: &str = "Enter the ZIP code: ";

/// Prompt on `output` and read one whitespace-delimited CEP from `input`.
pub fn prompt_cep(mut input: impl BufRead, mut output: impl Write) -> anyhow::Result<String> {
    write!(output, "{}", CEP_PROMPT)?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    normalize_cep(&line)
}

/// Trim surrounding whitespace, keeping only the first token.
pub fn normalize_cep(raw: &str) -> anyhow::Result<String> {
    match raw.split_whitespace().next() {
        Some(cep) => Ok(cep.to_string()),
        None => anyhow::bail!("No ZIP code provided"),
    }
}

/// Render a race result as the single output line.
pub fn render(result: &RaceResult, json: bool) -> anyhow::Result<String> {
    if json {
        Ok(serde_json::to_string(result)?)
    } else {
        Ok(result.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_cep() {
        let mut prompt = Vec::new();
        let cep = prompt_cep("  01001000 \n".as_bytes(), &mut prompt).unwrap();
        assert_eq!(cep, "01001000");
        assert_eq!(String::from_utf8(prompt).unwrap(), CEP_PROMPT);
    }

    #[test]
    fn test_prompt_cep_takes_first_token() {
        let cep = prompt_cep("01001000 extra\n".as_bytes(), Vec::new()).unwrap();
        assert_eq!(cep, "01001000");
    }

    #[test]
    fn test_prompt_cep_empty_input() {
        assert!(prompt_cep("".as_bytes(), Vec::new()).is_err());
        assert!(prompt_cep("   \n".as_bytes(), Vec::new()).is_err());
    }

    #[test]
    fn test_render() {
        assert_eq!(
            render(&RaceResult::TimedOut, false).unwrap(),
            "Error: Request timeout"
        );
        assert_eq!(
            render(&RaceResult::TimedOut, true).unwrap(),
            r#"{"status":"timed_out"}"#
        );
    }
}
