//! Interactive numbered-choice prompt.

use crate::error::Result;
use std::io::{BufRead, Write};

/// Ask the user to pick one of `choices` by number.
///
/// Returns the 0-based index of the choice, or `None` if there is nothing to choose
/// from or the user cancelled (empty input or end of input). A single choice is
/// returned without prompting.
pub fn numbered_choices_prompt<I, W>(
    choices: &[String],
    preamble: Option<&str>,
    input: &mut I,
    output: &mut W,
) -> Result<Option<usize>>
where
    I: BufRead,
    W: Write,
{
    match choices.len() {
        0 => return Ok(None),
        1 => return Ok(Some(0)),
        _ => {}
    }

    if let Some(preamble) = preamble {
        writeln!(output, "{preamble}")?;
    }
    let width = choices.len().to_string().len();
    for (i, choice) in choices.iter().enumerate() {
        writeln!(output, "  {:>width$}: {choice}", i + 1)?;
    }

    let mut response = String::new();
    loop {
        write!(output, "Choice (1-{}, or Enter to cancel): ", choices.len())?;
        output.flush()?;

        response.clear();
        if input.read_line(&mut response)? == 0 {
            writeln!(output)?;
            return Ok(None);
        }

        let response = response.trim();
        if response.is_empty() {
            return Ok(None);
        }
        match response.parse::<usize>() {
            Ok(n) if (1..=choices.len()).contains(&n) => return Ok(Some(n - 1)),
            _ => writeln!(output, "Invalid choice: {response}")?,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn choices() -> Vec<String> {
        vec!["Kitchen".to_string(), "Garage".to_string(), "Attic".to_string()]
    }

    fn run(choices: &[String], input: &str) -> (Option<usize>, String) {
        let mut input = Cursor::new(input.as_bytes().to_vec());
        let mut output = Vec::new();
        let result =
            numbered_choices_prompt(choices, Some("Pick one:"), &mut input, &mut output).unwrap();
        (result, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_valid_choice() {
        let (result, output) = run(&choices(), "2\n");
        assert_eq!(result, Some(1));
        assert!(output.starts_with("Pick one:\n  1: Kitchen\n  2: Garage\n  3: Attic\n"));
    }

    #[test]
    fn test_invalid_choice_reprompts() {
        let (result, output) = run(&choices(), "7\nabc\n3\n");
        assert_eq!(result, Some(2));
        assert!(output.contains("Invalid choice: 7"));
        assert!(output.contains("Invalid choice: abc"));
    }

    #[test]
    fn test_cancel() {
        assert_eq!(run(&choices(), "\n").0, None);
        assert_eq!(run(&choices(), "").0, None);
    }

    #[test]
    fn test_single_choice_skips_prompt() {
        let (result, output) = run(&["Only".to_string()], "");
        assert_eq!(result, Some(0));
        assert!(output.is_empty());
    }

    #[test]
    fn test_no_choices() {
        assert_eq!(run(&[], "1\n").0, None);
    }
}
