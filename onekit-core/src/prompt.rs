use anyhow::{Context, Result};
use std::io::{BufRead, Write};

/// Questions an operation may need to ask the user.
pub trait Prompt {
    /// Ask a yes/no question. Only an explicit yes counts.
    fn confirm(&mut self, prompt: &str) -> Result<bool>;

    /// Ask for a line of text, returned trimmed.
    fn input(&mut self, prompt: &str) -> Result<String>;

    /// Show text the user needs before answering the next question.
    fn show(&mut self, text: &str) -> Result<()>;
}

/// True for `y` and `yes` in any case, false for everything else.
pub fn is_yes(answer: &str) -> bool {
    let answer = answer.trim().to_lowercase();
    answer == "y" || answer == "yes"
}

/// A prompt that writes questions to `output` and reads answers from `input`.
pub struct ReaderPrompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ReaderPrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{prompt}").context("Failed to write prompt")?;
        self.output.flush().context("Failed to flush prompt")?;

        let mut line = String::new();
        self.input
            .read_line(&mut line)
            .context("Failed to read user input")?;
        Ok(line.trim().to_string())
    }
}

impl<R: BufRead, W: Write> Prompt for ReaderPrompt<R, W> {
    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        Ok(is_yes(&self.ask(prompt)?))
    }

    fn input(&mut self, prompt: &str) -> Result<String> {
        self.ask(prompt)
    }

    fn show(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{text}").context("Failed to write output")
    }
}

/// Answers every confirmation with yes and never expects text input.
#[derive(Debug, Default, Clone, Copy)]
pub struct AssumeYes;

impl Prompt for AssumeYes {
    fn confirm(&mut self, _prompt: &str) -> Result<bool> {
        Ok(true)
    }

    fn input(&mut self, prompt: &str) -> Result<String> {
        anyhow::bail!("input required but prompting is disabled: {}", prompt.trim())
    }

    fn show(&mut self, _text: &str) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_only_explicit_yes_confirms() {
        for (answer, expected) in [
            ("y\n", true),
            ("YES\n", true),
            (" yes \n", true),
            ("\n", false),
            ("n\n", false),
            ("yep\n", false),
            ("", false),
        ] {
            let mut prompt = ReaderPrompt::new(Cursor::new(answer), Vec::new());
            assert_eq!(prompt.confirm("Overwrite? [y/N]: ").unwrap(), expected, "{answer:?}");
        }
    }

    #[test]
    fn test_input_is_trimmed_and_prompt_written() {
        let mut output = Vec::new();
        let mut prompt = ReaderPrompt::new(Cursor::new("  fan-speed \n"), &mut output);
        prompt.show("Current: fan").unwrap();
        assert_eq!(prompt.input("New name: ").unwrap(), "fan-speed");
        drop(prompt);
        assert_eq!(String::from_utf8(output).unwrap(), "Current: fan\nNew name: ");
    }

    #[test]
    fn test_assume_yes() {
        let mut prompt = AssumeYes;
        assert!(prompt.confirm("Apply? [y/N]: ").unwrap());
        assert!(prompt.input("New name: ").is_err());
    }
}
