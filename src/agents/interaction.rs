use crate::error::{ReqSyncError, Result};
use colored::Colorize;
use regex::Regex;
use std::io::{self, BufRead, Write};

const AFFIRMATIVE: &[&str] = &["y", "Y", "yes", "Yes", "YES"];
const NEGATIVE: &[&str] = &["n", "N", "no", "No", "NO"];

/// Accepted shape for a manually typed version: `0.0`, `0.00`, `0.0.0` up to `0.00.000`.
const VERSION_PATTERN: &str = r"^[0-9]\.[0-9]{1,2}(\.[0-9]{1,3})?$";

/// Line-oriented request/response channel to the operator.
pub trait PromptSource {
    /// Prints a message without waiting for input.
    fn say(&mut self, message: &str);

    /// Prints `prompt` and blocks for one line of input, returned trimmed.
    fn read_line(&mut self, prompt: &str) -> Result<String>;
}

/// Prompts on stdout and reads answers from stdin.
pub struct TerminalPrompt;

impl PromptSource for TerminalPrompt {
    fn say(&mut self, message: &str) {
        println!("{message}");
    }

    fn read_line(&mut self, prompt: &str) -> Result<String> {
        print!("{prompt}");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().lock().read_line(&mut input)? == 0 {
            return Err(ReqSyncError::InputClosed);
        }
        Ok(input.trim().to_string())
    }
}

/// Manages the questions asked during a sync run
///
/// Answers are validated here and re-requested until they are acceptable,
/// so callers only ever see a clean yes/no or a well-formed version.
pub struct Interaction<P> {
    prompt: P,
    version_pattern: Regex,
}

impl<P: PromptSource> Interaction<P> {
    pub fn new(prompt: P) -> Result<Self> {
        let version_pattern = Regex::new(VERSION_PATTERN).map_err(|e| {
            ReqSyncError::Configuration(format!("Invalid version pattern: {e}"))
        })?;
        Ok(Self {
            prompt,
            version_pattern,
        })
    }

    pub fn say(&mut self, message: &str) {
        self.prompt.say(message);
    }

    /// Asks a yes/no question until one of the accepted tokens is typed.
    pub fn ask(&mut self, question: &str) -> Result<bool> {
        self.prompt.say(question);

        loop {
            let answer = self.prompt.read_line("Type your answer... y/N : ")?;
            if AFFIRMATIVE.contains(&answer.as_str()) {
                return Ok(true);
            }
            if NEGATIVE.contains(&answer.as_str()) {
                return Ok(false);
            }
            self.prompt
                .say(&"Wrong answer... Allowed responses are: y/N".red().to_string());
        }
    }

    /// Reads a version matching the accepted pattern, re-prompting without limit.
    pub fn ask_version(&mut self, question: &str) -> Result<String> {
        let mut answer = self.prompt.read_line(question)?;
        while !self.is_valid_version(&answer) {
            self.prompt.say(
                &"Wrong format... Please follow the rule: 0.00.000"
                    .red()
                    .to_string(),
            );
            answer = self.prompt.read_line(question)?;
        }
        Ok(answer)
    }

    /// Reads any non-empty answer.
    pub fn ask_text(&mut self, question: &str) -> Result<String> {
        loop {
            let answer = self.prompt.read_line(question)?;
            if !answer.is_empty() {
                return Ok(answer);
            }
            self.prompt.say(&"An empty answer is not allowed.".red().to_string());
        }
    }

    pub fn is_valid_version(&self, version: &str) -> bool {
        self.version_pattern.is_match(version)
    }

    #[cfg(test)]
    pub fn prompt(&self) -> &P {
        &self.prompt
    }
}

/// Replays canned answers and records everything that was shown.
#[cfg(test)]
pub struct ScriptedPrompt {
    answers: std::collections::VecDeque<String>,
    pub transcript: Vec<String>,
    pub reads: usize,
}

#[cfg(test)]
impl ScriptedPrompt {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|a| a.to_string()).collect(),
            transcript: Vec::new(),
            reads: 0,
        }
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

#[cfg(test)]
impl PromptSource for ScriptedPrompt {
    fn say(&mut self, message: &str) {
        self.transcript.push(message.to_string());
    }

    fn read_line(&mut self, prompt: &str) -> Result<String> {
        self.transcript.push(prompt.to_string());
        self.reads += 1;
        self.answers
            .pop_front()
            .map(|a| a.trim().to_string())
            .ok_or(ReqSyncError::InputClosed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interaction(answers: &[&str]) -> Interaction<ScriptedPrompt> {
        Interaction::new(ScriptedPrompt::new(answers)).unwrap()
    }

    #[test]
    fn ask_accepts_exact_tokens() {
        let mut ui = interaction(&["YES", "No", "y", "N"]);
        assert!(ui.ask("first?").unwrap());
        assert!(!ui.ask("second?").unwrap());
        assert!(ui.ask("third?").unwrap());
        assert!(!ui.ask("fourth?").unwrap());
    }

    #[test]
    fn ask_reprompts_on_unknown_answer() {
        let mut ui = interaction(&["", "yeah", "yEs", "n"]);
        assert!(!ui.ask("continue?").unwrap());
        assert_eq!(ui.prompt().reads, 4);
    }

    #[test]
    fn ask_fails_when_input_closes() {
        let mut ui = interaction(&["maybe"]);
        assert!(matches!(ui.ask("continue?"), Err(ReqSyncError::InputClosed)));
    }

    #[test]
    fn version_validator_accepts_expected_shapes() {
        let ui = interaction(&[]);
        for good in ["1.2", "1.23.4", "0.0.1", "9.99.999"] {
            assert!(ui.is_valid_version(good), "{good} should be accepted");
        }
        for bad in ["1", "1.2.3.4", "v1.2", "", "10.1", "1.234", "1.2.3456"] {
            assert!(!ui.is_valid_version(bad), "{bad} should be rejected");
        }
    }

    #[test]
    fn ask_version_reprompts_until_valid() {
        let mut ui = interaction(&["1", "v1.2", "", "1.2.3.4", "2.31"]);
        assert_eq!(ui.ask_version("New version: ").unwrap(), "2.31");
        assert_eq!(ui.prompt().reads, 5);
        assert_eq!(ui.prompt().remaining(), 0);
    }

    #[test]
    fn ask_text_rejects_empty() {
        let mut ui = interaction(&["", "  ", "2.0rc1"]);
        assert_eq!(ui.ask_text("Version: ").unwrap(), "2.0rc1");
    }
}
