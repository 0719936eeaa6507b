//! Interactive confirmation before a large collection

use std::io::{self, BufRead, Write};

/// Asks the user whether to continue
///
/// Implementations may block; the driver calls them before any collection
/// work is started.
pub trait Confirm {
    /// Show `prompt` and return whether the answer was affirmative
    fn confirm(&mut self, prompt: &str) -> io::Result<bool>;
}

/// Whether `answer` means yes: `y`, `ye` or `yes`, in any case
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "ye" | "yes")
}

/// Prompts on stdout and reads one line from any reader (stdin by default)
pub struct LineConfirm<R> {
    input: R,
}

impl<R: BufRead> LineConfirm<R> {
    /// Read answers from `input`
    pub fn new(input: R) -> Self {
        Self { input }
    }
}

/// Confirmation read from the terminal
pub type StdinConfirm = LineConfirm<io::StdinLock<'static>>;

impl StdinConfirm {
    /// Read answers from standard input
    pub fn stdin() -> Self {
        Self::new(io::stdin().lock())
    }
}

impl<R: BufRead> Confirm for LineConfirm<R> {
    fn confirm(&mut self, prompt: &str) -> io::Result<bool> {
        let mut stdout = io::stdout().lock();
        write!(stdout, "{prompt}")?;
        stdout.flush()?;

        let mut answer = String::new();
        // EOF reads as an empty answer, which declines
        self.input.read_line(&mut answer)?;
        Ok(is_affirmative(&answer))
    }
}

/// Always gives the same answer without prompting
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswer(pub bool);

impl Confirm for FixedAnswer {
    fn confirm(&mut self, _prompt: &str) -> io::Result<bool> {
        Ok(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_is_affirmative() {
        for yes in ["y", "Y", "ye", "YE", "yes", "Yes", "YES", "yes\n", " y \r\n"] {
            assert!(is_affirmative(yes), "{yes:?} should be affirmative");
        }
        for no in ["", "n", "no", "yess", "yeah", "sure", "1", "\n"] {
            assert!(!is_affirmative(no), "{no:?} should not be affirmative");
        }
    }

    #[test]
    fn test_line_confirm_reads_answer() {
        let mut confirm = LineConfirm::new(Cursor::new("yes\n"));
        assert!(confirm.confirm("Continue? ").unwrap());

        let mut confirm = LineConfirm::new(Cursor::new("no\n"));
        assert!(!confirm.confirm("Continue? ").unwrap());
    }

    #[test]
    fn test_line_confirm_eof_declines() {
        let mut confirm = LineConfirm::new(Cursor::new(""));
        assert!(!confirm.confirm("Continue? ").unwrap());
    }

    #[test]
    fn test_fixed_answer() {
        assert!(FixedAnswer(true).confirm("ignored").unwrap());
        assert!(!FixedAnswer(false).confirm("ignored").unwrap());
    }
}
