use std::io::{self, BufRead, Write};

/// Default answer for a yes/no prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Yes,
    No,
}

impl Answer {
    fn token(self) -> &'static str {
        match self {
            Answer::Yes => "y",
            Answer::No => "n",
        }
    }

    fn hint(self) -> &'static str {
        match self {
            Answer::Yes => "[Y/n]",
            Answer::No => "[y/N]",
        }
    }
}

/// Yes/no gate asked before irreversible bulk actions.
pub trait ConfirmPrompt {
    /// Returns true when the operator affirms the default answer,
    /// explicitly or by entering nothing; false when they pick the
    /// opposite token.
    fn ask(&mut self, question: &str, default: Answer) -> bool;
}

/// Prompt that reads one answer line per attempt from a buffered
/// reader: stdin in production, a cursor in tests. Anything that is
/// not empty, `y`, or `n` (any case) is rejected and the question is
/// asked again. End of input counts as a decline.
pub struct LinePrompt<R> {
    input: R,
}

impl<R: BufRead> LinePrompt<R> {
    pub fn new(input: R) -> Self {
        Self { input }
    }
}

impl<R: BufRead> ConfirmPrompt for LinePrompt<R> {
    fn ask(&mut self, question: &str, default: Answer) -> bool {
        loop {
            log::info!("{} {}", question, default.hint());
            print!("Input -> ");
            let _ = io::stdout().flush();

            let mut line = String::new();
            match self.input.read_line(&mut line) {
                Ok(0) | Err(_) => return false,
                Ok(_) => {}
            }
            let choice = line.trim().to_lowercase();

            if choice.is_empty() || choice == default.token() {
                return true;
            }
            if choice == "y" || choice == "n" {
                return false;
            }
            log::warn!("Invalid input supplied");
        }
    }
}
