//! Read-eval-print loop over a line-oriented input source.

use std::io::{self, BufRead, Write};

use pokedex_types::config::DEFAULT_PROMPT;

use crate::api::PageFetcher;
use crate::interpreter::{CommandOutput, CommandRegistry, Environment};
use crate::session::Session;

/// Driver lifecycle. `Terminated` is final.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplState {
    Running,
    Terminated,
}

/// Owns the session; borrows the registry and page source.
pub struct Repl<'a> {
    registry: &'a CommandRegistry,
    fetcher: &'a dyn PageFetcher,
    session: Session,
    prompt: String,
    state: ReplState,
}

impl<'a> Repl<'a> {
    pub fn new(
        registry: &'a CommandRegistry,
        fetcher: &'a dyn PageFetcher,
        session: Session,
    ) -> Self {
        Self {
            registry,
            fetcher,
            session,
            prompt: DEFAULT_PROMPT.to_string(),
            state: ReplState::Running,
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn state(&self) -> ReplState {
        self.state
    }

    /// Prompt, read, evaluate until `exit` or end of input.
    ///
    /// Only I/O failures on `input` / `out` are returned; command errors are
    /// printed and the loop keeps going.
    ///
    /// Bytes that are not valid UTF-8 are replaced with U+FFFD, so such a
    /// line is reported like any other unknown command.
    pub fn run(&mut self, mut input: impl BufRead, mut out: impl Write) -> io::Result<()> {
        let mut buf = Vec::new();
        while self.state == ReplState::Running {
            write!(out, "{}", self.prompt)?;
            out.flush()?;

            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                log::debug!("End of input");
                self.state = ReplState::Terminated;
                break;
            }
            let line = String::from_utf8_lossy(&buf);
            self.eval(strip_line_ending(&line), &mut out)?;
        }
        out.flush()
    }

    /// Evaluate one input line and print its result.
    pub fn eval(&mut self, line: &str, out: &mut impl Write) -> io::Result<ReplState> {
        let registry = self.registry;
        let mut env = Environment {
            session: &mut self.session,
            fetcher: self.fetcher,
            registry,
        };
        match registry.dispatch(line, &mut env) {
            Ok(CommandOutput::Text(text)) => writeln!(out, "{text}")?,
            Ok(CommandOutput::None) => {},
            Ok(CommandOutput::Exit { message }) => {
                writeln!(out, "{message}")?;
                self.state = ReplState::Terminated;
            },
            Err(e) => {
                log::debug!("{line:?} failed: {e}");
                writeln!(out, "{e}")?;
            },
        }
        Ok(self.state)
    }
}

/// Drop the trailing `\n` or `\r\n`, nothing else.
fn strip_line_ending(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}
