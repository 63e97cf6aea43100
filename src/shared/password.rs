use std::io::{self, BufRead, Write};

/// Source of a secret typed by the user
pub trait PasswordPrompt {
    fn read_password(&mut self, prompt: &str) -> io::Result<String>;
}

/// Hidden input on an interactive terminal
pub struct TerminalPassword;

impl PasswordPrompt for TerminalPassword {
    fn read_password(&mut self, prompt: &str) -> io::Result<String> {
        dialoguer::Password::new()
            .with_prompt(prompt)
            .interact()
            .map_err(io::Error::other)
    }
}

/// One line from a reader, for piped stdin
pub struct LinePassword<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LinePassword<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl LinePassword<io::StdinLock<'static>, io::Stderr> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> PasswordPrompt for LinePassword<R, W> {
    fn read_password(&mut self, prompt: &str) -> io::Result<String> {
        write!(self.output, "{}: ", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}
