use anyhow::Result;
use crossterm::{
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
};
use std::io::{self, Write};

/// Color scheme for terminal output.
struct Colors;

impl Colors {
    const USER_PROMPT: Color = Color::Green;
    const ASSISTANT_TEXT: Color = Color::Cyan;
    const ERROR: Color = Color::Red;
    const DIM: Color = Color::DarkGrey;
    const HEADER: Color = Color::Magenta;
}

/// The literal token that ends the session, case-insensitive and
/// whitespace-trimmed. Everything else is a query.
pub fn is_quit(input: &str) -> bool {
    input.trim().eq_ignore_ascii_case("quit")
}

/// Manages terminal I/O for the interactive REPL.
pub struct Terminal;

impl Terminal {
    pub fn new() -> Self {
        Self
    }

    /// Print the startup banner.
    pub fn print_banner(&self, model: &str, server_script: &str) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            SetForegroundColor(Colors::HEADER),
            Print("toolchat"),
            ResetColor,
            Print(" - MCP chat client\n"),
            SetForegroundColor(Colors::DIM),
            Print(format!("Model: {model} | Server: {server_script}\n")),
            Print("Type your queries or 'quit' to exit.\n"),
            Print("---\n"),
            ResetColor,
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// Announce the tools the server advertised.
    pub fn print_tools(&self, names: &[&str]) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            SetForegroundColor(Colors::DIM),
            Print(format!(
                "Connected to server with tools: {}\n",
                names.join(", ")
            )),
            ResetColor,
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// Read one line of user input with prompt.
    ///
    /// Returns `None` on end-of-input or the quit token.
    pub fn read_input(&self) -> Result<Option<String>> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            Print("\n"),
            SetForegroundColor(Colors::USER_PROMPT),
            Print("query> "),
            ResetColor,
        )?;
        stdout.flush()?;

        let mut input = String::new();
        let bytes_read = io::stdin().read_line(&mut input)?;
        if bytes_read == 0 {
            return Ok(None); // EOF
        }

        if is_quit(&input) {
            return Ok(None);
        }

        Ok(Some(input.trim().to_string()))
    }

    /// Print one query's accumulated answer.
    pub fn print_response(&self, text: &str) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            Print("\n"),
            SetForegroundColor(Colors::ASSISTANT_TEXT),
            Print(text),
            Print("\n"),
            ResetColor,
        )?;
        stdout.flush()?;
        Ok(())
    }

    pub fn print_info(&self, message: &str) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            SetForegroundColor(Colors::DIM),
            Print(message),
            Print("\n"),
            ResetColor,
        )?;
        stdout.flush()?;
        Ok(())
    }

    pub fn print_error(&self, message: &str) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            SetForegroundColor(Colors::ERROR),
            Print(format!("Error: {message}\n")),
            ResetColor,
        )?;
        stdout.flush()?;
        Ok(())
    }
}

impl Default for Terminal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quit_token_is_case_insensitive_and_trimmed() {
        assert!(is_quit("quit"));
        assert!(is_quit("QUIT"));
        assert!(is_quit("Quit"));
        assert!(is_quit("  quit  "));
        assert!(is_quit("\tQuIt\n"));
    }

    #[test]
    fn test_non_quit_inputs_are_queries() {
        assert!(!is_quit("exit"));
        assert!(!is_quit("quit now"));
        assert!(!is_quit("please quit"));
        assert!(!is_quit(""));
    }
}
