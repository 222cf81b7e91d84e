use anyhow::Result;
use chef_core::{ConversationLog, ConversationTurn, Role};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal,
};
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use crate::commands::HELP;

/// Color scheme for terminal output.
struct Colors;

impl Colors {
    const USER_PROMPT: Color = Color::Green;
    const ASSISTANT_TEXT: Color = Color::Cyan;
    const SUCCESS: Color = Color::DarkGreen;
    const WARNING: Color = Color::Yellow;
    const ERROR: Color = Color::Red;
    const DIM: Color = Color::DarkGrey;
    const HEADER: Color = Color::Magenta;
}

const ABOUT: &str = "\
\"Aichya Gavat\" means your mother's village. We curate delicious Satvik recipes
inspired by your mother's village, chosen to match your mood.";

const INPUT_HINT: &str = "How are you feeling? (e.g., Homesick, Hungry)";

fn role_label(role: Role) -> &'static str {
    match role {
        Role::User => "you> ",
        Role::Assistant => "chef> ",
    }
}

/// Manages terminal I/O for the interactive REPL.
pub struct Terminal;

impl Terminal {
    /// Create a new terminal handler.
    pub fn new() -> Self {
        Self
    }

    /// Print the startup banner.
    pub fn print_banner(&self, model: &str, has_key: bool) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            SetForegroundColor(Colors::HEADER),
            Print("Aichya Gavat Satvik Heritage Chef"),
            ResetColor,
            Print("\n"),
            SetForegroundColor(Colors::DIM),
            Print(format!(
                "Model: {} | API key: {}\n",
                model,
                if has_key { "set" } else { "missing (use /key)" }
            )),
            Print(format!("{}\n", ABOUT)),
            Print("Type /help for commands, 'exit' or 'quit' to leave.\n"),
            Print("---\n"),
            ResetColor,
        )?;
        stdout.flush()?;
        Ok(())
    }

    pub fn print_help(&self) -> Result<()> {
        self.print_info(HELP)
    }

    /// Read a line of user input with prompt.
    /// Returns None on end of input.
    pub fn read_input(&self) -> Result<Option<String>> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            Print("\n"),
            SetForegroundColor(Colors::DIM),
            Print(format!("{}\n", INPUT_HINT)),
            SetForegroundColor(Colors::USER_PROMPT),
            Print(role_label(Role::User)),
            ResetColor,
        )?;
        stdout.flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            return Ok(None);
        }
        Ok(Some(input))
    }

    /// Read a secret without echoing it; each character shows as `*`.
    /// Returns None if the user cancels with Esc or Ctrl+C.
    pub fn read_secret(&self, prompt: &str) -> Result<Option<String>> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            SetForegroundColor(Colors::USER_PROMPT),
            Print(prompt),
            ResetColor,
        )?;
        stdout.flush()?;

        terminal::enable_raw_mode()?;
        let secret = read_masked(&mut stdout);
        terminal::disable_raw_mode()?;
        execute!(stdout, Print("\n"))?;
        secret
    }

    pub fn print_turn(&self, turn: &ConversationTurn) -> Result<()> {
        let mut stdout = io::stdout();
        let color = match turn.role() {
            Role::User => Colors::USER_PROMPT,
            Role::Assistant => Colors::ASSISTANT_TEXT,
        };
        execute!(
            stdout,
            SetForegroundColor(color),
            Print(role_label(turn.role())),
            ResetColor,
            Print(format!("{}\n", turn.text())),
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// Redraw every turn of the conversation.
    pub fn print_history(&self, log: &ConversationLog) -> Result<()> {
        if log.is_empty() {
            return self.print_info("No messages yet.");
        }
        for turn in log.turns() {
            self.print_turn(turn)?;
        }
        Ok(())
    }

    /// Show a spinner/waiting indicator. Returns a handle to stop it.
    pub fn start_spinner(&self, message: &str) -> Result<SpinnerHandle> {
        let running = Arc::new(AtomicBool::new(true));
        let running_clone = running.clone();
        let message = message.to_string();

        let handle = std::thread::spawn(move || {
            let frames = ['|', '/', '-', '\\'];
            let mut i = 0;
            while running_clone.load(Ordering::SeqCst) {
                let mut stdout = io::stdout();
                execute!(
                    stdout,
                    SetForegroundColor(Colors::DIM),
                    Print(format!("\r{} {}", frames[i % frames.len()], message)),
                    ResetColor,
                )
                .ok();
                stdout.flush().ok();
                i += 1;
                std::thread::sleep(std::time::Duration::from_millis(100));
            }
            // Clear spinner
            let mut stdout = io::stdout();
            execute!(
                stdout,
                Print(format!("\r{}\r", " ".repeat(message.len() + 2)))
            )
            .ok();
            stdout.flush().ok();
        });

        Ok(SpinnerHandle {
            running,
            thread: Some(handle),
        })
    }

    pub fn print_success(&self, msg: &str) -> Result<()> {
        self.print_colored(Colors::SUCCESS, msg)
    }

    pub fn print_warning(&self, msg: &str) -> Result<()> {
        self.print_colored(Colors::WARNING, &format!("Warning: {}", msg))
    }

    /// Print an error message.
    pub fn print_error(&self, msg: &str) -> Result<()> {
        self.print_colored(Colors::ERROR, &format!("Error: {}", msg))
    }

    /// Print an info message.
    pub fn print_info(&self, msg: &str) -> Result<()> {
        self.print_colored(Colors::DIM, msg)
    }

    fn print_colored(&self, color: Color, msg: &str) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            SetForegroundColor(color),
            Print(format!("{}\n", msg)),
            ResetColor,
        )?;
        stdout.flush()?;
        Ok(())
    }
}

fn read_masked(stdout: &mut io::Stdout) -> Result<Option<String>> {
    let mut secret = String::new();
    loop {
        let Event::Key(KeyEvent { code, modifiers, kind, .. }) = event::read()? else {
            continue;
        };
        if kind != KeyEventKind::Press {
            continue;
        }
        match code {
            KeyCode::Enter => return Ok(Some(secret)),
            KeyCode::Esc => return Ok(None),
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return Ok(None),
            KeyCode::Backspace => {
                if secret.pop().is_some() {
                    execute!(stdout, Print("\u{8} \u{8}"))?;
                }
            }
            KeyCode::Char(c) => {
                secret.push(c);
                execute!(stdout, Print('*'))?;
            }
            _ => {}
        }
    }
}

/// Handle to a running spinner. Drop or call stop() to terminate it.
pub struct SpinnerHandle {
    running: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl SpinnerHandle {
    /// Stop the spinner and wait until its line is cleared, so nothing
    /// printed afterwards gets overwritten.
    pub fn stop(mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(thread) = self.thread.take() {
            thread.join().ok();
        }
    }
}

impl Drop for SpinnerHandle {
    fn drop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_labels() {
        assert_eq!(role_label(Role::User), "you> ");
        assert_eq!(role_label(Role::Assistant), "chef> ");
    }

    #[test]
    fn spinner_stops() {
        let term = Terminal::new();
        let spinner = term.start_spinner("Thinking...").unwrap();
        let running = spinner.running.clone();
        spinner.stop();
        assert!(!running.load(Ordering::SeqCst));
    }
}
