//! REPL (Read-Eval-Print Loop) for interactive chat

use crate::ConsoleFormatter;
use crate::ProgressReporter;
use colored::Colorize;
use reedline::{DefaultPrompt, DefaultPromptSegment, FileBackedHistory, Reedline, Signal};
use std::path::PathBuf;
use tracing::warn;
use tripwise_application::{NoProgress, ProcessMessageUseCase};

const HISTORY_CAPACITY: usize = 500;

/// Slash commands understood by the chat REPL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatCommand {
    Help,
    History,
    Clear,
    Quit,
    Unknown,
}

impl ChatCommand {
    /// Parse a line starting with `/`; `None` for anything else.
    pub fn parse(line: &str) -> Option<Self> {
        let word = line.trim().strip_prefix('/')?.split_whitespace().next()?;
        Some(match word {
            "help" | "h" | "?" => ChatCommand::Help,
            "history" => ChatCommand::History,
            "clear" | "reset" => ChatCommand::Clear,
            "quit" | "exit" | "q" => ChatCommand::Quit,
            _ => ChatCommand::Unknown,
        })
    }
}

/// Interactive chat REPL
pub struct ChatRepl {
    use_case: ProcessMessageUseCase,
    show_progress: bool,
    history_path: Option<PathBuf>,
}

impl ChatRepl {
    /// Create a new ChatRepl
    pub fn new(use_case: ProcessMessageUseCase) -> Self {
        Self {
            use_case,
            show_progress: true,
            history_path: dirs::data_dir().map(|p| p.join("tripwise").join("history.txt")),
        }
    }

    /// Set whether to show progress
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    fn line_editor(&self) -> Reedline {
        let editor = Reedline::create();
        let Some(path) = &self.history_path else {
            return editor;
        };
        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                warn!("Could not create history directory {}: {}", parent.display(), e);
            }
        }
        match FileBackedHistory::with_file(HISTORY_CAPACITY, path.clone()) {
            Ok(history) => editor.with_history(Box::new(history)),
            Err(e) => {
                warn!("Could not open input history {}: {}", path.display(), e);
                editor
            }
        }
    }

    /// Run the interactive REPL
    pub async fn run(&mut self) -> std::io::Result<()> {
        let mut editor = self.line_editor();
        let prompt = DefaultPrompt::new(
            DefaultPromptSegment::Basic("tripwise".to_string()),
            DefaultPromptSegment::Empty,
        );

        self.print_welcome();

        loop {
            match editor.read_line(&prompt)? {
                Signal::Success(line) => {
                    let line = line.trim();

                    // Skip empty lines
                    if line.is_empty() {
                        continue;
                    }

                    if let Some(command) = ChatCommand::parse(line) {
                        if self.handle_command(command, line) {
                            break;
                        }
                        continue;
                    }

                    self.process_question(line).await;
                }
                Signal::CtrlD => {
                    println!("Bye!");
                    break;
                }
                _ => {
                    println!("^C");
                }
            }
        }

        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│            tripwise - Chat Mode             │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        println!("Model: {}", self.use_case.model_name());
        println!();
        Self::print_help();
    }

    fn print_help() {
        println!("Commands:");
        println!("  /help, /h, /?     - Show this help");
        println!("  /history          - Show the conversation so far");
        println!("  /clear            - Forget the conversation");
        println!("  /quit, /exit, /q  - Exit chat");
        println!();
    }

    /// Handle slash commands. Returns true if should exit.
    fn handle_command(&mut self, command: ChatCommand, line: &str) -> bool {
        match command {
            ChatCommand::Quit => {
                println!("Bye!");
                true
            }
            ChatCommand::Help => {
                println!();
                Self::print_help();
                false
            }
            ChatCommand::History => {
                println!();
                print!("{}", ConsoleFormatter::format_history(&self.use_case.history()));
                println!();
                false
            }
            ChatCommand::Clear => {
                self.use_case.clear_history();
                println!("{}", "Conversation cleared.".dimmed());
                false
            }
            ChatCommand::Unknown => {
                println!("Unknown command: {}", line);
                println!("Type /help for available commands");
                false
            }
        }
    }

    async fn process_question(&mut self, question: &str) {
        println!();

        let outcome = if self.show_progress {
            let progress = ProgressReporter::new();
            let outcome = self.use_case.process_message(question, &progress).await;
            progress.finish();
            outcome
        } else {
            self.use_case.process_message(question, &NoProgress).await
        };

        print!("{}", ConsoleFormatter::format(&outcome));
        println!();
    }
}
