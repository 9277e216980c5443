//! Registered bot commands and the help menu rendered from them

use serde::Serialize;

/// Commands the router knows how to dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Entry point, greets the user
    Start,
    /// Ask the user for the text of a new task
    AddTask,
    /// List every active task
    ActiveTasks,
}

impl Command {
    /// Token as delivered by the transport (no leading slash, no `@bot` suffix)
    pub fn token(self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::AddTask => "add_task",
            Command::ActiveTasks => "active_tasks",
        }
    }

    /// Parse a transport command token. Matching is exact and case-sensitive.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "start" => Some(Command::Start),
            "add_task" => Some(Command::AddTask),
            "active_tasks" => Some(Command::ActiveTasks),
            _ => None,
        }
    }
}

/// One row of the command table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub command: Command,
    /// Leading-slash name shown to users, e.g. `/add_task`
    pub name: &'static str,
    pub description: &'static str,
}

/// Command as advertised to the messaging platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformCommand {
    pub command: String,
    pub description: String,
}

/// Static table of recognized commands, fixed at startup
#[derive(Debug, Clone)]
pub struct CommandRegistry {
    specs: Vec<CommandSpec>,
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self {
            specs: vec![
                CommandSpec {
                    command: Command::Start,
                    name: "/start",
                    description: "Start",
                },
                CommandSpec {
                    command: Command::AddTask,
                    name: "/add_task",
                    description: "Add a new task",
                },
                CommandSpec {
                    command: Command::ActiveTasks,
                    name: "/active_tasks",
                    description: "List active tasks",
                },
            ],
        }
    }

    /// All commands in registration order
    pub fn list(&self) -> &[CommandSpec] {
        &self.specs
    }

    /// Resolve a transport token to a registered command
    pub fn resolve(&self, token: &str) -> Option<Command> {
        Command::from_token(token).filter(|cmd| self.specs.iter().any(|s| s.command == *cmd))
    }

    /// Command menu appended to most responses.
    ///
    /// Lists every command except the welcome entry point, one per line.
    pub fn help_text(&self) -> String {
        self.list()
            .iter()
            .filter(|s| s.command != Command::Start)
            .map(|s| s.name)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Full registry in the shape the platform expects (names without the slash)
    pub fn platform_command_list(&self) -> Vec<PlatformCommand> {
        self.list()
            .iter()
            .map(|s| PlatformCommand {
                command: s.command.token().to_string(),
                description: s.description.to_string(),
            })
            .collect()
    }
}
