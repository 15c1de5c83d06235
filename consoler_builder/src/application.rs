use std::collections::HashSet;
use std::env;
use thiserror::Error;

use crate::grammar::GrammarError;
use crate::interface::{ConsoleInterface, UserInterface};
use crate::matcher::{Matcher, Matches};
use crate::options::Options;
use crate::printer::Printer;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// The action run when a command matches.
pub type Handler<'a, R> = Box<dyn Fn(&Matches) -> R + 'a>;

/// A mistake in the configuration of an [`Application`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid definition for command '{command}': {error}")]
    InvalidDefinition {
        command: String,
        #[source]
        error: GrammarError,
    },
}

/// The application builder.
///
/// Register commands, each with a definition string and a handler.
/// Commands are tried in registration order; the first whose definition matches the tokens runs.
///
/// ### Example
/// ```
/// # use consoler_builder as consoler;
/// use consoler::Application;
///
/// let dispatcher = Application::new("program")
///     .description("Builds things.")
///     .command("build", "target [--clean]", |matches| {
///         format!(
///             "{} (clean: {})",
///             matches.value("target").unwrap(),
///             matches.flag("clean").unwrap()
///         )
///     })
///     .build_application()
///     .unwrap();
///
/// let result = dispatcher.dispatch(&["build", "production", "--clean"]);
/// assert_eq!(result, Some("production (clean: true)".to_string()));
/// assert_eq!(dispatcher.dispatch(&["deploy", "production"]), None);
/// ```
pub struct Application<'a, R> {
    program: String,
    description: Option<String>,
    entries: Vec<Entry<'a, R>>,
}

enum Entry<'a, R> {
    Command {
        name: String,
        definition: String,
        handler: Handler<'a, R>,
    },
    Branch {
        name: String,
        application: Application<'a, R>,
    },
}

impl<'a, R> Application<'a, R> {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            description: None,
            entries: Vec::default(),
        }
    }

    /// Document the application, shown at the top of the usage message.
    /// If repeated, only the final description will apply.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description.replace(description.into());
        self
    }

    /// Register a command.
    ///
    /// `definition` declares the options the command accepts (see [`Options::new`]).
    /// The same name may be registered more than once with different definitions.
    pub fn command<F>(
        mut self,
        name: impl Into<String>,
        definition: impl Into<String>,
        handler: F,
    ) -> Self
    where
        F: Fn(&Matches) -> R + 'a,
    {
        self.entries.push(Entry::Command {
            name: name.into(),
            definition: definition.into(),
            handler: Box::new(handler),
        });
        self
    }

    /// Register a group of commands under `name`.
    ///
    /// ### Example
    /// ```
    /// # use consoler_builder as consoler;
    /// use consoler::Application;
    ///
    /// let dispatcher = Application::new("program")
    ///     .sub_application("jobs", |jobs| {
    ///         jobs.command("start", "[--force] -- start the job", |matches| {
    ///             matches.flag("force").unwrap()
    ///         })
    ///     })
    ///     .build_application()
    ///     .unwrap();
    ///
    /// assert_eq!(dispatcher.dispatch(&["jobs", "start", "--force"]), Some(true));
    /// ```
    pub fn sub_application<F>(mut self, name: impl Into<String>, setup_fn: F) -> Self
    where
        F: FnOnce(Application<'a, R>) -> Application<'a, R>,
    {
        let name = name.into();
        let application = setup_fn(Application::new(name.clone()));
        self.entries.push(Entry::Branch { name, application });
        self
    }

    pub(crate) fn build_with_interface(
        self,
        user_interface: Box<dyn UserInterface>,
    ) -> Result<Dispatcher<'a, R>, ConfigError> {
        let Application {
            program,
            description,
            entries,
        } = self;
        let commands = build_commands(&program, entries)?;

        Ok(Dispatcher {
            program,
            description,
            commands,
            printer: Printer::terminal(),
            user_interface,
        })
    }

    /// Build the application as a Result.
    /// This parses every command definition and reports the first one in error.
    pub fn build_application(self) -> Result<Dispatcher<'a, R>, ConfigError> {
        self.build_with_interface(Box::new(ConsoleInterface::default()))
    }

    /// Build the application.
    /// If a command definition is in error, exits with error code `1` (via [`std::process::exit`]).
    pub fn build(self) -> Dispatcher<'a, R> {
        match self.build_application() {
            Ok(dispatcher) => dispatcher,
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
        }
    }
}

fn build_commands<'a, R>(
    path: &str,
    entries: Vec<Entry<'a, R>>,
) -> Result<Vec<Command<'a, R>>, ConfigError> {
    entries
        .into_iter()
        .map(|entry| match entry {
            Entry::Command {
                name,
                definition,
                handler,
            } => {
                let options = Options::new(&definition).map_err(|error| {
                    ConfigError::InvalidDefinition {
                        command: format!("{path} {name}"),
                        error,
                    }
                })?;

                Ok(Command {
                    name,
                    target: Target::Handler { options, handler },
                })
            }
            Entry::Branch { name, application } => {
                let children = build_commands(&format!("{path} {name}"), application.entries)?;

                Ok(Command {
                    name,
                    target: Target::Branch(children),
                })
            }
        })
        .collect()
}

pub(crate) struct Command<'a, R> {
    pub(crate) name: String,
    pub(crate) target: Target<'a, R>,
}

pub(crate) enum Target<'a, R> {
    Handler {
        options: Options,
        handler: Handler<'a, R>,
    },
    Branch(Vec<Command<'a, R>>),
}

/// The configured application.
/// Built via [`Application::build`] or [`Application::build_application`].
pub struct Dispatcher<'a, R> {
    program: String,
    description: Option<String>,
    commands: Vec<Command<'a, R>>,
    printer: Printer,
    user_interface: Box<dyn UserInterface>,
}

impl<'a, R> Dispatcher<'a, R> {
    /// Find the command for `tokens` and run its handler.
    ///
    /// The first token names the command (or sub-application).
    /// When no command carries exactly that name, it may be a unique prefix of one (`rem` for `remove`).
    /// Returns `None` when nothing matches; `tokens` are never modified.
    pub fn dispatch(&self, tokens: &[&str]) -> Option<R> {
        dispatch_commands(&self.commands, tokens)
    }

    /// Dispatch, printing the usage message when nothing matches.
    pub fn run_tokens(&self, tokens: &[&str]) -> Result<R, i32> {
        match self.dispatch(tokens) {
            Some(result) => Ok(result),
            None => {
                self.usage();
                Err(1)
            }
        }
    }

    /// Run the application against the Cli [`env::args`].
    ///
    /// When nothing matches, prints the usage message and exits with error code `1` (via [`std::process::exit`]).
    pub fn run(&self) -> R {
        let command_input: Vec<String> = env::args().skip(1).collect();

        match self.run_tokens(
            command_input
                .iter()
                .map(AsRef::as_ref)
                .collect::<Vec<&str>>()
                .as_slice(),
        ) {
            Ok(result) => result,
            Err(exit_code) => std::process::exit(exit_code),
        }
    }

    /// Print the usage message, listing every command (including those of sub-applications).
    pub fn usage(&self) {
        self.printer.print_usage(
            &self.program,
            self.description.as_deref(),
            &self.commands,
            &*self.user_interface,
        );
    }
}

fn dispatch_commands<R>(commands: &[Command<'_, R>], tokens: &[&str]) -> Option<R> {
    let (name, rest) = tokens.split_first()?;

    for command in candidates(commands, name) {
        match &command.target {
            Target::Handler { options, handler } => {
                if let Some(matches) = Matcher::new(options).match_tokens(rest) {
                    return Some(handler(&matches));
                }
            }
            Target::Branch(children) => {
                if let Some(result) = dispatch_commands(children, rest) {
                    return Some(result);
                }
            }
        }
    }

    None
}

/// The commands to try for `name`: those named exactly so, otherwise those
/// of the single command name `name` is a prefix of.
fn candidates<'c, 'a, R>(commands: &'c [Command<'a, R>], name: &str) -> Vec<&'c Command<'a, R>> {
    let exact: Vec<&Command<'a, R>> = commands
        .iter()
        .filter(|command| command.name == name)
        .collect();

    if !exact.is_empty() || name.is_empty() {
        return exact;
    }

    let prefixed: Vec<&Command<'a, R>> = commands
        .iter()
        .filter(|command| command.name.starts_with(name))
        .collect();
    let names: HashSet<&str> = prefixed
        .iter()
        .map(|command| command.name.as_str())
        .collect();

    if names.len() == 1 {
        #[cfg(feature = "tracing_debug")]
        {
            debug!("Expanded '{name}' to the command '{}'.", prefixed[0].name);
        }

        prefixed
    } else {
        #[cfg(feature = "tracing_debug")]
        {
            debug!("No unique command for '{name}' (candidates: {names:?}).");
        }

        Vec::default()
    }
}
