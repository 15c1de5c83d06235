use terminal_size::{terminal_size, Width};

use crate::application::{Command, Target};
use crate::interface::UserInterface;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

// Used when the output isn't a terminal.
const DEFAULT_WIDTH: usize = 80;

// Narrower than this and the description wrapping stops being readable.
pub(crate) const MINIMUM_WIDTH: usize = 20;

#[derive(Debug)]
pub(crate) struct Printer {
    width: usize,
}

impl Printer {
    pub(crate) fn terminal() -> Self {
        let width = match terminal_size() {
            Some((Width(width), _)) => width as usize,
            None => DEFAULT_WIDTH,
        };

        #[cfg(feature = "tracing_debug")]
        {
            debug!("Rendering usage at width {width}.");
        }

        Self::new(width)
    }

    pub(crate) fn new(width: usize) -> Self {
        Self {
            width: std::cmp::max(width, MINIMUM_WIDTH),
        }
    }

    pub(crate) fn print_usage<R>(
        &self,
        program: &str,
        description: Option<&str>,
        commands: &[Command<'_, R>],
        user_interface: &(impl UserInterface + ?Sized),
    ) {
        user_interface.print(self.usage(program, description, commands).join("\n"));
    }

    /// The usage message: the wrapped description, then one line per command.
    /// Sub-application commands are listed with their full path.
    pub(crate) fn usage<R>(
        &self,
        program: &str,
        description: Option<&str>,
        commands: &[Command<'_, R>],
    ) -> Vec<String> {
        let mut lines = Vec::default();

        if let Some(description) = description {
            for line in description.lines() {
                if line.trim().is_empty() {
                    lines.push(String::default());
                } else {
                    lines.extend(wrap(line, self.width));
                }
            }

            lines.push(String::default());
        }

        lines.push("Usage:".to_string());
        command_lines(program, commands, &mut lines);
        lines
    }
}

fn command_lines<R>(prefix: &str, commands: &[Command<'_, R>], lines: &mut Vec<String>) {
    for command in commands {
        let path = format!("{prefix} {name}", name = command.name);

        match &command.target {
            Target::Branch(children) => command_lines(&path, children, lines),
            Target::Handler { options, .. } => {
                let mut line = format!("  {path}");
                let definition = options.to_definition();

                if !definition.is_empty() {
                    line.push(' ');
                    line.push_str(&definition);
                }

                if let Some(description) = options.description() {
                    line.push_str("  -- ");
                    line.push_str(description);
                }

                lines.push(line);
            }
        }
    }
}

fn wrap(paragraph: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::default();
    let mut current = String::default();

    for word in paragraph.split_whitespace() {
        if current.is_empty() {
            hyphenate(width, &mut lines, &mut current, word);
        } else if current.chars().count() + word.chars().count() + 1 <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            hyphenate(width, &mut lines, &mut current, word);
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

/// Start `current` with `word`, first breaking off hyphenated lines while the word is too wide.
fn hyphenate(width: usize, lines: &mut Vec<String>, current: &mut String, word: &str) {
    let characters: Vec<char> = word.chars().collect();
    let mut left = 0;

    while characters.len() - left > width {
        let right = left + width - 1;
        let mut line: String = characters[left..right].iter().collect();
        line.push('-');
        lines.push(line);
        left = right;
    }

    current.extend(&characters[left..]);
}
