/// The syntactic class of a declared option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// `--name`: a boolean switch, or a value option when declared with `=`.
    Long,
    /// `-n`: an occurrence counter, or a value option when declared with `=`.
    Short,
    /// `name` or `<name>`: a positional argument.
    Argument,
}

/// The value bound to an option by a successful match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    /// A long switch: `true` when given, `false` as the optional default.
    Flag(bool),
    /// A short switch: the number of occurrences (`0` as the optional default).
    Count(u32),
    /// A value option: the following token, or `None` as the optional default.
    Value(Option<String>),
    /// A positional argument.
    Positional(String),
}

impl Binding {
    /// The switch state, if this is a [`Binding::Flag`].
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Binding::Flag(flag) => Some(*flag),
            _ => None,
        }
    }

    /// The occurrence count, if this is a [`Binding::Count`].
    pub fn as_count(&self) -> Option<u32> {
        match self {
            Binding::Count(count) => Some(*count),
            _ => None,
        }
    }

    /// The bound text of a value option or positional argument.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Binding::Value(value) => value.as_deref(),
            Binding::Positional(value) => Some(value.as_str()),
            _ => None,
        }
    }
}
