use thiserror::Error;

use crate::model::{Binding, Kind};

/// A mistake in an option definition string.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GrammarError {
    #[error("Option must have a name")]
    EmptyName,

    #[error("Option can not be a long and a short option")]
    LongAndShort,

    #[error("Arguments can't have a value")]
    ArgumentValue,

    #[error("Unopened optional")]
    UnopenedOptional,

    #[error("Nested optionals are not allowed")]
    NestedOptionals,

    #[error("Unclosed optional")]
    UnclosedOptional,

    #[error("Missing closing '>' for argument: {0}")]
    MissingClosingAngle(String),

    #[error("Missing opening '<' for argument: {0}")]
    MissingOpeningAngle(String),

    #[error("Duplicate option name: {0}")]
    DuplicateName(String),

    #[error("Duplicate alias name: {0}")]
    DuplicateAlias(String),

    #[error("Arguments can't have aliases: {0}")]
    ArgumentAlias(String),

    #[error("Alias must be a long or short option: {0}")]
    AliasArgument(String),

    #[error("Alias must match the value requirement of its option: {0}")]
    AliasValueMismatch(String),

    #[error("Combined short options can't have aliases: {0}")]
    ShortClusterAlias(String),
}

/// Bracket state shared by every token of one definition string.
#[derive(Debug, Default)]
pub(crate) struct OptionalsTracker {
    tracking: bool,
    index: u32,
}

impl OptionalsTracker {
    pub(crate) fn is_tracking(&self) -> bool {
        self.tracking
    }

    /// Strip the optional brackets from `definition`, returning the group the option belongs to.
    fn strip<'d>(&mut self, definition: &'d str) -> Result<(&'d str, Option<u32>), GrammarError> {
        let mut body = definition;

        if let Some(stripped) = body.strip_prefix('[') {
            if self.tracking {
                return Err(GrammarError::NestedOptionals);
            }

            self.tracking = true;
            self.index += 1;
            body = stripped;
        }

        let group = if self.tracking {
            Some(self.index)
        } else {
            None
        };

        if let Some(stripped) = body.strip_suffix(']') {
            if !self.tracking {
                return Err(GrammarError::UnopenedOptional);
            }

            self.tracking = false;
            body = stripped;
        }

        Ok((body, group))
    }
}

/// A single declared flag, value option or positional argument.
///
/// Produced from one whitespace separated token of a definition string.
/// The token `-abc` yields three of these (one per character).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionDef {
    name: String,
    kind: Kind,
    takes_value: bool,
    group: Option<u32>,
    aliases: Vec<OptionDef>,
}

impl OptionDef {
    /// Parse one definition token into the option(s) it declares.
    pub(crate) fn create(
        definition: &str,
        tracker: &mut OptionalsTracker,
    ) -> Result<Vec<OptionDef>, GrammarError> {
        let (body, group) = tracker.strip(definition)?;
        let mut segments = body.split('|');
        // `split` always yields at least one segment.
        let mut option = OptionDef::single(segments.next().unwrap_or_default(), group)?;

        for segment in segments {
            if option.is_argument() {
                return Err(GrammarError::ArgumentAlias(option.name));
            }

            if option.is_cluster() {
                return Err(GrammarError::ShortClusterAlias(option.name));
            }

            let alias = OptionDef::single(segment, group)?;

            if alias.is_argument() {
                return Err(GrammarError::AliasArgument(alias.name));
            }

            if alias.is_cluster() {
                return Err(GrammarError::ShortClusterAlias(alias.name));
            }

            if alias.takes_value != option.takes_value {
                return Err(GrammarError::AliasValueMismatch(alias.name));
            }

            if option.names().any(|name| name == alias.name) {
                return Err(GrammarError::DuplicateAlias(alias.name));
            }

            option.aliases.push(alias);
        }

        if option.is_cluster() {
            Ok(option.expand())
        } else {
            Ok(vec![option])
        }
    }

    fn single(definition: &str, group: Option<u32>) -> Result<OptionDef, GrammarError> {
        let (body, long) = match definition.strip_prefix("--") {
            Some(body) => (body, true),
            None => (definition, false),
        };
        let (body, short) = match body.strip_prefix('-') {
            Some(body) => (body, true),
            None => (body, false),
        };
        let argument = !long && !short;
        let (body, takes_value) = match body.strip_suffix('=') {
            Some(body) => {
                if argument {
                    return Err(GrammarError::ArgumentValue);
                }

                (body, true)
            }
            None => (body, false),
        };
        let name = if argument { strip_angles(body)? } else { body };

        if name.is_empty() {
            return Err(GrammarError::EmptyName);
        }

        if long && short {
            return Err(GrammarError::LongAndShort);
        }

        let kind = if long {
            Kind::Long
        } else if short {
            Kind::Short
        } else {
            Kind::Argument
        };

        Ok(OptionDef {
            name: name.to_string(),
            kind,
            takes_value,
            group,
            aliases: Vec::default(),
        })
    }

    fn is_cluster(&self) -> bool {
        self.kind == Kind::Short && self.name.chars().count() > 1
    }

    /// Split a combined short option (`-abc=`) into one option per character.
    /// Only the final character keeps the value requirement.
    fn expand(self) -> Vec<OptionDef> {
        let length = self.name.chars().count();

        self.name
            .chars()
            .enumerate()
            .map(|(index, single)| OptionDef {
                name: single.to_string(),
                kind: Kind::Short,
                takes_value: self.takes_value && index + 1 == length,
                group: self.group,
                aliases: Vec::default(),
            })
            .collect()
    }

    /// The primary name, without any `-`, `--` or `<>` decoration.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn is_long(&self) -> bool {
        self.kind == Kind::Long
    }

    pub fn is_short(&self) -> bool {
        self.kind == Kind::Short
    }

    pub fn is_argument(&self) -> bool {
        self.kind == Kind::Argument
    }

    /// Whether the option expects the following token as its value (`--name=`).
    pub fn takes_value(&self) -> bool {
        self.takes_value
    }

    /// The optional group this option belongs to, or `None` when it is mandatory.
    pub fn group(&self) -> Option<u32> {
        self.group
    }

    pub fn is_optional(&self) -> bool {
        self.group.is_some()
    }

    pub fn aliases(&self) -> &[OptionDef] {
        &self.aliases
    }

    /// The primary name followed by every alias name.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(|alias| alias.name()))
    }

    /// The binding an optional option receives when the tokens don't mention it.
    /// Positional arguments have no default; they stay absent.
    pub fn default_binding(&self) -> Option<Binding> {
        if self.takes_value {
            Some(Binding::Value(None))
        } else {
            match self.kind {
                Kind::Long => Some(Binding::Flag(false)),
                Kind::Short => Some(Binding::Count(0)),
                Kind::Argument => None,
            }
        }
    }

    /// Render the option (and its aliases) back into definition syntax.
    /// Optional brackets are the concern of [`crate::Options::to_definition`].
    pub fn to_definition(&self) -> String {
        let mut definition = match self.kind {
            Kind::Long => format!("--{}", self.name),
            Kind::Short => format!("-{}", self.name),
            Kind::Argument => format!("<{}>", self.name),
        };

        if self.takes_value {
            definition.push('=');
        }

        for alias in &self.aliases {
            definition.push('|');
            definition.push_str(&alias.to_definition());
        }

        definition
    }
}

fn strip_angles(body: &str) -> Result<&str, GrammarError> {
    match body.strip_prefix('<') {
        Some(inner) => inner
            .strip_suffix('>')
            .ok_or_else(|| GrammarError::MissingClosingAngle(body.to_string())),
        None if body.ends_with('>') => Err(GrammarError::MissingOpeningAngle(body.to_string())),
        None => Ok(body),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn create(definition: &str) -> Result<Vec<OptionDef>, GrammarError> {
        OptionDef::create(definition, &mut OptionalsTracker::default())
    }

    #[rstest]
    #[case("name", "name", Kind::Argument, false)]
    #[case("<name>", "name", Kind::Argument, false)]
    #[case("-f", "f", Kind::Short, false)]
    #[case("-f=", "f", Kind::Short, true)]
    #[case("--force", "force", Kind::Long, false)]
    #[case("--force=", "force", Kind::Long, true)]
    #[case("--dashed-option", "dashed-option", Kind::Long, false)]
    fn create_single(
        #[case] definition: &str,
        #[case] name: &str,
        #[case] kind: Kind,
        #[case] takes_value: bool,
    ) {
        let options = create(definition).unwrap();

        assert_eq!(options.len(), 1);
        let option = &options[0];
        assert_eq!(option.name(), name);
        assert_eq!(option.kind(), kind);
        assert_eq!(option.takes_value(), takes_value);
        assert_eq!(option.group(), None);
        assert!(option.aliases().is_empty());
    }

    #[rstest]
    #[case("-", GrammarError::EmptyName)]
    #[case("--", GrammarError::EmptyName)]
    #[case("--=", GrammarError::EmptyName)]
    #[case("<>", GrammarError::EmptyName)]
    #[case("[]", GrammarError::EmptyName)]
    #[case("---force", GrammarError::LongAndShort)]
    #[case("name=", GrammarError::ArgumentValue)]
    #[case("<name>=", GrammarError::ArgumentValue)]
    #[case("name]", GrammarError::UnopenedOptional)]
    #[case("<name", GrammarError::MissingClosingAngle("<name".to_string()))]
    #[case("name>", GrammarError::MissingOpeningAngle("name>".to_string()))]
    #[case("name|-n", GrammarError::ArgumentAlias("name".to_string()))]
    #[case("-ab|--all", GrammarError::ShortClusterAlias("ab".to_string()))]
    #[case("--all|-ab", GrammarError::ShortClusterAlias("ab".to_string()))]
    #[case("--force|force", GrammarError::AliasArgument("force".to_string()))]
    #[case("--name=|-n", GrammarError::AliasValueMismatch("n".to_string()))]
    #[case("--name|-n=", GrammarError::AliasValueMismatch("n".to_string()))]
    #[case("--force|--force", GrammarError::DuplicateAlias("force".to_string()))]
    #[case("--force|-f|-f", GrammarError::DuplicateAlias("f".to_string()))]
    #[case("--force|", GrammarError::EmptyName)]
    fn create_invalid(#[case] definition: &str, #[case] expected: GrammarError) {
        assert_eq!(create(definition).unwrap_err(), expected);
    }

    #[test]
    fn error_messages() {
        assert_eq!(GrammarError::EmptyName.to_string(), "Option must have a name");
        assert_eq!(
            GrammarError::LongAndShort.to_string(),
            "Option can not be a long and a short option"
        );
        assert_eq!(
            GrammarError::ArgumentValue.to_string(),
            "Arguments can't have a value"
        );
        assert_eq!(GrammarError::UnopenedOptional.to_string(), "Unopened optional");
        assert_eq!(
            GrammarError::NestedOptionals.to_string(),
            "Nested optionals are not allowed"
        );
        assert_eq!(
            GrammarError::DuplicateName("name".to_string()).to_string(),
            "Duplicate option name: name"
        );
    }

    #[test]
    fn tracker_groups() {
        let mut tracker = OptionalsTracker::default();

        let first = OptionDef::create("[first", &mut tracker).unwrap();
        assert!(tracker.is_tracking());
        let second = OptionDef::create("second]", &mut tracker).unwrap();
        assert!(!tracker.is_tracking());
        let third = OptionDef::create("third", &mut tracker).unwrap();
        let fourth = OptionDef::create("[fourth]", &mut tracker).unwrap();

        assert_eq!(first[0].group(), Some(1));
        assert_eq!(second[0].group(), Some(1));
        assert_eq!(third[0].group(), None);
        assert_eq!(fourth[0].group(), Some(2));
        assert!(!tracker.is_tracking());
    }

    #[test]
    fn tracker_nested() {
        let mut tracker = OptionalsTracker::default();
        OptionDef::create("[first", &mut tracker).unwrap();

        assert_eq!(
            OptionDef::create("[second]", &mut tracker).unwrap_err(),
            GrammarError::NestedOptionals
        );
    }

    #[rstest]
    #[case("-ab", None, false)]
    #[case("-ab=", None, true)]
    #[case("[-ab]", Some(1), false)]
    #[case("[-ab=]", Some(1), true)]
    fn create_cluster(
        #[case] definition: &str,
        #[case] group: Option<u32>,
        #[case] last_takes_value: bool,
    ) {
        let options = create(definition).unwrap();

        assert_eq!(options.len(), 2);
        assert_eq!(options[0].name(), "a");
        assert_eq!(options[1].name(), "b");

        for option in &options {
            assert!(option.is_short());
            assert_eq!(option.group(), group);
        }

        assert!(!options[0].takes_value());
        assert_eq!(options[1].takes_value(), last_takes_value);
    }

    #[test]
    fn create_aliases() {
        let options = create("[--clear-cache=|-c=|--cc=]").unwrap();

        assert_eq!(options.len(), 1);
        let option = &options[0];
        assert_eq!(option.name(), "clear-cache");
        assert!(option.is_long());
        assert!(option.takes_value());
        assert_eq!(option.group(), Some(1));
        assert_eq!(
            option.names().collect::<Vec<&str>>(),
            vec!["clear-cache", "c", "cc"]
        );

        let short = &option.aliases()[0];
        assert!(short.is_short());
        assert!(short.takes_value());
        assert_eq!(short.group(), Some(1));
        assert!(option.aliases()[1].is_long());
    }

    #[rstest]
    #[case("name", "<name>")]
    #[case("<name>", "<name>")]
    #[case("-n", "-n")]
    #[case("-n=", "-n=")]
    #[case("--name", "--name")]
    #[case("--name=", "--name=")]
    #[case("-f|--force", "-f|--force")]
    #[case("--name=|-n=", "--name=|-n=")]
    fn to_definition(#[case] definition: &str, #[case] expected: &str) {
        let options = create(definition).unwrap();
        assert_eq!(options[0].to_definition(), expected);
    }

    #[rstest]
    #[case("--force", Some(Binding::Flag(false)))]
    #[case("-f", Some(Binding::Count(0)))]
    #[case("--name=", Some(Binding::Value(None)))]
    #[case("-n=", Some(Binding::Value(None)))]
    #[case("name", None)]
    fn default_binding(#[case] definition: &str, #[case] expected: Option<Binding>) {
        let options = create(definition).unwrap();
        assert_eq!(options[0].default_binding(), expected);
    }
}
