use std::collections::HashSet;

use crate::grammar::{GrammarError, OptionDef, OptionalsTracker};

/// The ordered list of options declared by one definition string.
///
/// ### Example
/// ```
/// # use consoler_builder as consoler;
/// use consoler::Options;
///
/// let options = Options::new("[-v] --reason= <filename> -- Remove a file").unwrap();
///
/// assert_eq!(options.len(), 3);
/// assert_eq!(options.description(), Some("Remove a file"));
/// assert_eq!(options.to_definition(), "[-v] --reason= <filename>");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    options: Vec<OptionDef>,
    description: Option<String>,
}

impl Options {
    /// Parse a definition string.
    ///
    /// Everything after a ` -- ` separator is kept as free text [`Options::description`].
    /// Fails on the first grammar mistake, including a name (or alias) declared twice.
    pub fn new(definition: &str) -> Result<Self, GrammarError> {
        let (definition, description) = split_description(definition);
        let mut tracker = OptionalsTracker::default();
        let mut options = Vec::default();
        let mut names: HashSet<String> = HashSet::default();

        for token in definition.split_whitespace() {
            for option in OptionDef::create(token, &mut tracker)? {
                for name in option.names() {
                    if !names.insert(name.to_string()) {
                        return Err(GrammarError::DuplicateName(name.to_string()));
                    }
                }

                options.push(option);
            }
        }

        if tracker.is_tracking() {
            return Err(GrammarError::UnclosedOptional);
        }

        Ok(Self {
            options,
            description,
        })
    }

    /// Find an option by its primary name.
    pub fn get(&self, name: &str) -> Option<&OptionDef> {
        self.options.iter().find(|option| option.name() == name)
    }

    /// Find an option by its primary name or any of its aliases.
    ///
    /// Returns the owning option along with the form that matched `name`.
    /// The matched form decides whether `name` was declared long or short.
    pub fn get_with_alias(&self, name: &str) -> Option<(&OptionDef, &OptionDef)> {
        self.options.iter().find_map(|option| {
            if option.name() == name {
                Some((option, option))
            } else {
                option
                    .aliases()
                    .iter()
                    .find(|alias| alias.name() == name)
                    .map(|alias| (option, alias))
            }
        })
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OptionDef> {
        self.options.iter()
    }

    /// Render the options back into a canonical definition string (without the description).
    ///
    /// Consecutive options sharing an optional group are wrapped in one pair of brackets.
    pub fn to_definition(&self) -> String {
        let mut parts = Vec::default();
        let mut open: Option<u32> = None;

        for (index, option) in self.options.iter().enumerate() {
            let mut part = String::default();

            if open.is_none() && option.is_optional() {
                part.push('[');
                open = option.group();
            }

            part.push_str(&option.to_definition());

            if option.is_optional() {
                let next = self.options.get(index + 1).and_then(OptionDef::group);

                if next != open {
                    part.push(']');
                    open = None;
                }
            }

            parts.push(part);
        }

        parts.join(" ")
    }
}

impl<'o> IntoIterator for &'o Options {
    type Item = &'o OptionDef;
    type IntoIter = std::slice::Iter<'o, OptionDef>;

    fn into_iter(self) -> Self::IntoIter {
        self.options.iter()
    }
}

/// Split `name -- Some text` into the option part and the description.
/// The `--` must sit at the start or follow whitespace.
fn split_description(definition: &str) -> (&str, Option<String>) {
    let mut boundary = true;

    for (index, character) in definition.char_indices() {
        if boundary && definition[index..].starts_with("-- ") {
            return (
                definition[..index].trim_end(),
                Some(definition[index + 3..].to_string()),
            );
        }

        boundary = character.is_whitespace();
    }

    (definition, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Kind;
    use rstest::rstest;

    fn check_option(
        option: &OptionDef,
        name: &str,
        kind: Kind,
        takes_value: bool,
        group: Option<u32>,
    ) {
        assert_eq!(option.name(), name);
        assert_eq!(option.kind(), kind);
        assert_eq!(option.takes_value(), takes_value);
        assert_eq!(option.group(), group);
    }

    #[test]
    fn empty() {
        let options = Options::new("").unwrap();

        assert!(options.is_empty());
        assert_eq!(options.description(), None);
        assert_eq!(options.to_definition(), "");
    }

    #[rstest]
    #[case("name", "name", Kind::Argument, false, None)]
    #[case("-f", "f", Kind::Short, false, None)]
    #[case("--force", "force", Kind::Long, false, None)]
    #[case("-f=", "f", Kind::Short, true, None)]
    #[case("--force=", "force", Kind::Long, true, None)]
    #[case("[name]", "name", Kind::Argument, false, Some(1))]
    #[case("[-f]", "f", Kind::Short, false, Some(1))]
    #[case("[--force]", "force", Kind::Long, false, Some(1))]
    fn single(
        #[case] definition: &str,
        #[case] name: &str,
        #[case] kind: Kind,
        #[case] takes_value: bool,
        #[case] group: Option<u32>,
    ) {
        let options = Options::new(definition).unwrap();

        assert_eq!(options.len(), 1);
        for option in &options {
            check_option(option, name, kind, takes_value, group);
        }
    }

    #[test]
    fn combined_short() {
        let options = Options::new("-ab=").unwrap();

        assert_eq!(options.len(), 2);
        check_option(options.get("a").unwrap(), "a", Kind::Short, false, None);
        check_option(options.get("b").unwrap(), "b", Kind::Short, true, None);
    }

    #[rstest]
    #[case("first_name last_name", None, None)]
    #[case("[first_name] last_name", Some(1), None)]
    #[case("first_name [last_name]", None, Some(1))]
    #[case("[first_name] [last_name]", Some(1), Some(2))]
    #[case("[first_name last_name]", Some(1), Some(1))]
    #[case("[<first_name> <last_name>]", Some(1), Some(1))]
    fn multi_argument(
        #[case] definition: &str,
        #[case] first: Option<u32>,
        #[case] last: Option<u32>,
    ) {
        let options = Options::new(definition).unwrap();

        assert_eq!(options.len(), 2);
        check_option(
            options.get("first_name").unwrap(),
            "first_name",
            Kind::Argument,
            false,
            first,
        );
        check_option(
            options.get("last_name").unwrap(),
            "last_name",
            Kind::Argument,
            false,
            last,
        );
    }

    #[rstest]
    #[case("-- Command description", 0, "Command description")]
    #[case("name -- Command description", 1, "Command description")]
    #[case("name   --   spaced out", 1, "  spaced out")]
    #[case("--force -- a -- b", 1, "a -- b")]
    fn description(#[case] definition: &str, #[case] size: usize, #[case] expected: &str) {
        let options = Options::new(definition).unwrap();

        assert_eq!(options.len(), size);
        assert_eq!(options.description(), Some(expected));
    }

    #[test]
    fn description_requires_boundary() {
        // `x-- y` is not a separator, so `x--` and `y` are plain argument names.
        let options = Options::new("x-- y").unwrap();

        assert_eq!(options.len(), 2);
        assert_eq!(options.description(), None);
    }

    #[rstest]
    #[case("-", GrammarError::EmptyName)]
    #[case("---force", GrammarError::LongAndShort)]
    #[case("name=", GrammarError::ArgumentValue)]
    #[case("name]", GrammarError::UnopenedOptional)]
    #[case("[first_name [last_name]]", GrammarError::NestedOptionals)]
    #[case("[first_name last_name", GrammarError::UnclosedOptional)]
    #[case("name name", GrammarError::DuplicateName("name".to_string()))]
    #[case("-f --force|-f", GrammarError::DuplicateName("f".to_string()))]
    #[case("-ab -b", GrammarError::DuplicateName("b".to_string()))]
    #[case("--force|-f -f", GrammarError::DuplicateName("f".to_string()))]
    fn invalid(#[case] definition: &str, #[case] expected: GrammarError) {
        assert_eq!(Options::new(definition).unwrap_err(), expected);
    }

    #[test]
    fn invalid_messages() {
        assert_eq!(
            Options::new("name name").unwrap_err().to_string(),
            "Duplicate option name: name"
        );
        assert_eq!(
            Options::new("[first_name [last_name]]")
                .unwrap_err()
                .to_string(),
            "Nested optionals are not allowed"
        );
    }

    #[test]
    fn get_with_alias() {
        let options = Options::new("-f|--force --name=|-n=").unwrap();

        let (option, form) = options.get_with_alias("force").unwrap();
        assert_eq!(option.name(), "f");
        assert!(option.is_short());
        assert!(form.is_long());

        let (option, form) = options.get_with_alias("f").unwrap();
        assert_eq!(option.name(), "f");
        assert!(form.is_short());

        let (option, form) = options.get_with_alias("n").unwrap();
        assert_eq!(option.name(), "name");
        assert!(form.is_short());
        assert!(form.takes_value());

        assert!(options.get_with_alias("missing").is_none());
        // `get` only knows primary names.
        assert!(options.get("force").is_none());
    }

    #[rstest]
    #[case("name", "<name>")]
    #[case("<name>", "<name>")]
    #[case("-n", "-n")]
    #[case("-nf", "-n -f")]
    #[case("-nf=", "-n -f=")]
    #[case("[-nf]", "[-n -f]")]
    #[case("--force", "--force")]
    #[case("-n=", "-n=")]
    #[case("--name=", "--name=")]
    #[case("[name]", "[<name>]")]
    #[case("[first_name] [last_name]", "[<first_name>] [<last_name>]")]
    #[case("[first_name last_name]", "[<first_name> <last_name>]")]
    #[case(
        "--force [name] [first_name last_name] -n=",
        "--force [<name>] [<first_name> <last_name>] -n="
    )]
    #[case("[--clear-cache|-c] file -- clear", "[--clear-cache|-c] <file>")]
    #[case("[a] b [c --d|-e]", "[<a>] <b> [<c> --d|-e]")]
    fn to_definition(#[case] definition: &str, #[case] expected: &str) {
        let options = Options::new(definition).unwrap();
        assert_eq!(options.to_definition(), expected);
    }

    #[rstest]
    #[case("[-v] [-f] [--lang] [--reason=] [foo bar] filename")]
    #[case("[--clear-cache|-c] <file> [a b -x=]")]
    #[case("-n -f= [--name=|-m=]")]
    fn to_definition_round_trip(#[case] definition: &str) {
        let options = Options::new(definition).unwrap();
        let rendered = options.to_definition();

        assert_eq!(Options::new(&rendered).unwrap().to_definition(), rendered);
        assert_eq!(Options::new(&rendered).unwrap().len(), options.len());
    }
}
