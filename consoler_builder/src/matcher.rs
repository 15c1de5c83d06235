use std::cmp::Reverse;
use std::collections::HashMap;
use thiserror::Error;

use crate::grammar::OptionDef;
use crate::model::Binding;
use crate::options::Options;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// Why a list of tokens did not match a set of options.
///
/// Not matching is an ordinary outcome; these only serve to explain it.
#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum NoMatch {
    #[error("Option '{0}' does not exist.")]
    UnknownOption(String),

    #[error("Option '{0}' is not declared in this form.")]
    WrongForm(String),

    #[error("Option '{0}' requires a value.")]
    MissingValue(String),

    #[error("Not enough tokens provided to argument '{0}'.")]
    Undercomplete(String),

    #[error("Option '{0}' was not provided.")]
    Unbound(String),
}

/// The values bound by a successful [`Matcher::match_tokens`].
///
/// Every option is present under its primary name and each of its aliases,
/// except optional positional arguments that received no token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Matches {
    bindings: HashMap<String, Binding>,
    remaining: Vec<String>,
}

impl Matches {
    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.bindings.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// The state of a long switch.
    pub fn flag(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Binding::as_flag)
    }

    /// The number of times a short switch occurred.
    pub fn count(&self, name: &str) -> Option<u32> {
        self.get(name).and_then(Binding::as_count)
    }

    /// The text bound to a value option or positional argument.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Binding::as_str)
    }

    /// Positional tokens left over after every declared argument was filled.
    pub fn remaining(&self) -> &[String] {
        &self.remaining
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Binding)> {
        self.bindings
            .iter()
            .map(|(name, binding)| (name.as_str(), binding))
    }
}

/// Matches token lists against a set of [`Options`].
///
/// ### Example
/// ```
/// # use consoler_builder as consoler;
/// use consoler::{Matcher, Options};
///
/// let options = Options::new("[-v] --reason= filename").unwrap();
/// let matches = Matcher::new(&options)
///     .match_tokens(&["-vv", "--reason", "no more", "hello.rb"])
///     .unwrap();
///
/// assert_eq!(matches.count("v"), Some(2));
/// assert_eq!(matches.value("reason"), Some("no more"));
/// assert_eq!(matches.value("filename"), Some("hello.rb"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Matcher<'o> {
    options: &'o Options,
}

/// Optional arguments sitting directly in front of a mandatory argument
/// (or at the end, when `mandatory` is `None`), grouped by optional group.
#[derive(Debug)]
struct Bucket<'o> {
    mandatory: Option<&'o str>,
    groups: Vec<Group<'o>>,
}

#[derive(Debug)]
struct Group<'o> {
    id: u32,
    members: Vec<&'o str>,
    included: bool,
}

impl<'o> Matcher<'o> {
    pub fn new(options: &'o Options) -> Self {
        Self { options }
    }

    /// Match `tokens` against the options.
    ///
    /// Returns `None` when the tokens don't fit; nothing is retained between calls.
    pub fn match_tokens<S: AsRef<str>>(&self, tokens: &[S]) -> Option<Matches> {
        match self.try_match(tokens) {
            Ok(matches) => Some(matches),
            Err(_no_match) => {
                #[cfg(feature = "tracing_debug")]
                {
                    debug!("No match: {_no_match}");
                }

                None
            }
        }
    }

    pub(crate) fn try_match<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Matches, NoMatch> {
        let mut bindings: HashMap<String, Binding> = HashMap::default();
        let mut positionals: Vec<String> = Vec::default();
        let mut literal = false;
        let mut index = 0;

        while index < tokens.len() {
            let token = tokens[index].as_ref();
            index += 1;

            if literal {
                positionals.push(token.to_string());
                continue;
            }

            // Everything after a bare `--` is positional.
            if token == "--" {
                literal = true;
                continue;
            }

            let next = tokens.get(index).map(AsRef::as_ref);
            let consumed_next = if let Some(name) = token.strip_prefix("--") {
                self.match_long(name, next, &mut bindings)?
            } else if let Some(name) = token.strip_prefix('-') {
                self.match_short(name, next, &mut bindings)?
            } else {
                positionals.push(token.to_string());
                false
            };

            if consumed_next {
                index += 1;
            }
        }

        let remaining = self.match_positionals(positionals, &mut bindings)?;
        self.fill_defaults(&mut bindings)?;
        self.mirror_aliases(&mut bindings);

        Ok(Matches {
            bindings,
            remaining,
        })
    }

    fn match_long(
        &self,
        name: &str,
        next: Option<&str>,
        bindings: &mut HashMap<String, Binding>,
    ) -> Result<bool, NoMatch> {
        let (option, form) = self
            .options
            .get_with_alias(name)
            .ok_or_else(|| NoMatch::UnknownOption(format!("--{name}")))?;

        if !form.is_long() {
            return Err(NoMatch::WrongForm(format!("--{name}")));
        }

        if option.takes_value() {
            let value = next.ok_or_else(|| NoMatch::MissingValue(format!("--{name}")))?;
            bindings.insert(
                option.name().to_string(),
                Binding::Value(Some(value.to_string())),
            );
            Ok(true)
        } else {
            bindings.insert(option.name().to_string(), Binding::Flag(true));
            Ok(false)
        }
    }

    /// Match `-v`, `-n value` or a combined `-vvf`.
    ///
    /// Each character counts one occurrence of its option.
    /// A value is only read (from the next token) when the first character takes one:
    /// then a value option in the final position binds the next token instead of counting.
    fn match_short(
        &self,
        name: &str,
        next: Option<&str>,
        bindings: &mut HashMap<String, Binding>,
    ) -> Result<bool, NoMatch> {
        let first = name
            .chars()
            .next()
            .ok_or_else(|| NoMatch::UnknownOption("-".to_string()))?;
        let reads_value = self.resolve_short(first)?.takes_value();
        let length = name.chars().count();
        let mut consumed_next = false;

        for (index, single) in name.chars().enumerate() {
            let option = self.resolve_short(single)?;

            if reads_value && option.takes_value() && index + 1 == length {
                let value = next.ok_or_else(|| NoMatch::MissingValue(format!("-{single}")))?;
                bindings.insert(
                    option.name().to_string(),
                    Binding::Value(Some(value.to_string())),
                );
                consumed_next = true;
            } else {
                let count = match bindings.get(option.name()) {
                    Some(Binding::Count(count)) => count + 1,
                    _ => 1,
                };
                bindings.insert(option.name().to_string(), Binding::Count(count));
            }
        }

        Ok(consumed_next)
    }

    fn resolve_short(&self, single: char) -> Result<&'o OptionDef, NoMatch> {
        let mut buffer = [0; 4];
        let name: &str = single.encode_utf8(&mut buffer);
        let (option, form) = self
            .options
            .get_with_alias(name)
            .ok_or_else(|| NoMatch::UnknownOption(format!("-{single}")))?;

        if form.is_short() {
            Ok(option)
        } else {
            Err(NoMatch::WrongForm(format!("-{single}")))
        }
    }

    /// Bind the positional tokens to the declared arguments, returning the leftovers.
    ///
    /// Mandatory arguments always take a token.
    /// The spare tokens go to whole optional groups, bucket by bucket in declaration order;
    /// within a bucket the largest group goes first (ties in declaration order).
    /// Tokens are then handed out left to right in declaration order.
    fn match_positionals(
        &self,
        positionals: Vec<String>,
        bindings: &mut HashMap<String, Binding>,
    ) -> Result<Vec<String>, NoMatch> {
        let mut buckets = self.buckets();
        let mandatory = buckets
            .iter()
            .filter(|bucket| bucket.mandatory.is_some())
            .count();
        let mut total = 0;

        for bucket in &mut buckets {
            let mut order: Vec<usize> = (0..bucket.groups.len()).collect();
            // Stable, so equal sizes keep declaration order.
            order.sort_by_key(|&index| Reverse(bucket.groups[index].members.len()));

            for index in order {
                let group = &mut bucket.groups[index];
                let size = group.members.len();

                if total + size + mandatory <= positionals.len() {
                    total += size;
                    group.included = true;
                }

                #[cfg(feature = "tracing_debug")]
                {
                    debug!(
                        "Optional group {id} ({size} arguments) included: {included}.",
                        id = group.id,
                        included = group.included
                    );
                }
            }
        }

        let mut supply = positionals.into_iter();

        for bucket in &buckets {
            for group in bucket.groups.iter().filter(|group| group.included) {
                for name in &group.members {
                    let value = supply
                        .next()
                        .ok_or_else(|| NoMatch::Undercomplete(name.to_string()))?;
                    bindings.insert(name.to_string(), Binding::Positional(value));
                }
            }

            if let Some(name) = bucket.mandatory {
                let value = supply
                    .next()
                    .ok_or_else(|| NoMatch::Undercomplete(name.to_string()))?;
                bindings.insert(name.to_string(), Binding::Positional(value));
            }
        }

        Ok(supply.collect())
    }

    fn buckets(&self) -> Vec<Bucket<'o>> {
        let mut buckets = Vec::default();
        let mut groups: Vec<Group<'o>> = Vec::default();

        for option in self.options.iter().filter(|option| option.is_argument()) {
            match option.group() {
                Some(id) => match groups.last_mut() {
                    Some(group) if group.id == id => group.members.push(option.name()),
                    _ => groups.push(Group {
                        id,
                        members: vec![option.name()],
                        included: false,
                    }),
                },
                None => buckets.push(Bucket {
                    mandatory: Some(option.name()),
                    groups: std::mem::take(&mut groups),
                }),
            }
        }

        if !groups.is_empty() {
            buckets.push(Bucket {
                mandatory: None,
                groups,
            });
        }

        buckets
    }

    fn fill_defaults(&self, bindings: &mut HashMap<String, Binding>) -> Result<(), NoMatch> {
        for option in self.options {
            if bindings.contains_key(option.name()) {
                continue;
            }

            if !option.is_optional() {
                return Err(NoMatch::Unbound(option.name().to_string()));
            }

            if let Some(binding) = option.default_binding() {
                bindings.insert(option.name().to_string(), binding);
            }
        }

        Ok(())
    }

    fn mirror_aliases(&self, bindings: &mut HashMap<String, Binding>) {
        for option in self.options {
            if let Some(binding) = bindings.get(option.name()).cloned() {
                for alias in option.aliases() {
                    bindings.insert(alias.name().to_string(), binding.clone());
                }
            }
        }
    }
}
