//! Builder module for `consoler`.
//! See [documentation root](https://docs.rs/consoler/latest/consoler/index.html) for full details.
mod application;
mod grammar;
mod interface;
mod matcher;
mod model;
mod options;
mod printer;

pub use application::{Application, ConfigError, Dispatcher, Handler};
pub use grammar::{GrammarError, OptionDef};
pub use matcher::{Matcher, Matches};
pub use model::{Binding, Kind};
pub use options::Options;

#[cfg(test)]
#[macro_use]
extern crate assert_matches;

#[cfg(test)]
pub(crate) mod test {
    macro_rules! assert_contains {
        ($base:expr, $sub:expr) => {
            assert!(
                $base.contains($sub),
                "'{b}' does not contain '{s}'",
                b = $base,
                s = $sub,
            );
        };
    }

    pub(crate) use assert_contains;
}
