//! `consoler` is a command dispatcher for Rust Cli programs.
//!
//! Each command declares the options it accepts with a compact *definition string*, for example `[-v] --reason= <file>`.
//! The tokens following the command name are matched against that definition, and the command's handler receives the result.
//! There is no help generation beyond a single usage message; `consoler` aims to keep small Cli programs small.
//!
//! # Usage
//! ```no_run
#![doc = include_str!("../demos/demo_application.rs")]
//! ```
//!
//! ```console
//! $ jobs add nightly -p 3
//! Queued 'nightly' at priority 3.
//!
//! $ jobs rem -f nightly
//! Removed 'nightly' (forced: true).
//!
//! $ jobs worker start -vv 4
//! Starting 4 worker(s) (verbosity: 2).
//!
//! $ jobs frobnicate
//! Manage the job queue.
//!
//! Usage:
//!   jobs add <name> [--priority=|-p=]  -- queue a job
//!   jobs remove [-f|--force] <name>  -- remove a job
//!   jobs worker start [-v] [<count>]  -- start workers
//!   jobs worker stop  -- stop all workers
//! ```
//!
//! # Definitions
//! A definition is a whitespace separated list of options, optionally followed by ` -- ` and a description.
//! * `--name`: a long flag, bound to `true` when present (otherwise `false`).
//! * `-n`: a short flag, bound to the number of times it appears (otherwise `0`).
//! Short flags may be clustered in the definition (`-abc`) and on the Cli (`-vvf`).
//! * `--name=` / `-n=`: an option taking a value from the following token (otherwise unset).
//! * `name` / `<name>`: a positional argument.
//! * `[...]`: an optional group; every option inside is optional, and optional arguments in one group are filled together or not at all.
//! * `a|b`: aliases; the value is available under every name.
//!
//! On the Cli, `--` ends option parsing: every token after it is positional.
//!
//! # Matching
//! Options are matched wherever they appear.
//! Positional tokens fill the mandatory arguments first.
//! The leftover tokens are spent on optional groups in declaration order, where the largest group in front of a mandatory argument goes first.
//! In a combined short option (`-vn`) every character counts once; only when the first character takes a value does a value-taking last character read the next token.
//! Tokens beyond the declared arguments are available as [`Matches::remaining`].
//! Use the [`Matcher`] directly when no dispatch is needed:
//!
//! ```no_run
#![doc = include_str!("../demos/demo_matcher.rs")]
//! ```
//!
//! # Commands
//! Commands are tried in registration order, and the same name may be registered more than once.
//! A unique prefix selects a command (`rem` runs `remove`) unless some command carries exactly that name.
//! Sub-applications nest commands under a name of their own (see [`Application::sub_application`]).
//!
//! # Features
//! * `tracing_debug`: log each matching decision via [tracing](https://docs.rs/tracing).
pub use consoler_builder::*;
