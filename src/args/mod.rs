//! CLI argument types and parsing helpers.
mod cli;
mod defaults;
pub(crate) mod parsers;

#[cfg(test)]
mod test_support;

pub use cli::{AttackArgs, BeesArgs, Command, EnlistArgs};

pub(crate) use defaults::default_key_dir;
pub(crate) use parsers::{parse_basic_auth, parse_bee, parse_duration, parse_header, parse_threshold};
