//! Command-line flags declared by notifiers.

use std::collections::HashMap;

/// Value types a notifier flag may take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagKind {
    String,
    Int,
    Bool,
}

impl FlagKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int => "int",
            Self::Bool => "bool",
        }
    }
}

/// A parsed flag value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagValue {
    String(String),
    Int(i64),
    Bool(bool),
}

/// Description of one flag, merged into the command line at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagSpec {
    /// Long name without the leading dashes, e.g. `tg-token`.
    pub long: &'static str,
    pub short: Option<char>,
    pub help: &'static str,
    pub kind: FlagKind,
    /// Environment variable read when the flag is not given.
    pub env: &'static str,
}

/// Flag values keyed by long name. Flags left unset are absent.
pub type FlagValues = HashMap<String, FlagValue>;
