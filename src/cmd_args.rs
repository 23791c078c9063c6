//! # Argument Parser
//!
//! Consumes the arguments after the program name and fills in a [`Draft`].
//!
//! ```text
//! Options ──method──▶ Path ──"--"──▶ Pairs
//!   │  ▲
//!   ▼  │ value
//! Value(flag)
//! ```
//!
//! Each token moves the parser through [`transition`]; flags that take a
//! value park the parser in [`ParseState::Value`] so the next token is read
//! as that value and never as a flag.

use crate::draft::{Draft, Format};
use crate::error::{ReqError, Result};
use crate::value::{classify, Classification};

/// One-line usage shown when too few arguments are given
pub const USAGE: &str = "Usage: req [--host <host>] [--path <path>] [--header <name:value>] \
[--auth <value>] [--format <json|form>] [--verbose] [--scheme <scheme>] \
<method> <path> [<path> ...] [--] [<key>=<value> ...]";

/// Flags that consume the following token as their value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueFlag {
    Scheme,
    Host,
    Format,
    Path,
    Head,
    Header,
    Auth,
}

impl ValueFlag {
    fn from_token(token: &str) -> Option<Self> {
        match token {
            "--scheme" => Some(ValueFlag::Scheme),
            "--host" => Some(ValueFlag::Host),
            "--format" => Some(ValueFlag::Format),
            "--path" => Some(ValueFlag::Path),
            "--head" => Some(ValueFlag::Head),
            "--header" => Some(ValueFlag::Header),
            "--auth" => Some(ValueFlag::Auth),
            _ => None,
        }
    }

    /// The flag as typed on the command line
    pub fn name(self) -> &'static str {
        match self {
            ValueFlag::Scheme => "--scheme",
            ValueFlag::Host => "--host",
            ValueFlag::Format => "--format",
            ValueFlag::Path => "--path",
            ValueFlag::Head => "--head",
            ValueFlag::Header => "--header",
            ValueFlag::Auth => "--auth",
        }
    }

    fn apply(self, value: &str, draft: &mut Draft) -> Result<()> {
        match self {
            ValueFlag::Scheme => draft.scheme = value.to_string(),
            ValueFlag::Host => draft.host = value.to_string(),
            ValueFlag::Format => draft.format = Format::from_flag_value(value)?,
            ValueFlag::Path => draft.set_path(value),
            ValueFlag::Head | ValueFlag::Header => draft.add_header(value)?,
            ValueFlag::Auth => draft.set_auth(value)?,
        }
        Ok(())
    }
}

/// Where the parser is in the argument list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseState {
    /// Reading flags until the method token
    Options,
    /// The next token is the value of this flag
    Value(ValueFlag),
    /// Reading the host (if still unset) and path segments until `--`
    Path,
    /// Every token is a `key=value` body field or `key=@path` attachment
    Pairs,
}

/// Feed one token to the parser.
pub fn transition(state: ParseState, token: &str, draft: &mut Draft) -> Result<ParseState> {
    let next = match state {
        ParseState::Options => match token {
            "-v" | "--verbose" | "-d" | "--debug" => {
                draft.dump = true;
                ParseState::Options
            }
            _ => {
                if let Some(flag) = ValueFlag::from_token(token) {
                    ParseState::Value(flag)
                } else if token.starts_with('-') {
                    return Err(ReqError::UnknownFlag(token.to_string()));
                } else {
                    draft.method = token.to_uppercase();
                    ParseState::Path
                }
            }
        },
        ParseState::Value(flag) => {
            flag.apply(token, draft)?;
            ParseState::Options
        }
        ParseState::Path => {
            if token == "--" {
                ParseState::Pairs
            } else if draft.host.is_empty() {
                draft.host = token.to_string();
                ParseState::Path
            } else {
                draft.path.push(token.to_string());
                ParseState::Path
            }
        }
        ParseState::Pairs => {
            add_pair(token, draft)?;
            ParseState::Pairs
        }
    };
    tracing::trace!(?state, ?next, token, "parser transition");
    Ok(next)
}

fn add_pair(token: &str, draft: &mut Draft) -> Result<()> {
    let (key, value) = token
        .split_once('=')
        .ok_or_else(|| ReqError::InvalidPair(token.to_string()))?;

    match classify(value, draft.format.keeps_raw_strings()) {
        Classification::File(path) => {
            draft.files.insert(key.to_string(), path.to_string());
        }
        other => {
            if let Some(parsed) = other.into_value() {
                let parsed = parsed.map_err(|source| ReqError::InvalidJson {
                    key: key.to_string(),
                    source,
                })?;
                draft.body.insert(key.to_string(), parsed);
            }
        }
    }
    Ok(())
}

/// Run every token through the parser, failing on the first bad one.
pub fn parse_args<I, S>(args: I, draft: &mut Draft) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut state = ParseState::Options;
    for arg in args {
        state = transition(state, arg.as_ref(), draft)?;
    }
    if let ParseState::Value(flag) = state {
        return Err(ReqError::MissingValue(flag.name().to_string()));
    }
    tracing::debug!(
        method = %draft.method,
        host = %draft.host,
        fields = draft.body.len(),
        files = draft.files.len(),
        "arguments parsed"
    );
    Ok(())
}
