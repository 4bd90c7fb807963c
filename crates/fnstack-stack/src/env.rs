//! Parsing of repeated `KEY=VALUE` environment tokens.

use std::collections::BTreeMap;

use fnstack_common::error::{FnstackError, Result};

/// Parses `--env` tokens into a mapping.
///
/// Each token is trimmed and split on its first `=`, so values may
/// themselves contain `=`. Tokens are applied in order and a later
/// duplicate key replaces the earlier value.
///
/// # Errors
///
/// Returns [`FnstackError::InvalidEnvVar`] naming the token if it has no
/// `=`, an empty key, or an empty value.
pub fn parse_env<I, S>(tokens: I) -> Result<BTreeMap<String, String>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut env = BTreeMap::new();
    for token in tokens {
        let (key, value) = parse_token(token.as_ref())?;
        if let Some(previous) = env.insert(key.to_string(), value.to_string()) {
            tracing::debug!(key, previous = %previous, "environment variable overridden");
        }
    }
    Ok(env)
}

fn parse_token(raw: &str) -> Result<(&str, &str)> {
    let invalid = |reason| FnstackError::InvalidEnvVar {
        token: raw.to_string(),
        reason,
    };

    let (key, value) = raw.trim().split_once('=').ok_or_else(|| invalid("missing `=`"))?;
    if key.is_empty() {
        return Err(invalid("empty name"));
    }
    if value.is_empty() {
        return Err(invalid("empty value"));
    }
    Ok((key, value))
}
