/*
[INPUT]:  User-facing Lens handle strings
[OUTPUT]: Validated local names and display forms
[POS]:    Data layer - handle validation
[UPDATE]: When handle naming rules change
*/

use std::fmt;

use crate::http::ValidationError;

const MIN_LEN: usize = 3;
const MAX_LEN: usize = 31;

/// Lens handle local name, stored without the leading `@`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Handle(String);

impl Handle {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let local = raw.strip_prefix('@').unwrap_or(raw);
        let well_formed = (MIN_LEN..=MAX_LEN).contains(&local.len())
            && local
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_' || b == b'-');

        if !well_formed {
            return Err(ValidationError::InvalidHandle {
                value: raw.to_string(),
            });
        }
        Ok(Self(local.to_string()))
    }

    pub fn local_name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}
