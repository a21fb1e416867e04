//! Validated namespace paths.
//!
//! A path is absolute, '/'-delimited and canonical:
//! - no empty segments and no trailing separator (except the root "/")
//! - no "." or ".." segments
//! - no NUL, control or reserved characters

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PathError, PathResult};

/// Separator between path segments.
pub const SEPARATOR: char = '/';

/// Width of the zero-padded counter appended by sequential creates.
pub const SEQUENCE_WIDTH: usize = 10;

/// A validated, absolute path into the namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ZPath(String);

impl ZPath {
    /// The root path "/".
    pub fn root() -> Self {
        Self(SEPARATOR.to_string())
    }

    /// Parse and validate a path.
    pub fn parse(path: &str) -> PathResult<Self> {
        validate(path)?;
        Ok(Self(path.to_string()))
    }

    /// Build the path of a sequential node from the requested prefix and the
    /// parent's counter. The prefix may end with '/', in which case the
    /// counter alone becomes the node name.
    pub fn with_sequence(prefix: &str, sequence: i32) -> PathResult<Self> {
        Self::parse(&format!("{prefix}{sequence:0width$}", width = SEQUENCE_WIDTH))
    }

    /// Check that `prefix` is acceptable as a sequential-create prefix.
    pub fn validate_sequential_prefix(prefix: &str) -> PathResult<()> {
        validate(&format!("{prefix}1"))
    }

    /// Returns true for "/".
    pub fn is_root(&self) -> bool {
        self.0.len() == 1
    }

    /// Get the path as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The parent path, or `None` for the root.
    pub fn parent(&self) -> Option<ZPath> {
        if self.is_root() {
            return None;
        }
        match self.0.rfind(SEPARATOR) {
            Some(0) => Some(Self::root()),
            Some(idx) => Some(Self(self.0[..idx].to_string())),
            None => None,
        }
    }

    /// The last segment ("" for the root).
    pub fn name(&self) -> &str {
        match self.0.rfind(SEPARATOR) {
            Some(idx) => &self.0[idx + 1..],
            None => &self.0,
        }
    }

    /// Append a single child segment.
    pub fn child(&self, name: &str) -> PathResult<ZPath> {
        if self.is_root() {
            Self::parse(&format!("/{name}"))
        } else {
            Self::parse(&format!("{}/{name}", self.0))
        }
    }

    /// Number of segments below the root.
    pub fn depth(&self) -> usize {
        if self.is_root() {
            0
        } else {
            self.0.matches(SEPARATOR).count()
        }
    }
}

fn validate(path: &str) -> PathResult<()> {
    if path.is_empty() {
        return Err(PathError::Empty);
    }
    if !path.starts_with(SEPARATOR) {
        return Err(PathError::not_absolute(path));
    }
    if path.len() == 1 {
        return Ok(());
    }
    if path.ends_with(SEPARATOR) {
        return Err(PathError::trailing_slash(path));
    }

    // Skip the leading separator; `offset` tracks the byte index of each segment.
    let mut offset = 1;
    for segment in path[1..].split(SEPARATOR) {
        if segment.is_empty() {
            return Err(PathError::EmptySegment {
                path: path.to_string(),
                index: offset,
            });
        }
        if segment == "." || segment == ".." {
            return Err(PathError::RelativeSegment {
                path: path.to_string(),
                index: offset,
            });
        }
        for (i, ch) in segment.char_indices() {
            if is_forbidden(ch) {
                return Err(PathError::InvalidChar {
                    path: path.to_string(),
                    ch,
                    index: offset + i,
                });
            }
        }
        offset += segment.len() + 1;
    }
    Ok(())
}

fn is_forbidden(ch: char) -> bool {
    matches!(ch,
        '\u{0000}'..='\u{001f}'
        | '\u{007f}'..='\u{009f}'
        | '\u{e000}'..='\u{f8ff}'
        | '\u{fff0}'..='\u{ffff}')
}

impl fmt::Display for ZPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ZPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for ZPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ZPath {
    type Error = PathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        validate(&value)?;
        Ok(Self(value))
    }
}

impl From<ZPath> for String {
    fn from(path: ZPath) -> Self {
        path.0
    }
}
