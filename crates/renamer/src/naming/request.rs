use serde::{Deserialize, Serialize};

use super::side::Side;
use crate::error::{RenameError, Result};

/// Widest zero padding accepted for numeric index tokens.
pub const MAX_PADDING: usize = 32;

/// How the index token is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexMode {
    #[default]
    Numeric,
    Alphabetic,
}

/// Literal substring replacement applied after composition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchReplace {
    pub search: String,
    #[serde(default)]
    pub replace: String,
}

/// Input to the resolver: a base name plus the tokens wrapped around it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameRequest {
    pub base: String,
    #[serde(default)]
    pub prefix: Option<String>,
    #[serde(default)]
    pub suffix: Option<String>,
    /// Side tag as it appears in the name (`l`, `R`, or a host-specific tag).
    #[serde(default)]
    pub side: Option<String>,
    /// Starting index; `None` composes without an index token.
    #[serde(default)]
    pub index: Option<u32>,
    #[serde(default)]
    pub padding: usize,
    #[serde(default)]
    pub mode: IndexMode,
    /// Upper-case letters in alphabetic mode.
    #[serde(default)]
    pub capital: bool,
    /// Leading characters to drop; a `_` left exposed by the cut is dropped too.
    #[serde(default)]
    pub remove_first: usize,
    #[serde(default)]
    pub remove_last: usize,
    #[serde(default)]
    pub search_replace: Option<SearchReplace>,
}

impl NameRequest {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            prefix: None,
            suffix: None,
            side: None,
            index: None,
            padding: 0,
            mode: IndexMode::Numeric,
            capital: false,
            remove_first: 0,
            remove_last: 0,
            search_replace: None,
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    pub fn with_side(mut self, side: Side, capital: bool) -> Self {
        self.side = Some(side.token(capital).to_string());
        self
    }

    pub fn with_side_tag(mut self, tag: impl Into<String>) -> Self {
        self.side = Some(tag.into());
        self
    }

    pub fn with_index(mut self, index: u32) -> Self {
        self.index = Some(index);
        self
    }

    pub fn numeric(mut self, padding: usize) -> Self {
        self.mode = IndexMode::Numeric;
        self.padding = padding;
        self
    }

    pub fn alphabetic(mut self, capital: bool) -> Self {
        self.mode = IndexMode::Alphabetic;
        self.capital = capital;
        self
    }

    pub fn with_remove(mut self, first: usize, last: usize) -> Self {
        self.remove_first = first;
        self.remove_last = last;
        self
    }

    pub fn with_replace(mut self, search: impl Into<String>, replace: impl Into<String>) -> Self {
        self.search_replace = Some(SearchReplace {
            search: search.into(),
            replace: replace.into(),
        });
        self
    }

    /// Reject requests that cannot be composed. Runs before the universe is consulted.
    pub fn validate(&self) -> Result<()> {
        if self.base.is_empty() {
            return Err(RenameError::InvalidRequest("base name is empty".into()));
        }
        if self.padding > MAX_PADDING {
            return Err(RenameError::InvalidRequest(format!(
                "padding {} exceeds maximum of {}",
                self.padding, MAX_PADDING
            )));
        }
        Ok(())
    }
}
