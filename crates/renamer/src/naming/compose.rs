//! Candidate composition: `[prefix_][side_]base[_index][_suffix]`, then trims
//! and the search/replace pass.

use super::alpha::alpha_index;
use super::request::{IndexMode, NameRequest};
use crate::error::{RenameError, Result};

/// Prefix, side and base joined. Fixed for every retry of a request.
pub fn stem(req: &NameRequest) -> String {
    let side = req.side.as_deref().filter(|s| !s.is_empty());
    match (req.prefix.as_deref().filter(|p| !p.is_empty()), side) {
        (Some(prefix), Some(side)) => format!("{}_{}_{}", prefix, side, req.base),
        (Some(prefix), None) => format!("{}_{}", prefix, req.base),
        (None, Some(side)) => format!("{}_{}", side, req.base),
        (None, None) => req.base.clone(),
    }
}

/// Render the index token without its leading separator.
pub fn index_token(req: &NameRequest, index: u32) -> String {
    match req.mode {
        IndexMode::Numeric => format!("{:0width$}", index, width = req.padding),
        IndexMode::Alphabetic => alpha_index(index, req.capital),
    }
}

/// Compose the candidate for `index` (`None` omits the index token).
pub fn compose(req: &NameRequest, index: Option<u32>) -> Result<String> {
    compose_from_stem(req, &stem(req), index)
}

pub(crate) fn compose_from_stem(
    req: &NameRequest,
    stem: &str,
    index: Option<u32>,
) -> Result<String> {
    let mut name = stem.to_string();
    if let Some(i) = index {
        name.push('_');
        name.push_str(&index_token(req, i));
    }
    if let Some(suffix) = req.suffix.as_deref().filter(|s| !s.is_empty()) {
        name.push('_');
        name.push_str(suffix);
    }
    if req.remove_first > 0 {
        name = drop_leading(&name, req.remove_first);
    }
    if req.remove_last > 0 {
        name = drop_trailing(&name, req.remove_last);
    }
    if let Some(sr) = req.search_replace.as_ref().filter(|sr| !sr.search.is_empty()) {
        name = name.replace(&sr.search, &sr.replace);
    }
    if name.is_empty() {
        return Err(RenameError::EmptyName(stem.to_string()));
    }
    Ok(name)
}

/// Drop `n` leading characters, plus the `_` separator the cut would expose.
pub(crate) fn drop_leading(name: &str, n: usize) -> String {
    let rest: String = name.chars().skip(n).collect();
    match rest.strip_prefix('_') {
        Some(stripped) => stripped.to_string(),
        None => rest,
    }
}

pub(crate) fn drop_trailing(name: &str, n: usize) -> String {
    let keep = name.chars().count().saturating_sub(n);
    name.chars().take(keep).collect()
}
