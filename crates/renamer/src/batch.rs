//! Preview-name generation for a batch of items.
//!
//! Responsibilities:
//! - Pick the base name per item (replacement text or the item's own name).
//! - Count repeated bases so each repeat starts at the next index.
//! - Keep items that would not change untouched.
//! - Resolve every other item against host names, the batch's current names
//!   and previews already generated in this batch.
//!
//! Besides the composed manual preview, a batch can run a list of
//! [`EditOp`]s, solve names through a [`RuleEngine`], or only deduplicate
//! clashing names. All of them finish with the same collision pass.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::host::{RuleEngine, RuleTokens};
use crate::naming::{
    IndexMode, Layered, NameRequest, NameUniverse, Resolver, SearchReplace, compose,
};
use crate::ops::{self, EditContext, EditOp};

/// A node selected for renaming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameItem {
    /// Short name as shown to the user.
    #[serde(rename = "name")]
    pub display_name: String,
    /// Stable host identifier (UUID, full DAG path, ...).
    #[serde(rename = "id", default)]
    pub canonical_id: String,
    /// Host node type (`joint`, `mesh`, ...), used by type filters and auto suffixes.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_name: Option<String>,
}

impl RenameItem {
    pub fn new(display_name: impl Into<String>) -> Self {
        let display_name = display_name.into();
        Self {
            canonical_id: display_name.clone(),
            display_name,
            node_type: None,
            resolved_name: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.canonical_id = id.into();
        self
    }

    pub fn with_type(mut self, node_type: impl Into<String>) -> Self {
        self.node_type = Some(node_type.into());
        self
    }

    /// Name the next pass starts from: the preview if one exists.
    fn working_name(&self) -> &str {
        self.resolved_name.as_deref().unwrap_or(&self.display_name)
    }

    /// True when a preview exists and differs from the current name.
    pub fn needs_rename(&self) -> bool {
        self.resolved_name
            .as_deref()
            .is_some_and(|n| n != self.display_name)
    }
}

/// Manual rename options shared by every item of a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManualOptions {
    /// Replacement base name; when empty each item keeps its own name as base.
    pub text: Option<String>,
    pub prefix: Option<String>,
    pub suffix: Option<String>,
    pub side: Option<String>,
    pub padding: usize,
    pub mode: IndexMode,
    pub capital: bool,
    pub remove_first: usize,
    pub remove_last: usize,
    pub search_replace: Option<SearchReplace>,
}

impl ManualOptions {
    fn decorated(&self) -> bool {
        [&self.prefix, &self.suffix, &self.side]
            .iter()
            .any(|t| t.as_deref().is_some_and(|s| !s.is_empty()))
    }

    /// Trims or a replacement are set, so even undecorated items may change.
    fn edited(&self) -> bool {
        self.remove_first > 0
            || self.remove_last > 0
            || self
                .search_replace
                .as_ref()
                .is_some_and(|sr| !sr.search.is_empty())
    }

    /// Build the resolver request for one base name.
    pub fn request(&self, base: &str, index: Option<u32>) -> NameRequest {
        NameRequest {
            base: base.to_string(),
            prefix: self.prefix.clone(),
            suffix: self.suffix.clone(),
            side: self.side.clone(),
            index,
            padding: self.padding,
            mode: self.mode,
            capital: self.capital,
            remove_first: self.remove_first,
            remove_last: self.remove_last,
            search_replace: self.search_replace.clone(),
        }
    }
}

/// Generate preview names for `items`, storing each in `resolved_name`.
pub fn generate_names<U: NameUniverse + ?Sized>(
    items: &mut [RenameItem],
    opts: &ManualOptions,
    resolver: &Resolver,
    universe: &U,
) -> Result<Vec<String>> {
    let current: HashSet<String> = items.iter().map(|i| i.display_name.clone()).collect();
    let mut generated: HashSet<String> = HashSet::with_capacity(items.len());
    let mut repeats: HashMap<String, u32> = HashMap::new();
    let mut out = Vec::with_capacity(items.len());
    let text = opts.text.as_deref().filter(|t| !t.is_empty());
    let decorated = opts.decorated();
    let edited = opts.edited();

    for item in items.iter_mut() {
        let base = text.unwrap_or(item.display_name.as_str()).to_string();
        let counter = *repeats
            .entry(base.clone())
            .and_modify(|c| *c += 1)
            .or_insert(0);
        let in_place = base == item.display_name;

        let preview = if in_place && !decorated && !edited {
            item.display_name.clone()
        } else {
            let index = if in_place { None } else { Some(counter) };
            let req = opts.request(&base, index);
            if in_place && compose(&req, None)? == item.display_name {
                item.display_name.clone()
            } else {
                let taken = Layered(universe, Layered(&current, &generated));
                resolver.resolve(&req, &taken)?
            }
        };
        tracing::debug!("preview {} -> {}", item.display_name, preview);

        generated.insert(preview.clone());
        item.resolved_name = Some(preview.clone());
        out.push(preview);
    }
    tracing::info!("generated {} preview name(s)", out.len());
    Ok(out)
}

/// Resolve `target` for `item` unless it is the item's current name.
fn settle<U: NameUniverse + ?Sized>(
    item: &RenameItem,
    target: String,
    resolver: &Resolver,
    universe: &U,
) -> Result<String> {
    if target == item.display_name {
        return Ok(target);
    }
    resolver.resolve(&NameRequest::new(target), universe)
}

fn record(
    item: &mut RenameItem,
    preview: String,
    emitted: &mut HashSet<String>,
    out: &mut Vec<String>,
) {
    tracing::debug!("preview {} -> {}", item.display_name, preview);
    emitted.insert(preview.clone());
    item.resolved_name = Some(preview.clone());
    out.push(preview);
}

/// Run `edits` on each item's working name, then make the results unique.
///
/// Items whose edit chain fails keep their working name and are logged;
/// the rest of the batch still goes through.
pub fn apply_edits<U: NameUniverse + ?Sized>(
    items: &mut [RenameItem],
    edits: &[EditOp],
    auto_suffixes: &BTreeMap<String, String>,
    resolver: &Resolver,
    universe: &U,
) -> Result<Vec<String>> {
    let current: HashSet<String> = items.iter().map(|i| i.display_name.clone()).collect();
    let mut emitted: HashSet<String> = HashSet::with_capacity(items.len());
    let mut out = Vec::with_capacity(items.len());

    for (position, item) in items.iter_mut().enumerate() {
        let start = item.working_name().to_string();
        let ctx = EditContext {
            position,
            node_type: item.node_type.as_deref(),
            auto_suffixes,
        };
        let target = match ops::apply_all(&start, edits, &ctx) {
            Ok(name) => name,
            Err(e) => {
                tracing::warn!("impossible to edit {}: {}", item.display_name, e);
                start
            }
        };
        let taken = Layered(universe, Layered(&current, &emitted));
        let preview = settle(item, target, resolver, &taken)?;
        record(item, preview, &mut emitted, &mut out);
    }
    tracing::info!("applied {} edit(s) to {} item(s)", edits.len(), out.len());
    Ok(out)
}

/// Give every repeat of an already-seen name a free indexed variant.
/// The first holder of a name keeps it.
pub fn make_unique_names<U: NameUniverse + ?Sized>(
    items: &mut [RenameItem],
    resolver: &Resolver,
    universe: &U,
) -> Result<Vec<String>> {
    let current: HashSet<String> = items.iter().map(|i| i.display_name.clone()).collect();
    let mut seen: HashSet<String> = HashSet::with_capacity(items.len());
    let mut emitted: HashSet<String> = HashSet::with_capacity(items.len());
    let mut out = Vec::with_capacity(items.len());

    for item in items.iter_mut() {
        let preview = if seen.insert(item.display_name.clone()) {
            item.display_name.clone()
        } else {
            let taken = Layered(universe, Layered(&current, &emitted));
            resolver.resolve(&NameRequest::new(item.display_name.clone()), &taken)?
        };
        record(item, preview, &mut emitted, &mut out);
    }
    Ok(out)
}

/// Solve each item's name through `engine`, then make the results unique.
///
/// An empty `description` falls back to the item's name. With `unique_id`
/// each item gets its selection position as the `id` token.
pub fn auto_names<E, U>(
    items: &mut [RenameItem],
    tokens: &RuleTokens,
    engine: &E,
    unique_id: bool,
    resolver: &Resolver,
    universe: &U,
) -> Result<Vec<String>>
where
    E: RuleEngine + ?Sized,
    U: NameUniverse + ?Sized,
{
    let current: HashSet<String> = items.iter().map(|i| i.display_name.clone()).collect();
    let mut emitted: HashSet<String> = HashSet::with_capacity(items.len());
    let mut out = Vec::with_capacity(items.len());

    for (position, item) in items.iter_mut().enumerate() {
        let mut t = tokens.clone();
        if t.description.is_empty() {
            t.description = item.display_name.clone();
        }
        if item.node_type.is_some() {
            t.node_type = item.node_type.clone();
        }
        t.id = unique_id.then(|| u32::try_from(position).unwrap_or(u32::MAX));

        let preview = match engine.solve(&t).filter(|n| !n.is_empty()) {
            Some(name) => {
                let taken = Layered(universe, Layered(&current, &emitted));
                settle(item, name, resolver, &taken)?
            }
            None => {
                tracing::warn!("no rule result for {}; keeping its name", item.display_name);
                item.display_name.clone()
            }
        };
        record(item, preview, &mut emitted, &mut out);
    }
    tracing::info!("solved {} name(s) from rule", out.len());
    Ok(out)
}

/// Keep only items of `node_type` (case-insensitive). Empty or `all` keeps everything.
pub fn retain_type(items: &mut Vec<RenameItem>, node_type: &str) {
    if node_type.is_empty() || node_type.eq_ignore_ascii_case("all") {
        return;
    }
    items.retain(|i| {
        i.node_type
            .as_deref()
            .is_some_and(|t| t.eq_ignore_ascii_case(node_type))
    });
}
