//! Manual rename edits on a single short name.
//!
//! Each edit returns the new name or the reason it cannot be applied; the
//! caller decides whether to skip the node or abort.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{RenameError, Result};
use crate::naming::Side;
use crate::naming::compose::{drop_leading, drop_trailing};

fn require_text(name: &str, what: &str, text: &str) -> Result<()> {
    if text.is_empty() {
        return Err(RenameError::InvalidRequest(format!(
            "no {} to apply to '{}'",
            what, name
        )));
    }
    Ok(())
}

fn non_empty(original: &str, name: String) -> Result<String> {
    if name.is_empty() {
        return Err(RenameError::EmptyName(original.to_string()));
    }
    Ok(name)
}

pub fn add_prefix(name: &str, prefix: &str) -> Result<String> {
    require_text(name, "prefix", prefix)?;
    if prefix.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(RenameError::LeadingDigit(prefix.to_string()));
    }
    Ok(format!("{}{}", prefix, name))
}

pub fn add_suffix(name: &str, suffix: &str) -> Result<String> {
    require_text(name, "suffix", suffix)?;
    Ok(format!("{}{}", name, suffix))
}

pub fn add_side(name: &str, side: Side, capital: bool) -> String {
    format!("{}_{}", name, side.token(capital))
}

/// Drop everything up to and including the first `_`.
pub fn remove_prefix(name: &str) -> Result<String> {
    let (_, rest) = name
        .split_once('_')
        .ok_or_else(|| RenameError::MissingSeparator(name.to_string()))?;
    non_empty(name, rest.to_string())
}

/// Drop everything from the last `_` on.
pub fn remove_suffix(name: &str) -> Result<String> {
    let (head, _) = name
        .rsplit_once('_')
        .ok_or_else(|| RenameError::MissingSeparator(name.to_string()))?;
    non_empty(name, head.to_string())
}

fn check_count(name: &str, count: usize) -> Result<()> {
    if count == 0 {
        return Err(RenameError::InvalidCount {
            name: name.to_string(),
            count,
            reason: "must be greater than zero",
        });
    }
    if count >= name.chars().count() {
        return Err(RenameError::InvalidCount {
            name: name.to_string(),
            count,
            reason: "must be less than the name length",
        });
    }
    Ok(())
}

pub fn remove_first(name: &str, count: usize) -> Result<String> {
    check_count(name, count)?;
    non_empty(name, drop_leading(name, count))
}

pub fn remove_last(name: &str, count: usize) -> Result<String> {
    check_count(name, count)?;
    non_empty(name, drop_trailing(name, count))
}

pub fn search_replace(name: &str, search: &str, replace: &str) -> Result<String> {
    if search.is_empty() {
        return Ok(name.to_string());
    }
    non_empty(name, name.replace(search, replace))
}

pub fn remove_all_numbers(name: &str) -> Result<String> {
    let stripped: String = name.chars().filter(|c| !c.is_ascii_digit()).collect();
    non_empty(name, stripped.trim_end_matches('_').to_string())
}

/// Strip the trailing number and the `_` left in front of it.
pub fn remove_trailing_numbers(name: &str) -> Result<String> {
    let (head, _) = split_trailing_number(name);
    non_empty(name, head.trim_end_matches('_').to_string())
}

fn split_trailing_number(name: &str) -> (&str, &str) {
    let head = name.trim_end_matches(|c: char| c.is_ascii_digit());
    (head, &name[head.len()..])
}

fn check_pad(name: &str, pad: usize) -> Result<()> {
    if pad == 0 {
        return Err(RenameError::InvalidCount {
            name: name.to_string(),
            count: pad,
            reason: "padding must be greater than zero",
        });
    }
    Ok(())
}

/// Replace any trailing number with `_<index>` padded to `pad` digits.
pub fn replace_padding(name: &str, index: u32, pad: usize) -> Result<String> {
    check_pad(name, pad)?;
    let head = remove_trailing_numbers(name)?;
    Ok(format!("{}_{:0pad$}", head, index, pad = pad))
}

/// Append `_<index>` padded to `pad` digits, keeping existing digits.
pub fn append_padding(name: &str, index: u32, pad: usize) -> Result<String> {
    check_pad(name, pad)?;
    Ok(format!("{}_{:0pad$}", name, index, pad = pad))
}

/// Re-pad an existing trailing number; names without one are returned as-is.
pub fn change_padding(name: &str, pad: usize) -> Result<String> {
    check_pad(name, pad)?;
    let (head, digits) = split_trailing_number(name);
    if digits.is_empty() {
        return Ok(name.to_string());
    }
    let trimmed = digits.trim_start_matches('0');
    let value = if trimmed.is_empty() { "0" } else { trimmed };
    let head = if head.is_empty() || head.ends_with('_') {
        head.to_string()
    } else {
        format!("{}_", head)
    };
    Ok(format!("{}{:0>pad$}", head, value, pad = pad))
}

/// Namespace part and short name, split at the last `:`.
pub fn split_namespace(name: &str) -> (Option<&str>, &str) {
    match name.rsplit_once(':') {
        Some((ns, short)) => (Some(ns), short),
        None => (None, name),
    }
}

/// Put `name` under `namespace`, replacing any namespace it already has.
pub fn add_namespace(name: &str, namespace: &str) -> Result<String> {
    require_text(name, "namespace", namespace)?;
    let (_, short) = split_namespace(name);
    Ok(format!("{}:{}", namespace.trim_end_matches(':'), short))
}

/// Remove `namespace` when it is the name's leading namespace.
pub fn remove_namespace(name: &str, namespace: &str) -> Result<String> {
    require_text(name, "namespace", namespace)?;
    let ns = namespace.trim_end_matches(':');
    match name.strip_prefix(ns).and_then(|r| r.strip_prefix(':')) {
        Some(rest) => non_empty(name, rest.to_string()),
        None => Ok(name.to_string()),
    }
}

pub fn strip_namespaces(name: &str) -> String {
    split_namespace(name).1.to_string()
}

/// Node-type to suffix table used when no `[naming] auto_suffixes` is configured.
pub fn default_auto_suffixes() -> BTreeMap<String, String> {
    [
        ("camera", "cam"),
        ("joint", "jnt"),
        ("locator", "loc"),
        ("mesh", "geo"),
        ("nurbscurve", "ctrl"),
        ("transform", "grp"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

/// Append the suffix configured for `node_type`. Names that already end in
/// `_<suffix>` are returned unchanged. Table keys are lower-case.
pub fn auto_suffix(
    name: &str,
    node_type: Option<&str>,
    table: &BTreeMap<String, String>,
) -> Result<String> {
    let node_type = node_type.ok_or_else(|| {
        RenameError::InvalidRequest(format!("'{}' has no node type", name))
    })?;
    let suffix = table
        .get(&node_type.to_ascii_lowercase())
        .ok_or_else(|| RenameError::UnknownNodeType(node_type.to_string()))?;
    let tail = format!("_{}", suffix);
    if name.ends_with(&tail) {
        return Ok(name.to_string());
    }
    Ok(format!("{}{}", name, tail))
}

fn first_index() -> u32 {
    1
}

/// One step of a job's edit list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditOp {
    AddPrefix {
        prefix: String,
    },
    AddSuffix {
        suffix: String,
    },
    AddSide {
        side: Side,
        #[serde(default)]
        capital: bool,
    },
    RemovePrefix,
    RemoveSuffix,
    RemoveFirst {
        count: usize,
    },
    RemoveLast {
        count: usize,
    },
    SearchReplace {
        search: String,
        #[serde(default)]
        replace: String,
    },
    RemoveAllNumbers,
    RemoveTrailingNumbers,
    /// Renumber items in selection order starting at `start`.
    ReplacePadding {
        pad: usize,
        #[serde(default = "first_index")]
        start: u32,
    },
    AppendPadding {
        pad: usize,
        #[serde(default = "first_index")]
        start: u32,
    },
    ChangePadding {
        pad: usize,
    },
    AddNamespace {
        namespace: String,
    },
    RemoveNamespace {
        namespace: String,
    },
    StripNamespaces,
    AutoSuffix,
}

/// Per-item data an [`EditOp`] may need besides the name.
#[derive(Debug, Clone, Copy)]
pub struct EditContext<'a> {
    /// Position of the item in the selection.
    pub position: usize,
    pub node_type: Option<&'a str>,
    pub auto_suffixes: &'a BTreeMap<String, String>,
}

impl EditContext<'_> {
    fn index(&self, start: u32) -> u32 {
        start.saturating_add(u32::try_from(self.position).unwrap_or(u32::MAX))
    }
}

impl EditOp {
    pub fn apply(&self, name: &str, ctx: &EditContext<'_>) -> Result<String> {
        match self {
            EditOp::AddPrefix { prefix } => add_prefix(name, prefix),
            EditOp::AddSuffix { suffix } => add_suffix(name, suffix),
            EditOp::AddSide { side, capital } => Ok(add_side(name, *side, *capital)),
            EditOp::RemovePrefix => remove_prefix(name),
            EditOp::RemoveSuffix => remove_suffix(name),
            EditOp::RemoveFirst { count } => remove_first(name, *count),
            EditOp::RemoveLast { count } => remove_last(name, *count),
            EditOp::SearchReplace { search, replace } => search_replace(name, search, replace),
            EditOp::RemoveAllNumbers => remove_all_numbers(name),
            EditOp::RemoveTrailingNumbers => remove_trailing_numbers(name),
            EditOp::ReplacePadding { pad, start } => replace_padding(name, ctx.index(*start), *pad),
            EditOp::AppendPadding { pad, start } => append_padding(name, ctx.index(*start), *pad),
            EditOp::ChangePadding { pad } => change_padding(name, *pad),
            EditOp::AddNamespace { namespace } => add_namespace(name, namespace),
            EditOp::RemoveNamespace { namespace } => remove_namespace(name, namespace),
            EditOp::StripNamespaces => Ok(strip_namespaces(name)),
            EditOp::AutoSuffix => auto_suffix(name, ctx.node_type, ctx.auto_suffixes),
        }
    }
}

/// Run `edits` in order; the first failing edit aborts the chain.
pub fn apply_all(name: &str, edits: &[EditOp], ctx: &EditContext<'_>) -> Result<String> {
    edits
        .iter()
        .try_fold(name.to_string(), |current, op| op.apply(&current, ctx))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_rules() {
        assert_eq!(add_prefix("arm", "L_").unwrap(), "L_arm");
        assert!(matches!(add_prefix("arm", "1_"), Err(RenameError::LeadingDigit(_))));
        assert!(matches!(add_prefix("arm", ""), Err(RenameError::InvalidRequest(_))));
    }

    #[test]
    fn suffix_and_side() {
        assert_eq!(add_suffix("arm", "_jnt").unwrap(), "arm_jnt");
        assert_eq!(add_side("arm", Side::Left, true), "arm_L");
    }

    #[test]
    fn remove_prefix_and_suffix() {
        assert_eq!(remove_prefix("L_arm_jnt").unwrap(), "arm_jnt");
        assert_eq!(remove_suffix("L_arm_jnt").unwrap(), "L_arm");
        assert!(matches!(remove_prefix("arm"), Err(RenameError::MissingSeparator(_))));
        assert_eq!(remove_suffix("arm_").unwrap(), "arm");
        assert!(matches!(remove_prefix("arm_"), Err(RenameError::EmptyName(_))));
    }

    #[test]
    fn remove_counts() {
        assert_eq!(remove_first("ab_cube_01", 2).unwrap(), "cube_01");
        assert_eq!(remove_last("cube_001", 3).unwrap(), "cube_");
        assert!(matches!(remove_first("cube", 0), Err(RenameError::InvalidCount { .. })));
        assert!(matches!(remove_last("cube", 4), Err(RenameError::InvalidCount { .. })));
    }

    #[test]
    fn replace_is_global() {
        assert_eq!(search_replace("L_arm_L_01", "L_", "R_").unwrap(), "R_arm_R_01");
        assert_eq!(search_replace("arm", "", "x").unwrap(), "arm");
    }

    #[test]
    fn numbers() {
        assert_eq!(remove_all_numbers("arm1_seg2_03").unwrap(), "arm_seg");
        assert_eq!(remove_trailing_numbers("arm1_seg_03").unwrap(), "arm1_seg");
        assert_eq!(remove_trailing_numbers("arm").unwrap(), "arm");
        assert!(matches!(remove_all_numbers("123"), Err(RenameError::EmptyName(_))));
    }

    #[test]
    fn padding_edits() {
        assert_eq!(replace_padding("arm12", 3, 3).unwrap(), "arm_003");
        assert_eq!(append_padding("arm12", 3, 2).unwrap(), "arm12_03");
        assert_eq!(change_padding("arm_7", 3).unwrap(), "arm_007");
        assert_eq!(change_padding("arm0012", 2).unwrap(), "arm_12");
        assert_eq!(change_padding("arm", 2).unwrap(), "arm");
        assert!(matches!(change_padding("arm_1", 0), Err(RenameError::InvalidCount { .. })));
    }

    #[test]
    fn namespaces() {
        assert_eq!(add_namespace("arm", "char").unwrap(), "char:arm");
        assert_eq!(add_namespace("old:arm", "new:").unwrap(), "new:arm");
        assert_eq!(remove_namespace("char:arm", "char").unwrap(), "arm");
        assert_eq!(remove_namespace("prop:arm", "char").unwrap(), "prop:arm");
        assert_eq!(strip_namespaces("a:b:arm"), "arm");
        assert_eq!(split_namespace("arm"), (None, "arm"));
    }

    #[test]
    fn auto_suffix_uses_table() {
        let table = default_auto_suffixes();
        assert_eq!(auto_suffix("arm", Some("joint"), &table).unwrap(), "arm_jnt");
        assert_eq!(auto_suffix("hand", Some("nurbsCurve"), &table).unwrap(), "hand_ctrl");
        assert_eq!(auto_suffix("arm_jnt", Some("joint"), &table).unwrap(), "arm_jnt");
        assert!(matches!(
            auto_suffix("sun", Some("light"), &table),
            Err(RenameError::UnknownNodeType(_))
        ));
        assert!(matches!(
            auto_suffix("arm", None, &table),
            Err(RenameError::InvalidRequest(_))
        ));
    }

    #[test]
    fn edit_chain_runs_in_order() {
        let table = default_auto_suffixes();
        let ctx = EditContext {
            position: 2,
            node_type: Some("joint"),
            auto_suffixes: &table,
        };
        let edits = vec![
            EditOp::SearchReplace {
                search: "L_".into(),
                replace: "R_".into(),
            },
            EditOp::RemoveLast { count: 1 },
        ];
        assert_eq!(apply_all("L_arm", &edits, &ctx).unwrap(), "R_ar");
        let edits = vec![
            EditOp::RemoveAllNumbers,
            EditOp::ReplacePadding { pad: 2, start: 1 },
            EditOp::AutoSuffix,
        ];
        assert_eq!(apply_all("joint7", &edits, &ctx).unwrap(), "joint_03_jnt");
        assert!(apply_all("arm", &[EditOp::RemoveFirst { count: 9 }], &ctx).is_err());
    }

    #[test]
    fn edits_parse_from_toml() {
        #[derive(Deserialize)]
        struct Doc {
            edits: Vec<EditOp>,
        }
        let doc: Doc = toml::from_str(
            r#"
edits = [
    { op = "add_side", side = "left", capital = true },
    { op = "append_padding", pad = 3 },
    { op = "strip_namespaces" },
]
"#,
        )
        .expect("parse");
        assert_eq!(
            doc.edits,
            vec![
                EditOp::AddSide {
                    side: Side::Left,
                    capital: true
                },
                EditOp::AppendPadding { pad: 3, start: 1 },
                EditOp::StripNamespaces,
            ]
        );
    }
}
