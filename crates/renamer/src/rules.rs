//! Template-driven naming rules for automatic renames.
//!
//! A rule is a `_`-separated template such as `{side}_{description}_{id}_{type}`.
//! Segments whose tokens are missing are dropped together with their
//! separator, so the same rule names sided and unsided nodes.

use std::collections::BTreeMap;

use crate::host::{RuleEngine, RuleTokens};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateRule {
    template: String,
    padding: usize,
    type_codes: BTreeMap<String, String>,
}

impl TemplateRule {
    /// `type_codes` maps lower-case node types to the text written for
    /// `{type}`; unmapped types are written as-is.
    pub fn new(
        template: impl Into<String>,
        padding: usize,
        type_codes: BTreeMap<String, String>,
    ) -> Self {
        Self {
            template: template.into(),
            padding,
            type_codes,
        }
    }

    fn token(&self, key: &str, t: &RuleTokens) -> Option<String> {
        let value = match key {
            "description" => Some(t.description.clone()),
            "side" => t.side.clone(),
            "type" => t.node_type.as_ref().map(|ty| {
                self.type_codes
                    .get(&ty.to_ascii_lowercase())
                    .cloned()
                    .unwrap_or_else(|| ty.clone())
            }),
            "id" => t.id.map(|i| format!("{:0width$}", i, width = self.padding)),
            _ => None,
        };
        value.filter(|v| !v.is_empty())
    }

    fn render(&self, segment: &str, t: &RuleTokens) -> Option<String> {
        let mut out = String::new();
        let mut rest = segment;
        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let Some(close) = after.find('}') else {
                // unbalanced brace, keep literally
                out.push_str(&rest[open..]);
                rest = "";
                break;
            };
            out.push_str(&self.token(&after[..close], t)?);
            rest = &after[close + 1..];
        }
        out.push_str(rest);
        (!out.is_empty()).then_some(out)
    }
}

impl RuleEngine for TemplateRule {
    fn solve(&self, tokens: &RuleTokens) -> Option<String> {
        let parts: Vec<String> = self
            .template
            .split('_')
            .filter_map(|segment| self.render(segment, tokens))
            .collect();
        if parts.is_empty() {
            return None;
        }
        Some(parts.join("_"))
    }
}
