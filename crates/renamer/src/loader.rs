//! Batch job files.
//!
//! A job lists the names already present in the scene, the items to rename
//! and how to name them: manual options, an automatic rule or plain
//! deduplication, optionally followed by a list of edits. TOML and YAML are
//! accepted, picked by file extension.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context as _, bail};
use serde::Deserialize;

use crate::batch::{
    ManualOptions, RenameItem, apply_edits, auto_names, generate_names, make_unique_names,
    retain_type,
};
use crate::config::Settings;
use crate::error::Result;
use crate::host::RuleTokens;
use crate::naming::{IndexMode, NameUniverse, Resolver, SearchReplace};
use crate::ops::EditOp;
use crate::rules::TemplateRule;

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ItemEntry {
    Name(String),
    Item(RenameItem),
}

impl ItemEntry {
    fn into_item(self) -> RenameItem {
        match self {
            ItemEntry::Name(n) => RenameItem::new(n),
            ItemEntry::Item(mut item) => {
                if item.canonical_id.is_empty() {
                    item.canonical_id = item.display_name.clone();
                }
                item.resolved_name = None;
                item
            }
        }
    }
}

/// Options as written in a job; unset fields fall back to [`Settings`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct JobOptions {
    pub text: Option<String>,
    pub prefix: Option<String>,
    pub suffix: Option<String>,
    pub side: Option<String>,
    pub padding: Option<usize>,
    pub mode: Option<IndexMode>,
    pub capital: Option<bool>,
    pub remove_first: usize,
    pub remove_last: usize,
    pub search: Option<String>,
    pub replace: Option<String>,
    /// Only rename items of this node type.
    pub filter_type: Option<String>,
}

impl JobOptions {
    pub fn resolve(self, settings: &Settings) -> ManualOptions {
        let search_replace = match (self.search, self.replace) {
            (Some(search), Some(replace)) if !search.is_empty() => {
                Some(SearchReplace { search, replace })
            }
            _ => None,
        };
        ManualOptions {
            text: self.text,
            prefix: self.prefix,
            suffix: self.suffix,
            side: self.side,
            padding: self.padding.unwrap_or(settings.padding),
            mode: self.mode.unwrap_or(settings.index_mode),
            capital: self.capital.unwrap_or(settings.capital),
            remove_first: self.remove_first,
            remove_last: self.remove_last,
            search_replace,
        }
    }
}

/// Automatic naming through a [`TemplateRule`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AutoJob {
    pub rule: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub side: Option<String>,
    /// Number items by selection position through the `{id}` token.
    #[serde(default)]
    pub unique_id: bool,
    #[serde(default)]
    pub padding: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct RawJob {
    existing: Vec<String>,
    items: Vec<ItemEntry>,
    options: JobOptions,
    edits: Vec<EditOp>,
    auto: Option<AutoJob>,
    make_unique: bool,
}

/// A parsed job with options already merged with settings.
#[derive(Debug, Clone)]
pub struct BatchJob {
    pub existing: Vec<String>,
    pub items: Vec<RenameItem>,
    pub options: ManualOptions,
    pub edits: Vec<EditOp>,
    pub auto: Option<AutoJob>,
    pub make_unique: bool,
    pub auto_suffixes: BTreeMap<String, String>,
    padding: usize,
}

impl BatchJob {
    /// Fill every item's preview.
    ///
    /// The first pass is the automatic rule, deduplication or the manual
    /// options, in that order of precedence. Edits then run on its result.
    pub fn preview<U: NameUniverse + ?Sized>(
        &mut self,
        resolver: &Resolver,
        universe: &U,
    ) -> Result<Vec<String>> {
        let mut names = if let Some(auto) = &self.auto {
            let rule = TemplateRule::new(
                auto.rule.clone(),
                auto.padding.unwrap_or(self.padding),
                self.auto_suffixes.clone(),
            );
            let tokens = RuleTokens {
                description: auto.description.clone(),
                side: auto.side.clone(),
                ..Default::default()
            };
            auto_names(
                &mut self.items,
                &tokens,
                &rule,
                auto.unique_id,
                resolver,
                universe,
            )?
        } else if self.make_unique {
            make_unique_names(&mut self.items, resolver, universe)?
        } else {
            generate_names(&mut self.items, &self.options, resolver, universe)?
        };
        if !self.edits.is_empty() {
            names = apply_edits(
                &mut self.items,
                &self.edits,
                &self.auto_suffixes,
                resolver,
                universe,
            )?;
        }
        Ok(names)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobFormat {
    Toml,
    Yaml,
}

impl JobFormat {
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        match ext.as_str() {
            "toml" => Ok(JobFormat::Toml),
            "yaml" | "yml" => Ok(JobFormat::Yaml),
            _ => bail!(
                "unsupported job file '{}': expected .toml, .yaml or .yml",
                path.display()
            ),
        }
    }
}

pub fn parse_job(
    content: &str,
    format: JobFormat,
    settings: &Settings,
) -> anyhow::Result<BatchJob> {
    let raw: RawJob = match format {
        JobFormat::Toml => toml::from_str(content).context("parsing TOML job")?,
        JobFormat::Yaml => serde_yaml::from_str(content).context("parsing YAML job")?,
    };
    if raw.items.is_empty() {
        bail!("job has no items to rename");
    }
    if raw.auto.is_some() && raw.make_unique {
        bail!("job sets both [auto] and make_unique; pick one");
    }
    let mut items: Vec<RenameItem> = raw.items.into_iter().map(ItemEntry::into_item).collect();
    if let Some(ty) = raw.options.filter_type.as_deref() {
        retain_type(&mut items, ty);
        if items.is_empty() {
            bail!("no items of type '{}'", ty);
        }
    }
    Ok(BatchJob {
        existing: raw.existing,
        items,
        options: raw.options.resolve(settings),
        edits: raw.edits,
        auto: raw.auto,
        make_unique: raw.make_unique,
        auto_suffixes: settings.auto_suffixes.clone(),
        padding: settings.padding,
    })
}

pub fn load_job(path: &Path, settings: &Settings) -> anyhow::Result<BatchJob> {
    let format = JobFormat::from_path(path)?;
    let content =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    parse_job(&content, format, settings).with_context(|| format!("loading {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn toml_job_with_mixed_items() {
        let job = parse_job(
            r#"
existing = ["pCube1", "box_00"]
items = ["pCube1", { name = "pCube2", id = "uuid-2" }]

[options]
text = "box"
search = "box"
replace = "crate"
"#,
            JobFormat::Toml,
            &Settings::default(),
        )
        .expect("parse");
        assert_eq!(job.existing.len(), 2);
        assert_eq!(job.items[0].canonical_id, "pCube1");
        assert_eq!(job.items[1].canonical_id, "uuid-2");
        assert_eq!(job.options.padding, 2);
        assert_eq!(
            job.options.search_replace,
            Some(SearchReplace {
                search: "box".into(),
                replace: "crate".into()
            })
        );
    }

    #[test]
    fn yaml_job_overrides_settings() {
        let job = parse_job(
            "items:\n  - arm\n  - name: leg\noptions:\n  prefix: rig\n  padding: 4\n  mode: alphabetic\n",
            JobFormat::Yaml,
            &Settings::default(),
        )
        .expect("parse");
        assert_eq!(job.items[1].canonical_id, "leg");
        assert_eq!(job.options.padding, 4);
        assert_eq!(job.options.mode, IndexMode::Alphabetic);
        assert_eq!(job.options.prefix.as_deref(), Some("rig"));
    }

    #[test]
    fn negative_counts_are_rejected() {
        let err = parse_job(
            "items = [\"a\"]\n[options]\nremove_first = -1\n",
            JobFormat::Toml,
            &Settings::default(),
        );
        assert!(err.is_err());
    }

    #[test]
    fn empty_job_is_rejected() {
        assert!(parse_job("existing = []\n", JobFormat::Toml, &Settings::default()).is_err());
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(
            JobFormat::from_path(&PathBuf::from("job.YML")).unwrap(),
            JobFormat::Yaml
        );
        assert!(JobFormat::from_path(&PathBuf::from("job.json")).is_err());
    }

    #[test]
    fn load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("job.toml");
        std::fs::write(&path, "items = [\"a\", \"b\"]\n[options]\ntext = \"n\"\n").unwrap();
        let job = load_job(&path, &Settings::default()).unwrap();
        assert_eq!(job.items.len(), 2);
        assert_eq!(job.options.text.as_deref(), Some("n"));
    }

    #[test]
    fn edits_and_type_filter() {
        let mut job = parse_job(
            r#"
items = [
    { name = "L_arm", type = "joint" },
    { name = "L_leg", type = "joint" },
    { name = "L_arm_geo", type = "mesh" },
]
edits = [
    { op = "search_replace", search = "L_", replace = "R_" },
    { op = "remove_last", count = 1 },
]

[options]
filter_type = "joint"
"#,
            JobFormat::Toml,
            &Settings::default(),
        )
        .expect("parse");
        assert_eq!(job.items.len(), 2);
        assert_eq!(job.edits.len(), 2);
        let host: Vec<String> = vec!["L_arm".into(), "L_leg".into(), "L_arm_geo".into()];
        let names = job.preview(&Resolver::default(), &host).unwrap();
        assert_eq!(names, vec!["R_ar", "R_le"]);
    }

    #[test]
    fn filter_without_matches_is_rejected() {
        let err = parse_job(
            "items = [\"a\"]\n[options]\nfilter_type = \"mesh\"\n",
            JobFormat::Toml,
            &Settings::default(),
        );
        assert!(err.is_err());
    }

    #[test]
    fn auto_rule_uses_configured_suffixes() {
        let mut job = parse_job(
            "items:\n  - {name: joint1, type: joint}\n  - {name: joint2, type: joint}\nauto:\n  rule: \"{side}_{description}_{id}_{type}\"\n  description: spine\n  side: C\n  unique_id: true\n",
            JobFormat::Yaml,
            &Settings::default(),
        )
        .expect("parse");
        let host: Vec<String> = vec!["joint1".into(), "joint2".into()];
        let names = job.preview(&Resolver::default(), &host).unwrap();
        assert_eq!(names, vec!["C_spine_00_jnt", "C_spine_01_jnt"]);
    }

    #[test]
    fn make_unique_job() {
        let mut job = parse_job(
            "make_unique = true\nitems = [\"hand\", \"hand\"]\n",
            JobFormat::Toml,
            &Settings::default(),
        )
        .expect("parse");
        let host: Vec<String> = vec!["hand".into()];
        assert_eq!(
            job.preview(&Resolver::default(), &host).unwrap(),
            vec!["hand", "hand_0"]
        );
        assert!(
            parse_job(
                "make_unique = true\nitems = [\"a\"]\n[auto]\nrule = \"{description}\"\n",
                JobFormat::Toml,
                &Settings::default(),
            )
            .is_err()
        );
    }
}
