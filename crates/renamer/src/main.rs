use std::path::PathBuf;

use anyhow::{Context as _, bail};
use env_flags::env_flags;
use once_cell::sync::OnceCell;
use serde::Serialize;

use renamer::config::{Settings, UserConfig, load_user_config, renamer_home};
use renamer::loader::load_job;
use renamer::{MemoryScene, RenameReport, SceneUniverse, apply_plan};

fn init_tracing(home: &std::path::Path, user_cfg: Option<&UserConfig>) {
    env_flags! {
        /// Tracing filter, e.g. "info", "debug", or targets format.
        RUST_LOG: &str = "warn";
        /// Preferred filter env (alias). If set, overrides RUST_LOG.
        TRACING_FILTER: &str = "";
        /// Pretty formatting for logs (ignored if TRACING_JSON=true).
        TRACING_PRETTY: bool = false;
        /// Compact single-line formatting for logs (ignored if TRACING_JSON=true)
        TRACING_COMPACT: bool = true;
        /// JSON formatting for logs
        TRACING_JSON: bool = false;
        /// If true, also log to file under <RENAMER_HOME>/logs or LOG_DIR
        LOG_TO_FILE: bool = false;
        /// Optional explicit log directory (absolute). Defaults to <RENAMER_HOME>/logs
        LOG_DIR: &str = "";
    }

    use tracing_subscriber::{EnvFilter, Layer, Registry, layer::SubscriberExt, prelude::*};

    let env_set = |k: &str| std::env::var_os(k).is_some();

    // TRACING_FILTER first, then RUST_LOG, then user config.
    let mut rust_log = if !(*TRACING_FILTER).is_empty() {
        (*TRACING_FILTER).to_string()
    } else {
        (*RUST_LOG).to_string()
    };
    let mut tracing_json = *TRACING_JSON;
    let mut tracing_compact = *TRACING_COMPACT;
    let mut tracing_pretty = *TRACING_PRETTY;
    let mut log_to_file = *LOG_TO_FILE;
    let mut log_dir: Option<PathBuf> = if !(*LOG_DIR).is_empty() {
        Some(PathBuf::from((*LOG_DIR).to_string()))
    } else {
        None
    };

    if let Some(cfg) = user_cfg.and_then(|c| c.logging.as_ref()) {
        if !(env_set("TRACING_FILTER") || env_set("RUST_LOG"))
            && let Some(level) = cfg.level.as_ref()
        {
            rust_log = level.clone();
        }
        if !env_set("TRACING_JSON")
            && let Some(v) = cfg.json
        {
            tracing_json = v;
        }
        if !env_set("TRACING_COMPACT")
            && let Some(v) = cfg.compact
        {
            tracing_compact = v;
        }
        if !env_set("TRACING_PRETTY")
            && let Some(v) = cfg.pretty
        {
            tracing_pretty = v;
        }
        if !env_set("LOG_TO_FILE")
            && let Some(v) = cfg.to_file
        {
            log_to_file = v;
        }
        if !env_set("LOG_DIR")
            && let Some(dir) = cfg.dir.as_ref()
        {
            log_dir = Some(PathBuf::from(dir));
        }
    }

    let filter = EnvFilter::try_new(rust_log).unwrap_or_else(|_| EnvFilter::new("warn"));

    type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

    // Stdout carries the rename plan; logs always go to stderr.
    let base = tracing_subscriber::fmt::layer()
        .with_file(false)
        .with_line_number(false)
        .with_target(true)
        .with_ansi(true)
        .with_writer(std::io::stderr);
    let stderr_layer: BoxedLayer = if tracing_json {
        base.json().boxed()
    } else if tracing_compact {
        base.compact().boxed()
    } else if tracing_pretty {
        base.pretty().boxed()
    } else {
        base.boxed()
    };
    let mut layers: Vec<BoxedLayer> = vec![stderr_layer];

    static FILE_GUARD: OnceCell<tracing_appender::non_blocking::WorkerGuard> = OnceCell::new();
    let mut dir_error = None;
    if log_to_file {
        let dir = log_dir.unwrap_or_else(|| home.join("logs"));
        match std::fs::create_dir_all(&dir) {
            Ok(()) => {
                let appender = tracing_appender::rolling::daily(dir, "renamer.log");
                let (nb, guard) = tracing_appender::non_blocking(appender);
                let _ = FILE_GUARD.set(guard);
                let file_base = tracing_subscriber::fmt::layer()
                    .with_file(false)
                    .with_line_number(false)
                    .with_target(true)
                    .with_ansi(false)
                    .with_writer(nb);
                let file_layer: BoxedLayer = if tracing_json {
                    file_base.json().boxed()
                } else if tracing_compact {
                    file_base.compact().boxed()
                } else if tracing_pretty {
                    file_base.pretty().boxed()
                } else {
                    file_base.boxed()
                };
                layers.push(file_layer);
            }
            Err(e) => dir_error = Some((dir, e)),
        }
    }

    let subscriber = tracing_subscriber::registry().with(layers).with(filter);
    if let Err(e) = subscriber.try_init() {
        tracing::debug!("tracing already set: {:?}", e);
    }
    if let Some((dir, e)) = dir_error {
        tracing::warn!("failed to create log dir {}: {}", dir.display(), e);
    }
}

#[derive(Serialize)]
struct PlanEntry<'a> {
    id: &'a str,
    from: &'a str,
    to: &'a str,
}

#[derive(Serialize)]
struct Output<'a> {
    plan: Vec<PlanEntry<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<&'a RenameReport>,
}

fn main() -> anyhow::Result<()> {
    env_flags! {
        /// Renamer home directory (absolute). Defaults to $HOME/.renamer
        RENAMER_HOME: &str = "";
        /// Job file to run when no path is given on the command line.
        RENAMER_JOB: &str = "";
        /// Apply the plan to an in-memory scene and report the outcome.
        RENAMER_APPLY: bool = false;
    }

    let home = renamer_home(*RENAMER_HOME);
    let user_cfg = load_user_config(&home)?;
    init_tracing(&home, user_cfg.as_ref());
    tracing::debug!("renamer_home={}", home.display());

    let mut job_path: Option<PathBuf> = None;
    let mut apply = *RENAMER_APPLY;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--apply" => apply = true,
            flag if flag.starts_with("--") => bail!("unknown flag '{}'", flag),
            path if job_path.is_none() => job_path = Some(PathBuf::from(path)),
            extra => bail!("unexpected argument '{}'", extra),
        }
    }
    let job_path = match job_path {
        Some(p) => p,
        None if !(*RENAMER_JOB).is_empty() => PathBuf::from((*RENAMER_JOB).to_string()),
        None => bail!("usage: renamer <job.toml|job.yaml> [--apply]"),
    };

    let settings = Settings::from_user(user_cfg.as_ref());
    let mut job = load_job(&job_path, &settings)?;
    tracing::info!(
        "loaded {} item(s) from {}",
        job.items.len(),
        job_path.display()
    );

    // Items exist in the scene even when the job does not list them.
    let mut scene = MemoryScene::new(job.existing.iter().cloned());
    for item in &job.items {
        scene.insert(item.display_name.clone());
    }

    let resolver = settings.resolver();
    job.preview(&resolver, &SceneUniverse(&scene))
        .context("generating names")?;

    let previews: Vec<(String, String, String)> = job
        .items
        .iter()
        .map(|i| {
            (
                i.canonical_id.clone(),
                i.display_name.clone(),
                i.resolved_name.clone().unwrap_or_default(),
            )
        })
        .collect();
    let report = if apply {
        Some(apply_plan(&mut job.items, &mut scene))
    } else {
        None
    };

    let out = Output {
        plan: previews
            .iter()
            .map(|(id, from, to)| PlanEntry { id, from, to })
            .collect(),
        report: report.as_ref(),
    };
    println!("{}", serde_json::to_string_pretty(&out)?);

    if let Some(r) = report.as_ref()
        && !r.failed.is_empty()
    {
        bail!("{} rename(s) failed", r.failed.len());
    }
    Ok(())
}
