use crate::config::Config;
use crate::script::{parse_script, run_script, StepReport};
use crate::store::FileStore;
use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use colored::Colorize;
use mediakit_editor::{DocumentTree, EditSession, EditorEvent, EventQueue, Tier};
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TierArg {
    Free,
    Pro,
    Agency,
}

impl From<TierArg> for Tier {
    fn from(arg: TierArg) -> Self {
        match arg {
            TierArg::Free => Tier::Free,
            TierArg::Pro => Tier::Pro,
            TierArg::Agency => Tier::Agency,
        }
    }
}

#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// Document JSON file to start from
    pub document: PathBuf,

    /// Editing script (JSON array of steps)
    pub script: PathBuf,

    /// Write the resulting document here
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Access tier (overrides the config file)
    #[arg(short, long, value_enum)]
    pub tier: Option<TierArg>,
}

/// Outcome of a replay
#[derive(Debug)]
pub struct Replay {
    pub reports: Vec<StepReport>,
    pub events: Vec<EditorEvent>,
    pub document: DocumentTree,
    pub saved_to: Option<String>,
}

/// Load `document`, run `script` against it, optionally save the result
pub fn run_replay(args: &ReplayArgs, config: &Config, cwd: &str) -> Result<Replay> {
    let script = fs::read_to_string(&args.script)
        .with_context(|| format!("Cannot read {}", args.script.display()))?;
    let steps = parse_script(&script)?;

    let mut store = FileStore::new(cwd);
    if let Some(output) = &args.output {
        store = store.saving_to(output);
    }

    let tier = args.tier.map(Tier::from).unwrap_or(config.tier);
    let events = Rc::new(EventQueue::new());
    let mut session = EditSession::new(DocumentTree::new(), config.editor.clone())
        .with_access(tier)
        .with_events(events.clone());

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let key = args.document.display().to_string();
    let document = runtime.block_on(session.load(&store, &key)?)?;
    session.replace_document(document)?;
    events.drain();

    let reports = run_script(&mut session, steps)?;

    let saved_to = match &args.output {
        Some(_) => {
            let completion = runtime.block_on(session.save(&store)?);
            session.complete_save(completion)?.key
        }
        None => None,
    };

    Ok(Replay {
        reports,
        events: events.drain(),
        document: session.document().clone(),
        saved_to,
    })
}

pub fn replay(args: ReplayArgs, config: &Config, cwd: &str) -> Result<()> {
    println!("🔁 {} Media Kit Replay", "Starting".green().bold());
    println!("   Document: {}", args.document.display());
    println!("   Script:   {}", args.script.display());
    println!();

    let replay = run_replay(&args, config, cwd)?;

    for report in &replay.reports {
        println!(
            "   {} {:>3} {:<8} {}",
            "✓".green(),
            report.index,
            report.label.bright_white(),
            report.outcome
        );
    }

    let count = |pred: fn(&EditorEvent) -> bool| replay.events.iter().filter(|e| pred(e)).count();
    println!();
    println!(
        "✨ {} {} steps replayed",
        "Done".green().bold(),
        replay.reports.len()
    );
    println!(
        "   {} sections, {} components",
        replay.document.sections.len(),
        replay.document.component_count()
    );
    println!(
        "   History changes: {}, save requests: {}, upgrade prompts: {}",
        count(|e| matches!(e, EditorEvent::HistoryChanged(_))),
        count(|e| matches!(e, EditorEvent::SaveRequested)),
        count(|e| matches!(e, EditorEvent::UpgradePrompt { .. })),
    );
    if let Some(path) = &replay.saved_to {
        println!("   Output: {}", path);
    }

    Ok(())
}
