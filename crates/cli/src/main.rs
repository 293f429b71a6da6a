use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use pipeline::{
    ChangeDecision, Decision, DiscardOldBranchFilter, FilterConfig, PullRequestTargetBranch,
    RetentionConfig, TriggerConfig, TriggerPipeline,
};
use scm_model::{parse_snapshot, CommitRevision, Revision, SourceSnapshot};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

/// branch-gate - decide which source-control changes trigger a build
#[derive(Parser)]
#[command(name = "branch-gate")]
#[command(about = "Build-trigger filters for branches and commits", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decide every change of a snapshot with a trigger configuration
    Evaluate {
        /// Trigger configuration (JSON)
        #[arg(long)]
        config: PathBuf,

        /// Snapshot of branches and changes (JSON)
        #[arg(long)]
        snapshot: PathBuf,

        /// Print decisions as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check a single commit against skip patterns
    CheckCommit {
        /// Wildcard pattern for the commit message
        #[arg(long)]
        message_pattern: Option<String>,

        /// Wildcard pattern for the commit author
        #[arg(long)]
        author_pattern: Option<String>,

        /// Commit author, e.g. "builder <no-reply@acme.com>"
        #[arg(long)]
        author: Option<String>,

        /// Commit message
        #[arg(long)]
        message: Option<String>,
    },

    /// List heads kept and discarded by the branch-age filter
    Prune {
        /// Days to keep a branch after its last commit
        #[arg(long, default_value = "1")]
        keep_for_days: i32,

        /// Snapshot of branches and changes (JSON)
        #[arg(long)]
        snapshot: PathBuf,
    },

    /// Print the ref specs needed to build each head of a snapshot
    RefSpecs {
        /// Snapshot of branches and changes (JSON)
        #[arg(long)]
        snapshot: PathBuf,

        /// Remote name
        #[arg(long, default_value = "origin")]
        remote: String,
    },
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Evaluate {
            config,
            snapshot,
            json,
        } => handle_evaluate(&config, &snapshot, json)?,
        Commands::CheckCommit {
            message_pattern,
            author_pattern,
            author,
            message,
        } => handle_check_commit(message_pattern, author_pattern, author, message),
        Commands::Prune {
            keep_for_days,
            snapshot,
        } => handle_prune(keep_for_days, &snapshot)?,
        Commands::RefSpecs { snapshot, remote } => handle_ref_specs(&snapshot, &remote)?,
    }

    Ok(())
}

fn load_snapshot(path: &Path) -> Result<SourceSnapshot> {
    let start = Instant::now();
    let snapshot = parse_snapshot(path)
        .with_context(|| format!("Failed to load snapshot {}", path.display()))?;
    info!(
        "Loaded {} branches and {} changes in {:?}",
        snapshot.branches.len(),
        snapshot.changes.len(),
        start.elapsed()
    );
    Ok(snapshot)
}

/// Handle the 'evaluate' command
fn handle_evaluate(config_path: &Path, snapshot_path: &Path, json: bool) -> Result<()> {
    let config = TriggerConfig::load(config_path)
        .with_context(|| format!("Failed to load configuration {}", config_path.display()))?;
    let pipeline = config
        .build_pipeline()
        .context("Failed to build trigger pipeline")?;
    let snapshot = load_snapshot(snapshot_path)?;

    let decisions = pipeline.evaluate(&snapshot);
    if json {
        println!("{}", serde_json::to_string_pretty(&decisions)?);
    } else {
        print_decisions(&decisions);
    }
    Ok(())
}

/// Handle the 'check-commit' command
fn handle_check_commit(
    message_pattern: Option<String>,
    author_pattern: Option<String>,
    author: Option<String>,
    message: Option<String>,
) {
    let config = FilterConfig::new(message_pattern.as_deref(), author_pattern.as_deref());

    let mut commit = CommitRevision::new("HEAD");
    commit.author = author;
    commit.message = message;
    let revision = Revision::Git(commit);

    if pipeline::should_skip(&config, &revision) {
        println!("{} build skipped", "✗".red());
    } else {
        println!("{} build triggered", "✓".green());
    }
}

/// Handle the 'prune' command
fn handle_prune(keep_for_days: i32, snapshot_path: &Path) -> Result<()> {
    let retention = RetentionConfig::new(keep_for_days);
    retention.validate().context("Invalid --keep-for-days")?;
    let snapshot = load_snapshot(snapshot_path)?;

    let pipeline = TriggerPipeline::new().add_head_filter(DiscardOldBranchFilter::new(retention));
    let heads = snapshot.heads();
    let kept = pipeline.prune(heads.clone(), &snapshot.branches);

    println!(
        "{}",
        format!("Keeping branches for {keep_for_days} day(s):").bold().blue()
    );
    for head in &heads {
        if kept.contains(head) {
            println!("{} {}", "✓".green(), head.name());
        } else {
            println!("{} {} ({})", "✗".red(), head.name(), head.branch_name());
        }
    }
    Ok(())
}

/// Handle the 'ref-specs' command
fn handle_ref_specs(snapshot_path: &Path, remote: &str) -> Result<()> {
    let snapshot = load_snapshot(snapshot_path)?;
    let pipeline = TriggerPipeline::new().add_decorator(PullRequestTargetBranch);

    for head in snapshot.heads() {
        println!("{}", head.name().bold());
        for spec in pipeline.ref_specs(&head, remote) {
            println!("  {spec}");
        }
    }
    Ok(())
}

/// Helper function to print decisions, one per line
fn print_decisions(decisions: &[ChangeDecision]) {
    println!("{}", "Trigger decisions:".bold().blue());
    for decision in decisions {
        let marker = match decision.decision {
            Decision::Build => "✓".green(),
            Decision::Skipped => "–".yellow(),
            Decision::Excluded => "✗".red(),
        };
        println!(
            "{} {} @ {} [{}]",
            marker, decision.head, decision.revision, decision.decision
        );
    }
}
