mod config;
mod explain;

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use config::ConfigMerger;
use edi204_domain::Triage;
use edi204_render::render_report_md;
use edi204_types::report::{ToolInfo, TriageReport, VerdictStatus};
use fs_err as fs;
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "edi204",
    version,
    about = "Classify X12 204 load tenders as live unload or drop and hook."
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Classify tenders and write report.json / report.md.
    Classify(ClassifyArgs),
    /// Explain what a stop reason code means and the disposition it implies.
    Explain(ExplainArgs),
    /// List the stop reason codes with a known meaning.
    ListCodes(ListCodesArgs),
}

#[derive(Debug, Parser)]
struct ClassifyArgs {
    /// Individual JSON documents to classify.
    paths: Vec<Utf8PathBuf>,

    /// Directory whose *.json files are classified (default: current directory when no paths
    /// are given).
    #[arg(long)]
    inbox: Option<Utf8PathBuf>,

    /// Output directory for report artifacts (default: <inbox>/edi204).
    #[arg(long)]
    out_dir: Option<Utf8PathBuf>,

    /// Config file (default: ./edi204.toml when present).
    #[arg(long)]
    config: Option<Utf8PathBuf>,

    /// Fail when any shipment has no recognized delivery stop.
    #[arg(long, default_value_t = false)]
    fail_on_unknown: bool,

    /// Accept an additional transaction set identifier (repeatable).
    #[arg(long = "transaction-set")]
    transaction_sets: Vec<String>,

    /// Do not write report.md.
    #[arg(long, default_value_t = false)]
    no_markdown: bool,

    /// Output format (text, json).
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Parser)]
struct ExplainArgs {
    /// Stop reason code or title to explain (e.g., "CU", "spot-for-unload").
    code: String,
}

#[derive(Debug, Parser)]
struct ListCodesArgs {
    /// Output format (text, json).
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Exit code for a run whose verdict failed under the active policy.
const EXIT_POLICY_FAIL: u8 = 2;

fn main() -> ExitCode {
    match real_main() {
        Ok(code) => code,
        Err(e) => {
            debug!("{:?}", e);
            eprintln!("error: {:#}", e);
            ExitCode::from(1)
        }
    }
}

fn real_main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Classify(args) => cmd_classify(args),
        Command::Explain(args) => cmd_explain(args).map(|_| ExitCode::SUCCESS),
        Command::ListCodes(args) => cmd_list_codes(args).map(|_| ExitCode::SUCCESS),
    }
}

fn cmd_classify(args: ClassifyArgs) -> anyhow::Result<ExitCode> {
    let inbox = match (&args.inbox, args.paths.is_empty()) {
        (Some(dir), _) => Some(dir.clone()),
        (None, true) => Some(Utf8PathBuf::from(".")),
        (None, false) => None,
    };
    let out_dir = args.out_dir.clone().unwrap_or_else(|| {
        inbox
            .clone()
            .unwrap_or_else(|| Utf8PathBuf::from("."))
            .join("edi204")
    });

    // Load config file and merge with CLI arguments
    let file_config = match &args.config {
        Some(path) => config::load_config(path)?,
        None => config::load_or_default(Utf8Path::new("."))
            .with_context(|| format!("load {}", config::CONFIG_FILE_NAME))?,
    };
    let merged = ConfigMerger::new(file_config).merge_classify_args(
        args.fail_on_unknown,
        &args.transaction_sets,
        args.no_markdown,
    );
    debug!(
        "merged config: fail_on_unknown={}, fail_on_load_error={}, transaction_sets={:?}, markdown={}",
        merged.fail_on_unknown, merged.fail_on_load_error, merged.transaction_sets, merged.markdown
    );

    let documents = edi204_events::load_documents(&args.paths, inbox.as_deref())
        .context("load documents")?;

    let report = Triage::new().run(&merged.triage_config(), &documents, tool_info());

    fs::create_dir_all(&out_dir).with_context(|| format!("create {}", out_dir))?;
    write_json(&out_dir.join("report.json"), &report)?;
    if merged.markdown {
        let md_path = out_dir.join("report.md");
        fs::write(&md_path, render_report_md(&report))
            .with_context(|| format!("write {}", md_path))?;
    }
    info!("wrote report to {}", out_dir);

    match args.format {
        OutputFormat::Text => print_summary(&report),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&report).context("serialize report")?
        ),
    }

    Ok(exit_code(report.verdict.status))
}

fn print_summary(report: &TriageReport) {
    for entry in &report.shipments {
        println!(
            "{}\t{}\t{}",
            entry.source,
            entry.digest.shipment_id.as_deref().unwrap_or("-"),
            entry.digest.disposition
        );
    }
    for skip in &report.skipped {
        println!("{}\tskipped\t{}", skip.path, skip.reason);
    }
    for err in &report.errors {
        println!("{}\terror\t{}", err.path, err.message);
    }

    let s = &report.summary;
    println!(
        "verdict: {} ({} live unload, {} drop and hook, {} unknown, {} skipped, {} errors)",
        status_label(report.verdict.status),
        s.live_unload,
        s.drop_and_hook,
        s.unknown,
        s.skipped,
        s.errors
    );
}

fn exit_code(status: VerdictStatus) -> ExitCode {
    match status {
        VerdictStatus::Pass | VerdictStatus::Warn => ExitCode::SUCCESS,
        VerdictStatus::Fail => ExitCode::from(EXIT_POLICY_FAIL),
    }
}

fn status_label(status: VerdictStatus) -> &'static str {
    match status {
        VerdictStatus::Pass => "pass",
        VerdictStatus::Warn => "warn",
        VerdictStatus::Fail => "fail",
    }
}

fn write_json<T: serde::Serialize>(path: &Utf8Path, v: &T) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(v).context("serialize json")?;
    fs::write(path, s).with_context(|| format!("write {}", path))?;
    Ok(())
}

fn tool_info() -> ToolInfo {
    ToolInfo {
        name: "edi204".to_string(),
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
        commit: None,
    }
}

fn cmd_explain(args: ExplainArgs) -> anyhow::Result<()> {
    use explain::{disposition_meaning, list_codes, lookup_code};

    let Some(entry) = lookup_code(&args.code) else {
        let available = list_codes().join(", ");
        anyhow::bail!(
            "Unknown stop reason code: '{}'\n\nKnown codes: {}",
            args.code,
            available
        );
    };

    println!("================================================================================");
    println!("STOP REASON: {} ({})", entry.code, entry.title);
    println!("================================================================================");
    println!();

    println!("DESCRIPTION");
    println!("--------------------------------------------------------------------------------");
    println!("{}", entry.description);
    println!();

    println!("DISPOSITION");
    println!("--------------------------------------------------------------------------------");
    match entry.disposition() {
        Some(d) => {
            println!("{}", disposition_meaning(d));
            println!();
            println!("The earliest stop, by sequence number, carrying CU or SU decides.");
        }
        None => println!("This code does not decide the delivery disposition."),
    }
    println!();

    println!("GUIDANCE");
    println!("--------------------------------------------------------------------------------");
    println!("{}", entry.guidance);
    println!();

    Ok(())
}

fn cmd_list_codes(args: ListCodesArgs) -> anyhow::Result<()> {
    use explain::CODE_REGISTRY;

    match args.format {
        OutputFormat::Text => {
            println!("Stop reason codes:\n");
            println!("  {:<6} {:<15} TITLE", "CODE", "DISPOSITION");
            println!("  {:<6} {:<15} -----", "----", "-----------");
            for entry in CODE_REGISTRY {
                println!(
                    "  {:<6} {:<15} {}",
                    entry.code.as_code(),
                    entry.disposition().map(|d| d.label()).unwrap_or("-"),
                    entry.title
                );
            }
            println!();
            println!("Use 'edi204 explain <code>' for details.");
        }
        OutputFormat::Json => {
            let codes: Vec<_> = CODE_REGISTRY
                .iter()
                .map(|e| {
                    serde_json::json!({
                        "code": e.code.as_code(),
                        "title": e.title,
                        "disposition": e.disposition(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&codes)?);
        }
    }
    Ok(())
}
