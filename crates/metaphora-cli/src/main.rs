//! Metaphora CLI
//!
//! Command-line interface for:
//! - Deterministic metaphor analysis of artwork descriptions (`analyze`, `text`)
//! - LLM adjudication of a whole collection (`classify`)
//! - Inspecting the generated prompt section and the built-in ontology (`prompt`, `ontology`)

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use metaphora_adjudicator::{
    Adjudicator, AdjudicatorConfig, BatchItem, BatchRunner, OpenRouterClient, PromptMode,
    RateLimitPolicy,
};
use metaphora_core::{
    enhance_system_prompt, generate_prompt_section, MetaphorAnalyzer, Ontology, TextAnalysis,
};

mod ingest;
mod report;

#[derive(Parser)]
#[command(name = "metaphora")]
#[command(
    author,
    version,
    about = "Metaphora: consciousness-theory metaphor analysis for media-art descriptions"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze every record of a JSON / JSONL / CSV / text file without calling an LLM.
    Analyze {
        /// Input file
        input: PathBuf,
        /// Write per-record analyses as JSON
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Ontology JSON to use instead of the built-in one
        #[arg(long)]
        ontology: Option<PathBuf>,
    },

    /// Analyze a single description given on the command line.
    Text {
        /// Description text
        description: String,
        /// Ontology JSON to use instead of the built-in one
        #[arg(long)]
        ontology: Option<PathBuf>,
        /// Print the full analysis as JSON
        #[arg(long)]
        json: bool,
    },

    /// Classify every record with the LLM adjudicator (needs OPENROUTER_API_KEY).
    Classify {
        /// Input file
        input: PathBuf,
        /// Output directory (default: enhanced_analysis_results_<timestamp>)
        #[arg(long)]
        out_dir: Option<PathBuf>,
        /// Concurrent requests
        #[arg(long, default_value_t = 1)]
        concurrency: usize,
        /// Minimum milliseconds between request starts
        #[arg(long, default_value_t = 500)]
        min_interval_ms: u64,
        /// Attempts per description
        #[arg(long)]
        max_retries: Option<u32>,
        /// Model override (default: OPENROUTER_MODEL or anthropic/claude-3.5-sonnet)
        #[arg(long)]
        model: Option<String>,
        /// System prompt flavour
        #[arg(long, value_enum, default_value_t = PromptArg::Enhanced)]
        prompt: PromptArg,
        /// Ontology JSON to use instead of the built-in one
        #[arg(long)]
        ontology: Option<PathBuf>,
    },

    /// Print the metaphor-analysis prompt section, or splice it into a base prompt.
    Prompt {
        /// Base system prompt file; the section goes before its response-format line
        #[arg(long)]
        base: Option<PathBuf>,
    },

    /// Export the built-in ontology as JSON.
    Ontology {
        /// Output file (default: stdout)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PromptArg {
    Enhanced,
    Augmented,
}

impl From<PromptArg> for PromptMode {
    fn from(arg: PromptArg) -> Self {
        match arg {
            PromptArg::Enhanced => PromptMode::Enhanced,
            PromptArg::Augmented => PromptMode::Augmented,
        }
    }
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Analyze {
            input,
            out,
            ontology,
        } => cmd_analyze(&input, out.as_deref(), ontology.as_deref()),
        Commands::Text {
            description,
            ontology,
            json,
        } => cmd_text(&description, ontology.as_deref(), json),
        Commands::Classify {
            input,
            out_dir,
            concurrency,
            min_interval_ms,
            max_retries,
            model,
            prompt,
            ontology,
        } => cmd_classify(ClassifyArgs {
            input,
            out_dir,
            concurrency,
            min_interval: Duration::from_millis(min_interval_ms),
            max_retries,
            model,
            prompt: prompt.into(),
            ontology,
        }),
        Commands::Prompt { base } => cmd_prompt(base.as_deref()),
        Commands::Ontology { out } => cmd_ontology(out.as_deref()),
    }
}

fn load_analyzer(ontology: Option<&Path>) -> Result<MetaphorAnalyzer> {
    match ontology {
        None => Ok(MetaphorAnalyzer::default()),
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading ontology {}", path.display()))?;
            let ontology = Ontology::from_json(&text)
                .with_context(|| format!("loading ontology {}", path.display()))?;
            Ok(MetaphorAnalyzer::new(ontology))
        }
    }
}

fn write_output(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents).with_context(|| format!("writing {}", path.display()))?;
    println!("  {} {}", "→".cyan(), path.display());
    Ok(())
}

// ============================================================================
// analyze / text
// ============================================================================

#[derive(Serialize)]
struct AnalyzedRecord<'a> {
    index: usize,
    title: &'a str,
    description_length: usize,
    #[serde(flatten)]
    analysis: &'a TextAnalysis,
}

fn print_verdict(label: &str, analysis: &TextAnalysis) {
    let dominant = analysis
        .network
        .dominant_pattern
        .map(|t| t.to_string())
        .unwrap_or_else(|| "-".to_string());
    let mut line = format!(
        "{} {} evidence, dominant {}",
        label.bold(),
        analysis.evidence.len(),
        dominant.cyan()
    );
    if analysis.network.is_hybrid() {
        let hybrid: Vec<String> = analysis
            .network
            .hybrid_theories
            .iter()
            .map(|t| t.to_string())
            .collect();
        line.push_str(&format!(", hybrid {}", hybrid.join("+").yellow()));
    }
    if analysis.network.meta_metaphor_detected {
        line.push_str(&format!(", {}", "meta-metaphor".magenta().bold()));
    }
    println!("{line}");
}

fn cmd_analyze(input: &Path, out: Option<&Path>, ontology: Option<&Path>) -> Result<()> {
    println!("{} {}", "Analyzing".green().bold(), input.display());

    let analyzer = load_analyzer(ontology)?;
    let records = ingest::load_records(input)?;
    let descriptions: Vec<&str> = records.iter().map(|r| r.description.as_str()).collect();
    let analyses = analyzer.analyze_batch(&descriptions);

    for (record, analysis) in records.iter().zip(&analyses) {
        print_verdict(&record.title, analysis);
    }

    let with_evidence = analyses.iter().filter(|a| !a.evidence.is_empty()).count();
    let meta = analyses
        .iter()
        .filter(|a| a.network.meta_metaphor_detected)
        .count();
    println!(
        "{} {} records, {} with evidence, {} meta-metaphor",
        "ok".green().bold(),
        records.len(),
        with_evidence,
        meta
    );

    if let Some(out) = out {
        let rows: Vec<AnalyzedRecord<'_>> = records
            .iter()
            .zip(&analyses)
            .enumerate()
            .map(|(index, (record, analysis))| AnalyzedRecord {
                index,
                title: &record.title,
                description_length: record.description.chars().count(),
                analysis,
            })
            .collect();
        write_output(out, &serde_json::to_string_pretty(&rows)?)?;
    }
    Ok(())
}

fn cmd_text(description: &str, ontology: Option<&Path>, json: bool) -> Result<()> {
    let analyzer = load_analyzer(ontology)?;
    let analysis = analyzer.analyze(description);

    if json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
        return Ok(());
    }

    for e in &analysis.evidence {
        println!(
            "  {} {:<19} {:<13} {:.2}  {}",
            e.theory.to_string().cyan(),
            e.level.as_str(),
            e.metaphor_type.as_str(),
            e.weight,
            e.span
        );
    }
    print_verdict("text:", &analysis);
    Ok(())
}

// ============================================================================
// classify
// ============================================================================

struct ClassifyArgs {
    input: PathBuf,
    out_dir: Option<PathBuf>,
    concurrency: usize,
    min_interval: Duration,
    max_retries: Option<u32>,
    model: Option<String>,
    prompt: PromptMode,
    ontology: Option<PathBuf>,
}

fn cmd_classify(args: ClassifyArgs) -> Result<()> {
    let mut config = AdjudicatorConfig::from_env()?;
    if let Some(model) = args.model {
        config = config.with_model(model);
    }
    if let Some(max_retries) = args.max_retries {
        config = config.with_max_retries(max_retries);
    }
    config.validate()?;

    let records = ingest::load_records(&args.input)?;
    println!(
        "{} {} ({} items, model {})",
        "Classifying".green().bold(),
        args.input.display(),
        records.len(),
        config.model
    );

    let analyzer = load_analyzer(args.ontology.as_deref())?;
    let model = config.model.clone();
    let provider = Arc::new(OpenRouterClient::new(config.clone())?);
    let adjudicator = Adjudicator::new(provider, analyzer)
        .with_config(&config)
        .with_prompt_mode(args.prompt);
    let runner = BatchRunner::new(Arc::new(adjudicator))
        .with_concurrency(args.concurrency)
        .with_rate_limit(RateLimitPolicy {
            min_interval: args.min_interval,
        });

    let items: Vec<BatchItem> = records
        .iter()
        .map(|r| BatchItem::new(r.title.clone(), r.description.clone()))
        .collect();

    let runtime = tokio::runtime::Runtime::new().context("starting async runtime")?;
    let results = runtime.block_on(runner.run(items));

    let now = chrono::Local::now();
    let out_dir = args
        .out_dir
        .unwrap_or_else(|| report::default_output_dir(now));
    let saved = report::save_results(&out_dir, &records, &results, &model, now)?;

    let successful = results.iter().filter(|r| r.is_success()).count();
    println!(
        "{} {}/{} classified",
        "ok".green().bold(),
        successful,
        results.len()
    );
    for (class, count) in report::class_distribution(results.iter().filter(|r| r.is_success())) {
        println!("  {class}: {count}");
    }
    for path in [Some(&saved.results), Some(&saved.summary), saved.merged.as_ref()]
        .into_iter()
        .flatten()
    {
        println!("  {} {}", "→".cyan(), path.display());
    }
    Ok(())
}

// ============================================================================
// prompt / ontology
// ============================================================================

fn cmd_prompt(base: Option<&Path>) -> Result<()> {
    let section = generate_prompt_section();
    match base {
        None => print!("{section}"),
        Some(path) => {
            let base = fs::read_to_string(path)
                .with_context(|| format!("reading base prompt {}", path.display()))?;
            print!("{}", enhance_system_prompt(&base, &section));
        }
    }
    Ok(())
}

fn cmd_ontology(out: Option<&Path>) -> Result<()> {
    let json = Ontology::builtin().to_json_pretty()?;
    match out {
        None => println!("{json}"),
        Some(path) => write_output(path, &json)?,
    }
    Ok(())
}
