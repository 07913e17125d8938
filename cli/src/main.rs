//! vkrfmt CLI - thesis (ВКР) formatting tool

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use vkrfmt::report::{self, JsonFormat};
use vkrfmt::{
    default_output_path, Document, FormatOptions, FormatOutcome, PageBreakMode, Requirements,
    StrategyKind, VkrFormatter,
};

#[derive(Parser)]
#[command(name = "vkrfmt")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Format thesis (ВКР) .docx files to ГОСТ requirements", long_about = None)]
struct Cli {
    /// Input DOCX file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output DOCX file
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(flatten)]
    config: ConfigArgs,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Args, Clone)]
struct ConfigArgs {
    /// Requirements JSON merged over the built-in standard
    #[arg(short, long, value_name = "JSON", env = "VKRFMT_REQUIREMENTS", global = true)]
    requirements: Option<PathBuf>,

    /// How headings and lists are recognized
    #[arg(long, value_enum, env = "VKRFMT_STRATEGY", default_value = "style", global = true)]
    strategy: Strategy,
}

#[derive(Subcommand)]
enum Commands {
    /// Format a thesis
    Format {
        /// Input DOCX file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (<name>_formatted.docx next to the input if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// How page breaks before chapters are written
        #[arg(long, value_enum, default_value = "property")]
        page_break: PageBreak,

        /// Leave margins and the default font unchanged
        #[arg(long)]
        no_global: bool,

        /// Leave tables unchanged
        #[arg(long)]
        no_tables: bool,

        /// Print statistics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the role of every paragraph without changing the file
    Classify {
        /// Input DOCX file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,

        /// Hide skipped paragraphs
        #[arg(long)]
        hide_skipped: bool,
    },

    /// Format many theses in parallel
    Batch {
        /// Input DOCX files
        #[arg(value_name = "FILES", required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long, value_name = "DIR", default_value = "formatted")]
        output: PathBuf,
    },

    /// Print the effective requirements as JSON
    Requirements {
        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show document information
    Info {
        /// Input DOCX file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print the information as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Strategy {
    /// Text patterns only
    Pattern,
    /// Paragraph styles first, text patterns for plain paragraphs
    Style,
    /// Paragraph styles only
    Strict,
}

impl From<Strategy> for StrategyKind {
    fn from(strategy: Strategy) -> Self {
        match strategy {
            Strategy::Pattern => StrategyKind::Pattern,
            Strategy::Style => StrategyKind::Style,
            Strategy::Strict => StrategyKind::StrictStyle,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum PageBreak {
    /// "Page break before" paragraph property
    Property,
    /// Explicit page break run at the start of the heading
    Run,
}

impl From<PageBreak> for PageBreakMode {
    fn from(mode: PageBreak) -> Self {
        match mode {
            PageBreak::Property => PageBreakMode::Property,
            PageBreak::Run => PageBreakMode::BreakRun,
        }
    }
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = cli.config;
    let result = match cli.command {
        Some(Commands::Format {
            input,
            output,
            page_break,
            no_global,
            no_tables,
            json,
        }) => {
            let options = FormatOptions::new()
                .with_strategy(config.strategy.into())
                .with_page_break_mode(page_break.into())
                .with_global_settings(!no_global)
                .with_tables(!no_tables);
            cmd_format(&config, &input, output.as_deref(), options, json)
        }
        Some(Commands::Classify {
            input,
            json,
            hide_skipped,
        }) => cmd_classify(&config, &input, json, hide_skipped),
        Some(Commands::Batch { inputs, output }) => cmd_batch(&config, &inputs, &output),
        Some(Commands::Requirements { output, compact }) => {
            cmd_requirements(&config, output.as_deref(), compact)
        }
        Some(Commands::Info { input, json }) => cmd_info(&input, json),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: format if input is provided
            if let Some(input) = cli.input {
                let options = FormatOptions::new().with_strategy(config.strategy.into());
                cmd_format(&config, &input, cli.output.as_deref(), options, false)
            } else {
                println!("{}", "Usage: vkrfmt <FILE> [OUTPUT]".yellow());
                println!("       vkrfmt --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn load_requirements(config: &ConfigArgs) -> Result<Requirements, vkrfmt::Error> {
    vkrfmt::load_requirements(config.requirements.as_deref())
}

fn formatter(config: &ConfigArgs, options: FormatOptions) -> Result<VkrFormatter, vkrfmt::Error> {
    Ok(VkrFormatter::new(load_requirements(config)?)?.with_options(options))
}

fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(message);
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn cmd_format(
    config: &ConfigArgs,
    input: &Path,
    output: Option<&Path>,
    options: FormatOptions,
    json: bool,
) -> CliResult {
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output_path(input));
    let formatter = formatter(config, options)?;

    let pb = spinner("Formatting...");
    let outcome = formatter.format_file(input, &output);
    pb.finish_and_clear();

    if json {
        println!("{}", report::to_json(&outcome, JsonFormat::Pretty)?);
    } else {
        print_outcome(&outcome, &output);
    }

    if outcome.success {
        Ok(())
    } else {
        Err(format!("could not format {}", input.display()).into())
    }
}

fn print_outcome(outcome: &FormatOutcome, output: &Path) {
    if outcome.success {
        println!("{} {}", "Saved to".green(), output.display());
    }
    println!();
    println!("{}", "Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    print!("{}", report::to_text(&outcome.statistics));

    let errors = outcome.statistics.statistics.errors;
    if errors > 0 {
        println!(
            "\n{} {} paragraphs or tables could not be formatted (run with -v for details)",
            "Warning:".yellow().bold(),
            errors
        );
    }
}

fn cmd_classify(config: &ConfigArgs, input: &Path, json: bool, hide_skipped: bool) -> CliResult {
    let document = Document::open(input)?;
    let formatter = formatter(
        config,
        FormatOptions::new().with_strategy(config.strategy.into()),
    )?;
    let classification = formatter.classify_document(&document)?;

    if json {
        println!("{}", report::to_json(&classification, JsonFormat::Pretty)?);
        return Ok(());
    }

    for paragraph in &classification.paragraphs {
        if hide_skipped && paragraph.role.is_skip() {
            continue;
        }
        let text: String = paragraph.text.chars().take(70).collect();
        let role = format!("{:<26}", paragraph.role);
        let role = if paragraph.role.is_skip() {
            role.dimmed()
        } else if paragraph.role.heading_level().is_some() {
            role.green().bold()
        } else {
            role.cyan()
        };
        println!("{:>5} {} {}", paragraph.index + 1, role, text);
    }

    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for paragraph in &classification.paragraphs {
        *counts.entry(paragraph.role.to_string()).or_default() += 1;
    }
    println!();
    println!("{}", "Roles".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for (role, count) in counts {
        println!("{:<26} {}", role, count);
    }
    println!(
        "{:<26} {}",
        "main content found",
        classification.state.found_main_content()
    );

    Ok(())
}

fn cmd_batch(config: &ConfigArgs, inputs: &[PathBuf], output_dir: &Path) -> CliResult {
    fs::create_dir_all(output_dir)?;
    let formatter = formatter(
        config,
        FormatOptions::new().with_strategy(config.strategy.into()),
    )?;

    let pb = spinner("Formatting files...");
    let items = formatter.format_batch(inputs, output_dir);
    pb.finish_and_clear();

    let mut failed = 0;
    for item in &items {
        if item.succeeded() {
            let stats = &item.outcome.statistics.statistics;
            println!(
                "{} {} -> {} ({} headings, {} errors)",
                "✓".green(),
                item.input.display(),
                item.output.display(),
                stats.h1_formatted,
                stats.errors
            );
        } else {
            failed += 1;
            println!("{} {}", "✗".red(), item.input.display());
        }
    }

    println!(
        "\n{} {} formatted, {} failed",
        "Done!".green().bold(),
        items.len() - failed,
        failed
    );

    if failed > 0 {
        Err(format!("{} files failed", failed).into())
    } else {
        Ok(())
    }
}

fn cmd_requirements(config: &ConfigArgs, output: Option<&Path>, compact: bool) -> CliResult {
    let requirements = load_requirements(config)?;
    requirements.validate()?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    let json = report::to_json(&requirements, format)?;

    if let Some(path) = output {
        fs::write(path, &json)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn cmd_info(input: &Path, json: bool) -> CliResult {
    let format = vkrfmt::detect_format_from_path(input)?;
    let document = Document::open(input)?;

    if json {
        let (font, size) = document.styles().default_font();
        let margins: Vec<_> = document
            .page_margins()
            .iter()
            .map(|m| {
                serde_json::json!({
                    "top_cm": m.top.to_cm(),
                    "bottom_cm": m.bottom.to_cm(),
                    "left_cm": m.left.to_cm(),
                    "right_cm": m.right.to_cm(),
                })
            })
            .collect();
        let info = serde_json::json!({
            "file": input.display().to_string(),
            "format": format.to_string(),
            "parts": document.part_names().len(),
            "default_font": font,
            "default_font_size_pt": size.map(|s| s.to_pt()),
            "margins": margins,
            "paragraphs": document.paragraphs().count(),
            "tables": document.tables().count(),
        });
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Format".bold(), format);
    println!("{}: {}", "Parts".bold(), document.part_names().len());

    let (font, size) = document.styles().default_font();
    println!(
        "{}: {} {}",
        "Default font".bold(),
        font.unwrap_or_else(|| "-".to_string()),
        size.map(|s| format!("{} pt", s.to_pt())).unwrap_or_default()
    );

    for (index, margins) in document.page_margins().iter().enumerate() {
        println!(
            "{} {}: top {:.2} cm, bottom {:.2} cm, left {:.2} cm, right {:.2} cm",
            "Section".bold(),
            index + 1,
            margins.top.to_cm(),
            margins.bottom.to_cm(),
            margins.left.to_cm(),
            margins.right.to_cm()
        );
    }

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    let text = document.text();
    let paragraphs = document.paragraphs().count();
    let empty = document.paragraphs().filter(|p| p.is_empty()).count();
    let images = document.paragraphs().filter(|p| p.has_image()).count();

    println!("{}: {}", "Paragraphs".bold(), paragraphs);
    println!("{}: {}", "Empty paragraphs".bold(), empty);
    println!("{}: {}", "Tables".bold(), document.tables().count());
    println!("{}: {}", "Images".bold(), images);
    println!("{}: {}", "Words".bold(), text.split_whitespace().count());
    println!("{}: {}", "Characters".bold(), text.chars().count());

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "vkrfmt".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Thesis (ВКР) formatting tool");
    println!();
    println!("Repository: {}", "https://github.com/iyulab/vkrfmt".dimmed());
    println!("License: MIT");
}
