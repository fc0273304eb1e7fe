//! cvpress CLI - résumé structuring and export tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use cvpress::{
    BlockKind, CleanupPreset, EditCommand, ExportFormat, ExportOptions, InferOptions,
    KeywordSet, PageGeometry, Session,
};

#[derive(Parser)]
#[command(name = "cvpress")]
#[command(version)]
#[command(about = "Structure résumé text, check keyword coverage and export PDF", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a plain-text résumé as PDF, text or JSON
    Export {
        /// Input text file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (derived from the input name if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "pdf")]
        format: OutputKind,

        /// Page size
        #[arg(long, value_enum, default_value = "a4", env = "CVPRESS_PAGE_SIZE")]
        page_size: PageSize,

        /// Page geometry as a JSON file (overrides --page-size)
        #[arg(long, value_name = "FILE")]
        geometry: Option<PathBuf>,

        /// Edit script (JSON array of edit commands) applied before export
        #[arg(long, value_name = "FILE")]
        edits: Option<PathBuf>,

        /// Text cleanup preset
        #[arg(long, value_enum)]
        cleanup: Option<CleanupLevel>,

        /// Flate-compress PDF content streams
        #[arg(long)]
        compress: bool,

        /// Document title for the PDF info dictionary
        #[arg(long)]
        title: Option<String>,

        /// Document author for the PDF info dictionary
        #[arg(long, env = "CVPRESS_AUTHOR")]
        author: Option<String>,
    },

    /// Report which keywords occur in a résumé
    Coverage {
        /// Input text file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Comma-separated keywords
        #[arg(short, long, value_name = "LIST", conflicts_with = "keywords_file")]
        keywords: Option<String>,

        /// File with one keyword per line
        #[arg(long, value_name = "FILE")]
        keywords_file: Option<PathBuf>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the inferred structure and layout of a résumé
    Inspect {
        /// Input text file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Page size
        #[arg(long, value_enum, default_value = "a4", env = "CVPRESS_PAGE_SIZE")]
        page_size: PageSize,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutputKind {
    /// PDF document
    Pdf,
    /// Plain text
    Text,
    /// Paginated layout as JSON
    Json,
}

impl From<OutputKind> for ExportFormat {
    fn from(kind: OutputKind) -> Self {
        match kind {
            OutputKind::Pdf => ExportFormat::Document,
            OutputKind::Text => ExportFormat::PlainText,
            OutputKind::Json => ExportFormat::Json,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum PageSize {
    /// ISO A4 (595 x 842 pt)
    A4,
    /// US Letter (612 x 792 pt)
    Letter,
}

impl From<PageSize> for PageGeometry {
    fn from(size: PageSize) -> Self {
        match size {
            PageSize::A4 => PageGeometry::a4(),
            PageSize::Letter => PageGeometry::letter(),
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum CleanupLevel {
    /// Minimal cleanup (Unicode normalization only)
    Minimal,
    /// Standard cleanup (default)
    Standard,
}

impl From<CleanupLevel> for CleanupPreset {
    fn from(level: CleanupLevel) -> Self {
        match level {
            CleanupLevel::Minimal => CleanupPreset::Minimal,
            CleanupLevel::Standard => CleanupPreset::Standard,
        }
    }
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Export {
            input,
            output,
            format,
            page_size,
            geometry,
            edits,
            cleanup,
            compress,
            title,
            author,
        } => {
            let export = ExportOptions::new()
                .with_format(format.into())
                .with_compression(compress);
            let export = match title {
                Some(title) => export.with_title(title),
                None => export,
            };
            let export = match author {
                Some(author) => export.with_author(author),
                None => export,
            };
            cmd_export(
                &input,
                output.as_deref(),
                page_size,
                geometry.as_deref(),
                edits.as_deref(),
                cleanup,
                export,
            )
        }
        Commands::Coverage {
            input,
            keywords,
            keywords_file,
            json,
        } => cmd_coverage(&input, keywords.as_deref(), keywords_file.as_deref(), json),
        Commands::Inspect { input, page_size } => cmd_inspect(&input, page_size),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_export(
    input: &Path,
    output: Option<&Path>,
    page_size: PageSize,
    geometry: Option<&Path>,
    edits: Option<&Path>,
    cleanup: Option<CleanupLevel>,
    export: ExportOptions,
) -> CliResult {
    let format = export.format;
    let output_path = output
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| input.with_extension(format.extension()));

    let pb = ProgressBar::new(3);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")?
            .progress_chars("#>-"),
    );

    pb.set_message("Inferring structure...");
    let raw = fs::read_to_string(input)?;
    let geometry = match geometry {
        Some(path) => PageGeometry::from_json(&fs::read_to_string(path)?)?,
        None => page_size.into(),
    };
    let mut infer = InferOptions::new();
    if let Some(level) = cleanup {
        infer = infer.with_cleanup_preset(level.into());
    }
    let mut session = Session::builder()
        .with_geometry(geometry)
        .with_infer_options(infer)
        .with_export_options(export)
        .build_from_text(&raw)?;
    pb.inc(1);

    if let Some(path) = edits {
        pb.set_message("Applying edits...");
        let commands = EditCommand::parse_script(&fs::read_to_string(path)?)?;
        for command in commands {
            session.apply(command)?;
        }
        log::info!("Applied edits, now at revision {}", session.revision());
    }
    pb.inc(1);

    pb.set_message("Exporting...");
    let output = session
        .export()?
        .ok_or("document changed while exporting")?;
    output.write_to(&output_path)?;
    pb.inc(1);

    pb.finish_with_message("Done!");

    println!(
        "{} {} ({}, {} pages, {} bytes)",
        "Saved to".green(),
        output_path.display(),
        format,
        output.stats.page_count,
        output.len()
    );

    Ok(())
}

fn cmd_coverage(
    input: &Path,
    keywords: Option<&str>,
    keywords_file: Option<&Path>,
    json: bool,
) -> CliResult {
    let keywords = match (keywords, keywords_file) {
        (Some(list), _) => KeywordSet::parse_list(list),
        (None, Some(path)) => KeywordSet::parse_list(&fs::read_to_string(path)?),
        (None, None) => return Err("either --keywords or --keywords-file is required".into()),
    };

    let raw = fs::read_to_string(input)?;
    let session = Session::builder().with_keywords(keywords).build_from_text(&raw)?;
    let state = session
        .coverage()
        .ok_or("coverage was not computed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&state.to_map())?);
        return Ok(());
    }

    println!("{}", "Keyword Coverage".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for (keyword, present) in &state.entries {
        if *present {
            println!("  {} {}", "✓".green(), keyword);
        } else {
            println!("  {} {}", "✗".red(), keyword.dimmed());
        }
    }
    println!();
    println!(
        "{}: {}/{} ({:.0}%)",
        "Covered".bold(),
        state.matched().len(),
        state.entries.len(),
        state.ratio() * 100.0
    );

    Ok(())
}

fn cmd_inspect(input: &Path, page_size: PageSize) -> CliResult {
    let raw = fs::read_to_string(input)?;
    let document = cvpress::infer(&raw);
    let layout = cvpress::paginate(&document, &page_size.into())?;

    println!("{}", "Document Structure".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for (index, block) in document.blocks().iter().enumerate() {
        let kind = match block.kind {
            BlockKind::Title | BlockKind::Heading => block.kind.as_str().bold(),
            _ => block.kind.as_str().normal(),
        };
        let text = block.plain_text();
        let preview: String = text.chars().take(48).collect();
        let ellipsis = if text.chars().count() > 48 { "..." } else { "" };
        println!(
            "{:>4} {:<18} {}{}",
            index.to_string().dimmed(),
            kind,
            preview.replace('\n', " "),
            ellipsis
        );
    }

    println!();
    println!("{}", "Layout".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Pages".bold(), layout.page_count());
    println!("{}: {}", "Lines".bold(), layout.line_count());
    for page in &layout.pages {
        println!("  {} page {}: {} lines", "├─".dimmed(), page.number, page.line_count());
    }
    println!("{}: {}", "Words".bold(), document.word_count());

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "cvpress".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Résumé structuring and export tool");
    println!();
    println!("License: MIT");
}
