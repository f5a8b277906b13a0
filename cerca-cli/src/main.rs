use cerca::{
    editor::{confirm_and_launch, editor_from_env},
    errors::unify_path,
    interactive::{filter_by_extension, Prompt},
    report::{paint, print_results, ReplacementPreview, ReportOptions},
    search::LiteralMatcher,
    search, SearchConfig, SearchError,
};
use clap::Parser;
use colored::Colorize;
use std::{num::NonZeroUsize, path::PathBuf, process::ExitCode, time::Instant};
use tracing_subscriber::EnvFilter;

type Result<T> = std::result::Result<T, SearchError>;

#[derive(Parser)]
#[command(author, version, about = "Search strings in files and open them with an editor", long_about = None)]
#[command(after_help = "EXAMPLES:
  cerca-cli \"TODO\"                   Search \"TODO\" (case-sensitive)
  cerca-cli \"todo\" -i                Search \"todo\" ignoring case
  cerca-cli \"import pandas\" -e .py   Search only in Python files
  cerca-cli \"error\" -c               Show context of occurrences
  cerca-cli \"bug\" -r \"fix\"           Preview replacing \"bug\" with \"fix\"
  cerca-cli \"TODO\" --editor code     Open files with VS Code")]
struct Cli {
    /// String to search for (matched literally)
    pattern: String,

    /// Case-insensitive search
    #[arg(short = 'i', long)]
    ignore_case: bool,

    /// File extensions to include (e.g. .py .txt)
    #[arg(short = 'e', long, num_args = 1..)]
    extensions: Option<Vec<String>>,

    /// Don't open files, only show results
    #[arg(short = 'n', long)]
    no_open: bool,

    /// Limit the number of files to open (0 = unlimited)
    #[arg(short = 'l', long, default_value = "0")]
    limit: usize,

    /// Show context of occurrences
    #[arg(short = 'c', long)]
    context: bool,

    /// Show a replacement preview (files are never modified)
    #[arg(short = 'r', long)]
    replace: Option<String>,

    /// Include binary files in the search
    #[arg(long)]
    include_binary: bool,

    /// Skip files whose first kilobyte contains a NUL byte
    #[arg(long)]
    sniff_binary: bool,

    /// Number of parallel worker threads
    #[arg(short = 'w', long, default_value = "8")]
    workers: NonZeroUsize,

    /// Editor used to open files (default: $EDITOR, then the system opener)
    #[arg(long)]
    editor: Option<String>,

    /// Root directory to search in
    #[arg(short = 'd', long, default_value = ".")]
    root: PathBuf,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Log level used when RUST_LOG is unset (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn init_logging(level: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli.log_level);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let start = Instant::now();
    let use_color = !cli.no_color;
    let show_context = cli.context || cli.replace.is_some();

    let mut config = SearchConfig::new(cli.pattern.clone(), cli.root.clone())
        .with_ignore_case(cli.ignore_case)
        .with_exclude_binary(!cli.include_binary)
        .with_sniff_binary(cli.sniff_binary)
        .with_context(show_context)
        .with_workers(cli.workers);
    if let Some(extensions) = &cli.extensions {
        config = config.with_extensions(extensions);
    }

    let root = unify_path(&cli.root);
    println!(
        "\n{} search for '{}' in progress...",
        if cli.ignore_case {
            "Case-insensitive"
        } else {
            "Case-sensitive"
        },
        cli.pattern
    );
    println!("Directory: {}", root.display());
    if let Some(extensions) = &cli.extensions {
        println!("Filtering by extensions: {}", extensions.join(", "));
    }
    println!();

    let results = search(&config)?;
    if results.is_empty() {
        let message = format!("No files found containing '{}'", cli.pattern);
        println!("{}", paint(message, use_color, |s| s.yellow()));
        return Ok(());
    }

    let options = ReportOptions {
        show_context,
        preview: match &cli.replace {
            Some(replacement) => Some(ReplacementPreview::new(
                LiteralMatcher::new(&cli.pattern, cli.ignore_case)?,
                replacement.clone(),
            )),
            None => None,
        },
        use_color,
    };

    let mut stdout = std::io::stdout();
    let mut report = print_results(&results, &options, "Files found:", &mut stdout)?;
    let summary = format!(
        "Found {} files with {} total occurrences in {:.2} seconds",
        results.len(),
        report.total_occurrences,
        start.elapsed().as_secs_f64()
    );
    println!("\n{}", paint(summary, use_color, |s| s.bold()));

    let mut prompt = Prompt::stdio();
    let total_files = results.len();
    let filtered = filter_by_extension(results, &mut prompt)?;
    if filtered.len() < total_files {
        report = print_results(
            &filtered,
            &options,
            "Files found after filtering:",
            &mut stdout,
        )?;
        println!(
            "\n{} files remaining with {} occurrences after filtering",
            filtered.len(),
            report.total_occurrences
        );
    }

    if cli.no_open {
        return Ok(());
    }

    let editor = editor_from_env(cli.editor.as_deref());
    let paths: Vec<PathBuf> = report.ranked.into_iter().map(|r| r.path).collect();
    confirm_and_launch(&mut prompt, &editor, &paths, cli.limit)?;
    Ok(())
}
