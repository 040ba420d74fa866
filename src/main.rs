use aboutme::index::{
    build_index, check_staleness, find_missing_headers, index_to_json, locked_save_index,
    update_file,
};
use aboutme::output::{self, ColorMode};
use aboutme::utils::progress::scan_spinner;
use aboutme::utils::{resolve_path, AppConfig};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "aboutme")]
#[command(about = "Index the ABOUTME headers of a project's files")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// When to colour output
    #[arg(long, value_enum, default_value_t = ColorMode::Auto, global = true)]
    color: ColorMode,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the full index (printed as JSON unless --output is given)
    Build {
        /// Directory to scan
        #[arg(default_value = ".")]
        directory: PathBuf,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// List files missing ABOUTME headers (exit 1 if any)
        #[arg(short, long)]
        check: bool,

        /// Check if the index is older than any file (exit 1 if stale)
        #[arg(short, long)]
        stale: bool,
    },
    /// Update the index entry for a single file
    Update {
        /// Path to the file to index
        file_path: PathBuf,

        /// Index file, relative to the project root unless absolute
        #[arg(short, long)]
        index: Option<PathBuf>,

        /// Project root directory (default: nearest ancestor with .claude or .git)
        #[arg(short, long)]
        project_dir: Option<PathBuf>,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    aboutme::logging::init_with_config(&config, cli.verbose);

    match cli.command {
        Commands::Build {
            directory,
            output,
            check,
            stale,
        } => run_build(&config, cli.color, &directory, output.as_deref(), check, stale),
        Commands::Update {
            file_path,
            index,
            project_dir,
        } => {
            let index = index.unwrap_or_else(|| PathBuf::from(&config.index_path));
            run_update(cli.color, &file_path, &index, project_dir.as_deref())
        }
    }
}

fn run_build(
    config: &AppConfig,
    color: ColorMode,
    directory: &Path,
    output_path: Option<&Path>,
    check: bool,
    stale: bool,
) -> Result<ExitCode> {
    let root = resolve_path(directory);
    if !root.is_dir() {
        eprintln!("Error: {} is not a directory", root.display());
        return Ok(ExitCode::FAILURE);
    }

    let mut stdout = output::stdout(color);

    if stale {
        let index_path = root.join(&config.index_path);
        let status = check_staleness(&root, &index_path);
        output::write_staleness(&mut stdout, &status)?;
        return Ok(exit_code(!status.stale));
    }

    if check {
        let missing = find_missing_headers(&root);
        output::write_missing_report(&mut stdout, &missing)?;
        return Ok(exit_code(missing.is_empty()));
    }

    match output_path {
        Some(path) => {
            let spinner = scan_spinner("Scanning for ABOUTME headers...");
            let index = build_index(&root);
            spinner.finish_and_clear();

            locked_save_index(&index, path)
                .with_context(|| format!("Failed to write index to {}", path.display()))?;
            output::write_saved(&mut stdout, &path.display().to_string(), index.len())?;
        }
        None => {
            let index = build_index(&root);
            let json = index_to_json(&index)?;
            println!("{}", json);
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn run_update(
    color: ColorMode,
    file_path: &Path,
    index: &Path,
    project_dir: Option<&Path>,
) -> Result<ExitCode> {
    if let Some(update) = update_file(file_path, index, project_dir)? {
        let mut stdout = output::stdout(color);
        output::write_update(&mut stdout, &update)?;
    }
    Ok(ExitCode::SUCCESS)
}

fn exit_code(ok: bool) -> ExitCode {
    if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}
