use std::io;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use walkdir::WalkDir;

use importscope::export::{export, ExportFormat, ReportData};
use importscope::scanner::{scan_file, FileScan, Language};
use importscope::usage::locate_usages;

#[derive(Parser)]
#[command(name = "importscope")]
#[command(version)]
#[command(about = "Lexical import extraction and usage location for Python and JS/TS sources", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a file or directory for package imports
    Scan {
        /// Path to scan (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Locate usages of each imported name
        #[arg(short, long)]
        usages: bool,

        /// Output format (json, markdown)
        #[arg(short, long, default_value_t = ExportFormat::Json)]
        format: ExportFormat,
    },
    /// Show version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Scan {
            path,
            usages,
            format,
        }) => run_scan(&path, usages, format),
        Some(Commands::Version) => {
            println!("importscope v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        None => {
            println!("importscope - import extraction and usage location");
            println!("Run 'importscope scan <path>' to scan sources");
            println!("Run 'importscope --help' for more information");
            Ok(())
        }
    }
}

fn run_scan(path: &Path, with_usages: bool, format: ExportFormat) -> Result<()> {
    let files = collect_files(path);
    if files.is_empty() {
        println!("No supported source files under {}", path.display());
        return Ok(());
    }

    for file in files {
        match scan_file(&file) {
            Ok(scan) => print_report(scan, with_usages, format)?,
            Err(err) => eprintln!("{}: {}", file.display(), err),
        }
    }
    Ok(())
}

/// Gather every file under `path` whose extension maps to a supported
/// language. A direct file path is taken as-is.
fn collect_files(path: &Path) -> Vec<PathBuf> {
    if path.is_file() {
        return vec![path.to_path_buf()];
    }

    WalkDir::new(path)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .and_then(Language::from_extension)
                .is_some()
        })
        .collect()
}

fn print_report(scan: FileScan, with_usages: bool, format: ExportFormat) -> Result<()> {
    let name = scan.path.display().to_string();
    let data = if with_usages {
        let usages = locate_usages(&scan.source, &scan.result.imports);
        ReportData::from_scan(&name, scan.language, scan.result.clone()).with_usages(&usages)
    } else {
        ReportData::from_scan(&name, scan.language, scan.result)
    };

    let mut stdout = io::stdout().lock();
    export(format, &data, &mut stdout)?;
    Ok(())
}
