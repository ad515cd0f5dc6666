use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use semgo::{export, shell};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Parser)]
#[command(name = "semgo")]
#[command(about = "Go declaration-tree parser for semantic diff/merge tools", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the line-oriented request loop over stdin/stdout
    Shell {
        /// Readiness flag file created (zero-length) at startup
        flag_file: PathBuf,
    },

    /// Parse a .go file (or a directory of them) and emit the YAML tree
    Parse {
        /// Source file or directory
        path: PathBuf,

        /// Declared source encoding (UTF-8 or WINDOWS-1252)
        #[arg(short, long, default_value = "UTF-8")]
        encoding: String,

        /// Write the result here instead of stdout (single-file mode only)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Shell { flag_file } => cmd_shell(&flag_file),
        Commands::Parse {
            path,
            encoding,
            output,
        } => cmd_parse(&path, &encoding, output.as_deref()),
    }
}

fn cmd_shell(flag_file: &Path) -> Result<()> {
    shell::write_flag_file(flag_file)
        .with_context(|| format!("error creating flag file {}", flag_file.display()))?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    shell::run(stdin.lock(), stdout.lock())?;
    Ok(())
}

fn cmd_parse(path: &Path, encoding: &str, output: Option<&Path>) -> Result<()> {
    if path.is_dir() {
        return cmd_parse_dir(path, encoding);
    }

    let src = fs::read(path).with_context(|| format!("error reading {}", path.display()))?;
    let file = semgo::parse(&src, encoding)?;
    let yaml = serde_yaml::to_string(&export::to_export(&file, &path.display().to_string()))?;

    match output {
        Some(out) => {
            shell::write_atomic(out, yaml.as_bytes())
                .with_context(|| format!("error writing {}", out.display()))?;
            println!("{} {} -> {}", "✓".green(), path.display(), out.display());
        }
        None => print!("{}", yaml),
    }
    Ok(())
}

/// Parse every .go file under a directory and report per-file status.
fn cmd_parse_dir(dir: &Path, encoding: &str) -> Result<()> {
    let mut parsed = 0;
    let mut degraded = 0;
    let mut failed = 0;

    for entry in WalkDir::new(dir) {
        let entry = entry?;
        if !entry.file_type().is_file()
            || entry.path().extension().and_then(|s| s.to_str()) != Some("go")
        {
            continue;
        }
        let path = entry.path();
        let src = fs::read(path).with_context(|| format!("error reading {}", path.display()))?;
        match semgo::parse(&src, encoding) {
            Ok(file) if file.has_errors() => {
                let message = &file.parsing_errors[0].message;
                println!("{} {}: {}", "⊙".yellow(), path.display(), message.dimmed());
                degraded += 1;
            }
            Ok(file) => {
                println!(
                    "{} {}: {} declarations",
                    "✓".green(),
                    path.display(),
                    file.children.len()
                );
                parsed += 1;
            }
            Err(err) => {
                eprintln!("{} {}: {}", "✗".red(), path.display(), err);
                failed += 1;
            }
        }
    }

    println!();
    println!("{}", "Summary:".bold());
    println!("  {} parsed", format!("{}", parsed).green());
    println!("  {} with syntax errors", format!("{}", degraded).yellow());
    println!("  {} failed", format!("{}", failed).red());

    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}
