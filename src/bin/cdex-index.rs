//! cdex indexing tool.
//!
//! Produces a search database from C source files, either a single `.c`
//! file or everything listed in a compilation database.

use std::path::PathBuf;
use std::process::ExitCode;

use tracing::info;
use tracing_subscriber::EnvFilter;

use cdex::indexer::{index_project, IndexConfig, InputKind, StoreConfig};
use cdex::platform::{self, EX_DATAERR, EX_IOERR, EX_USAGE};
use cdex::version;

fn print_usage() {
    println!(
        "Usage: cdex-index [OPTION]... [-s] source-file\n   \
         or: cdex-index [OPTION]... -d build-directory"
    );
}

fn print_help() {
    print_usage();
    println!(
        "cdex indexing tool. Create a search database from C source files.\n\
         OPTIONS:\n   \
         -h, --help      print this\n   \
         -V, --version   display version\n   \
         -s, --src       input path is a single `.c' file (default)\n   \
         -d, --dir       input path is the parent directory of a\n                   \
         compilation database\n   \
         -o, --out       path to sqlite database to create\n   \
         -n, --dry-run   don't persist anything"
    );
}

struct Args {
    help: bool,
    version: bool,
    config: IndexConfig,
}

/// Parse argv into a struct. Defaults: single `.c` input, sqlite output
/// at "cf.db".
fn parse_args(argv: &[String]) -> Result<Args, String> {
    let mut args = Args {
        help: false,
        version: false,
        config: IndexConfig {
            input: PathBuf::new(),
            input_kind: InputKind::SourceFile,
            store: StoreConfig::Sql(PathBuf::from("cf.db")),
        },
    };
    let mut out_path: Option<PathBuf> = None;
    let mut dry_run = false;
    let mut input: Option<PathBuf> = None;

    let mut iter = argv.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => args.help = true,
            "-V" | "--version" => args.version = true,
            "-s" | "--src" => args.config.input_kind = InputKind::SourceFile,
            "-d" | "--dir" => args.config.input_kind = InputKind::CompDb,
            "-o" | "--out" => {
                let value = iter.next().ok_or("--out requires an argument")?;
                out_path = Some(PathBuf::from(value));
            }
            "-n" | "--dry-run" => dry_run = true,
            other if other.starts_with('-') => {
                return Err(format!("unknown option '{}'", other));
            }
            other => {
                if input.is_some() {
                    return Err("too many input paths".to_string());
                }
                input = Some(PathBuf::from(other));
            }
        }
    }

    if args.help || args.version {
        return Ok(args);
    }

    if dry_run {
        args.config.store = StoreConfig::Nop;
    } else if let Some(path) = out_path {
        args.config.store = StoreConfig::Sql(path);
    }

    args.config.input = input.ok_or("missing input file")?;
    Ok(args)
}

fn main() -> ExitCode {
    if let Err(e) = platform::setup_stdio() {
        // stdio may not exist; nowhere to report this
        let _ = e;
        return ExitCode::from(EX_IOERR);
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let argv: Vec<String> = std::env::args().skip(1).collect();
    let args = match parse_args(&argv) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{}", message);
            print_usage();
            return ExitCode::from(EX_USAGE);
        }
    };

    if args.help {
        print_help();
        return ExitCode::SUCCESS;
    }
    if args.version {
        println!("{}", version::version());
        return ExitCode::SUCCESS;
    }

    info!(
        "index {}('{}')",
        match args.config.input_kind {
            InputKind::CompDb => "project",
            InputKind::SourceFile => "source",
        },
        args.config.input.display()
    );

    match index_project(&args.config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("cdex-index: {:#}", e);
            ExitCode::from(EX_DATAERR)
        }
    }
}
