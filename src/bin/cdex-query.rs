//! cdex database query tool.
//!
//! Searches a database created by cdex-index.

use std::path::PathBuf;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use cdex::platform::{self, EX_DATAERR, EX_IOERR, EX_UNAVAILABLE, EX_USAGE};
use cdex::search::run_one_command;
use cdex::version;
use cdex::StoreError;

fn print_usage() {
    println!(
        "Usage: cdex-query [OPTION]... [-i] database-file\n   \
         or: cdex-query [OPTION]... -c cmd database-file"
    );
}

fn print_help() {
    print_usage();
    println!(
        "cdex query tool. Search a database created by cdex-index.\n\
         OPTIONS:\n   \
         -h, --help            print this\n   \
         -V, --version         display version\n   \
         -i, --interactive     interactive mode (default)\n   \
         -c, --command <cmd>   execute a single command\n\
         COMMANDS:\n   \
         td|typedecl (ID | [struct|union|enum] NAME)\n   \
         tn|typename [struct|union|enum] NAME\n   \
         md|memberdecl (ID | [struct|union|enum] NAME) MEMBER"
    );
}

struct Args {
    help: bool,
    version: bool,
    command: Option<String>,
    db_path: PathBuf,
}

fn parse_args(argv: &[String]) -> Result<Args, String> {
    let mut args = Args {
        help: false,
        version: false,
        command: None,
        db_path: PathBuf::new(),
    };
    let mut db_path: Option<PathBuf> = None;

    let mut iter = argv.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => args.help = true,
            "-V" | "--version" => args.version = true,
            "-i" | "--interactive" => args.command = None,
            "-c" | "--command" => {
                let value = iter.next().ok_or("--command requires an argument")?;
                args.command = Some(value.clone());
            }
            other if other.starts_with('-') => {
                return Err(format!("unknown option '{}'", other));
            }
            other => {
                if db_path.is_some() {
                    return Err("too many database paths".to_string());
                }
                db_path = Some(PathBuf::from(other));
            }
        }
    }

    if args.help || args.version {
        return Ok(args);
    }

    args.db_path = db_path.ok_or("missing database-file")?;
    Ok(args)
}

fn main() -> ExitCode {
    if let Err(e) = platform::setup_stdio() {
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

    let Some(command) = args.command else {
        eprintln!("interactive mode unimplemented");
        return ExitCode::from(EX_UNAVAILABLE);
    };

    match run_one_command(&args.db_path, &command) {
        Ok(()) => ExitCode::SUCCESS,
        // misses and ambiguity already printed their user message
        Err(StoreError::NotFound) | Err(StoreError::Ambiguous) => ExitCode::from(EX_DATAERR),
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(EX_DATAERR)
        }
    }
}
