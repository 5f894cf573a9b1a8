// minic: scanner, parser and semantic checker for mini-C

use std::path::{Path, PathBuf};
use std::process;

use clap::Parser as _;
use crossterm::style::Stylize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use minic::parser::render::render_program;
use minic::{Analyzer, FrontendError, ParseError, Parser, Scanner, Source};

/// Check a mini-C translation unit for syntax and declaration errors.
#[derive(clap::Parser, Debug)]
#[command(author, version, long_about = None)]
struct Args {
    /// Source file to check
    file: PathBuf,

    /// Print the token stream before parsing
    #[arg(long)]
    tokens: bool,

    /// Print the syntax tree
    #[arg(long)]
    ast: bool,

    /// Print the syntax tree rendered back as mini-C
    #[arg(long)]
    emit_source: bool,

    /// Stop after parsing
    #[arg(long)]
    no_check: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(err) = run(&args) {
        eprintln!("{} {}", "error:".red().bold(), err);
        process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load(path: &Path) -> Result<Source, FrontendError> {
    Source::from_path(path).map_err(|source| FrontendError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn run(args: &Args) -> Result<(), FrontendError> {
    let source = load(&args.file)?;
    info!(file = %args.file.display(), lines = source.line_count(), "loaded source");

    if args.tokens {
        for token in Scanner::new(source.clone()) {
            let token = token.map_err(ParseError::from)?;
            let kind = token.kind.to_string();
            println!("{:>4}  {:<20} {}", token.line, kind, token.text);
        }
    }

    let program = Parser::new(Scanner::new(source))?.parse_program()?;
    info!(declarations = program.declarations.len(), "parsed");

    if args.ast {
        println!("{:#?}", program);
    }

    if args.emit_source {
        print!("{}", render_program(&program));
    }

    if args.no_check {
        return Ok(());
    }

    Analyzer::new().analyze(&program)?;
    eprintln!("{} {}", "ok:".green().bold(), args.file.display());
    Ok(())
}
