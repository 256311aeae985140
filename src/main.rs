use cidr_aggregator::{aggregate_cidrs, parse_cidr_lines, read_cidr_file, Ipv4Cidr};
use clap::{ArgAction, Parser};
use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::error::Error;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const USAGE: &str =
    "Please pass in an argument where you have a file containing newline delimited valid CIDR ranges.";

#[derive(Parser, Debug)]
#[command(version, about = "Smallest single CIDR block covering every CIDR in a file")]
struct Opts {
    /// File with one CIDR per line, `-` for standard input
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Also print the first and last address of the result
    #[arg(short, long)]
    range: bool,

    /// More log output on stderr, repeat for more
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) -> Result<(), Box<dyn Error>> {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new("{d(%H:%M:%S)} {h({l})} {t} - {m}{n}")))
        .build();
    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(level))?;
    log4rs::init_config(config)?;
    Ok(())
}

/// Exactly one file is accepted; anything else gets the usage line.
fn single_file(mut files: Vec<PathBuf>) -> Option<PathBuf> {
    match files.len() {
        1 => files.pop(),
        _ => None,
    }
}

fn load(path: &Path) -> cidr_aggregator::Result<Vec<Ipv4Cidr>> {
    if path.as_os_str() == "-" {
        parse_cidr_lines(io::stdin().lock())
    } else {
        read_cidr_file(path)
    }
}

fn main() -> ExitCode {
    let opts = Opts::parse();
    if let Err(e) = init_logging(opts.verbose) {
        eprintln!("Logging disabled: {}", e);
    }

    let path = match single_file(opts.files) {
        Some(path) => path,
        None => {
            println!("{}", USAGE);
            return ExitCode::SUCCESS;
        }
    };

    let cidrs = match load(&path) {
        Ok(cidrs) => cidrs,
        Err(e) => {
            log::error!("{:?}", e);
            eprintln!("Error reading CIDR file: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match aggregate_cidrs(&cidrs) {
        Ok(block) => {
            println!("Aggregated CIDR:");
            println!("{}", block);
            if opts.range {
                println!("{} - {}", block.first_ip(), block.last_ip());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
