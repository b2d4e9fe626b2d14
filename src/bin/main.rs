use clap::{Args, Parser, Subcommand};
use log::{debug, info};
use lox_scan::{ExitStatus, Reporter, ScanConfig, Scanner};
use std::{
    fs::File,
    io::{self, BufReader, Write},
    path::PathBuf,
    process::ExitCode,
};

const EX_USAGE: u8 = 64;
const EX_IOERR: u8 = 74;

/// Scanner for a small C-like language.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the tokens of a source file, one per line.
    Tokenize(Tokenize),
}

#[derive(Args, Debug)]
struct Tokenize {
    /// Source file to scan; standard input when absent or `-`.
    path: Option<PathBuf>,

    /// Skip `//` line comments.
    #[arg(long)]
    line_comments: bool,
}

impl Tokenize {
    fn config(&self) -> ScanConfig {
        ScanConfig::new().line_comments(self.line_comments)
    }

    fn run(self) -> io::Result<ExitStatus> {
        let config = self.config();
        let tokens = match self.path.as_deref() {
            Some(path) if path.as_os_str() != "-" => {
                info!("scanning {}", path.display());
                let file = File::open(path)?;
                Scanner::from_reader(BufReader::new(file), config).scan_tokens()?
            },
            _ => {
                info!("scanning standard input");
                Scanner::from_reader(io::stdin().lock(), config).scan_tokens()?
            },
        };

        Reporter::new(io::stdout().lock(), io::stderr().lock()).report(&tokens)
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Nowhere left to report a failed write of the usage text; the exit code still says it.
            let _ = e.print();
            return if e.use_stderr() { ExitCode::from(EX_USAGE) } else { ExitCode::SUCCESS };
        },
    };

    let result = match cli.command {
        Command::Tokenize(tokenize) => tokenize.run(),
    };

    match result {
        Ok(status) => ExitCode::from(status.code()),
        Err(e) => {
            debug!("scan aborted: {:?}", e);
            // Same as above: if stderr is gone, the exit code is the only report.
            let _ = writeln!(io::stderr(), "Error: {}", e);
            ExitCode::from(EX_IOERR)
        },
    }
}
