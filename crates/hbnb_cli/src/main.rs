//! Line-oriented console over the hbnb record store.
//!
//! # Responsibility
//! - Build the core configuration from flags and environment.
//! - Load the durable file once, then feed stdin lines to the console.

mod command;
mod console;

use clap::Parser;
use console::Console;
use hbnb_core::{CoreConfig, FileStorage, RecordService, RecordStore, DEFAULT_FILE_PATH};
use log::error;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;

const PROMPT: &str = "(hbnb) ";

#[derive(Debug, Parser)]
#[command(name = "hbnb", version, about = "Record store console")]
struct Args {
    /// Durable JSON file holding every record.
    #[arg(long, env = "HBNB_FILE", default_value = DEFAULT_FILE_PATH)]
    file: PathBuf,
    /// Log level: trace|debug|info|warn|error.
    #[arg(long, env = "HBNB_LOG_LEVEL")]
    log_level: Option<String>,
    /// Absolute directory for rolling log files; logging is off when unset.
    #[arg(long, env = "HBNB_LOG_DIR")]
    log_dir: Option<PathBuf>,
}

impl Args {
    fn into_config(self) -> CoreConfig {
        let mut config = CoreConfig::default().with_file_path(self.file);
        if let Some(level) = self.log_level {
            config = config.with_log_level(level);
        }
        if let Some(dir) = self.log_dir {
            config = config.with_log_dir(dir);
        }
        config
    }
}

fn main() -> ExitCode {
    let config = Args::parse().into_config();

    if let Err(err) = config.start_logging() {
        eprintln!("hbnb: {err}");
        return ExitCode::from(2);
    }

    let mut storage = FileStorage::from_config(&config);
    if let Err(err) = storage.load() {
        error!("event=console_start module=cli status=error error={}", err);
        eprintln!("hbnb: cannot load `{}`: {err}", config.file_path.display());
        return ExitCode::FAILURE;
    }

    let mut console = Console::new(RecordService::new(storage));
    match run(&mut console) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("hbnb: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(console: &mut Console<FileStorage>) -> io::Result<()> {
    let interactive = io::stdin().is_terminal();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    loop {
        if interactive {
            write!(out, "{PROMPT}")?;
            out.flush()?;
        }
        let Some(line) = lines.next().transpose()? else {
            if interactive {
                writeln!(out)?;
            }
            return Ok(());
        };
        if !console.execute(&line, &mut out)? {
            return Ok(());
        }
    }
}
