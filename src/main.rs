use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing::Level;

use magi_wm::apps::{AppId, SizeTable};
use magi_wm::config::DesktopConfig;
use magi_wm::constants::{DEFAULT_UNITS_PER_COLUMN, DEFAULT_UNITS_PER_ROW};
use magi_wm::keybindings::KeyBindings;
use magi_wm::layout::CellScale;
use magi_wm::locale::Locale;
use magi_wm::{runner, tracing_sub};

#[derive(Parser, Debug)]
#[command(
    name = "magi-wm",
    version = env!("CARGO_PKG_VERSION"),
    about = "MAGI desktop: floating windows in the terminal"
)]
struct Cli {
    /// Display language, `cn` or `en`.
    #[arg(long, value_name = "LOCALE", default_value = "cn")]
    locale: Locale,

    /// Application to open at startup. Repeat to open several.
    #[arg(long = "open", value_name = "APP")]
    open: Vec<AppId>,

    /// Desktop length units per terminal column.
    #[arg(long, value_name = "UNITS", default_value_t = DEFAULT_UNITS_PER_COLUMN)]
    unit_width: i32,

    /// Desktop length units per terminal row.
    #[arg(long, value_name = "UNITS", default_value_t = DEFAULT_UNITS_PER_ROW)]
    unit_height: i32,

    /// Frame tick in milliseconds.
    #[arg(long, value_name = "MS", default_value_t = 16)]
    tick_ms: u64,

    /// Append logs to this file. Logging is off without it.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    #[arg(long, value_name = "LEVEL", default_value_t = Level::INFO)]
    log_level: Level,

    /// Print the key bindings and exit.
    #[arg(long)]
    list_keys: bool,
}

impl Cli {
    fn into_config(self) -> DesktopConfig {
        DesktopConfig {
            locale: self.locale,
            open: self.open,
            scale: CellScale::new(self.unit_width, self.unit_height),
            sizes: SizeTable::default(),
            tick: Duration::from_millis(self.tick_ms.max(1)),
            log_file: self.log_file,
            log_level: self.log_level,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if cli.list_keys {
        for (action, keys) in KeyBindings::default().help_entries() {
            println!("{:<12} {action}", keys.join(", "));
        }
        return ExitCode::SUCCESS;
    }

    let config = cli.into_config();
    if let Err(err) = tracing_sub::init(config.log_file.as_deref(), config.log_level) {
        eprintln!("magi-wm: {err}");
        return ExitCode::FAILURE;
    }
    match runner::run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(%err, "desktop session failed");
            eprintln!("magi-wm: {err}");
            ExitCode::FAILURE
        }
    }
}
