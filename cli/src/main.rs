use std::io::Write;

use anyhow::Error;

use clap::{ArgAction, Parser, Subcommand};

mod args;

mod diversity;
use diversity::Diversity;

mod partitions;
use partitions::Partitions;

mod plot;
use plot::Plot;

mod table;

mod theta;
use theta::Theta;

mod view;
use view::View;

const NAME: &str = env!("CARGO_BIN_NAME");
const VERSION: &str = env!("CARGO_PKG_VERSION");
const AUTHOR: &str = env!("CARGO_PKG_AUTHORS");

/// Tools for analysing linkage, diversity and differentiation in multilocus data.
#[derive(Debug, Parser)]
#[clap(name = NAME, author = AUTHOR, version = VERSION, about)]
#[clap(subcommand_required = true)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Suppress warnings.
    ///
    /// By default, only warnings are printed. By setting this flag, warnings will be disabled.
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Verbosity.
    ///
    /// Flag can be set multiply times to increase verbosity, or left unset for quiet mode.
    #[clap(short = 'v', long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Print CLI arguments for debugging.
    #[clap(long, hide = true, global = true)]
    debug: bool,
}

impl Cli {
    pub fn run(self) -> Result<(), Error> {
        if self.debug {
            eprintln!("{self:#?}");
        }

        let level = if self.quiet {
            log::LevelFilter::Off
        } else {
            match self.verbose {
                0 => log::LevelFilter::Warn,
                1 => log::LevelFilter::Info,
                2 => log::LevelFilter::Debug,
                _ => log::LevelFilter::Trace,
            }
        };

        match env_logger::Builder::new()
            .filter_level(level)
            .target(env_logger::Target::Stderr)
            .format(|buf, record| {
                let level = record.level().as_str().to_lowercase();
                let args = record.args();
                writeln!(buf, "[multilocus {level:>5}] {args}")
            })
            .try_init()
        {
            Ok(()) => (),
            Err(e) => eprintln!("failed to setup logger: {e}"),
        }

        self.command.run()
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    Diversity(Diversity),
    Partitions(Partitions),
    Plot(Plot),
    Theta(Theta),
    View(View),
}

impl Command {
    fn run(self) -> Result<(), Error> {
        match self {
            Command::Diversity(diversity) => diversity.run(),
            Command::Partitions(partitions) => partitions.run(),
            Command::Plot(plot) => plot.run(),
            Command::Theta(theta) => theta.run(),
            Command::View(view) => view.run(),
        }
    }
}

macro_rules! impl_try_from_command {
    ($($variant:ident),+ $(,)?) => {
        $(
            impl TryFrom<Command> for $variant {
                type Error = Command;

                fn try_from(command: Command) -> Result<Self, Self::Error> {
                    match command {
                        Command::$variant(subcommand) => Ok(subcommand),
                        command => Err(command),
                    }
                }
            }
        )+
    };
}

impl_try_from_command!(Diversity, Partitions, Plot, Theta, View);

fn main() {
    let cli = Cli::parse();

    match cli.run() {
        Ok(()) => (),
        Err(e) => {
            eprintln!("{e:#}");
            std::process::exit(1);
        }
    }
}
