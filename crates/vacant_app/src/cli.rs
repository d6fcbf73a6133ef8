use std::io;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use vacant_core::{Platform, SalaryRange};
use vacant_engine::SearchRequest;

use crate::app::App;
use crate::config::AppConfig;
use crate::logging;
use crate::prompt::DEFAULT_COUNT;

#[derive(Parser, Debug)]
#[command(
    name = "vacant",
    about = "Search HH.ru and SuperJob.ru vacancies and keep a local JSON store",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch, filter and print vacancies from the selected platforms
    Search(SearchArgs),
    /// Print vacancies from the local store
    Stored(StoredArgs),
    /// Remove a stored vacancy by platform and id
    Delete(DeleteArgs),
    /// Ask for every choice on the terminal (default command)
    Interactive,
}

#[derive(Args, Debug, Clone, Copy, Default)]
struct SalaryArgs {
    /// Keep vacancies whose salary is strictly above this value
    #[arg(long)]
    min: Option<i64>,
    /// Keep vacancies whose salary is strictly below this value
    #[arg(long)]
    max: Option<i64>,
}

impl SalaryArgs {
    fn range(self) -> SalaryRange {
        SalaryRange::new(self.min, self.max)
    }
}

#[derive(Args, Debug)]
struct SearchArgs {
    /// Platform to query (hh, superjob); repeat for several
    #[arg(long = "platform", required = true)]
    platforms: Vec<Platform>,
    /// Search phrase sent to the platforms
    #[arg(long, default_value = "")]
    keyword: String,
    /// Vacancies to request per platform
    #[arg(long, default_value_t = DEFAULT_COUNT)]
    count: usize,
    #[command(flatten)]
    salary: SalaryArgs,
    /// Overwrite the store with the results
    #[arg(long)]
    save: bool,
}

#[derive(Args, Debug)]
struct StoredArgs {
    /// Only show this platform; repeat for several, omit for all
    #[arg(long = "platform")]
    platforms: Vec<Platform>,
    #[command(flatten)]
    salary: SalaryArgs,
}

#[derive(Args, Debug)]
struct DeleteArgs {
    #[arg(long)]
    platform: Platform,
    #[arg(long)]
    id: i64,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load().context("reading configuration")?;
    logging::initialize(config.log_destination, config.log_level);
    let app = App::from_config(&config)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.command.unwrap_or(Command::Interactive) {
        Command::Search(args) => {
            let request = SearchRequest {
                platforms: args.platforms,
                keyword: args.keyword,
                count: args.count,
                salary: args.salary.range(),
            };
            app.run_search(&request, args.save, &mut out)
        }
        Command::Stored(args) => app.run_stored(&args.platforms, args.salary.range(), &mut out),
        Command::Delete(args) => app.run_delete(args.platform, args.id, &mut out),
        Command::Interactive => app.run_interactive(io::stdin().lock(), out),
    }
}
