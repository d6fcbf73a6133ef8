mod app;
mod cli;
mod config;
mod logging;
mod output;
mod prompt;

fn main() -> anyhow::Result<()> {
    cli::run()
}
