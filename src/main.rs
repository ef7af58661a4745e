use anyhow::Result;
use episode_mover::cli;

mod app;
mod logging;

fn main() -> Result<()> {
    let args = cli::parse();
    app::run(args)
}
