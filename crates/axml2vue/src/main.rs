//! axml2vue - converts Alipay mini-program projects into Vue components.

use clap::Parser;
use miette::Result;
use std::process::ExitCode;

mod cli;
mod config;
mod orchestrator;
mod output;

use cli::Args;
use orchestrator::Orchestrator;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))
    .ok();

    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("{:?}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<ExitCode> {
    let mut orchestrator = Orchestrator::new(args)?;
    orchestrator.run().await?;

    // Per-file failures are reported but do not fail the run.
    Ok(ExitCode::SUCCESS)
}
