use clap::Parser;

mod cli;
mod platform;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    platform::run_app(cli::Cli::parse()).await
}
