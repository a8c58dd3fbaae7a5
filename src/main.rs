//! LLM-Emulator CLI

use clap::Parser;

use llm_emulator::cli::{execute, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    execute(cli).await
}
