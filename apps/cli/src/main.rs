//! docpress CLI — turns exported .docx site content into a static-site
//! content bundle (`_posts/`, `_data/`, `img/`).

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
