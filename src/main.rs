// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (stderr, so rendered output on stdout stays clean)
// 3. Build the GitHub client once and hand it to every tag
// 4. Exit with proper code (0 = success, 2 = error)
//
// A failing tag aborts the render: we never write a page with a hole in it.
// =============================================================================

mod cli;     // src/cli.rs - command-line parsing
mod error;   // src/error.rs - error type for the client and tags
mod github;  // src/github/ - GitHub API and raw file access
mod render;  // src/render.rs - finding and replacing tag markup
mod tags;    // src/tags/ - the template tags themselves

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use github::GitHubClient;
use render::Invocation;
use tags::{RenderContext, TagRegistry};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let exit_code = match run(cli).await {
        Ok(()) => 0,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// RUST_LOG wins when set; otherwise warn, or debug with --verbose
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    // The registry is built once here and only read afterwards
    let registry = TagRegistry::global();

    // Match on which subcommand was used
    match cli.command {
        Commands::Tags => {
            // BTreeMap keys come out sorted
            for name in registry.names() {
                println!("{}", name);
            }
            Ok(())
        }
        Commands::Render { input, output } => {
            // One client for the whole file; every tag borrows it
            let client = GitHubClient::new(cli.hosts.client_config())?;
            let ctx = RenderContext { client: &client };

            // Any failing tag aborts here, so we never write a partial page
            let rendered = render::render_file(&input, registry, &ctx).await?;

            // Write to the output file if given, otherwise to stdout
            match output {
                Some(path) => tokio::fs::write(&path, rendered)
                    .await
                    .with_context(|| format!("could not write {}", path.display()))?,
                None => print!("{}", rendered),
            }
            Ok(())
        }
        Commands::Tag { name, arguments } => {
            // Parse before building anything that touches the network
            let invocation = Invocation::parse(&name, &arguments, registry)?;

            let client = GitHubClient::new(cli.hosts.client_config())?;
            let ctx = RenderContext { client: &client };
            let rendered = invocation.render(&ctx).await?;

            println!("{}", rendered);
            Ok(())
        }
    }
}
