use anyhow::Result;
use clap::Parser;
use gh_changelog::{
    cli::{Cli, Command},
    git,
    github::{GitHub, setup_github_client},
    query::build_changelog,
};

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Command::Changelog(args) => {
            let request = args.into_request()?;
            let github = GitHub::new(setup_github_client().await?);
            let changelog = build_changelog(&request, &github).await?;
            print!("{changelog}");
        }
        Command::Workspace => {
            println!("{}", git::toplevel_dir()?);
        }
    }

    Ok(())
}
