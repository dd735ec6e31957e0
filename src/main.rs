use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use feed_digest::app::AppContext;
use feed_digest::cli::{commands, Cli, Commands};
use feed_digest::config::Config;

fn context(cli: &Cli) -> anyhow::Result<AppContext> {
    let mut config = Config::load(cli.config.as_deref())?;
    config.apply(cli.overrides());
    config.validate()?;
    Ok(AppContext::new(config)?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut cli = Cli::parse();

    match cli.command.take().unwrap_or(Commands::Run) {
        Commands::Run => {
            let ctx = context(&cli)?;
            commands::run(&ctx).await?;
        }
        Commands::Update => {
            let ctx = context(&cli)?;
            let summary = commands::update_archive(&ctx).await?;
            println!(
                "Added {} new items ({} total)",
                summary.added, summary.total
            );
        }
        Commands::Render => {
            let ctx = context(&cli)?;
            let paths = commands::render_digest(&ctx)?;
            for path in paths {
                println!("{}", path.display());
            }
        }
        Commands::Config => {
            print!("{}", Config::default_config_content());
        }
    }

    Ok(())
}
