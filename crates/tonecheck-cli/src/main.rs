use clap::Parser;
use std::process::ExitCode;
use tonecheck_cli::{exit_status, App, AppConfig, Cli};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:?}");
            ExitCode::from(exit_status(&e))
        }
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = AppConfig::load(&cli.config, &cli)?;
    tracing::debug!(?config, "configuration loaded");

    let app = App::new(config);
    let out = app.run(cli.command).await?;
    print!("{out}");
    if !out.ends_with('\n') {
        println!();
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        "tonecheck=debug,tonecheck_cli=debug,tonecheck_classifiers=debug,tonecheck_telemetry=debug"
    } else {
        "tonecheck=info,tonecheck_cli=info,tonecheck_classifiers=info,tonecheck_telemetry=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
