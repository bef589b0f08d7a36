use clap::Parser;
use std::process::ExitCode;
use summarize_page::results::render_report;
use summarize_page::{Config, Summaries};

mod args;
use args::Args;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    env_logger::init();

    // Credentials may live in a local .env file
    if let Err(e) = dotenv::dotenv() {
        ::log::debug!("No .env file loaded: {}", e);
    }

    let args = Args::parse();

    let base = match &args.config {
        Some(path) => match Config::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                ::log::error!("Failed to load config {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => Config::default(),
    };
    let mut config = args.apply(base);

    config.summarizer.apply_overrides(
        std::env::var("OPENAI_API_KEY").ok(),
        std::env::var("OPENAI_BASE_URL").ok(),
    );

    let summaries = Summaries::new(args.urls).with_config(config);

    let results = match summaries.generate().await {
        Ok(results) => results,
        Err(e) => {
            ::log::error!("Failed to start summarizing: {}", e);
            return ExitCode::FAILURE;
        }
    };

    print!("{}", render_report(&results));

    let failed = results.iter().filter(|r| !r.is_ok()).count();
    if failed > 0 {
        ::log::error!("{} of {} URLs failed", failed, results.len());
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
