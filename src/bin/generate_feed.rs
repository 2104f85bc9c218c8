use clap::Parser;
use static_podcast_publisher::config::{
    FeedConfig, DEFAULT_FEED_PATH, DEFAULT_LOG_SPEC, DEFAULT_METADATA_PATH,
};
use static_podcast_publisher::{publish, util};
use std::path::PathBuf;
use std::process;

/// Generate an RSS 2.0 podcast feed from YAML metadata
#[derive(Parser)]
#[command(name = "generate_feed", version)]
struct Cli {
    /// Metadata document to read
    #[arg(short, long, default_value = DEFAULT_METADATA_PATH)]
    input: PathBuf,
    /// Feed file to write
    #[arg(short, long, default_value = DEFAULT_FEED_PATH)]
    output: PathBuf,
    /// Log specification, overridden by RUST_LOG
    #[arg(long, default_value = DEFAULT_LOG_SPEC)]
    log_level: String,
}

fn main() {
    let cli = Cli::parse();
    let _lg = match util::init_log(&cli.log_level) {
        Ok(handle) => handle,
        Err(e) => {
            eprintln!("Error: cannot start logger: {}", e);
            process::exit(2);
        }
    };

    let config = FeedConfig {
        metadata: cli.input,
        output: cli.output,
    };
    match publish(&config) {
        Ok(count) => log::info!(
            "Feed generated: {} ({} episodes)",
            config.output.display(),
            count
        ),
        Err(e) => {
            log::error!("{}", e);
            process::exit(1);
        }
    }
}
