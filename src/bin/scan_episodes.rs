use clap::Parser;
use static_podcast_publisher::config::{
    ScanConfig, DEFAULT_AUDIO_DIR, DEFAULT_LOG_SPEC, DEFAULT_METADATA_PATH,
};
use static_podcast_publisher::{scanner, util};
use std::path::PathBuf;
use std::process;

/// Scan audio files and add stub episodes to the metadata document
#[derive(Parser)]
#[command(name = "scan_episodes", version)]
struct Cli {
    /// Directory holding the audio files
    #[arg(short, long, default_value = DEFAULT_AUDIO_DIR)]
    audio_dir: PathBuf,
    /// Metadata document to create or update
    #[arg(short, long, default_value = DEFAULT_METADATA_PATH)]
    metadata: PathBuf,
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

    let config = ScanConfig {
        audio_dir: cli.audio_dir,
        metadata: cli.metadata,
    };
    let report = match scanner::scan(&config) {
        Ok(report) => report,
        Err(e) => {
            log::error!("{}", e);
            process::exit(1);
        }
    };

    if !report.added.is_empty() {
        let verb = if report.created { "Generated" } else { "Updated" };
        log::info!(
            "{}: {} ({} new episodes)",
            verb,
            config.metadata.display(),
            report.added.len()
        );
        log::info!("Fill in the TODO fields, then run generate_feed");
    }
}
