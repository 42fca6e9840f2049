use clap::Parser;
use log::{error, info};

use poseprep::{sanitize_label_dir, SanitizeArgs};

fn main() {
    // Initialize the logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = SanitizeArgs::parse();

    if !args.labels_dir.is_dir() {
        error!(
            "The specified labels_dir does not exist: {}",
            args.labels_dir.display()
        );
        std::process::exit(1);
    }
    if args.dry_run {
        info!("Dry run: no label file will be modified");
    }

    match sanitize_label_dir(&args.labels_dir, &args.to_sanitize_options()) {
        Ok(stats) => stats.print_summary(),
        Err(e) => {
            error!("Failed to sanitize labels: {}", e);
            std::process::exit(1);
        }
    }
}
