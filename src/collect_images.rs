use clap::Parser;
use log::{error, info};

use poseprep::{collect_images, CollectArgs};

fn main() {
    // Initialize the logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = CollectArgs::parse();

    info!(
        "Collecting images referenced by {} into {}",
        args.ann_file.display(),
        args.target_dir.display()
    );

    match collect_images(
        &args.ann_file,
        &args.source_dirs,
        &args.target_dir,
        &args.to_collect_options(),
    ) {
        Ok(stats) => stats.print_summary(),
        Err(e) => {
            error!("Failed to collect images: {}", e);
            std::process::exit(1);
        }
    }
}
