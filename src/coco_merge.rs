use clap::Parser;
use log::{error, info};

use poseprep::{merge_annotation_files, MergeArgs};

fn main() {
    // Initialize the logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = MergeArgs::parse();

    info!("Merging {} annotation files...", args.ann_files.len());

    match merge_annotation_files(&args.ann_files, &args.out, args.to_merge_options()) {
        Ok(stats) => stats.print_summary(),
        Err(e) => {
            error!("Failed to merge annotations: {}", e);
            std::process::exit(1);
        }
    }
}
