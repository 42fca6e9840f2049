use clap::Parser;
use log::{error, info};

use poseprep::{split_annotation_file, SplitArgs};

fn main() {
    // Initialize the logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = SplitArgs::parse();

    info!("Splitting {} by video...", args.merged_coco.display());

    if let Err(e) = split_annotation_file(&args.merged_coco, &args.out_dir, &args.to_split_options())
    {
        error!("Failed to split dataset: {}", e);
        std::process::exit(1);
    }
}
