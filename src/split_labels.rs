use clap::Parser;
use log::{error, info};

use poseprep::{split_label_dir, LabelSplitArgs};

fn main() {
    // Initialize the logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = LabelSplitArgs::parse();

    if !args.folder.is_dir() {
        error!(
            "The specified folder does not exist: {}",
            args.folder.display()
        );
        std::process::exit(1);
    }

    let out_root = args.output_root();
    info!(
        "Splitting YOLO export {} into {}",
        args.folder.display(),
        out_root.display()
    );

    if let Err(e) = split_label_dir(&args.folder, &out_root, &args.to_label_split_options()) {
        error!("Failed to split labels: {}", e);
        std::process::exit(1);
    }
}
