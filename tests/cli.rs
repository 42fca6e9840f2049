use assert_cmd::Command;
use predicates::str::contains;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn cmd(bin: &str) -> Command {
    let mut cmd = Command::cargo_bin(bin).unwrap();
    cmd.env("RUST_LOG", "info");
    cmd
}

fn write_json(path: &Path, value: &Value) {
    fs::write(path, serde_json::to_string(value).unwrap()).unwrap();
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

fn single_image_export(file_name: &str) -> Value {
    json!({
        "licenses": [],
        "info": {},
        "categories": [{"id": 1, "name": "person", "keypoints": ["nose"], "skeleton": []}],
        "images": [{"id": 1, "file_name": file_name, "width": 640, "height": 480}],
        "annotations": [{"id": 1, "image_id": 1, "category_id": 1, "keypoints": [1, 2, 2], "num_keypoints": 1}]
    })
}

#[test]
fn merge_then_split() {
    let tmp = TempDir::new().unwrap();
    let a = tmp.path().join("a.json");
    let b = tmp.path().join("b.json");
    write_json(&a, &single_image_export("100_1_0.jpg"));
    write_json(&b, &single_image_export("200_1_0.jpg"));
    let merged = tmp.path().join("merged.json");

    cmd("coco_merge")
        .arg("--ann_files")
        .arg(&a)
        .arg(&b)
        .arg("--out")
        .arg(&merged)
        .assert()
        .success()
        .stderr(contains("Total annotations: 2"));

    let merged_json = read_json(&merged);
    assert_eq!(merged_json["images"][1]["id"], json!(2));
    assert_eq!(merged_json["annotations"][1]["image_id"], json!(2));

    let out_dir = tmp.path().join("split");
    cmd("coco_split")
        .arg("--merged_coco")
        .arg(&merged)
        .arg("--out_dir")
        .arg(&out_dir)
        .assert()
        .success();

    let mut images = 0;
    for name in ["train_coco.json", "val_coco.json", "test_coco.json"] {
        let subset = read_json(&out_dir.join(name));
        images += subset["images"].as_array().unwrap().len();
    }
    assert_eq!(images, 2);
}

#[test]
fn merge_reports_missing_input() {
    let tmp = TempDir::new().unwrap();
    cmd("coco_merge")
        .arg("--ann_files")
        .arg(tmp.path().join("nope.json"))
        .arg("--out")
        .arg(tmp.path().join("merged.json"))
        .assert()
        .failure()
        .stderr(contains("Failed to merge annotations"));
}

#[test]
fn split_rejects_ratios_not_summing_to_one() {
    let tmp = TempDir::new().unwrap();
    let out_dir = tmp.path().join("split");
    cmd("coco_split")
        .arg("--merged_coco")
        .arg(tmp.path().join("missing.json"))
        .arg("--out_dir")
        .arg(&out_dir)
        .args(["--train_ratio", "0.8", "--val_ratio", "0.15", "--test_ratio", "0.15"])
        .assert()
        .failure()
        .stderr(contains("must equal 1.0"));
    assert!(!out_dir.exists());
}

#[test]
fn collect_copies_referenced_images() {
    let tmp = TempDir::new().unwrap();
    let ann = tmp.path().join("merged.json");
    write_json(&ann, &single_image_export("100_1_0.jpg"));
    let source = tmp.path().join("frames/nested");
    fs::create_dir_all(&source).unwrap();
    fs::write(source.join("100_1_0.jpg"), "img").unwrap();
    fs::write(source.join("other.jpg"), "img").unwrap();
    let target = tmp.path().join("merged_images");

    cmd("collect_images")
        .arg("--ann_file")
        .arg(&ann)
        .arg("--source_dirs")
        .arg(tmp.path().join("frames"))
        .arg("--target_dir")
        .arg(&target)
        .assert()
        .success()
        .stderr(contains("Copied"));

    assert!(target.join("100_1_0.jpg").exists());
    assert!(!target.join("other.jpg").exists());
}

#[test]
fn collect_strict_fails_when_image_missing() {
    let tmp = TempDir::new().unwrap();
    let ann = tmp.path().join("merged.json");
    write_json(&ann, &single_image_export("100_1_0.jpg"));
    fs::create_dir_all(tmp.path().join("frames")).unwrap();

    cmd("collect_images")
        .arg("--ann_file")
        .arg(&ann)
        .arg("--source_dirs")
        .arg(tmp.path().join("frames"))
        .arg("--target_dir")
        .arg(tmp.path().join("target"))
        .arg("--strict")
        .assert()
        .failure()
        .stderr(contains("not found"));
}

#[test]
fn sanitize_labels_directory() {
    let tmp = TempDir::new().unwrap();
    let labels = tmp.path().join("labels");
    fs::create_dir_all(&labels).unwrap();
    fs::write(labels.join("bad.txt"), "0 0.5 0.5 0.2 0.2 1.5 0.3 2\n").unwrap();
    fs::write(labels.join("fix.txt"), "0 0.5 0.5 0.2 0.2 1.5 0.3 2 0.1 0.1 2\n").unwrap();

    cmd("sanitize_labels")
        .arg("--labels_dir")
        .arg(&labels)
        .assert()
        .success()
        .stderr(contains("Label files deleted: 1"));

    assert!(!labels.join("bad.txt").exists());
    assert_eq!(
        fs::read_to_string(labels.join("fix.txt")).unwrap(),
        "0 0.5 0.5 0.2 0.2 0.0 0.0 0 0.1 0.1 2\n"
    );
}

#[test]
fn sanitize_missing_directory_fails() {
    let tmp = TempDir::new().unwrap();
    cmd("sanitize_labels")
        .arg("-d")
        .arg(tmp.path().join("absent"))
        .assert()
        .failure();
}

#[test]
fn split_labels_export() {
    let tmp = TempDir::new().unwrap();
    let folder = tmp.path().join("export");
    fs::create_dir_all(&folder).unwrap();
    for video in 0..5 {
        let stem = format!("{}_1_0", 300 + video);
        fs::write(folder.join(format!("{}.txt", stem)), "0 0.5 0.5 0.1 0.1").unwrap();
        fs::write(folder.join(format!("{}.png", stem)), "img").unwrap();
    }

    cmd("split_labels")
        .arg("--folder")
        .arg(&folder)
        .arg("--write_lists")
        .assert()
        .success()
        .stderr(contains("Train set"));

    let mut labels = 0;
    for split in ["train", "val", "test"] {
        labels += fs::read_dir(folder.join("labels").join(split)).unwrap().count();
        assert!(folder.join(format!("{}.txt", split)).exists());
    }
    assert_eq!(labels, 5);
}

#[test]
fn split_labels_lists_only() {
    let tmp = TempDir::new().unwrap();
    let folder = tmp.path().join("obj_train_data");
    fs::create_dir_all(&folder).unwrap();
    for video in 0..5 {
        let stem = format!("{}_1_0", 400 + video);
        fs::write(folder.join(format!("{}.txt", stem)), "0 0.5 0.5 0.1 0.1").unwrap();
    }

    cmd("split_labels")
        .arg("--folder")
        .arg(&folder)
        .arg("--lists_only")
        .assert()
        .success()
        .stderr(contains("Train set"));

    let mut listed = 0;
    for split in ["train", "val", "test"] {
        listed += fs::read_to_string(folder.join(format!("{}.txt", split)))
            .unwrap()
            .lines()
            .count();
    }
    assert_eq!(listed, 5);
    assert!(!folder.join("labels").exists());
}
