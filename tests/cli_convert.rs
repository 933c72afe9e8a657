//! CLI integration tests

use assert_cmd::Command;
use image::{Rgba, RgbaImage};
use predicates::prelude::*;

fn write_test_card(path: &std::path::Path) {
    let mut image = RgbaImage::from_pixel(100, 100, Rgba([190, 190, 190, 255]));
    for y in 0..5 {
        for x in 0..5 {
            image.put_pixel(x, y, Rgba([0, 0, 0, 0]));
        }
    }
    image.save(path).unwrap();
}

#[test]
fn convert_writes_output_files() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("cards");
    let output = dir.path().join("done");
    std::fs::create_dir_all(&input).unwrap();
    write_test_card(&input.join("alpha_corners.png"));

    Command::cargo_bin("cardbleed")
        .unwrap()
        .args([
            "convert",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "--card-width",
            "100",
            "--card-height",
            "100",
            "--quiet",
        ])
        .assert()
        .success();

    let written = image::open(output.join("alpha_corners.png")).unwrap();
    // 100 - 2*2 crop + 2*38 bleed
    assert_eq!(written.width(), 172);
    assert_eq!(written.height(), 172);
}

#[test]
fn convert_finds_images_recursively() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("cards/set_a/rares");
    let output = dir.path().join("done");
    std::fs::create_dir_all(&nested).unwrap();
    write_test_card(&nested.join("dragon.png"));

    Command::cargo_bin("cardbleed")
        .unwrap()
        .args([
            "convert",
            dir.path().join("cards").to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "--card-width",
            "100",
            "--card-height",
            "100",
            "--quiet",
        ])
        .assert()
        .success();

    // Output is flat, keyed by base name
    assert!(output.join("dragon.png").exists());
}

#[test]
fn convert_reports_missing_input() {
    Command::cargo_bin("cardbleed")
        .unwrap()
        .args(["convert", "/no/such/directory"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn convert_fails_on_empty_directory() {
    let dir = tempfile::tempdir().unwrap();

    Command::cargo_bin("cardbleed")
        .unwrap()
        .args(["convert", dir.path().to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no card images"));
}

#[test]
fn dry_run_prints_plan_and_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("cards");
    let output = dir.path().join("done");
    std::fs::create_dir_all(&input).unwrap();
    write_test_card(&input.join("card.png"));

    Command::cargo_bin("cardbleed")
        .unwrap()
        .args([
            "convert",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "--dry-run",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Execution Plan"))
        .stdout(predicate::str::contains("card.png"));

    assert!(!output.exists());
}

#[test]
fn info_prints_version_and_defaults() {
    Command::cargo_bin("cardbleed")
        .unwrap()
        .arg("info")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")))
        .stdout(predicate::str::contains("745x1040"));
}
