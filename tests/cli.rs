extern crate assert_cmd;
extern crate image;
extern crate predicates;
extern crate tempfile;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;

fn mandelbrot() -> Command {
    Command::cargo_bin("mandelbrot").unwrap()
}

#[test]
fn renders_a_ppm_with_negative_bounds() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("set.ppm");
    mandelbrot()
        .args(&["3", "-2", "1", "-1.5", "1.5", "40", "30"])
        .arg(&output)
        .assert()
        .success();
    let decoded = image::open(&output).unwrap().to_rgb();
    assert_eq!((decoded.width(), decoded.height()), (40, 30));
}

#[test]
fn renders_a_png_by_columns_with_a_color_file() {
    let dir = tempfile::tempdir().unwrap();
    let colors = dir.path().join("colors.txt");
    fs::write(&colors, "1 1 1 1\r\n\n  5\t0 0 1\r\n50 0 0 0\r\n").unwrap();
    let output = dir.path().join("set.png");
    mandelbrot()
        .args(&["0", "-2", "1", "-1", "1", "16", "16"])
        .arg(&output)
        .arg(&colors)
        .args(&["--strategy", "chunks", "--axis", "columns"])
        .assert()
        .success();
    let decoded = image::open(&output).unwrap().to_rgb().into_raw();
    // The top-left corner escapes immediately and gets the first band.
    assert_eq!(&decoded[..3], &[255, 255, 255]);
}

#[test]
fn too_few_arguments_prints_usage() {
    mandelbrot()
        .args(&["4", "-2", "1", "-1.5", "1.5", "100", "100"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("USAGE"));
}

#[test]
fn bad_color_file_aborts_before_rendering() {
    let dir = tempfile::tempdir().unwrap();
    let colors = dir.path().join("colors.txt");
    fs::write(&colors, "1 0 0 0\n20 0.5 0.5\n").unwrap();
    let output = dir.path().join("set.ppm");
    mandelbrot()
        .args(&["2", "-2", "1", "-1.5", "1.5", "10", "10"])
        .arg(&output)
        .arg(&colors)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("line 2"));
    assert!(!output.exists());
}

#[test]
fn unknown_output_format_fails_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("set.xyz");
    mandelbrot()
        .args(&["2", "-2", "1", "-1.5", "1.5", "10", "10"])
        .arg(&output)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("output_path"));
    assert!(!output.exists());
}

#[test]
fn far_more_threads_than_rows() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("set.ppm");
    mandelbrot()
        .args(&["200000", "-2", "1", "-1.5", "1.5", "10", "10"])
        .arg(&output)
        .args(&["--strategy", "chunks"])
        .assert()
        .success();
    assert!(output.exists());
}

#[test]
fn missing_color_file_names_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("set.ppm");
    mandelbrot()
        .args(&["2", "-2", "1", "-1.5", "1.5", "10", "10"])
        .arg(&output)
        .arg(dir.path().join("nowhere.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("nowhere.txt"));
    assert!(!output.exists());
}
