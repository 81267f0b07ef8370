//! Integration tests for bundler module

#[path = "common/mod.rs"]
mod common;

use common::*;
use enelogic_cli::bundler;
use enelogic_cli::config::ResolvedConfig;
use std::fs;
use tempfile::TempDir;

fn config_for(temp_dir: &TempDir) -> ResolvedConfig {
    ResolvedConfig {
        output_dir: temp_dir.path().to_path_buf(),
        ..ResolvedConfig::default()
    }
}

#[test]
fn test_daily_files_bundle_into_year() {
    let temp_dir = TempDir::new().unwrap();
    create_daily_file(temp_dir.path(), "123.2023-01-01.csv", "a,b\n1,2\n");
    create_daily_file(temp_dir.path(), "123.2023-01-02.csv", "a,b\n3,4\n5,6\n");

    let summary = bundler::bundle_dir(&config_for(&temp_dir)).unwrap();

    assert_eq!(summary.daily_files, 2);
    assert_eq!(summary.bundles_written, 1);
    assert_eq!(
        fs::read_to_string(temp_dir.path().join("123.2023.csv")).unwrap(),
        "a,b\n1,2\n3,4\n5,6\n"
    );
}

#[test]
fn test_points_and_years_are_kept_apart() {
    let temp_dir = TempDir::new().unwrap();
    create_daily_file(temp_dir.path(), "1.2022-12-31.csv", "v\nold\n");
    create_daily_file(temp_dir.path(), "1.2023-01-01.csv", "v\nnew\n");
    create_daily_file(temp_dir.path(), "2.2023-01-01.csv", "v\nother\n");

    let summary = bundler::bundle_dir(&config_for(&temp_dir)).unwrap();

    assert_eq!(summary.bundles_written, 3);
    assert_eq!(
        fs::read_to_string(temp_dir.path().join("1.2022.csv")).unwrap(),
        "v\nold\n"
    );
    assert_eq!(
        fs::read_to_string(temp_dir.path().join("1.2023.csv")).unwrap(),
        "v\nnew\n"
    );
    assert_eq!(
        fs::read_to_string(temp_dir.path().join("2.2023.csv")).unwrap(),
        "v\nother\n"
    );
}

#[test]
fn test_existing_bundles_and_other_files_are_not_inputs() {
    let temp_dir = TempDir::new().unwrap();
    create_daily_file(temp_dir.path(), "123.2023-01-01.csv", "a\n1\n");
    create_daily_file(temp_dir.path(), "123.2023.csv", "a\nstale\n");
    create_daily_file(temp_dir.path(), "notes.txt", "hello");

    let summary = bundler::bundle_dir(&config_for(&temp_dir)).unwrap();

    assert_eq!(summary.daily_files, 1);
    assert_eq!(
        fs::read_to_string(temp_dir.path().join("123.2023.csv")).unwrap(),
        "a\n1\n"
    );
}

#[test]
fn test_deleted_bundles_regenerate_identically() {
    let temp_dir = TempDir::new().unwrap();
    create_daily_file(temp_dir.path(), "7.2024-02-29.csv", "t,v\n\"x, y\",1\n");
    create_daily_file(temp_dir.path(), "7.2024-03-01.csv", "t,v\nz,\n");
    let config = config_for(&temp_dir);

    bundler::bundle_dir(&config).unwrap();
    let bundle_path = temp_dir.path().join("7.2024.csv");
    let first = fs::read(&bundle_path).unwrap();

    fs::remove_file(&bundle_path).unwrap();
    bundler::bundle_dir(&config).unwrap();

    assert_eq!(fs::read(&bundle_path).unwrap(), first);
}

#[test]
fn test_empty_output_dir_bundles_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let summary = bundler::bundle_dir(&config_for(&temp_dir)).unwrap();
    assert_eq!(summary, Default::default());
}
