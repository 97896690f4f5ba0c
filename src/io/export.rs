//! Split a rate sheet into one CSV per rate group.
//!
//! Handy for uploading zip lists by hand; not used by the create pipeline.

use std::fs::create_dir_all;
use std::path::{Path, PathBuf};

use crate::domain::{RateGroup, RateGroups};
use crate::error::AppError;

/// `linehaul_{rate}.csv`
pub fn split_file_name(group: &RateGroup) -> String {
    format!("linehaul_{}.csv", group.rate)
}

/// Write one single-column (`zipcode`) CSV per group; returns the written paths
/// in group order.
pub fn write_group_files(dir: &Path, groups: &RateGroups) -> Result<Vec<PathBuf>, AppError> {
    create_dir_all(dir)
        .map_err(|e| AppError::new(2, format!("Failed to create output dir '{}': {e}", dir.display())))?;

    let mut written = Vec::with_capacity(groups.len());
    for group in groups {
        let path = dir.join(split_file_name(group));
        write_group_file(&path, group)?;
        println!(
            "CSV file created for rate {} ({}/{}): {}",
            group.rate,
            group.index,
            groups.len(),
            path.display()
        );
        written.push(path);
    }

    Ok(written)
}

fn write_group_file(path: &Path, group: &RateGroup) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::new(2, format!("Failed to create '{}': {e}", path.display())))?;

    writer
        .write_record(["zipcode"])
        .map_err(|e| AppError::new(2, format!("Failed to write header to '{}': {e}", path.display())))?;
    for zip in &group.locations {
        writer
            .write_record([zip])
            .map_err(|e| AppError::new(2, format!("Failed to write row to '{}': {e}", path.display())))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush '{}': {e}", path.display())))?;

    Ok(())
}
