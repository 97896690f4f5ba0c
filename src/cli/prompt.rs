//! Interactive confirmation and input path checks.
//!
//! Kept apart from clap parsing: clap handles flags, this module handles the
//! "are you sure?" step before any remote call.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use crate::error::AppError;

/// Ask a yes/no question on stdin/stdout.
pub fn confirm(question: &str) -> Result<bool, AppError> {
    let stdin = io::stdin();
    confirm_with(question, &mut stdin.lock(), &mut io::stdout())
}

/// Ask a yes/no question on the given streams.
///
/// Behavior:
/// - `y` / `yes` (any case) confirms
/// - `n` / `no` or an empty line declines
/// - anything else re-asks
/// - end of input declines
pub fn confirm_with<R: BufRead, W: Write>(question: &str, input: &mut R, output: &mut W) -> Result<bool, AppError> {
    loop {
        write!(output, "{question} (y/n): ")
            .and_then(|()| output.flush())
            .map_err(|e| AppError::new(2, format!("Failed to write prompt: {e}")))?;

        let mut line = String::new();
        let bytes = input
            .read_line(&mut line)
            .map_err(|e| AppError::new(2, format!("Failed to read input: {e}")))?;
        if bytes == 0 {
            return Ok(false);
        }

        match line.trim().to_ascii_lowercase().as_str() {
            "y" | "yes" => return Ok(true),
            "" | "n" | "no" => return Ok(false),
            other => {
                writeln!(output, "Please answer 'y' or 'n' (got '{other}').")
                    .map_err(|e| AppError::new(2, format!("Failed to write prompt: {e}")))?;
            }
        }
    }
}

/// Validate the provided path points to a `.csv` file.
pub fn validate_csv_path(path: &Path) -> Result<PathBuf, AppError> {
    if !path.exists() {
        return Err(AppError::new(2, format!("CSV file not found: {}", path.display())));
    }
    if path.is_dir() {
        return Err(AppError::new(
            2,
            format!("Expected a file, got a directory: {}", path.display()),
        ));
    }
    if path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        != Some(true)
    {
        return Err(AppError::new(
            2,
            format!("Expected a .csv file (got: {}). Use -f to pass a CSV path.", path.display()),
        ));
    }

    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ask(answers: &str) -> (bool, String) {
        let mut input = answers.as_bytes();
        let mut output = Vec::new();
        let ok = confirm_with("Proceed?", &mut input, &mut output).unwrap();
        (ok, String::from_utf8(output).unwrap())
    }

    #[test]
    fn accepts_yes() {
        assert!(ask("y\n").0);
        assert!(ask("YES\n").0);
    }

    #[test]
    fn declines_on_no_empty_or_eof() {
        assert!(!ask("n\n").0);
        assert!(!ask("\n").0);
        assert!(!ask("").0);
    }

    #[test]
    fn reasks_on_garbage() {
        let (ok, out) = ask("maybe\ny\n");
        assert!(ok);
        assert_eq!(out.matches("Proceed? (y/n): ").count(), 2);
        assert!(out.contains("got 'maybe'"));
    }

    #[test]
    fn csv_path_checks() {
        let dir = tempfile::tempdir().unwrap();
        assert!(validate_csv_path(dir.path()).is_err());
        assert!(validate_csv_path(&dir.path().join("missing.csv")).is_err());

        let txt = dir.path().join("rates.txt");
        std::fs::write(&txt, "x").unwrap();
        assert!(validate_csv_path(&txt).is_err());

        let csv = dir.path().join("rates.CSV");
        std::fs::write(&csv, "ZIPCODE,LINEHAUL\n").unwrap();
        assert_eq!(validate_csv_path(&csv).unwrap(), csv);
    }
}
