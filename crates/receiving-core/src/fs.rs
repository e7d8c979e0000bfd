//! Filesystem helpers for replacing stored values in one step.

use std::fs;
use std::io;
use std::path::Path;

/// Move a fully written temp file over `destination`.
///
/// `fs::rename` refuses to replace an existing file on some platforms
/// (notably Windows); in that case the destination is removed and the
/// rename retried. The temp file never outlives a failed call.
///
/// # Errors
///
/// Returns an error if the rename fails even after the retry.
pub fn rename_with_fallback(temp_path: &Path, destination: &Path) -> io::Result<()> {
    let Err(first) = fs::rename(temp_path, destination) else {
        return Ok(());
    };
    if !temp_path.exists() {
        return Err(first);
    }

    let _ = fs::remove_file(destination);
    fs::rename(temp_path, destination).map_err(|retry| {
        let _ = fs::remove_file(temp_path);
        io::Error::new(
            retry.kind(),
            format!("replace failed (first: {}, retry: {})", first, retry),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_replaces_existing_value() {
        let dir = tempdir().unwrap();
        let temp = dir.path().join(".receivingScheduleWorkbook.1.tmp");
        let dest = dir.path().join("receivingScheduleWorkbook");

        fs::write(&dest, "old-workbook").unwrap();
        fs::write(&temp, "new-workbook").unwrap();

        rename_with_fallback(&temp, &dest).unwrap();

        assert!(!temp.exists());
        assert_eq!(fs::read_to_string(&dest).unwrap(), "new-workbook");
    }

    #[test]
    fn test_missing_temp_file_errors_and_keeps_destination() {
        let dir = tempdir().unwrap();
        let temp = dir.path().join(".missing.tmp");
        let dest = dir.path().join("qrLabelSuppliers");
        fs::write(&dest, "[\"Supplier A\"]").unwrap();

        assert!(rename_with_fallback(&temp, &dest).is_err());
        assert!(dest.exists());
    }
}
