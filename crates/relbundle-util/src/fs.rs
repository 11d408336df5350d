use std::path::{Path, PathBuf};

/// Walk up from `start` looking for a file named `filename`.
/// Returns the path to the directory containing the file, or `None`.
pub fn find_ancestor_with(start: &Path, filename: &str) -> Option<PathBuf> {
    let mut current = start;
    loop {
        let candidate = current.join(filename);
        if candidate.is_file() {
            return Some(current.to_path_buf());
        }
        current = current.parent()?;
    }
}

/// Ensure a directory exists, creating it and any parents if needed.
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Remove `path` and everything below it, then create it again empty.
pub fn recreate_dir(path: &Path) -> std::io::Result<()> {
    if path.exists() {
        std::fs::remove_dir_all(path)?;
    }
    std::fs::create_dir_all(path)
}

/// List the regular files directly inside `dir`, sorted by file name.
pub fn list_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

/// File name of `path` as an owned string, lossily converted.
pub fn file_name_string(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
