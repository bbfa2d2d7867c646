use anyhow::Result;
use std::fs::read_dir;
use std::path::{Path, PathBuf};

/// Lists the image files directly inside a directory, sorted by file name.
pub fn list_image_files<P: AsRef<Path>>(path: P) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in read_dir(path)? {
        let entry = entry?;
        let path = entry.path();

        if path.is_file() && is_image(&path) {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Function to check if the path has a PNG or JPEG extension.
pub fn is_image(path: &Path) -> bool {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => matches!(ext.to_ascii_lowercase().as_str(), "png" | "jpg" | "jpeg"),
        None => false, // No extension present
    }
}
