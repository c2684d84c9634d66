use log::debug;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Image container formats recognised by extension
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
    WebP,
    Bmp,
    Tiff,
    Other(String),
}

impl ImageFormat {
    /// Determine format from file extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "jpg" | "jpeg" => Self::Jpeg,
            "png" => Self::Png,
            "gif" => Self::Gif,
            "webp" => Self::WebP,
            "bmp" => Self::Bmp,
            "tif" | "tiff" => Self::Tiff,
            other => Self::Other(other.to_string()),
        }
    }

    /// Check if format can be decoded
    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

/// Discover images under the provided paths
///
/// Files are taken as they are when their extension is a supported image format; directories
/// are walked down to `max_depth` (unlimited when `None`). The result is sorted and free of
/// duplicates.
pub fn discover_images<P: AsRef<Path>>(paths: &[P], max_depth: Option<usize>) -> Result<Vec<PathBuf>> {
    let mut images = Vec::new();

    for path in paths {
        let path = path.as_ref();
        // Missing inputs fail the whole call
        if !path.exists() {
            return Err(Error::Read {
                path: path.to_path_buf(),
                source: io::Error::new(io::ErrorKind::NotFound, "path does not exist"),
            });
        }

        // Explicit files are kept only if they look like images
        if path.is_file() {
            if is_image_path(path) {
                images.push(path.to_path_buf());
            }
            continue;
        }

        images.extend(discover_images_in_directory(path, max_depth));
    }

    // Overlapping inputs can list a file twice
    images.sort();
    images.dedup();
    debug!("Discovered {} images in {} paths", images.len(), paths.len());
    Ok(images)
}

/// Discover images in a single directory
fn discover_images_in_directory(directory: &Path, max_depth: Option<usize>) -> Vec<PathBuf> {
    // Determine max depth for directory traversal
    let max_depth = max_depth.unwrap_or(usize::MAX);

    WalkDir::new(directory)
        .max_depth(max_depth)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|path| is_image_path(path))
        .collect()
}

/// Get image format from file extension
fn get_image_format(path: &Path) -> Option<ImageFormat> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(ImageFormat::from_extension)
}

/// Returns if the given path has an image extension
pub fn is_image_path(path: &Path) -> bool {
    match get_image_format(path) {
        Some(format) => format.is_supported(),
        None => false,
    }
}

// -- Tests --

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::tempdir;

    fn create_test_image(dir: &Path, name: &str, ext: &str) -> PathBuf {
        let file_path = dir.join(format!("{}.{}", name, ext));
        let mut file = File::create(&file_path).unwrap();
        // Extension is all discovery looks at
        file.write_all(b"DUMMY IMAGE DATA").unwrap();
        file_path
    }

    fn setup_test_directory() -> (tempfile::TempDir, Vec<PathBuf>) {
        let dir = tempdir().unwrap();

        let subdir_path = dir.path().join("subdir");
        fs::create_dir(&subdir_path).unwrap();

        let files = vec![
            create_test_image(dir.path(), "image1", "jpg"),
            create_test_image(dir.path(), "image2", "png"),
            create_test_image(dir.path(), "image3", "tiff"),
            create_test_image(dir.path(), "image4", "WEBP"),
            create_test_image(&subdir_path, "subdir_image1", "jpg"),
            create_test_image(&subdir_path, "subdir_image2", "gif"),
        ];

        let non_image_path = dir.path().join("document.txt");
        let mut file = File::create(&non_image_path).unwrap();
        file.write_all(b"NOT AN IMAGE").unwrap();

        (dir, files)
    }

    #[test]
    fn test_is_image_path() {
        assert!(is_image_path(Path::new("test.jpg")));
        assert!(is_image_path(Path::new("test.JPEG")));
        assert!(is_image_path(Path::new("test.png")));
        assert!(is_image_path(Path::new("test.bmp")));
        assert!(is_image_path(Path::new("test.tif")));
        assert!(!is_image_path(Path::new("test.heic")));
        assert!(!is_image_path(Path::new("test.txt")));
        assert!(!is_image_path(Path::new("test")));
    }

    #[test]
    fn test_discover_images_recursively() {
        let (dir, files) = setup_test_directory();

        let discovered = discover_images(&[dir.path()], None).unwrap();

        assert_eq!(discovered.len(), 6);
        for file_path in &files {
            assert!(discovered.contains(file_path));
        }
        assert!(!discovered.contains(&dir.path().join("document.txt")));

        let mut sorted = discovered.clone();
        sorted.sort();
        assert_eq!(discovered, sorted);
    }

    #[test]
    fn test_discover_images_with_depth_limit() {
        let (dir, _) = setup_test_directory();

        // Depth 1 is the directory's own entries
        let discovered = discover_images(&[dir.path()], Some(1)).unwrap();

        assert_eq!(discovered.len(), 4);
        for path in &discovered {
            assert_eq!(path.parent().unwrap(), dir.path());
        }
    }

    #[test]
    fn test_files_and_directories_mix() {
        let (dir, files) = setup_test_directory();
        let subdir = dir.path().join("subdir");

        let discovered =
            discover_images(&[files[0].clone(), subdir.clone(), files[0].clone()], None).unwrap();
        assert_eq!(discovered.len(), 3);

        let text_only = discover_images(&[dir.path().join("document.txt")], None).unwrap();
        assert!(text_only.is_empty());
    }

    #[test]
    fn test_missing_path_is_read_error() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");

        match discover_images(&[&missing], None) {
            Err(Error::Read { path, source }) => {
                assert_eq!(path, missing);
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("expected a read error, got {:?}", other),
        }
    }
}
