mod common;

use common::{blob_scene, jpeg_bytes, png_bytes, write_file};
use fastimagehash_core::batch::hash_files;
use fastimagehash_core::discovery::discover_images;
use fastimagehash_core::{
    multi_hash, multi_hash_file, AverageHash, Code, DctHash, Error, HashAlgorithm, ImageHasher,
    MultiHashConfig,
};
use tempfile::tempdir;

#[test]
fn test_missing_file_is_read_error() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("absent.png");

    let result = DctHash::default().hash_file(&missing);
    assert_eq!(Code::of(&result), Code::ReadError);
    assert!(result.unwrap_err().is_retryable());

    let result = multi_hash_file(&missing, &MultiHashConfig::default());
    assert!(matches!(result, Err(Error::Read { .. })));
}

#[test]
fn test_non_image_bytes_are_decode_error() {
    let dir = tempdir().unwrap();
    let path = write_file(dir.path(), "notes.png", b"this is not a picture");

    let result = AverageHash::default().hash_file(&path);
    assert_eq!(Code::of(&result), Code::DecodeError);
    assert!(!result.unwrap_err().is_retryable());

    let empty = write_file(dir.path(), "empty.jpg", b"");
    assert_eq!(
        Code::of(&multi_hash_file(&empty, &MultiHashConfig::default())),
        Code::DecodeError
    );
}

#[test]
fn test_invalid_config_reported_before_reading() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("absent.png");

    let result = DctHash::new(8, 0).hash_file(&missing);
    assert_eq!(Code::of(&result), Code::InvalidConfig);
}

#[test]
fn test_file_and_memory_hashes_agree() {
    let dir = tempdir().unwrap();
    let bytes = jpeg_bytes(&blob_scene(20, 180, 120), 90);
    let path = write_file(dir.path(), "scene.jpg", &bytes);

    let config = MultiHashConfig::default();
    assert_eq!(
        multi_hash_file(&path, &config).unwrap(),
        multi_hash(&bytes, &config).unwrap()
    );
}

#[test]
fn test_discover_and_hash_directory() {
    let dir = tempdir().unwrap();
    let nested = dir.path().join("nested");
    std::fs::create_dir(&nested).unwrap();

    write_file(dir.path(), "a.png", &png_bytes(&blob_scene(30, 64, 64)));
    write_file(&nested, "b.jpg", &jpeg_bytes(&blob_scene(31, 64, 64), 80));
    write_file(&nested, "broken.png", b"garbage");
    write_file(dir.path(), "readme.txt", b"not an image");

    let images = discover_images(&[dir.path()], None).unwrap();
    assert_eq!(images.len(), 3);

    let config = MultiHashConfig::default().with_algorithms([HashAlgorithm::Perceptual]);
    let results = hash_files(&images, &config).unwrap();
    assert_eq!(results.len(), 3);

    let ok: Vec<_> = results.iter().filter(|r| r.is_ok()).collect();
    assert_eq!(ok.len(), 2);
    for r in ok {
        let bundle = r.result.as_ref().unwrap();
        assert_eq!(bundle.algorithms(), vec![HashAlgorithm::Perceptual]);
    }

    let broken = results
        .iter()
        .find(|r| r.path.ends_with("broken.png"))
        .unwrap();
    assert_eq!(Code::of(&broken.result), Code::DecodeError);
}
