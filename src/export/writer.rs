use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbaImage};
use tempfile::NamedTempFile;

use super::{ExportError, Result};

/// What landed on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub bytes: u64,
}

/// Encode `image` as PNG at `path`.
///
/// The PNG goes to a uniquely named temporary file next to `path` and is
/// persisted over it once complete. A failed or empty write drops the
/// temporary file, so nothing is left at `path`.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<ExportSummary> {
    let io_err = |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };

    let dir = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let mut temp_file = NamedTempFile::new_in(dir).map_err(io_err)?;

    let bytes = write_png(image, &mut temp_file)?;
    if bytes == 0 {
        return Err(ExportError::EmptyOutput {
            path: path.to_path_buf(),
        });
    }

    temp_file.persist(path).map_err(|e| io_err(e.error))?;
    log::info!(
        "Saved {}x{} PNG to {} ({} bytes)",
        image.width(),
        image.height(),
        path.display(),
        bytes
    );
    Ok(ExportSummary {
        path: path.to_path_buf(),
        width: image.width(),
        height: image.height(),
        bytes,
    })
}

fn write_png(image: &RgbaImage, temp_file: &mut NamedTempFile) -> Result<u64> {
    let temp_path = temp_file.path().to_path_buf();
    let io_err = |source| ExportError::Io {
        path: temp_path.clone(),
        source,
    };

    let mut writer = BufWriter::new(temp_file.as_file_mut());
    image.write_to(&mut writer, ImageFormat::Png)?;
    writer.flush().map_err(io_err)?;
    drop(writer);

    let file = temp_file.as_file_mut();
    file.sync_all().map_err(io_err)?;
    Ok(file.metadata().map_err(io_err)?.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_save_roundtrip_dimensions() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("chat.png");
        let img = RgbaImage::from_pixel(12, 7, image::Rgba([0x17, 0x21, 0x2B, 0xFF]));

        let summary = save_png(&img, &path).unwrap();
        assert_eq!((summary.width, summary.height), (12, 7));
        assert!(summary.bytes > 0);
        assert_eq!(entries(dir.path()), vec!["chat.png"]);

        let decoded = image::open(&path).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (12, 7));
    }

    #[test]
    fn test_bad_directory_leaves_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("chat.png");
        let img = RgbaImage::new(4, 4);

        let err = save_png(&img, &path).unwrap_err();
        assert!(matches!(err, ExportError::Io { .. }));
        assert!(!path.exists());
        assert!(entries(dir.path()).is_empty());
    }

    #[test]
    fn test_zero_sized_image_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.png");
        let img = RgbaImage::new(0, 0);

        assert!(save_png(&img, &path).is_err());
        assert!(!path.exists());
        assert!(entries(dir.path()).is_empty());
    }

    #[test]
    fn test_existing_part_file_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.png");
        let part = dir.path().join("out.png.part");
        fs::write(&part, "keep").unwrap();

        save_png(&RgbaImage::new(3, 3), &path).unwrap();
        assert_eq!(fs::read_to_string(&part).unwrap(), "keep");
        assert_eq!(image::open(&path).unwrap().width(), 3);
        assert_eq!(entries(dir.path()), vec!["out.png", "out.png.part"]);
    }

    #[test]
    fn test_overwrites_existing_target() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.png");
        fs::write(&path, "old").unwrap();

        save_png(&RgbaImage::new(5, 2), &path).unwrap();
        assert_eq!(image::open(&path).unwrap().height(), 2);
    }
}
