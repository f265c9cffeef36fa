//! Shared fixture helpers for the integration suite.
//!
//! Fixtures live in a per-suite temp directory and are written once by the
//! helpers here: plain byte files, gzip-compressed files, and small grayscale
//! images encoded through the `image` crate.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use flate2::write::GzEncoder;
use flate2::Compression;
use tempfile::TempDir;

/// A temp directory of comparison fixtures.
pub struct Fixtures {
    dir: TempDir,
}

impl Fixtures {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create fixture dir"),
        }
    }

    /// Writes raw bytes under the given file name and returns the path.
    pub fn write(&self, name: &str, bytes: &[u8]) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, bytes).expect("write fixture");
        path
    }

    /// Writes the gzip compression of `bytes`.
    pub fn write_gzip(&self, name: &str, bytes: &[u8]) -> PathBuf {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(bytes).expect("gzip fixture");
        let compressed = encoder.finish().expect("finish gzip fixture");
        self.write(name, &compressed)
    }

    /// Encodes a square grayscale u8 image; the container format is inferred
    /// from the file extension (`.png`, `.tiff`).
    pub fn write_gray_image(&self, name: &str, side: u32, samples: &[u8]) -> PathBuf {
        assert_eq!(samples.len() as u32, side * side, "square image expected");
        let img = image::GrayImage::from_raw(side, side, samples.to_vec())
            .expect("build grayscale image");
        let path = self.dir.path().join(name);
        img.save(&path).expect("encode image fixture");
        path
    }

    /// Encodes a square interleaved-RGB u8 image.
    pub fn write_rgb_image(&self, name: &str, side: u32, samples: &[u8]) -> PathBuf {
        assert_eq!(samples.len() as u32, side * side * 3, "rgb samples expected");
        let img =
            image::RgbImage::from_raw(side, side, samples.to_vec()).expect("build rgb image");
        let path = self.dir.path().join(name);
        img.save(&path).expect("encode image fixture");
        path
    }

    /// Encodes a square interleaved-RGB f32 image as TIFF, the one raster
    /// format here that carries float samples.
    pub fn write_rgb_f32_tiff(&self, name: &str, side: u32, samples: &[f32]) -> PathBuf {
        assert_eq!(samples.len() as u32, side * side * 3, "rgb samples expected");
        let img = image::Rgb32FImage::from_raw(side, side, samples.to_vec())
            .expect("build rgb f32 image");
        let path = self.dir.path().join(name);
        image::DynamicImage::ImageRgb32F(img)
            .save(&path)
            .expect("encode float tiff fixture");
        path
    }
}
