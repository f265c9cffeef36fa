//! Pixel grids and image-distance metrics.
//!
//! Image payloads are decoded into a [`PixelGrid`]: a flat `f64` sample
//! vector at the *raw scale of the source sample type* (u8 stays 0–255, u16
//! stays 0–65535, f32 stays raw), plus the retained [`SampleKind`]. Keeping
//! the raw scale means a float image in `[0, 1]` and its u8 rendition scaled
//! to 0–255 measure as very different under the strict pixel metrics, which
//! is the intended behavior for verification.
//!
//! The container format is irrelevant once decoded: a PNG and a TIFF holding
//! the same samples compare as equal under every metric.

use std::collections::HashMap;

use image::DynamicImage;

use crate::config::Metric;
use crate::diagnostics::VerifyError;
use crate::mismatch;

/// The sample type an image was decoded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleKind {
    U8,
    U16,
    F32,
}

impl SampleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SampleKind::U8 => "u8",
            SampleKind::U16 => "u16",
            SampleKind::F32 => "f32",
        }
    }
}

/// A decoded image: `width × height × channels` samples, flattened
/// row-major with interleaved channels.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelGrid {
    width: u32,
    height: u32,
    channels: u8,
    kind: SampleKind,
    samples: Vec<f64>,
}

impl PixelGrid {
    /// Builds a grid directly from samples. The sample count must equal
    /// `width * height * channels`.
    pub fn from_samples(
        width: u32,
        height: u32,
        channels: u8,
        kind: SampleKind,
        samples: Vec<f64>,
    ) -> Result<Self, VerifyError> {
        let expected = width as usize * height as usize * channels as usize;
        if samples.len() != expected {
            return Err(crate::config_err!(
                "sample count {} does not match {}x{}x{} grid",
                samples.len(),
                width,
                height,
                channels
            ));
        }
        Ok(Self {
            width,
            height,
            channels,
            kind,
            samples,
        })
    }

    /// Decodes an image from raw container bytes (PNG, TIFF, ...) using the
    /// format sniffing of the `image` crate.
    pub fn decode(bytes: &[u8]) -> Result<Self, VerifyError> {
        let img = image::load_from_memory(bytes)
            .map_err(|e| VerifyError::decode("unrecognized or corrupt image payload", e))?;
        Self::from_image(&img)
    }

    /// Converts a decoded image into a grid, preserving raw sample scale.
    pub fn from_image(img: &DynamicImage) -> Result<Self, VerifyError> {
        let width = img.width();
        let height = img.height();
        let (channels, kind, samples): (u8, SampleKind, Vec<f64>) = match img {
            DynamicImage::ImageLuma8(buf) => (1, SampleKind::U8, widen(buf.as_raw())),
            DynamicImage::ImageLumaA8(buf) => (2, SampleKind::U8, widen(buf.as_raw())),
            DynamicImage::ImageRgb8(buf) => (3, SampleKind::U8, widen(buf.as_raw())),
            DynamicImage::ImageRgba8(buf) => (4, SampleKind::U8, widen(buf.as_raw())),
            DynamicImage::ImageLuma16(buf) => (1, SampleKind::U16, widen(buf.as_raw())),
            DynamicImage::ImageLumaA16(buf) => (2, SampleKind::U16, widen(buf.as_raw())),
            DynamicImage::ImageRgb16(buf) => (3, SampleKind::U16, widen(buf.as_raw())),
            DynamicImage::ImageRgba16(buf) => (4, SampleKind::U16, widen(buf.as_raw())),
            DynamicImage::ImageRgb32F(buf) => (3, SampleKind::F32, widen(buf.as_raw())),
            DynamicImage::ImageRgba32F(buf) => (4, SampleKind::F32, widen(buf.as_raw())),
            other => {
                return Err(VerifyError::Decode {
                    message: format!("unsupported pixel format {:?}", other.color()),
                    source: None,
                })
            }
        };
        Self::from_samples(width, height, channels, kind, samples)
    }

    pub fn shape(&self) -> (u32, u32, u8) {
        (self.width, self.height, self.channels)
    }

    pub fn kind(&self) -> SampleKind {
        self.kind
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }
}

fn widen<T: Copy + Into<f64>>(raw: &[T]) -> Vec<f64> {
    raw.iter().map(|&v| v.into()).collect()
}

/// Computes the scalar distance between two grids under the given metric.
///
/// Shapes must agree for every metric. `iou` additionally requires matching
/// sample kinds: region labels taken from different value scales are not
/// comparable.
pub fn metric_distance(a: &PixelGrid, b: &PixelGrid, metric: Metric) -> Result<f64, VerifyError> {
    if a.shape() != b.shape() {
        let (aw, ah, ac) = a.shape();
        let (bw, bh, bc) = b.shape();
        return Err(mismatch!(
            "image shapes differ: {}x{}x{} vs {}x{}x{}",
            aw,
            ah,
            ac,
            bw,
            bh,
            bc
        ));
    }
    if a.samples.is_empty() {
        return Ok(0.0);
    }
    let distance = match metric {
        Metric::Mad => mean_absolute_difference(&a.samples, &b.samples),
        Metric::Mse => mean_squared_difference(&a.samples, &b.samples),
        Metric::Rms => mean_squared_difference(&a.samples, &b.samples).sqrt(),
        Metric::Fro => frobenius_norm(&a.samples, &b.samples),
        Metric::Iou => {
            if a.kind != b.kind {
                return Err(mismatch!(
                    "iou requires matching sample kinds, got {} vs {}",
                    a.kind.as_str(),
                    b.kind.as_str()
                ));
            }
            1.0 - matched_label_iou(&a.samples, &b.samples)
        }
    };
    Ok(distance)
}

/// Compares two grids under the metric and threshold in `config`; fails when
/// the computed distance exceeds `eps`.
pub fn compare_grids(
    a: &PixelGrid,
    b: &PixelGrid,
    metric: Metric,
    eps: f64,
) -> Result<(), VerifyError> {
    let distance = metric_distance(a, b, metric)?;
    if distance > eps {
        return Err(mismatch!(
            "image distance {} under metric '{}' exceeds the allowed eps of {}",
            distance,
            metric,
            eps
        ));
    }
    Ok(())
}

// =============================================================================
// METRIC IMPLEMENTATIONS
// =============================================================================

fn mean_absolute_difference(a: &[f64], b: &[f64]) -> f64 {
    let sum: f64 = a.iter().zip(b).map(|(x, y)| (x - y).abs()).sum();
    sum / a.len() as f64
}

fn mean_squared_difference(a: &[f64], b: &[f64]) -> f64 {
    let sum: f64 = a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum();
    sum / a.len() as f64
}

fn frobenius_norm(a: &[f64], b: &[f64]) -> f64 {
    let sum: f64 = a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum();
    sum.sqrt()
}

/// Matched-label intersection-over-union.
///
/// Each distinct sample value is treated as a region label. For every label
/// region in one image the matching region in the other is the one whose
/// label has majority overlap; the directed score is the minimum IoU over
/// labels, and the symmetric score the minimum of both directions. A region
/// that merely changes value but keeps its shape therefore scores 1.0, while
/// a region that changes shape drags the score down.
fn matched_label_iou(a: &[f64], b: &[f64]) -> f64 {
    directed_label_iou(a, b).min(directed_label_iou(b, a))
}

fn directed_label_iou(a: &[f64], b: &[f64]) -> f64 {
    let mut worst: f64 = 1.0;
    for label in unique_labels(a) {
        // majority label of b over this region
        let mut overlap: HashMap<u64, usize> = HashMap::new();
        for (x, y) in a.iter().zip(b) {
            if x.to_bits() == label {
                *overlap.entry(y.to_bits()).or_insert(0) += 1;
            }
        }
        // deterministic tie-break on the label bits
        let matched = overlap
            .into_iter()
            .max_by_key(|&(bits, count)| (count, bits))
            .map(|(bits, _)| bits)
            .expect("label regions are non-empty by construction");

        let mut intersection = 0usize;
        let mut union = 0usize;
        for (x, y) in a.iter().zip(b) {
            let in_a = x.to_bits() == label;
            let in_b = y.to_bits() == matched;
            if in_a && in_b {
                intersection += 1;
            }
            if in_a || in_b {
                union += 1;
            }
        }
        worst = worst.min(intersection as f64 / union as f64);
    }
    worst
}

fn unique_labels(samples: &[f64]) -> Vec<u64> {
    let mut labels: Vec<u64> = samples.iter().map(|v| v.to_bits()).collect();
    labels.sort_unstable();
    labels.dedup();
    labels
}

#[cfg(test)]
mod pixels_tests {
    use super::*;
    use crate::diagnostics::ErrorType;

    fn gray(kind: SampleKind, samples: Vec<f64>) -> PixelGrid {
        let side = (samples.len() as f64).sqrt() as u32;
        PixelGrid::from_samples(side, side, 1, kind, samples).unwrap()
    }

    fn float_3x3(center: f64) -> PixelGrid {
        gray(
            SampleKind::F32,
            vec![1.0, 1.0, 1.0, 1.0, center, 1.0, 1.0, 1.0, 1.0],
        )
    }

    fn u8_3x3(center: f64) -> PixelGrid {
        gray(
            SampleKind::U8,
            vec![255.0, 255.0, 255.0, 255.0, center, 255.0, 255.0, 255.0, 255.0],
        )
    }

    #[test]
    fn identical_grids_measure_zero_under_every_metric() {
        let grid = float_3x3(0.9);
        for metric in [Metric::Mad, Metric::Mse, Metric::Rms, Metric::Fro, Metric::Iou] {
            assert_eq!(metric_distance(&grid, &grid, metric).unwrap(), 0.0);
            assert!(compare_grids(&grid, &grid, metric, 0.0).is_ok());
        }
    }

    #[test]
    fn mad_is_the_mean_absolute_difference() {
        // one of nine samples differs by 9
        let a = u8_3x3(255.0);
        let b = u8_3x3(246.0);
        let d = metric_distance(&a, &b, Metric::Mad).unwrap();
        assert_eq!(d, 1.0);
        assert!(compare_grids(&a, &b, Metric::Mad, 1.0).is_ok());
        assert!(compare_grids(&a, &b, Metric::Mad, 0.99).is_err());
    }

    #[test]
    fn squared_metrics_have_their_documented_scales() {
        let a = u8_3x3(255.0);
        let b = u8_3x3(246.0);
        assert_eq!(metric_distance(&a, &b, Metric::Mse).unwrap(), 9.0);
        assert_eq!(metric_distance(&a, &b, Metric::Rms).unwrap(), 3.0);
        assert_eq!(metric_distance(&a, &b, Metric::Fro).unwrap(), 9.0);
    }

    #[test]
    fn mad_eps_boundary_matches_measured_distance() {
        let a = float_3x3(0.9);
        let b = float_3x3(0.8);
        let measured = metric_distance(&a, &b, Metric::Mad).unwrap();
        assert!(measured > 0.0);
        assert!(compare_grids(&a, &b, Metric::Mad, measured).is_ok());
        assert!(compare_grids(&a, &b, Metric::Mad, measured * 0.99).is_err());
    }

    #[test]
    fn iou_tolerates_relabeled_regions_of_identical_shape() {
        // center pixel changes value but the region layout is unchanged
        let a = float_3x3(0.9);
        let b = float_3x3(0.8);
        assert_eq!(metric_distance(&a, &b, Metric::Iou).unwrap(), 0.0);
        assert!(compare_grids(&a, &b, Metric::Iou, 0.0).is_ok());
    }

    #[test]
    fn iou_detects_regions_that_move() {
        let a = gray(
            SampleKind::U8,
            vec![0.0, 0.0, 0.0, 0.0, 200.0, 0.0, 0.0, 0.0, 0.0],
        );
        let b = gray(
            SampleKind::U8,
            vec![200.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
        );
        let d = metric_distance(&a, &b, Metric::Iou).unwrap();
        assert!(d > 0.0);
        assert!(compare_grids(&a, &b, Metric::Iou, 0.0).is_err());
    }

    #[test]
    fn iou_rejects_mismatched_sample_kinds() {
        let float = float_3x3(0.9);
        let scaled = u8_3x3(229.0);
        let err = metric_distance(&float, &scaled, Metric::Iou).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Mismatch);
    }

    #[test]
    fn strict_metrics_fail_across_value_scales() {
        // float [0,1] content vs the same content scaled to u8 range
        let float = float_3x3(0.9);
        let scaled = u8_3x3(229.0);
        for metric in [Metric::Mad, Metric::Mse, Metric::Rms, Metric::Fro] {
            assert!(compare_grids(&float, &scaled, metric, 0.0).is_err());
        }
    }

    #[test]
    fn shape_mismatch_fails_every_metric() {
        let a = gray(SampleKind::U8, vec![0.0; 9]);
        let b = PixelGrid::from_samples(2, 2, 1, SampleKind::U8, vec![0.0; 4]).unwrap();
        for metric in [Metric::Mad, Metric::Mse, Metric::Rms, Metric::Fro, Metric::Iou] {
            let err = metric_distance(&a, &b, metric).unwrap_err();
            assert_eq!(err.error_type(), ErrorType::Mismatch);
        }
    }

    #[test]
    fn sample_count_is_checked_at_construction() {
        let err = PixelGrid::from_samples(2, 2, 1, SampleKind::U8, vec![0.0; 3]).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Config);
    }
}
