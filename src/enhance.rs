//! Image post-processing: named enhancement presets applied with the
//! `image` crate before upload.
//!
//! The adjustments interpolate between the image and a "degenerate"
//! version of it (black, grey, mean grey, smoothed), the way classic
//! enhancers do. A factor of 1.0 leaves the image unchanged, below 1.0
//! moves toward the degenerate image, above 1.0 moves away from it.
//!
//! ## Rust concepts
//! - `const` tables of plain structs for the preset registry
//! - `ImageBuffer::from_fn` to build images pixel by pixel
//! - Closures passed to a shared `blend` helper

use crate::error::EnhanceError;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::{ImageReader, Rgb, RgbImage};
use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

pub const DEFAULT_PRESET: &str = "upscale-sharp";
pub const JPEG_QUALITY: u8 = 95;

// ── Parameters ───────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UnsharpMask {
    /// Gaussian sigma in pixels
    pub radius: f32,
    /// Strength of the sharpening, in percent
    pub percent: i32,
    /// Minimum per-channel difference before sharpening applies
    pub threshold: i32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Enhancement {
    pub sharpness: f32,
    pub contrast: f32,
    pub brightness: f32,
    pub color: f32,
    pub upscale_factor: f32,
    pub unsharp: Option<UnsharpMask>,
}

impl Enhancement {
    pub const IDENTITY: Self = Self {
        sharpness: 1.0,
        contrast: 1.0,
        brightness: 1.0,
        color: 1.0,
        upscale_factor: 1.0,
        unsharp: None,
    };
}

const fn unsharp(radius: f32, percent: i32, threshold: i32) -> Option<UnsharpMask> {
    Some(UnsharpMask {
        radius,
        percent,
        threshold,
    })
}

pub const PRESETS: [(&str, Enhancement); 9] = [
    ("original", Enhancement::IDENTITY),
    (
        "mild",
        Enhancement {
            sharpness: 1.3,
            contrast: 1.1,
            brightness: 1.0,
            color: 1.05,
            upscale_factor: 1.0,
            unsharp: None,
        },
    ),
    (
        "medium",
        Enhancement {
            sharpness: 1.5,
            contrast: 1.2,
            brightness: 1.05,
            color: 1.1,
            upscale_factor: 1.0,
            unsharp: unsharp(2.0, 150, 3),
        },
    ),
    (
        "strong",
        Enhancement {
            sharpness: 2.0,
            contrast: 1.3,
            brightness: 1.1,
            color: 1.2,
            upscale_factor: 1.0,
            unsharp: unsharp(3.0, 200, 2),
        },
    ),
    (
        "tv-optimized",
        Enhancement {
            sharpness: 1.7,
            contrast: 1.25,
            brightness: 1.05,
            color: 1.15,
            upscale_factor: 1.2,
            unsharp: unsharp(2.0, 180, 3),
        },
    ),
    (
        "sharp-only",
        Enhancement {
            sharpness: 2.0,
            ..Enhancement::IDENTITY
        },
    ),
    (
        "unsharp-only",
        Enhancement {
            unsharp: unsharp(2.0, 200, 3),
            ..Enhancement::IDENTITY
        },
    ),
    (
        "upscale-only",
        Enhancement {
            upscale_factor: 1.5,
            ..Enhancement::IDENTITY
        },
    ),
    (
        "upscale-sharp",
        Enhancement {
            sharpness: 1.5,
            upscale_factor: 2.0,
            unsharp: unsharp(2.0, 200, 3),
            ..Enhancement::IDENTITY
        },
    ),
];

pub fn preset_names() -> impl Iterator<Item = &'static str> {
    PRESETS.iter().map(|(name, _)| *name)
}

pub fn preset(name: &str) -> Result<Enhancement, EnhanceError> {
    PRESETS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, e)| *e)
        .ok_or_else(|| EnhanceError::UnknownPreset {
            name: name.to_string(),
            available: preset_names().collect::<Vec<_>>().join(", "),
        })
}

// ── Pixel operations ─────────────────────────────────────────────────

/// ITU-R 601-2 luma, in fixed point.
fn luma(p: &Rgb<u8>) -> u8 {
    let [r, g, b] = p.0;
    ((u32::from(r) * 19595 + u32::from(g) * 38470 + u32::from(b) * 7471 + 0x8000) >> 16) as u8
}

fn mix(degenerate: f32, value: u8, factor: f32) -> u8 {
    let v = degenerate + factor * (f32::from(value) - degenerate);
    if v <= 0.0 {
        0
    } else if v >= 255.0 {
        255
    } else {
        v as u8
    }
}

/// Interpolate every pixel against its degenerate counterpart.
fn blend<F>(img: &RgbImage, factor: f32, degenerate: F) -> RgbImage
where
    F: Fn(u32, u32, &Rgb<u8>) -> [f32; 3],
{
    RgbImage::from_fn(img.width(), img.height(), |x, y| {
        let p = img.get_pixel(x, y);
        let d = degenerate(x, y, p);
        Rgb([
            mix(d[0], p[0], factor),
            mix(d[1], p[1], factor),
            mix(d[2], p[2], factor),
        ])
    })
}

pub fn adjust_brightness(img: &RgbImage, factor: f32) -> RgbImage {
    blend(img, factor, |_, _, _| [0.0; 3])
}

pub fn adjust_color(img: &RgbImage, factor: f32) -> RgbImage {
    blend(img, factor, |_, _, p| [f32::from(luma(p)); 3])
}

pub fn adjust_contrast(img: &RgbImage, factor: f32) -> RgbImage {
    let count = u64::from(img.width()) * u64::from(img.height());
    let total: u64 = img.pixels().map(|p| u64::from(luma(p))).sum();
    let mean = if count == 0 {
        0.0
    } else {
        (total as f64 / count as f64 + 0.5).floor() as f32
    };
    blend(img, factor, |_, _, _| [mean; 3])
}

/// 3x3 smoothing (centre weight 5, neighbours 1). Border pixels are
/// copied unchanged.
pub fn smooth(img: &RgbImage) -> RgbImage {
    let (w, h) = img.dimensions();
    RgbImage::from_fn(w, h, |x, y| {
        if x == 0 || y == 0 || x + 1 >= w || y + 1 >= h {
            return *img.get_pixel(x, y);
        }
        let mut sums = [0u32; 3];
        for dy in 0..3 {
            for dx in 0..3 {
                let weight = if dx == 1 && dy == 1 { 5 } else { 1 };
                let p = img.get_pixel(x + dx - 1, y + dy - 1);
                for c in 0..3 {
                    sums[c] += u32::from(p[c]) * weight;
                }
            }
        }
        Rgb(sums.map(|s| ((s as f32 / 13.0) + 0.5) as u8))
    })
}

pub fn adjust_sharpness(img: &RgbImage, factor: f32) -> RgbImage {
    let smoothed = smooth(img);
    blend(img, factor, |x, y, _| {
        smoothed.get_pixel(x, y).0.map(f32::from)
    })
}

pub fn unsharp_mask(img: &RgbImage, mask: UnsharpMask) -> RgbImage {
    let blurred = imageops::blur(img, mask.radius);
    RgbImage::from_fn(img.width(), img.height(), |x, y| {
        let p = img.get_pixel(x, y);
        let b = blurred.get_pixel(x, y);
        let mut out = [0u8; 3];
        for c in 0..3 {
            let value = i32::from(p[c]);
            let diff = value - i32::from(b[c]);
            out[c] = if diff.abs() >= mask.threshold {
                (value + diff * mask.percent / 100).clamp(0, 255) as u8
            } else {
                p[c]
            };
        }
        Rgb(out)
    })
}

pub fn upscale(img: &RgbImage, factor: f32) -> RgbImage {
    let width = (img.width() as f32 * factor) as u32;
    let height = (img.height() as f32 * factor) as u32;
    imageops::resize(img, width, height, FilterType::Lanczos3)
}

/// Apply all adjustments in order: upscale, brightness, color, contrast,
/// sharpness, unsharp mask.
pub fn apply(img: &RgbImage, e: &Enhancement) -> RgbImage {
    let mut result = if e.upscale_factor > 1.0 {
        upscale(img, e.upscale_factor)
    } else {
        img.clone()
    };

    if e.brightness != 1.0 {
        result = adjust_brightness(&result, e.brightness);
    }
    if e.color != 1.0 {
        result = adjust_color(&result, e.color);
    }
    if e.contrast != 1.0 {
        result = adjust_contrast(&result, e.contrast);
    }
    if e.sharpness != 1.0 {
        result = adjust_sharpness(&result, e.sharpness);
    }
    if let Some(mask) = e.unsharp {
        result = unsharp_mask(&result, mask);
    }
    result
}

// ── Files ────────────────────────────────────────────────────────────

pub fn load(path: &Path) -> Result<RgbImage, EnhanceError> {
    let img = ImageReader::open(path)?.with_guessed_format()?.decode()?;
    Ok(img.to_rgb8())
}

/// Save as JPEG (quality 95) or in the format implied by the extension.
pub fn save(img: &RgbImage, path: &Path) -> Result<(), EnhanceError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    if is_jpeg(path) {
        let mut writer = BufWriter::new(fs::File::create(path)?);
        JpegEncoder::new_with_quality(&mut writer, JPEG_QUALITY).encode_image(img)?;
    } else {
        img.save(path)?;
    }
    Ok(())
}

fn is_jpeg(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("jpg") || e.eq_ignore_ascii_case("jpeg"))
}

/// `<out_dir>/<stem>_<preset>.<ext>`. Extensions the TV cannot take
/// become `jpg`.
pub fn output_path(input: &Path, preset: &str, out_dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .into_owned();
    let ext = input
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .filter(|e| matches!(e.as_str(), "jpg" | "jpeg" | "png"))
        .unwrap_or_else(|| "jpg".to_string());
    out_dir.join(format!("{stem}_{preset}.{ext}"))
}

/// Enhance `input` with the named preset and write the result into
/// `out_dir`. Returns the written path.
pub fn enhance_file(input: &Path, preset_name: &str, out_dir: &Path) -> Result<PathBuf, EnhanceError> {
    let params = preset(preset_name)?;
    let img = load(input)?;
    tracing::info!(
        "Enhancing {} with preset {} (original size {}x{})",
        input.display(),
        preset_name,
        img.width(),
        img.height()
    );

    let enhanced = apply(&img, &params);
    let path = output_path(input, preset_name, out_dir);
    save(&enhanced, &path)?;

    tracing::info!(
        "Enhanced size {}x{}, saved to {}",
        enhanced.width(),
        enhanced.height(),
        path.display()
    );
    Ok(path)
}

// ── Comparison ───────────────────────────────────────────────────────

/// Grid columns and rows for `total` tiles.
pub fn grid_layout(total: u32) -> (u32, u32) {
    match total {
        0..=2 => (total.max(1), 1),
        3 | 4 => (2, 2),
        _ => (3, total.div_ceil(3)),
    }
}

/// Tile the original and its enhanced versions on a white canvas. Every
/// tile is resized to the smallest width and height among the inputs.
pub fn comparison_grid(original: &RgbImage, enhanced: &[RgbImage]) -> RgbImage {
    let tiles: Vec<&RgbImage> = std::iter::once(original).chain(enhanced.iter()).collect();
    let width = tiles.iter().map(|t| t.width()).min().unwrap_or(1);
    let height = tiles.iter().map(|t| t.height()).min().unwrap_or(1);
    let (cols, rows) = grid_layout(tiles.len() as u32);

    let mut grid = RgbImage::from_pixel(cols * width, rows * height, Rgb([255, 255, 255]));
    for (i, tile) in tiles.iter().enumerate() {
        let i = i as u32;
        let thumb = imageops::resize(*tile, width, height, FilterType::Lanczos3);
        imageops::replace(
            &mut grid,
            &thumb,
            i64::from((i % cols) * width),
            i64::from((i / cols) * height),
        );
    }
    grid
}

pub struct Comparison {
    pub outputs: Vec<(String, PathBuf)>,
    pub grid: PathBuf,
}

/// Enhance `input` with each preset (all but `original` when none are
/// named) and save a `comparison_grid.jpg` next to the outputs.
pub fn compare_presets(input: &Path, presets: &[String], out_dir: &Path) -> Result<Comparison, EnhanceError> {
    let names: Vec<String> = if presets.is_empty() {
        preset_names()
            .filter(|n| *n != "original")
            .map(str::to_string)
            .collect()
    } else {
        presets.to_vec()
    };

    // Fail on a typo before doing any work.
    let params = names
        .iter()
        .map(|n| preset(n))
        .collect::<Result<Vec<_>, _>>()?;

    let original = load(input)?;
    let mut outputs = Vec::new();
    let mut images = Vec::new();

    for (name, params) in names.into_iter().zip(params) {
        let enhanced = apply(&original, &params);
        let path = output_path(input, &name, out_dir);
        save(&enhanced, &path)?;
        tracing::info!(
            "Preset {}: {}x{} → {}",
            name,
            enhanced.width(),
            enhanced.height(),
            path.display()
        );
        outputs.push((name, path));
        images.push(enhanced);
    }

    if images.is_empty() {
        return Err(EnhanceError::NothingToCompare);
    }

    let grid = out_dir.join("comparison_grid.jpg");
    save(&comparison_grid(&original, &images), &grid)?;
    Ok(Comparison { outputs, grid })
}
