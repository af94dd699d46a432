//! Output formatting for image listings

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::io::Write;
use zeitmaschine_core::ImageMetadata;

/// How to print image listings
#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Serialize)]
struct ImageListing<'a> {
    offset: usize,
    count: usize,
    images: &'a [ImageMetadata],
}

/// Write `images` (starting at `offset`) in the requested format
pub fn write_images<W: Write>(
    out: &mut W,
    images: &[ImageMetadata],
    offset: usize,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let listing = ImageListing {
                offset,
                count: images.len(),
                images,
            };
            serde_json::to_writer_pretty(&mut *out, &listing)?;
            writeln!(out)?;
        }
        OutputFormat::Text => {
            if images.is_empty() {
                writeln!(out, "No images found")?;
                return Ok(());
            }
            for (index, image) in images.iter().enumerate() {
                let date = image
                    .created_at()
                    .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                    .or_else(|| image.date.clone())
                    .unwrap_or_else(|| "-".to_string());
                writeln!(
                    out,
                    "{:>5}  {}  {}",
                    offset + index,
                    date.dimmed(),
                    image.name
                )?;
            }
        }
    }
    Ok(())
}

/// Human readable byte count
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}
