//! Background map acquisition.
//!
//! The map is an equirectangular world image, fetched or read once at startup
//! and resized to the display surface. Any failure here aborts startup.

use std::io::{Cursor, Read};
use std::path::PathBuf;

use image::imageops::FilterType;

use crate::error::TrackerError;

/// Refuse map downloads larger than this.
const MAX_MAP_BYTES: u64 = 64 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq)]
pub enum MapSource {
    Url(String),
    File(PathBuf),
}

impl std::fmt::Display for MapSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MapSource::Url(url) => write!(f, "{}", url),
            MapSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Decoded RGB raster, row-major from the top-left corner.
#[derive(Clone)]
pub struct MapImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<[u8; 3]>,
}

impl MapImage {
    /// Decode any supported image format and resize to exactly `width × height`.
    pub fn from_bytes(bytes: &[u8], width: u32, height: u32) -> Result<Self, TrackerError> {
        let reader = image::ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| TrackerError::decode("map image", e))?;
        let img = reader
            .decode()
            .map_err(|e| TrackerError::decode("map image", e))?;

        let resized = img.resize_exact(width, height, FilterType::Lanczos3).to_rgb8();
        let pixels = resized.pixels().map(|p| p.0).collect();
        Ok(Self { width, height, pixels })
    }

    /// Flat `RGBRGB...` bytes, the layout texture uploads expect.
    pub fn rgb_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flatten().copied().collect()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get((y * self.width + x) as usize).copied()
    }
}

/// Download the raw map bytes. Blocks until the transfer completes.
pub fn fetch_map_bytes(url: &str) -> Result<Vec<u8>, TrackerError> {
    log::info!("Fetching map image from {}", url);
    let response = ureq::get(url)
        .call()
        .map_err(|e| TrackerError::fetch(url, format!("HTTP error: {}", e)))?;

    let mut bytes = Vec::new();
    response
        .into_reader()
        .take(MAX_MAP_BYTES)
        .read_to_end(&mut bytes)
        .map_err(|e| TrackerError::fetch(url, format!("read error: {}", e)))?;

    log::info!("Fetched {} KiB of map data", bytes.len() / 1024);
    Ok(bytes)
}

/// Acquire and decode the map for a `width × height` surface.
pub fn load_map(source: &MapSource, width: u32, height: u32) -> Result<MapImage, TrackerError> {
    let bytes = match source {
        MapSource::Url(url) => fetch_map_bytes(url)?,
        MapSource::File(path) => {
            log::info!("Loading map image: {:?}", path);
            std::fs::read(path).map_err(|e| TrackerError::fetch(path.display().to_string(), e))?
        }
    };
    let map = MapImage::from_bytes(&bytes, width, height)?;
    log::info!("Map ready ({}x{})", map.width, map.height);
    Ok(map)
}
