//! The slide image extraction pipeline.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use deck_core::SlideImage;
use deck_sandbox::ScopedWorkdir;
use std::fs;
use std::path::{self, Path, PathBuf};
use std::time::Duration;

use crate::error::ImageError;
use crate::{office, raster};

/// Bound for each external tool invocation.
pub const EXTRACT_TIMEOUT: Duration = Duration::from_secs(60);

/// Rasterization resolution.
pub const DEFAULT_DPI: u32 = 150;

pub const EXTRACT_PREFIX: &str = "dome_ppt_extract_";

#[derive(Debug, Clone)]
pub struct ImageConfig {
    /// LibreOffice executable; discovered when `None`.
    pub office: Option<PathBuf>,
    /// `pdftoppm` executable; discovered when `None`.
    pub rasterizer: Option<PathBuf>,
    pub dpi: u32,
    pub timeout: Duration,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            office: None,
            rasterizer: None,
            dpi: DEFAULT_DPI,
            timeout: EXTRACT_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ImageExtractor {
    config: ImageConfig,
}

impl ImageExtractor {
    pub fn new(config: ImageConfig) -> Self {
        Self { config }
    }

    /// Render one PNG per slide of `input`, in slide order.
    pub fn extract(&self, input: &Path) -> Result<Vec<SlideImage>, ImageError> {
        let input = path::absolute(input)?;
        if !input.exists() {
            return Err(ImageError::NotFound(input));
        }

        let office = self
            .config
            .office
            .clone()
            .or_else(office::find_office)
            .ok_or(ImageError::OfficeNotFound)?;
        let rasterizer = self
            .config
            .rasterizer
            .clone()
            .or_else(raster::find_rasterizer)
            .ok_or(ImageError::RasterizerNotFound)?;

        let workdir = ScopedWorkdir::create(EXTRACT_PREFIX)?;

        log::debug!("Converting {} with {}", input.display(), office.display());
        let pdf = office::convert_to_pdf(&office, &input, workdir.path(), self.config.timeout)?;

        log::debug!("Rasterizing {} at {} dpi", pdf.display(), self.config.dpi);
        let pages = raster::rasterize(
            &rasterizer,
            &pdf,
            workdir.path(),
            self.config.dpi,
            self.config.timeout,
        )?;

        let slides = pages
            .iter()
            .enumerate()
            .map(|(index, page)| {
                let bytes = fs::read(page)?;
                Ok(SlideImage {
                    index,
                    image_base64: STANDARD.encode(bytes),
                })
            })
            .collect::<Result<Vec<_>, ImageError>>()?;

        log::info!("Rendered {} slides from {}", slides.len(), input.display());
        Ok(slides)
    }
}
