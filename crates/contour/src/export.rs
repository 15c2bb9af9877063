use std::io::Cursor;

use image::{DynamicImage, ImageFormat, RgbaImage};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::{
    error::{ContourError, Result},
    traits::RasterEncoder,
};

/// Raster encodings available for composite export, keyed by mime type.
#[derive(
    Debug, Clone, Copy, Default,
    Serialize, Deserialize,
    Display, EnumString, EnumIter, IntoStaticStr,
    PartialEq, Eq, Hash
)]
#[strum(ascii_case_insensitive)]
pub enum ExportFormat {
    #[default]
    #[strum(to_string = "image/png")]
    Png,
    #[strum(to_string = "image/jpeg", serialize = "image/jpg")]
    Jpeg,
    #[strum(to_string = "image/tiff")]
    Tiff,
}

impl ExportFormat {
    pub fn from_mime(mime: &str) -> Result<Self> {
        mime.trim()
            .parse()
            .map_err(|_| ContourError::UnsupportedFormat(mime.to_string()))
    }

    pub fn mime_type(self) -> &'static str {
        self.into()
    }

    pub fn image_format(self) -> ImageFormat {
        match self {
            Self::Png => ImageFormat::Png,
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Tiff => ImageFormat::Tiff,
        }
    }
}

/// Encoder backed by the `image` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageEncoder;

impl RasterEncoder for ImageEncoder {
    fn encode(&self, image: &RgbaImage, format: ExportFormat) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        let mut cursor = Cursor::new(&mut bytes);
        match format {
            // JPEG has no alpha channel
            ExportFormat::Jpeg => DynamicImage::ImageRgba8(image.clone())
                .to_rgb8()
                .write_to(&mut cursor, format.image_format())?,
            _ => image.write_to(&mut cursor, format.image_format())?,
        }

        if bytes.is_empty() {
            return Err(ContourError::EncodingFailed(format!(
                "{} encoder produced no data",
                format.mime_type()
            )));
        }
        Ok(bytes)
    }
}
