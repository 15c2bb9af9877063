use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContourError {
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Grid dimension mismatch: {len} values cannot fill a {width}x{height} grid")]
    GridDimensionMismatch { len: usize, width: u32, height: u32 },

    #[error("Base image is {actual_width}x{actual_height} but the surface is {expected_width}x{expected_height}")]
    SurfaceDimensionMismatch {
        expected_width: u32,
        expected_height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),

    #[error("Raster encoding failed: {0}")]
    EncodingFailed(String),

    #[error("No segmentation model loaded")]
    ModelNotLoaded,

    #[error("Unknown segmentation model: {0}")]
    UnknownModel(String),

    #[error("Segmentation error: {0}")]
    Segmentation(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ContourError>;
