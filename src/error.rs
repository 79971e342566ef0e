pub type PringsResult<T> = Result<T, PringsError>;

#[derive(thiserror::Error, Debug)]
pub enum PringsError {
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    #[error("image decode error: {0}")]
    ImageDecode(String),

    #[error("invalid crop region: {0}")]
    InvalidCropRegion(String),

    #[error("canvas unavailable: {0}")]
    CanvasUnavailable(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PringsError {
    pub fn invalid_dimensions(msg: impl Into<String>) -> Self {
        Self::InvalidDimensions(msg.into())
    }

    pub fn image_decode(msg: impl Into<String>) -> Self {
        Self::ImageDecode(msg.into())
    }

    pub fn invalid_crop_region(msg: impl Into<String>) -> Self {
        Self::InvalidCropRegion(msg.into())
    }

    pub fn canvas_unavailable(msg: impl Into<String>) -> Self {
        Self::CanvasUnavailable(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
