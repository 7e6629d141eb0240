use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Couldn't load the image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Pixel buffer needs at least 3 channels, got {0}")]
    UnsupportedChannels(usize),

    #[error("Pixel buffer too short: {actual} bytes (expected {expected})")]
    BufferTooShort { expected: usize, actual: usize },

    #[error("No color clusters found in image")]
    NoClusters,

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ExtractError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_clusters_message() {
        assert_eq!(
            ExtractError::NoClusters.to_string(),
            "No color clusters found in image"
        );
    }

    #[test]
    fn test_buffer_too_short_message() {
        let error = ExtractError::BufferTooShort {
            expected: 12,
            actual: 9,
        };
        assert_eq!(
            error.to_string(),
            "Pixel buffer too short: 9 bytes (expected 12)"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let error: ExtractError = io.into();
        match error {
            ExtractError::Io(_) => {}
            _ => panic!("Expected Io variant"),
        }
    }
}
