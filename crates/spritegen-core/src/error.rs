use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpritegenError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Packing error: {0}")]
    Pack(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Render error: {0}")]
    Render(String),
    #[error("Task pool error: {0}")]
    Pool(String),
}

pub type Result<T> = std::result::Result<T, SpritegenError>;
