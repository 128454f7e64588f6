use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("PDF generation error: {0}")]
    Pdf(String),
    #[error("Font '{font}' could not be embedded: {reason}")]
    Font { font: String, reason: String },
    #[error("Image '{src}' could not be decoded: {reason}")]
    Image { src: String, reason: String },
    #[error("Layout referenced unknown {0}")]
    MissingResource(String),
}

impl From<lopdf::Error> for RenderError {
    fn from(err: lopdf::Error) -> Self {
        RenderError::Pdf(err.to_string())
    }
}
