pub type AfficheResult<T> = Result<T, AfficheError>;

#[derive(thiserror::Error, Debug)]
pub enum AfficheError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("layout error: {0}")]
    Layout(String),

    #[error("asset error: {0}")]
    Asset(String),

    #[error("external service error: {0}")]
    External(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AfficheError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn layout(msg: impl Into<String>) -> Self {
        Self::Layout(msg.into())
    }

    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    pub fn external(msg: impl Into<String>) -> Self {
        Self::External(msg.into())
    }
}
