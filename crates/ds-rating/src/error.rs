use thiserror::Error;

#[derive(Debug, Error)]
pub enum RatingError {
    #[error("rater configuration error: {0}")]
    Config(String),
}

pub type RatingResult<T> = Result<T, RatingError>;
