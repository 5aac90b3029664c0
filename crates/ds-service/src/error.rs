use thiserror::Error;

use ds_routing::RoutingError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("service configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Routing(#[from] RoutingError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;
