use thiserror::Error;

use ds_core::CoreError;
use ds_routing::RoutingError;
use ds_service::ServiceError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Routing(#[from] RoutingError),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

pub type SimResult<T> = Result<T, SimError>;
