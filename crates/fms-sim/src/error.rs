use fms_core::{FmsError, Tick};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid vehicle parameters: {0}")]
    Params(#[from] FmsError),

    /// An observer asked the run to stop; it holds the underlying cause.
    #[error("run halted by observer at tick {tick}")]
    Halted { tick: Tick },
}

pub type SimResult<T> = Result<T, SimError>;
