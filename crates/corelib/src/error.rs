//! Errors for the fallible supplemental builders (motion curves, particle configs).

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("Segment duration must be finite and > 0, got {0}")]
    InvalidDuration(f32),
    #[error("Particle lifetime can reach {min}, must stay > 0 (base={base}, noise={noise})")]
    InvalidLifetime { base: f32, noise: f32, min: f32 },
}

pub type CoreResult<T> = Result<T, CoreError>;
