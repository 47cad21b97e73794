//! `vp-pipeline` has no error type of its own beyond configuration
//! validation: every other failure arrives already converted into
//! [`vp_core::Error`], the aggregating error `vp-pipeline` sits behind
//! (per `vp-core`'s own doc comment).

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("invalid pipeline configuration: {0}")]
    InvalidConfig(String),

    #[error("illegal state transition: {from} -> {to}")]
    IllegalTransition { from: vp_core::PipelineState, to: vp_core::PipelineState },

    #[error(transparent)]
    Core(#[from] vp_core::Error),
}

impl From<PipelineError> for vp_core::Error {
    fn from(e: PipelineError) -> Self {
        match e {
            PipelineError::InvalidConfig(msg) => vp_core::Error::InvalidParameter(msg),
            PipelineError::IllegalTransition { from, to } => {
                vp_core::Error::InvalidParameter(format!("illegal state transition: {from} -> {to}"))
            }
            PipelineError::Core(e) => e,
        }
    }
}
