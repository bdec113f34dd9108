use thiserror::Error;

use crate::db::Endpoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WiringError {
    /// The two endpoints can't be wired together: same component, same kind,
    /// or the target kind isn't listed for the source kind.
    #[error("incompatible components, cannot connect {from} to {to}")]
    IncompatibleConnection { from: Endpoint, to: Endpoint },
}
