use std::fmt;
use std::io;

/// Closed error taxonomy for the simulation core.
///
/// Most of these are never propagated out of a tick: `InvalidInput`,
/// `ResourceUnavailable`, `SeasonalInconsistency` and `NoiseDegenerate` are
/// recovered from at the point they occur (an absent query result, a
/// silently dropped action, a fallback to `Clear` weather, a clamp to
/// `0.5`). They exist as a type mainly so call sites that *do* want to
/// observe and log the recovery have something typed to match on.
#[derive(Debug)]
pub enum SimError {
    /// A caller-supplied value was out of range or otherwise nonsensical.
    InvalidInput(String),
    /// An action's target resource vanished, was depleted, or became
    /// otherwise unusable mid-execution.
    ResourceUnavailable(String),
    /// An addition was rejected because a hard capacity limit was hit.
    CapacityExceeded(String),
    /// A season/weather combination had no legal successor.
    SeasonalInconsistency(String),
    /// A noise sample degenerated to a non-finite value.
    NoiseDegenerate(String),
    Io(io::Error),
    Serialize(String),
    Deserialize(String),
    Config(String),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::InvalidInput(s) => write!(f, "invalid input: {s}"),
            SimError::ResourceUnavailable(s) => write!(f, "resource unavailable: {s}"),
            SimError::CapacityExceeded(s) => write!(f, "capacity exceeded: {s}"),
            SimError::SeasonalInconsistency(s) => write!(f, "seasonal inconsistency: {s}"),
            SimError::NoiseDegenerate(s) => write!(f, "noise degenerate: {s}"),
            SimError::Io(e) => write!(f, "I/O error: {e}"),
            SimError::Serialize(s) => write!(f, "serialization error: {s}"),
            SimError::Deserialize(s) => write!(f, "deserialization error: {s}"),
            SimError::Config(s) => write!(f, "configuration error: {s}"),
        }
    }
}

impl std::error::Error for SimError {}

impl From<io::Error> for SimError {
    fn from(e: io::Error) -> Self {
        SimError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_detail() {
        let e = SimError::InvalidInput("negative dt".to_string());
        assert!(e.to_string().contains("negative dt"));
    }

    #[test]
    fn io_error_converts() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "missing");
        let e: SimError = io_err.into();
        assert!(matches!(e, SimError::Io(_)));
    }
}
