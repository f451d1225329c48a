//! Error type shared by the engine boundary, the harness and the command line.

use crate::layout::{Domain, Layout};

/// Errors raised while configuring or driving a verification sweep.
///
/// Accuracy failures are *not* errors: they are recorded in the sweep
/// outcome. Only setup problems and broken plumbing end up here.
#[derive(Debug)]
pub enum OracleError {
    /// The transform length is not a power of two.
    NotPowerOfTwo(usize),
    /// The engine cannot plan a transform this short for the given domain.
    LengthTooShort {
        len: usize,
        min: usize,
        domain: Domain,
    },
    /// A caller supplied buffer does not match the planned length.
    BufferLength { expected: usize, actual: usize },
    /// An operation received a spectrum in the wrong layout.
    LayoutMismatch { expected: Layout, actual: Layout },
    /// Two spectra that must describe the same plan disagree on length or domain.
    PlanMismatch,
    /// A bin index outside `0..bin_count`.
    BinOutOfRange { bin: usize, bins: usize },
    /// Sweep configuration rejected before any transform runs.
    InvalidConfig(String),
    /// The transform engine reported a failure while processing.
    Engine(String),
    /// Writing the diagnostic report failed.
    Io(std::io::Error),
}

/// Display implementation for [`OracleError`] providing human-readable messages.
impl core::fmt::Display for OracleError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            OracleError::NotPowerOfTwo(len) => {
                write!(f, "transform length {len} is not a power of two")
            }
            OracleError::LengthTooShort { len, min, domain } => write!(
                f,
                "{domain} transform length {len} is below the engine minimum of {min}"
            ),
            OracleError::BufferLength { expected, actual } => write!(
                f,
                "buffer holds {actual} floats but the plan needs {expected}"
            ),
            OracleError::LayoutMismatch { expected, actual } => {
                write!(f, "expected a {expected} spectrum, got a {actual} one")
            }
            OracleError::PlanMismatch => write!(f, "spectra belong to different plans"),
            OracleError::BinOutOfRange { bin, bins } => {
                write!(f, "bin {bin} is outside the {bins} available bins")
            }
            OracleError::InvalidConfig(msg) => write!(f, "invalid sweep configuration: {msg}"),
            OracleError::Engine(msg) => write!(f, "transform engine failed: {msg}"),
            OracleError::Io(err) => write!(f, "failed to write report: {err}"),
        }
    }
}

impl std::error::Error for OracleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OracleError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for OracleError {
    fn from(err: std::io::Error) -> Self {
        OracleError::Io(err)
    }
}

impl From<realfft::FftError> for OracleError {
    fn from(err: realfft::FftError) -> Self {
        OracleError::Engine(err.to_string())
    }
}
