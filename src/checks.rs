//! Acceptance checks applied to every test case.
//!
//! Each check is a pure function of the case's buffers and returns a
//! [`CheckOutcome`]: a vote plus the numbers needed to diagnose a failure
//! without re-running anything.

use crate::analyze::{power_to_db, spectrum_bin, PowerScan};
use crate::config::Thresholds;
use crate::error::OracleError;
use crate::layout::{Domain, Spectrum};
use crate::signal::TestCase;

/// The acceptance checks a case can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckKind {
    DynamicRange,
    Phase,
    Magnitude,
    RoundTrip,
    /// Packed and ordered paths agree and the reorder is invertible.
    LayoutConsistency,
}

impl core::fmt::Display for CheckKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            CheckKind::DynamicRange => "dynamic range",
            CheckKind::Phase => "phase",
            CheckKind::Magnitude => "magnitude",
            CheckKind::RoundTrip => "round trip",
            CheckKind::LayoutConsistency => "layout consistency",
        };
        f.write_str(name)
    }
}

/// Measured quantities behind a check's vote.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Detail {
    DynamicRange {
        scan: PowerScan,
        range_db: f64,
        min_db: f64,
    },
    Phase {
        bin: usize,
        measured: f64,
        expected: f64,
        tolerance: f64,
    },
    /// Phase is meaningless on a purely real bin.
    PhaseSkipped { bin: usize },
    Magnitude {
        bin: usize,
        measured: f64,
        expected: f64,
        tolerance: f64,
    },
    RoundTrip {
        error_sum: f64,
        bound: f64,
        len: usize,
    },
    LayoutConsistency {
        /// First cell where the reordered spectrum differs from the direct one.
        path_mismatch: Option<usize>,
        /// First cell where re-packing differs from the engine's packed output.
        inverse_mismatch: Option<usize>,
    },
}

impl core::fmt::Display for Detail {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match *self {
            Detail::DynamicRange {
                scan,
                range_db,
                min_db,
            } => {
                writeln!(
                    f,
                    "carrier power at bin {}: {:e} == {:.3} dB (|mag| {:e})",
                    scan.carrier_bin,
                    scan.carrier_power,
                    power_to_db(scan.carrier_power),
                    scan.carrier_power.sqrt()
                )?;
                match scan.loudest_other {
                    Some((bin, power)) => writeln!(
                        f,
                        "  max other power at bin {bin}: {power:e} == {:.3} dB",
                        power_to_db(power)
                    )?,
                    None => writeln!(f, "  no other bins")?,
                }
                write!(
                    f,
                    "  dynamic range: {range_db:.3} dB (required {min_db:.1} dB)"
                )
            }
            Detail::Phase {
                bin,
                measured,
                expected,
                tolerance,
            } => write!(
                f,
                "phase at bin {bin} = {:.6} deg, expected {:.6} deg (tolerance {:e} deg)",
                measured.to_degrees(),
                expected.to_degrees(),
                tolerance.to_degrees()
            ),
            Detail::PhaseSkipped { bin } => {
                write!(f, "phase not checked at purely real bin {bin}")
            }
            Detail::Magnitude {
                bin,
                measured,
                expected,
                tolerance,
            } => write!(
                f,
                "magnitude at bin {bin} = {measured:.9}, expected {expected:.9} (tolerance {tolerance:e})"
            ),
            Detail::RoundTrip {
                error_sum,
                bound,
                len,
            } => write!(
                f,
                "inverse does not reproduce the signal: squared error sum {error_sum:e} (bound {bound:e}), mean {:e}",
                error_sum / len as f64
            ),
            Detail::LayoutConsistency {
                path_mismatch,
                inverse_mismatch,
            } => {
                f.write_str("packed layout")?;
                if let Some(cell) = path_mismatch {
                    write!(f, " disagrees with the ordered transform at cell {cell}")?;
                }
                if let Some(cell) = inverse_mismatch {
                    if path_mismatch.is_some() {
                        f.write_str(";")?;
                    }
                    write!(f, " does not survive a reorder round trip at cell {cell}")?;
                }
                if path_mismatch.is_none() && inverse_mismatch.is_none() {
                    f.write_str(" consistent")?;
                }
                Ok(())
            }
        }
    }
}

/// Vote of one check on one case.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CheckOutcome {
    pub kind: CheckKind,
    pub passed: bool,
    pub detail: Detail,
}

impl CheckOutcome {
    pub fn failed(&self) -> bool {
        !self.passed
    }
}

/// Carrier must stand at least `min_dynamic_range_db` above every other bin.
pub fn check_dynamic_range(scan: &PowerScan, thresholds: &Thresholds) -> CheckOutcome {
    let range_db = scan.dynamic_range_db();
    CheckOutcome {
        kind: CheckKind::DynamicRange,
        passed: range_db >= thresholds.min_dynamic_range_db,
        detail: Detail::DynamicRange {
            scan: *scan,
            range_db,
            min_db: thresholds.min_dynamic_range_db,
        },
    }
}

/// Phase at the tone bin must match the injected start phase.
///
/// DC and Nyquist carry no imaginary part, so the check passes there
/// without measuring.
pub fn check_phase(
    case: &TestCase,
    spectrum: &Spectrum,
    thresholds: &Thresholds,
) -> Result<CheckOutcome, OracleError> {
    if case.is_edge_bin() {
        return Ok(CheckOutcome {
            kind: CheckKind::Phase,
            passed: true,
            detail: Detail::PhaseSkipped { bin: case.bin },
        });
    }
    let measured = spectrum_bin(spectrum, case.bin)?.phase();
    let expected = case.tone().phase0;
    let tolerance = thresholds.max_phase_error_rad();
    Ok(CheckOutcome {
        kind: CheckKind::Phase,
        passed: (measured - expected).abs() <= tolerance,
        detail: Detail::Phase {
            bin: case.bin,
            measured,
            expected,
            tolerance,
        },
    })
}

/// Magnitude a tone should show at its bin after dividing by the length.
///
/// A real sinusoid splits its energy between the positive and negative
/// frequency images, and the real spectrum only stores the positive one.
/// DC and Nyquist have no mirror image.
pub fn expected_magnitude(case: &TestCase) -> f64 {
    let amp = f64::from(case.tone().amplitude);
    match case.domain {
        Domain::Complex => amp,
        Domain::Real if case.is_edge_bin() => amp,
        Domain::Real => amp / 2.0,
    }
}

/// Normalized carrier magnitude must match [`expected_magnitude`].
pub fn check_magnitude(
    case: &TestCase,
    carrier_power: f64,
    thresholds: &Thresholds,
) -> CheckOutcome {
    let measured = carrier_power.sqrt() / case.len as f64;
    let expected = expected_magnitude(case);
    CheckOutcome {
        kind: CheckKind::Magnitude,
        passed: (measured - expected).abs() <= thresholds.max_magnitude_error,
        detail: Detail::Magnitude {
            bin: case.bin,
            measured,
            expected,
            tolerance: thresholds.max_magnitude_error,
        },
    }
}

/// Summed squared error between `original` and the unnormalized inverse
/// `reconstruction` once divided by `len`.
pub fn round_trip_error(original: &[f32], reconstruction: &[f32], len: usize) -> f64 {
    let scale = len as f64;
    original
        .iter()
        .zip(reconstruction)
        .map(|(&x, &z)| {
            let err = f64::from(x) - f64::from(z) / scale;
            err * err
        })
        .sum()
}

/// Forward then inverse must reproduce the signal within `len * 1e-7`.
pub fn check_round_trip(
    len: usize,
    original: &[f32],
    reconstruction: &[f32],
    thresholds: &Thresholds,
) -> Result<CheckOutcome, OracleError> {
    if original.len() != reconstruction.len() {
        return Err(OracleError::BufferLength {
            expected: original.len(),
            actual: reconstruction.len(),
        });
    }
    let error_sum = round_trip_error(original, reconstruction, len);
    let bound = thresholds.round_trip_bound(len);
    Ok(CheckOutcome {
        kind: CheckKind::RoundTrip,
        passed: error_sum <= bound,
        detail: Detail::RoundTrip {
            error_sum,
            bound,
            len,
        },
    })
}

/// Reordered packed output must equal the direct ordered transform, and
/// re-packing the ordered spectrum must give back the packed output.
pub fn check_layout_consistency(
    direct: &Spectrum,
    reordered: &Spectrum,
    packed: &Spectrum,
    repacked: &Spectrum,
) -> CheckOutcome {
    let path_mismatch = direct.first_mismatch(reordered);
    let inverse_mismatch = packed.first_mismatch(repacked);
    CheckOutcome {
        kind: CheckKind::LayoutConsistency,
        passed: path_mismatch.is_none() && inverse_mismatch.is_none(),
        detail: Detail::LayoutConsistency {
            path_mismatch,
            inverse_mismatch,
        },
    }
}
