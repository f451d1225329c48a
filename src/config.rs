//! Sweep configuration and acceptance thresholds.

use crate::error::OracleError;
use crate::layout::{Domain, Layout};

/// Acceptance limits for the numerical checks.
///
/// The defaults are tuned for single precision: a 24 bit mantissa gives
/// roughly 144 dB of headroom, so 140 dB leaves a few dB for rounding. A
/// double precision engine needs its own limits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    /// Minimum carrier-to-strongest-spur ratio in dB.
    pub min_dynamic_range_db: f64,
    /// Maximum phase error at the tone bin, in degrees.
    pub max_phase_error_deg: f64,
    /// Maximum absolute error of the normalized tone magnitude.
    pub max_magnitude_error: f64,
    /// Allowed summed squared round-trip error per transform point.
    pub round_trip_error_per_sample: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            min_dynamic_range_db: 140.0,
            max_phase_error_deg: 1e-4,
            max_magnitude_error: 1e-6,
            round_trip_error_per_sample: 1e-7,
        }
    }
}

impl Thresholds {
    /// Phase tolerance in radians.
    pub fn max_phase_error_rad(&self) -> f64 {
        self.max_phase_error_deg.to_radians()
    }

    /// Round-trip bound for a transform of `len` points. Rounding error
    /// accumulates with size, so the bound scales with it.
    pub fn round_trip_bound(&self, len: usize) -> f64 {
        len as f64 * self.round_trip_error_per_sample
    }

    fn validate(&self) -> Result<(), OracleError> {
        let limits = [
            ("dynamic range", self.min_dynamic_range_db),
            ("phase error", self.max_phase_error_deg),
            ("magnitude error", self.max_magnitude_error),
            ("round-trip error", self.round_trip_error_per_sample),
        ];
        for (name, value) in limits {
            if !value.is_finite() || value < 0.0 {
                return Err(OracleError::InvalidConfig(format!(
                    "{name} limit must be a finite non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Which transforms a sweep visits and how they are judged.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepConfig {
    /// Smallest transform length (power of two).
    pub min_len: usize,
    /// Largest transform length (power of two, inclusive).
    pub max_len: usize,
    /// Tones per configuration are spaced `len / tone_divisor` bins apart.
    pub tone_divisor: usize,
    /// Domains in visiting order.
    pub domains: Vec<Domain>,
    /// Spectrum paths in visiting order.
    pub paths: Vec<Layout>,
    /// Dump every bin's power for every case, not only on replay.
    pub print_spectrum: bool,
    pub thresholds: Thresholds,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            min_len: 32,
            max_len: 65536,
            tone_divisor: 16,
            domains: Domain::ALL.to_vec(),
            paths: Layout::ALL.to_vec(),
            print_spectrum: false,
            thresholds: Thresholds::default(),
        }
    }
}

impl SweepConfig {
    /// Reject configurations that cannot describe a sweep.
    pub fn validate(&self) -> Result<(), OracleError> {
        for len in [self.min_len, self.max_len] {
            if !len.is_power_of_two() {
                return Err(OracleError::NotPowerOfTwo(len));
            }
        }
        if self.min_len > self.max_len {
            return Err(OracleError::InvalidConfig(format!(
                "minimum size {} exceeds maximum size {}",
                self.min_len, self.max_len
            )));
        }
        if self.tone_divisor == 0 {
            return Err(OracleError::InvalidConfig(
                "tone divisor must be at least 1".into(),
            ));
        }
        if self.domains.is_empty() || self.paths.is_empty() {
            return Err(OracleError::InvalidConfig(
                "at least one domain and one layout are required".into(),
            ));
        }
        if self.domains.contains(&Domain::Real) {
            if let Some(len) = self.sizes().find(|&len| self.nyquist_phase_slot(len) != 0) {
                return Err(OracleError::InvalidConfig(format!(
                    "tone divisor {} gives the real Nyquist tone of size {len} a non-zero start phase",
                    self.tone_divisor
                )));
            }
        }
        self.thresholds.validate()
    }

    /// Start-phase slot (`m mod 4`) of the tone on bin `len / 2`, or 0 when
    /// the schedule skips that bin.
    ///
    /// A real Nyquist tone `amp·cos(phi0 + πj)` only has magnitude `amp`
    /// when `phi0` is zero.
    fn nyquist_phase_slot(&self, len: usize) -> usize {
        let step = self.tone_step(len);
        let nyquist = len / 2;
        if nyquist % step == 0 {
            (nyquist / step) % 4
        } else {
            0
        }
    }

    /// Transform lengths in ascending order.
    pub fn sizes(&self) -> impl Iterator<Item = usize> {
        let max = self.max_len;
        core::iter::successors(Some(self.min_len), move |&n| {
            n.checked_mul(2).filter(|&next| next <= max)
        })
        .take_while(move |&n| n <= max)
    }

    /// Bin spacing between consecutive tones for a transform of `len` points.
    pub fn tone_step(&self, len: usize) -> usize {
        (len / self.tone_divisor.max(1)).max(1)
    }

    /// Configurations of one size in the order they run: every path, and
    /// every domain within a path.
    pub fn configurations(&self) -> impl Iterator<Item = (Domain, Layout)> + '_ {
        self.paths
            .iter()
            .flat_map(move |&path| self.domains.iter().map(move |&domain| (domain, path)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_sweep_covers_32_to_65536() {
        let cfg = SweepConfig::default();
        cfg.validate().unwrap();
        let sizes: Vec<usize> = cfg.sizes().collect();
        assert_eq!(sizes.len(), 12);
        assert_eq!(sizes.first(), Some(&32));
        assert_eq!(sizes.last(), Some(&65536));
        assert_eq!(cfg.tone_step(32), 2);
    }

    #[test]
    fn configurations_alternate_domains_within_a_path() {
        let cfg = SweepConfig::default();
        let order: Vec<_> = cfg.configurations().collect();
        assert_eq!(
            order,
            [
                (Domain::Complex, Layout::Ordered),
                (Domain::Real, Layout::Ordered),
                (Domain::Complex, Layout::Packed),
                (Domain::Real, Layout::Packed),
            ]
        );
    }

    #[test]
    fn rejects_bad_bounds() {
        let cfg = SweepConfig {
            min_len: 48,
            ..SweepConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(OracleError::NotPowerOfTwo(48))));
        let cfg = SweepConfig {
            min_len: 128,
            max_len: 64,
            ..SweepConfig::default()
        };
        assert!(cfg.validate().is_err());
        let mut cfg = SweepConfig::default();
        cfg.thresholds.max_magnitude_error = f64::NAN;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn single_size_sweep() {
        let cfg = SweepConfig {
            min_len: 64,
            max_len: 64,
            ..SweepConfig::default()
        };
        assert_eq!(cfg.sizes().collect::<Vec<_>>(), [64]);
    }

    #[test]
    fn tone_divisor_must_keep_nyquist_at_zero_phase() {
        for divisor in [2, 4] {
            let cfg = SweepConfig {
                max_len: 1024,
                tone_divisor: divisor,
                ..SweepConfig::default()
            };
            assert!(
                matches!(cfg.validate(), Err(OracleError::InvalidConfig(_))),
                "divisor {divisor}"
            );
        }
        for divisor in [1, 3, 8, 16, 32, 1024, 100_000] {
            let cfg = SweepConfig {
                tone_divisor: divisor,
                ..SweepConfig::default()
            };
            cfg.validate()
                .unwrap_or_else(|e| panic!("divisor {divisor}: {e}"));
        }
    }

    #[test]
    fn complex_only_sweeps_accept_any_divisor() {
        let cfg = SweepConfig {
            tone_divisor: 2,
            domains: vec![Domain::Complex],
            ..SweepConfig::default()
        };
        cfg.validate().unwrap();
    }
}
