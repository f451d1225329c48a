//! [`TransformEngine`] backed by `rustfft` (complex input) and `realfft`
//! (real input).
//!
//! Both libraries produce bins in natural order, so the ordered transform is
//! a direct call and the packed transform goes through [`LanePermutation`].

use std::sync::Arc;

use realfft::num_complex::Complex;
use realfft::{ComplexToReal, RealFftPlanner, RealToComplex};
use rustfft::{Fft, FftPlanner};

use super::lanes::LanePermutation;
use super::{check_len, TransformEngine, TransformPlan};
use crate::error::OracleError;
use crate::layout::{Direction, Domain};

/// Shortest complex transform the engine plans.
pub const MIN_COMPLEX_LEN: usize = 16;
/// Shortest real transform the engine plans.
pub const MIN_REAL_LEN: usize = 32;

enum Kernel {
    Complex {
        forward: Arc<dyn Fft<f32>>,
        inverse: Arc<dyn Fft<f32>>,
    },
    Real {
        forward: Arc<dyn RealToComplex<f32>>,
        inverse: Arc<dyn ComplexToReal<f32>>,
    },
}

/// Plan holding the planned kernels and the packing permutation.
pub struct RustFftPlan {
    len: usize,
    domain: Domain,
    kernel: Kernel,
    lanes: LanePermutation,
    scratch_len: usize,
}

impl RustFftPlan {
    /// Packing permutation used by [`RustFftEngine::transform`].
    pub fn lanes(&self) -> &LanePermutation {
        &self.lanes
    }
}

impl core::fmt::Debug for RustFftPlan {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RustFftPlan")
            .field("len", &self.len)
            .field("domain", &self.domain)
            .field("scratch_len", &self.scratch_len)
            .finish()
    }
}

impl TransformPlan for RustFftPlan {
    fn len(&self) -> usize {
        self.len
    }

    fn domain(&self) -> Domain {
        self.domain
    }
}

/// Work area: complex bins, kernel scratch, a copy of the real input
/// (`realfft` clobbers its input) and a staging spectrum for the packed path.
pub struct RustFftWork {
    bins: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
    samples: Vec<f32>,
    staging: Vec<f32>,
}

/// Engine built on the `rustfft`/`realfft` planners.
pub struct RustFftEngine {
    complex: FftPlanner<f32>,
    real: RealFftPlanner<f32>,
}

impl Default for RustFftEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RustFftEngine {
    pub fn new() -> Self {
        Self {
            complex: FftPlanner::new(),
            real: RealFftPlanner::new(),
        }
    }

    /// Run the natural-order kernel from `input` into `output`.
    fn process(
        plan: &RustFftPlan,
        input: &[f32],
        output: &mut [f32],
        bins: &mut [Complex<f32>],
        scratch: &mut [Complex<f32>],
        samples: &mut [f32],
        direction: Direction,
    ) -> Result<(), OracleError> {
        let n = plan.len;
        match (&plan.kernel, direction) {
            (Kernel::Complex { forward, inverse }, _) => {
                for (bin, pair) in bins.iter_mut().zip(input.chunks_exact(2)) {
                    *bin = Complex::new(pair[0], pair[1]);
                }
                let fft = match direction {
                    Direction::Forward => forward,
                    Direction::Backward => inverse,
                };
                fft.process_with_scratch(bins, scratch);
                for (pair, bin) in output.chunks_exact_mut(2).zip(bins.iter()) {
                    pair[0] = bin.re;
                    pair[1] = bin.im;
                }
            }
            (Kernel::Real { forward, .. }, Direction::Forward) => {
                samples.copy_from_slice(input);
                let spectrum = &mut bins[..n / 2 + 1];
                forward.process_with_scratch(samples, spectrum, scratch)?;
                output[0] = spectrum[0].re;
                output[1] = spectrum[n / 2].re;
                for k in 1..n / 2 {
                    output[2 * k] = spectrum[k].re;
                    output[2 * k + 1] = spectrum[k].im;
                }
            }
            (Kernel::Real { inverse, .. }, Direction::Backward) => {
                let spectrum = &mut bins[..n / 2 + 1];
                spectrum[0] = Complex::new(input[0], 0.0);
                spectrum[n / 2] = Complex::new(input[1], 0.0);
                for k in 1..n / 2 {
                    spectrum[k] = Complex::new(input[2 * k], input[2 * k + 1]);
                }
                inverse.process_with_scratch(spectrum, output, scratch)?;
            }
        }
        Ok(())
    }
}

impl TransformEngine for RustFftEngine {
    type Plan = RustFftPlan;
    type Work = RustFftWork;

    fn name(&self) -> &str {
        "rustfft/realfft"
    }

    fn plan(&mut self, len: usize, domain: Domain) -> Result<RustFftPlan, OracleError> {
        if !len.is_power_of_two() {
            return Err(OracleError::NotPowerOfTwo(len));
        }
        let min = match domain {
            Domain::Complex => MIN_COMPLEX_LEN,
            Domain::Real => MIN_REAL_LEN,
        };
        if len < min {
            return Err(OracleError::LengthTooShort { len, min, domain });
        }
        let lanes = LanePermutation::new(domain.pair_count(len))
            .ok_or(OracleError::LengthTooShort { len, min, domain })?;
        let (kernel, scratch_len) = match domain {
            Domain::Complex => {
                let forward = self.complex.plan_fft_forward(len);
                let inverse = self.complex.plan_fft_inverse(len);
                let scratch_len = forward
                    .get_inplace_scratch_len()
                    .max(inverse.get_inplace_scratch_len());
                (Kernel::Complex { forward, inverse }, scratch_len)
            }
            Domain::Real => {
                let forward = self.real.plan_fft_forward(len);
                let inverse = self.real.plan_fft_inverse(len);
                let scratch_len = forward.get_scratch_len().max(inverse.get_scratch_len());
                (Kernel::Real { forward, inverse }, scratch_len)
            }
        };
        log::trace!("planned {domain} rustfft kernel of length {len}, scratch {scratch_len}");
        Ok(RustFftPlan {
            len,
            domain,
            kernel,
            lanes,
            scratch_len,
        })
    }

    fn make_work(&self, plan: &RustFftPlan) -> RustFftWork {
        let bins = match plan.domain {
            Domain::Complex => plan.len,
            Domain::Real => plan.len / 2 + 1,
        };
        let samples = match plan.domain {
            Domain::Complex => 0,
            Domain::Real => plan.len,
        };
        RustFftWork {
            bins: vec![Complex::new(0.0, 0.0); bins],
            scratch: vec![Complex::new(0.0, 0.0); plan.scratch_len],
            samples: vec![0.0; samples],
            staging: vec![0.0; plan.float_len()],
        }
    }

    fn transform(
        &self,
        plan: &RustFftPlan,
        input: &[f32],
        output: &mut [f32],
        work: &mut RustFftWork,
        direction: Direction,
    ) -> Result<(), OracleError> {
        check_len(input, plan.float_len())?;
        check_len(output, plan.float_len())?;
        let RustFftWork {
            bins,
            scratch,
            samples,
            staging,
        } = work;
        match direction {
            Direction::Forward => {
                Self::process(plan, input, staging, bins, scratch, samples, direction)?;
                plan.lanes.pack(staging, output);
            }
            Direction::Backward => {
                plan.lanes.unpack(input, staging);
                Self::process(plan, staging, output, bins, scratch, samples, direction)?;
            }
        }
        Ok(())
    }

    fn transform_ordered(
        &self,
        plan: &RustFftPlan,
        input: &[f32],
        output: &mut [f32],
        work: &mut RustFftWork,
        direction: Direction,
    ) -> Result<(), OracleError> {
        check_len(input, plan.float_len())?;
        check_len(output, plan.float_len())?;
        let RustFftWork {
            bins,
            scratch,
            samples,
            ..
        } = work;
        Self::process(plan, input, output, bins, scratch, samples, direction)
    }

    fn reorder(
        &self,
        plan: &RustFftPlan,
        input: &[f32],
        output: &mut [f32],
        direction: Direction,
    ) -> Result<(), OracleError> {
        check_len(input, plan.float_len())?;
        check_len(output, plan.float_len())?;
        match direction {
            Direction::Forward => plan.lanes.unpack(input, output),
            Direction::Backward => plan.lanes.pack(input, output),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unsupported_lengths() {
        let mut engine = RustFftEngine::new();
        assert!(matches!(
            engine.plan(48, Domain::Complex),
            Err(OracleError::NotPowerOfTwo(48))
        ));
        assert!(matches!(
            engine.plan(16, Domain::Real),
            Err(OracleError::LengthTooShort { min: 32, .. })
        ));
        assert!(engine.plan(16, Domain::Complex).is_ok());
    }

    #[test]
    fn impulse_has_flat_spectrum() {
        let mut engine = RustFftEngine::new();
        let plan = engine.plan(32, Domain::Real).unwrap();
        let mut work = engine.make_work(&plan);
        let mut input = vec![0.0f32; 32];
        input[0] = 1.0;
        let mut output = vec![0.0f32; 32];
        engine
            .transform_ordered(&plan, &input, &mut output, &mut work, Direction::Forward)
            .unwrap();
        // DC and Nyquist share pair 0; every other bin is 1 + 0i.
        assert!((output[0] - 1.0).abs() < 1e-6);
        assert!((output[1] - 1.0).abs() < 1e-6);
        for pair in output[2..].chunks_exact(2) {
            assert!((pair[0] - 1.0).abs() < 1e-6);
            assert!(pair[1].abs() < 1e-6);
        }
    }

    #[test]
    fn wrong_buffer_length_is_an_error() {
        let mut engine = RustFftEngine::new();
        let plan = engine.plan(16, Domain::Complex).unwrap();
        let mut work = engine.make_work(&plan);
        let input = vec![0.0f32; 16];
        let mut output = vec![0.0f32; 32];
        let err = engine
            .transform(&plan, &input, &mut output, &mut work, Direction::Forward)
            .unwrap_err();
        assert!(matches!(
            err,
            OracleError::BufferLength {
                expected: 32,
                actual: 16
            }
        ));
    }
}
