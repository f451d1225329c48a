//! Boundary with the transform engine under test.
//!
//! The harness never calls an FFT library directly. Everything goes through
//! [`TransformEngine`], which mirrors the four operations a SIMD FFT library
//! typically exposes: plan creation, a transform whose spectrum side uses the
//! engine's native (packed) layout, a transform whose spectrum side is in
//! natural bin order, and the reorder between the two.
//!
//! [`RustFftEngine`] is the bundled implementation.

mod lanes;
mod rust_fft;

pub use lanes::{LanePermutation, LANES};
pub use rust_fft::{RustFftEngine, RustFftPlan, RustFftWork};

use crate::error::OracleError;
use crate::layout::{Direction, Domain};

/// Read-only view of a transform plan.
pub trait TransformPlan {
    /// Transform length in points.
    fn len(&self) -> usize;

    /// Input domain the plan was created for.
    fn domain(&self) -> Domain;

    /// Number of `f32` cells every sample or spectrum buffer must hold.
    fn float_len(&self) -> usize {
        self.domain().float_len(self.len())
    }
}

/// A fast Fourier transform engine as seen by the oracle.
///
/// All buffers are caller allocated and hold [`TransformPlan::float_len`]
/// cells. Inverse transforms are unnormalized: a forward/inverse round trip
/// scales the signal by the transform length.
pub trait TransformEngine {
    type Plan: TransformPlan;
    /// Opaque work area the engine needs next to the caller's buffers.
    type Work;

    /// Human readable engine name for the report.
    fn name(&self) -> &str;

    /// Plan a transform of `len` points over `domain`.
    fn plan(&mut self, len: usize, domain: Domain) -> Result<Self::Plan, OracleError>;

    /// Allocate the work area for `plan`.
    fn make_work(&self, plan: &Self::Plan) -> Self::Work;

    /// Transform with the spectrum side in the engine's packed layout.
    fn transform(
        &self,
        plan: &Self::Plan,
        input: &[f32],
        output: &mut [f32],
        work: &mut Self::Work,
        direction: Direction,
    ) -> Result<(), OracleError>;

    /// Transform with the spectrum side in natural bin order.
    fn transform_ordered(
        &self,
        plan: &Self::Plan,
        input: &[f32],
        output: &mut [f32],
        work: &mut Self::Work,
        direction: Direction,
    ) -> Result<(), OracleError>;

    /// Permute a spectrum between layouts.
    ///
    /// `Forward` goes packed to ordered, `Backward` ordered to packed. The
    /// two directions must be exact inverses.
    fn reorder(
        &self,
        plan: &Self::Plan,
        input: &[f32],
        output: &mut [f32],
        direction: Direction,
    ) -> Result<(), OracleError>;
}

/// Check that `buf` holds exactly `expected` cells.
pub(crate) fn check_len(buf: &[f32], expected: usize) -> Result<(), OracleError> {
    if buf.len() == expected {
        Ok(())
    } else {
        Err(OracleError::BufferLength {
            expected,
            actual: buf.len(),
        })
    }
}
