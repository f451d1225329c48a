//! Transform domains, spectrum layouts and the [`Spectrum`] buffer type.
//!
//! A spectrum is always a flat run of `f32` cells holding interleaved
//! `re, im` pairs. The *ordered* layout places bin `k` at pair `k`; the
//! *packed* layout is whatever permutation of those pairs the engine
//! computes natively. In the real domain both layouts reserve pair 0 for the
//! two purely real bins: cell 0 holds DC and cell 1 holds Nyquist.

use crate::error::OracleError;

/// Input domain of a transform plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Domain {
    Complex,
    Real,
}

impl Domain {
    /// Both domains in sweep order.
    pub const ALL: [Domain; 2] = [Domain::Complex, Domain::Real];

    /// Number of `f32` cells in a sample or spectrum buffer of `len` points.
    pub fn float_len(self, len: usize) -> usize {
        match self {
            Domain::Complex => 2 * len,
            Domain::Real => len,
        }
    }

    /// Number of distinct frequency bins a transform of `len` points yields.
    ///
    /// Real input only has `len / 2 + 1` independent bins thanks to
    /// conjugate symmetry.
    pub fn bin_count(self, len: usize) -> usize {
        match self {
            Domain::Complex => len,
            Domain::Real => len / 2 + 1,
        }
    }

    /// Number of interleaved `re, im` pairs stored in a spectrum buffer.
    pub fn pair_count(self, len: usize) -> usize {
        self.float_len(len) / 2
    }

    /// Short tag used in the console report.
    pub fn tag(self) -> &'static str {
        match self {
            Domain::Complex => "cplx",
            Domain::Real => "real",
        }
    }
}

impl core::fmt::Display for Domain {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Domain::Complex => f.write_str("complex"),
            Domain::Real => f.write_str("real"),
        }
    }
}

/// Storage order of spectrum bins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Layout {
    /// Bin `k` lives at pair `k`.
    Ordered,
    /// Engine-native order; needs [`Direction::Forward`] reordering to read.
    Packed,
}

impl Layout {
    /// Both layouts in sweep order.
    pub const ALL: [Layout; 2] = [Layout::Ordered, Layout::Packed];
}

impl core::fmt::Display for Layout {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Layout::Ordered => f.write_str("ordered"),
            Layout::Packed => f.write_str("packed"),
        }
    }
}

/// Direction of a transform or a reorder.
///
/// For transforms `Forward` maps time to frequency. For reorders `Forward`
/// maps the packed layout to the ordered one, `Backward` undoes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Spectrum buffer tagged with the plan geometry and its layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    len: usize,
    domain: Domain,
    layout: Layout,
    data: Vec<f32>,
}

impl Spectrum {
    /// Allocate a zero-filled spectrum for a transform of `len` points.
    pub fn zeroed(len: usize, domain: Domain, layout: Layout) -> Self {
        Self {
            len,
            domain,
            layout,
            data: vec![0.0; domain.float_len(len)],
        }
    }

    /// Wrap existing cells. Fails when `data` does not match the plan geometry.
    pub fn from_cells(
        len: usize,
        domain: Domain,
        layout: Layout,
        data: Vec<f32>,
    ) -> Result<Self, OracleError> {
        let expected = domain.float_len(len);
        if data.len() != expected {
            return Err(OracleError::BufferLength {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            len,
            domain,
            layout,
            data,
        })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Number of addressable frequency bins.
    pub fn bin_count(&self) -> usize {
        self.domain.bin_count(self.len)
    }

    /// Error unless this spectrum is in `layout`.
    pub fn expect_layout(&self, layout: Layout) -> Result<(), OracleError> {
        if self.layout == layout {
            Ok(())
        } else {
            Err(OracleError::LayoutMismatch {
                expected: layout,
                actual: self.layout,
            })
        }
    }

    /// Index of the first cell whose bits differ from `other`, if any.
    ///
    /// Comparison is on the bit pattern so `NaN` cells and signed zeros are
    /// treated as the permutation would treat them.
    pub fn first_mismatch(&self, other: &Spectrum) -> Option<usize> {
        if self.data.len() != other.data.len() {
            return Some(self.data.len().min(other.data.len()));
        }
        self.data
            .iter()
            .zip(&other.data)
            .position(|(a, b)| a.to_bits() != b.to_bits())
    }
}
