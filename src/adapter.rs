//! One interface over the engine regardless of the spectrum path.

use crate::engine::{TransformEngine, TransformPlan};
use crate::error::OracleError;
use crate::layout::{Direction, Domain, Layout, Spectrum};

/// A planned transform bound to the engine that planned it.
///
/// The plan is only read after creation, so every tone of a configuration
/// shares it.
pub struct TransformAdapter<'e, E: TransformEngine> {
    engine: &'e E,
    plan: E::Plan,
}

impl<'e, E: TransformEngine> TransformAdapter<'e, E> {
    pub fn new(engine: &'e E, plan: E::Plan) -> Self {
        Self { engine, plan }
    }

    pub fn len(&self) -> usize {
        self.plan.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plan.len() == 0
    }

    pub fn domain(&self) -> Domain {
        self.plan.domain()
    }

    /// Allocate the engine work area for this plan.
    pub fn make_work(&self) -> E::Work {
        self.engine.make_work(&self.plan)
    }

    /// Zero-filled spectrum matching this plan.
    pub fn spectrum(&self, layout: Layout) -> Spectrum {
        Spectrum::zeroed(self.len(), self.domain(), layout)
    }

    /// Forward transform of `signal` into the ordered spectrum `ordered`.
    ///
    /// On the packed path the engine writes its native layout into `packed`,
    /// which is then reordered into `ordered`. Both paths must agree.
    pub fn forward(
        &self,
        signal: &[f32],
        path: Layout,
        ordered: &mut Spectrum,
        packed: &mut Spectrum,
        work: &mut E::Work,
    ) -> Result<(), OracleError> {
        match path {
            Layout::Ordered => self.forward_ordered(signal, ordered, work),
            Layout::Packed => {
                self.forward_packed(signal, packed, work)?;
                self.reorder(packed, ordered)
            }
        }
    }

    /// Forward transform straight into natural bin order.
    pub fn forward_ordered(
        &self,
        signal: &[f32],
        ordered: &mut Spectrum,
        work: &mut E::Work,
    ) -> Result<(), OracleError> {
        self.check_geometry(ordered)?;
        ordered.expect_layout(Layout::Ordered)?;
        self.engine.transform_ordered(
            &self.plan,
            signal,
            ordered.as_mut_slice(),
            work,
            Direction::Forward,
        )
    }

    /// Forward transform straight into the engine's packed layout.
    pub fn forward_packed(
        &self,
        signal: &[f32],
        packed: &mut Spectrum,
        work: &mut E::Work,
    ) -> Result<(), OracleError> {
        self.check_geometry(packed)?;
        packed.expect_layout(Layout::Packed)?;
        self.engine.transform(
            &self.plan,
            signal,
            packed.as_mut_slice(),
            work,
            Direction::Forward,
        )
    }

    /// Inverse transform of an ordered spectrum. The result is scaled by the
    /// transform length.
    pub fn inverse(
        &self,
        ordered: &Spectrum,
        out: &mut [f32],
        work: &mut E::Work,
    ) -> Result<(), OracleError> {
        self.check_geometry(ordered)?;
        ordered.expect_layout(Layout::Ordered)?;
        self.engine.transform_ordered(
            &self.plan,
            ordered.as_slice(),
            out,
            work,
            Direction::Backward,
        )
    }

    /// Convert `from` into the layout of `to`.
    ///
    /// Packed to ordered runs the engine's forward reorder, ordered to packed
    /// the backward one; equal layouts are copied.
    pub fn reorder(&self, from: &Spectrum, to: &mut Spectrum) -> Result<(), OracleError> {
        self.check_geometry(from)?;
        self.check_geometry(to)?;
        let direction = match (from.layout(), to.layout()) {
            (Layout::Packed, Layout::Ordered) => Direction::Forward,
            (Layout::Ordered, Layout::Packed) => Direction::Backward,
            _ => {
                to.as_mut_slice().copy_from_slice(from.as_slice());
                return Ok(());
            }
        };
        self.engine
            .reorder(&self.plan, from.as_slice(), to.as_mut_slice(), direction)
    }

    fn check_geometry(&self, spectrum: &Spectrum) -> Result<(), OracleError> {
        if spectrum.len() == self.len() && spectrum.domain() == self.domain() {
            Ok(())
        } else {
            Err(OracleError::PlanMismatch)
        }
    }
}
