//! Adapter that exposes a [`LogDensity`] as an `argmin` problem.
//!
//! Maximizing `log p(θ)` becomes minimizing `c(θ) = -log p(θ)`. Analytic
//! gradients are negated; when none is provided we finite-difference the
//! **cost** directly, so no sign flip is needed in that branch.
use crate::optimization::{
    errors::{OptError, OptResult},
    map_search::{
        finite_diff::fd_gradient,
        traits::LogDensity,
        types::{Cost, Grad, Theta},
        validation::validate_grad,
    },
};
use argmin::core::{CostFunction, Error, Gradient};

/// Bridges a [`LogDensity`] to `argmin`'s `CostFunction` and `Gradient`.
#[derive(Debug, Clone)]
pub struct ArgMinAdapter<'a, F: LogDensity> {
    pub f: &'a F,
    pub data: &'a F::Data,
}

impl<'a, F: LogDensity> ArgMinAdapter<'a, F> {
    pub fn new(f: &'a F, data: &'a F::Data) -> Self {
        Self { f, data }
    }

    /// Cost `-log p(θ)` in the crate's own error type.
    ///
    /// # Errors
    /// - Propagates errors from `LogDensity::value`.
    /// - [`OptError::NonFiniteCost`] when the log-density is `NaN` or `±∞`.
    pub fn neg_log_density(&self, theta: &Theta) -> OptResult<Cost> {
        let output = self.f.value(theta, self.data)?;
        if !output.is_finite() {
            return Err(OptError::NonFiniteCost { value: output });
        }
        Ok(-output)
    }
}

impl<'a, F: LogDensity> CostFunction for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Output = Cost;

    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        Ok(self.neg_log_density(theta)?)
    }
}

impl<'a, F: LogDensity> Gradient for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Gradient = Grad;

    /// Gradient of the cost at `θ`.
    ///
    /// - Analytic `∇ log p` from the model is validated and negated.
    /// - `GradientNotImplemented` switches to [`fd_gradient`] on the cost.
    /// - Any other model error is propagated.
    fn gradient(&self, theta: &Self::Param) -> Result<Self::Gradient, Error> {
        match self.f.grad(theta, self.data) {
            Ok(g) => {
                validate_grad(&g, theta.len())?;
                Ok(-g)
            }
            Err(OptError::GradientNotImplemented) => {
                let cost = |x: &Theta| self.neg_log_density(x);
                Ok(fd_gradient(&cost, theta)?)
            }
            Err(e) => Err(e.into()),
        }
    }
}
