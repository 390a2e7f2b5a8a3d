use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The proposed epoch is empty: nothing to solve.
    #[error("no observation data")]
    NoObservationData,

    /// Too few residual rows to observe the complete state.
    /// Carries the row count (real satellites + pseudo observations)
    /// that was reached.
    #[error("lack of valid sats ns={0}")]
    LackOfValidSats(usize),

    /// Invalid orbital states or bad signal data may cause the
    /// normal equations to become singular.
    #[error("lsq error: singular normal equations")]
    LeastSquares,

    /// Gauss-Newton iteration ceiling reached without convergence.
    #[error("iteration divergent i={0}")]
    IterationDivergent(usize),

    /// The weighted residuals failed the chi-square consistency test.
    /// A faulty satellite is the usual cause: RAIM (when enabled)
    /// will attempt an exclusion.
    #[error("chi-square error nv={nv} vv={vv:.1} cs={threshold:.1}")]
    ChiSquare { nv: usize, vv: f64, threshold: f64 },

    /// Geometry too weak (or degenerate) for the solution to be trusted.
    #[error("gdop error nv={nv} gdop={gdop:.1}")]
    Gdop { nv: usize, gdop: f64 },
}
