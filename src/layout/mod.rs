//! Height estimation and page break computation

mod breaks;
mod estimator;
mod model;
mod walker;

pub use breaks::{compute_breaks, page_count, BreakMark, PageBudget};
pub use estimator::{GeometryProvider, HeightEstimator, NodeGeometry};
pub use model::{CodeMetrics, FlowMetrics, HeadingMetrics, HeightModel};
pub use walker::{BlockWalker, MeasurableUnit};
