//! Multi-source concentration field: superposes the attenuated contribution of
//! every point source and pollution zone at a queried location.

pub mod builder;
pub mod estimator;
pub mod scan;

pub use builder::FieldEstimatorBuilder;
pub use estimator::FieldEstimator;
