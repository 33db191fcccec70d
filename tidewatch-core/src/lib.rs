pub mod analysis;
pub mod error;
pub mod field;
pub mod geo;
pub mod logger;
pub mod model;
pub mod request;

pub use error::TidewatchError;
pub use model::DiffusionModel;
