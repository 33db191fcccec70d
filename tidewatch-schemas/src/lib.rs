pub mod environment;
pub mod field;
pub mod file_formats;
pub mod prediction;
pub mod request;
pub mod scenario;
pub mod source;
pub mod zone;
