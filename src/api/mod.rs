//! REST backend access: the [`Backend`] seam, its HTTP implementation, and
//! the office save payload.

mod backend;
mod client;
mod error;
pub mod payload;

pub use backend::Backend;
pub use client::HttpBackend;
pub use error::ApiError;
pub use payload::OfficePayload;
