//! Parameter Schema & Parser
//!
//! Defines every recognized form field of the render-request protocol, its
//! semantic type, and its conversion from string form-encoded values into a
//! validated [`RenderRequest`]. Unknown or ill-typed fields are a hard error.

pub mod field;
pub mod request;

pub use request::{ImageType, RenderRequest};
