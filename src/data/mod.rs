//! Row sources and column layouts.
//!
//! - [`Frame`] / [`Column`]: a minimal named column store
//! - [`adapt`] / [`AdaptedFrame`]: a frame re-encoded in a model's training
//!   schema, stored feature-major so rows are gathered column by column
//! - [`ColumnLayout`]: categorical/numeric layout of the expanded row space,
//!   with [`TransformType`] normalization

mod adapt;
mod frame;
mod layout;

pub use adapt::{adapt, AdaptedFrame};
pub use frame::{Column, ColumnData, Frame};
pub use layout::{ColumnLayout, NumericStats, TransformType};
