//! Opera Core - Foundational types for the Opera model viewer and editor
//!
//! This crate provides the types every other Opera crate depends on:
//! - `Limits`, `LimitBound` - camera limit ranges with the `auto` sentinel
//! - `Vector3D`, `SphericalPositionDeg` - camera target and orbit values
//! - `round_to_digits`, `format_number` - stable numeric serialization
//! - `ObjectId` - identity of renderer-owned runtime objects
//! - `ContentHash` - SHA-256 hashes of decoded image data
//! - Error types and Result alias

mod error;
mod hash;
mod id;
mod round;
mod types;

pub use error::{OperaError, Result};
pub use hash::ContentHash;
pub use id::ObjectId;
pub use round::{format_number, round_to_digits, DIGITS};
pub use types::{LimitBound, Limits, SphericalPositionDeg, Vector3D};
