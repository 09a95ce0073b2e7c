//! Opera Editor - State store and camera-limits editors
//!
//! The editor keeps its camera edits in a [`Store`]: a [`State`] value that
//! only changes through [`reduce`]d [`Action`]s, with explicit subscribers.
//! The limits panels read their inputs from the store and dispatch edits
//! back to it, using a [`CameraPreview`] for the live camera position.

mod limits;
mod state;
mod store;

pub use limits::{
    CameraPreview, FovLimits, LimitsEditor, LimitsPanel, PitchLimits, RadiusLimits, YawLimits,
};
pub use state::{effective_config, reduce, Action, State};
pub use store::{Store, SubscriberId};
