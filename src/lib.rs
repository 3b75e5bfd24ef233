//! mxtgen - license request form controller
//!
//! Collects a user name, target version and seat count, validates them,
//! encodes them into a request against the generation endpoint and starts a
//! download of the returned artifact. The artifact itself is produced by the
//! external endpoint; nothing here derives keys.
//!
//! # Features
//!
//! - `http` - Native download trigger backed by `reqwest`. Enabled by default.
//! - `cli` - The `mxtgen` command-line front end. Enabled by default.
//!
//! # Example
//!
//! ```toml
//! # Controller only, bring your own download trigger
//! mxtgen = { path = "../mxtgen", default-features = false }
//! ```

pub mod config;
pub mod controller;
pub mod download;
pub mod errors;
pub mod form;
pub mod locale;
pub mod logging;
pub mod request;
pub mod storage;
pub mod view;

pub use controller::{ControllerSettings, FormController, LoadingState, Notice, Submission};
pub use errors::{GenError, GenResult, TriggerError, ValidationError};
pub use form::{FormField, FormState, SeatBounds};
pub use locale::Locale;
