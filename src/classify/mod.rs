//! Boundary to the external vision classification service.
//!
//! [`api`] defines the black-box contract, [`vision`] the reqwest client,
//! and [`response`] the single place where wire shapes are normalized into
//! decision-layer types.

pub mod api;
pub mod response;
pub mod vision;

pub use api::{Capture, ClassifierApi};
pub use vision::VisionClient;
