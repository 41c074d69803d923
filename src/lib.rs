//! Facial measurement estimation.
//!
//! An uploaded photo is decoded, sent to a face mesh landmark detector and
//! turned into millimeter estimates (pupillary distance, pupil height,
//! naso-pupillary distances, face widths and length) using an assumed jaw
//! width as the scale. The face shape is classified from width and length
//! ratios and the result carries a heuristic accuracy score.

pub mod config;
pub mod error;
pub mod helper;
pub mod modules;
pub mod pipeline;
pub mod server;
pub mod utils;
