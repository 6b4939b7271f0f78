//! Preprocessing
//!
//! Techniques that remove discrimination from the training data before a
//! model is fit.
pub mod relabelling;

pub use relabelling::Relabeller;
