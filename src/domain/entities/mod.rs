//! Domain entities for the image-loading pipeline.

mod image;
mod size_class;

pub use image::{ImageSource, LoadOutcome, RequestKey};
pub use size_class::{PlaceholderId, SizeClass};
