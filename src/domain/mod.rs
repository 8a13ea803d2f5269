pub mod artifact;
pub mod chapter;

pub use artifact::WorkArtifact;
pub use chapter::Chapter;
