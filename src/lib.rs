pub mod cache;
pub mod coco;
pub mod curator;
pub mod error;
pub mod labels;
pub mod preprocess;
pub mod progress;
pub mod shuffle;
pub mod split;

pub use cache::{CacheStore, Fingerprint, Variant};
pub use coco::{Annotation, CocoSource};
pub use curator::{Curator, ImageDataset, IndexDataset};
pub use error::{Error, Result};
pub use split::SplitPolicy;
