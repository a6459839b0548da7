use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "Dataset Curator")]
#[command(version = "0.1.0")]
pub struct Args {
    /// COCO instances annotation file (e.g. annotations/instances_train2017.json).
    #[arg(long)]
    pub annotations: PathBuf,

    /// Directory containing the corpus images. When set, the cached arrays
    /// hold preprocessed pixels; without it they hold sample indices.
    #[arg(long)]
    pub images: Option<PathBuf>,

    /// Directory where the prepared arrays are cached.
    #[arg(long, default_value = "coco/cache")]
    pub cache_dir: PathBuf,

    /// Category id whose presence makes a sample positive.
    #[arg(long, default_value_t = 18)]
    pub category: u32,

    /// Seed for the shuffle permutation. Random when omitted.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Test-set divisor: the test set takes positives/DIVISOR samples.
    #[arg(long, default_value_t = 5)]
    pub test_divisor: usize,

    /// Keep every remaining negative for training instead of capping them
    /// at the positive count.
    #[arg(long, default_value_t = false)]
    pub unbalanced: bool,
}
