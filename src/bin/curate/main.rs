mod args;

use args::Args;
use clap::Parser;
use doggy_dataset::preprocess::IMAGE_SIZE;
use doggy_dataset::{CacheStore, CocoSource, Curator, Fingerprint, SplitPolicy, Variant};
use log::LevelFilter;
use simplelog::{Config, SimpleLogger};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let args = init()?;

    let source = CocoSource::load(&args.annotations)?;
    log::info!(
        "Loaded annotations for {} images from {}",
        source.len(),
        args.annotations.display()
    );

    let policy = SplitPolicy {
        test_divisor: args.test_divisor,
        balance_negatives: !args.unbalanced,
    };
    let curator = Curator {
        target: args.category,
        policy,
        seed: args.seed,
    };

    let variant = if args.images.is_some() {
        Variant::Images
    } else {
        Variant::Indices
    };
    let fingerprint = Fingerprint {
        source: source.identity(),
        category: args.category,
        policy,
        image_size: IMAGE_SIZE,
        variant,
    };
    let cache = CacheStore::new(&args.cache_dir, &fingerprint);
    log::info!("Cache directory: {}", cache.dir().display());

    match &args.images {
        Some(image_root) => {
            let dataset = curator.curate_images(source.decoded(image_root), &cache)?;
            log::info!("Train size: {}", dataset.train.len());
            log::info!("Test size: {}", dataset.test.len());
        }
        None => {
            let dataset = curator.curate_indices(source.annotation_lists(), &cache)?;
            log::info!("Train size: {}", dataset.train.len());
            log::info!("Test size: {}", dataset.test.len());
        }
    }

    log::info!("Done!");
    Ok(())
}

fn init() -> Result<Args, Box<dyn Error>> {
    let args = Args::parse();

    SimpleLogger::init(LevelFilter::Info, Config::default())?;

    Ok(args)
}
