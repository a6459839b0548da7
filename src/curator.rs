use image::DynamicImage;
use ndarray::{Array1, Array3, Array4, ArrayView3, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::cache::CacheStore;
use crate::coco::Annotation;
use crate::error::Result;
use crate::labels::has_target;
use crate::preprocess::{preprocess, IMAGE_SIZE};
use crate::progress::ClassifyProgressBar;
use crate::shuffle::shuffle_pair;
use crate::split::{stratified_split, SplitPartition, SplitPolicy};

/// A train or test split holding source-sample indices plus labels,
/// 1:1 paired by position.
#[derive(Debug, Clone)]
pub struct IndexPartition {
    pub indices: Array1<i64>,
    pub labels: Array1<i64>,
}

impl IndexPartition {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// A train or test split holding preprocessed pixel arrays of shape
/// `[n, IMAGE_SIZE, IMAGE_SIZE, 3]` plus labels, 1:1 paired by position.
#[derive(Debug, Clone)]
pub struct ImagePartition {
    pub images: Array4<f32>,
    pub labels: Array1<f32>,
}

impl ImagePartition {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct IndexDataset {
    pub train: IndexPartition,
    pub test: IndexPartition,
}

#[derive(Debug, Clone)]
pub struct ImageDataset {
    pub train: ImagePartition,
    pub test: ImagePartition,
}

/// Orchestrates dataset curation: one linear pass classifying every source
/// sample, a stratified split, a joint shuffle per partition, and the
/// build-once cache.
pub struct Curator {
    pub target: u32,
    pub policy: SplitPolicy,
    pub seed: Option<u64>,
}

impl Curator {
    pub fn new(target: u32) -> Self {
        Self {
            target,
            policy: SplitPolicy::default(),
            seed: None,
        }
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Index pipeline: partitions carry source-sample indices, no pixels.
    /// The annotation iterator is consumed only on a cache miss.
    pub fn curate_indices<'a, I>(&self, annotations: I, cache: &CacheStore) -> Result<IndexDataset>
    where
        I: IntoIterator<Item = &'a [Annotation]>,
    {
        cache.load_or_build_indices(|| self.build_indices(annotations))
    }

    /// Image pipeline: every sample is decoded and preprocessed, and the
    /// partitions carry the pixel arrays themselves.
    pub fn curate_images<'a, I>(&self, samples: I, cache: &CacheStore) -> Result<ImageDataset>
    where
        I: IntoIterator<Item = Result<(DynamicImage, &'a [Annotation])>>,
    {
        cache.load_or_build_images(|| self.build_images(samples))
    }

    fn build_indices<'a, I>(&self, annotations: I) -> Result<IndexDataset>
    where
        I: IntoIterator<Item = &'a [Annotation]>,
    {
        let progress = ClassifyProgressBar::new();
        let mut positives: Vec<i64> = Vec::new();
        let mut negatives: Vec<i64> = Vec::new();

        for (index, annotations) in annotations.into_iter().enumerate() {
            if has_target(annotations, self.target) {
                positives.push(index as i64);
            } else {
                negatives.push(index as i64);
            }
            progress.inc();
        }
        progress.finish();

        log::info!(
            "Classified {} positive / {} negative samples",
            positives.len(),
            negatives.len()
        );

        let split = stratified_split(&positives, &negatives, &self.policy);
        let mut rng = self.rng();

        Ok(IndexDataset {
            train: index_partition(split.train, &mut rng),
            test: index_partition(split.test, &mut rng),
        })
    }

    fn build_images<'a, I>(&self, samples: I) -> Result<ImageDataset>
    where
        I: IntoIterator<Item = Result<(DynamicImage, &'a [Annotation])>>,
    {
        let progress = ClassifyProgressBar::new();
        let mut positives: Vec<Array3<f32>> = Vec::new();
        let mut negatives: Vec<Array3<f32>> = Vec::new();

        for sample in samples {
            let (image, annotations) = sample?;
            let array = preprocess(&image);
            if has_target(annotations, self.target) {
                positives.push(array);
            } else {
                negatives.push(array);
            }
            progress.inc();
        }
        progress.finish();

        log::info!(
            "Classified {} positive / {} negative samples",
            positives.len(),
            negatives.len()
        );

        let split = stratified_split(&positives, &negatives, &self.policy);
        let mut rng = self.rng();

        Ok(ImageDataset {
            train: image_partition(split.train, &mut rng)?,
            test: image_partition(split.test, &mut rng)?,
        })
    }
}

// Positives first, then negatives; labels follow the same layout before the
// joint shuffle randomizes the order.
fn index_partition<R: Rng>(part: SplitPartition<i64>, rng: &mut R) -> IndexPartition {
    let labels: Vec<i64> = std::iter::repeat(1)
        .take(part.positives.len())
        .chain(std::iter::repeat(0).take(part.negatives.len()))
        .collect();

    let mut indices = part.positives;
    indices.extend(part.negatives);

    let (indices, labels) = shuffle_pair(&Array1::from(indices), &Array1::from(labels), rng);
    IndexPartition { indices, labels }
}

fn image_partition<R: Rng>(part: SplitPartition<Array3<f32>>, rng: &mut R) -> Result<ImagePartition> {
    let labels: Vec<f32> = std::iter::repeat(1.0)
        .take(part.positives.len())
        .chain(std::iter::repeat(0.0).take(part.negatives.len()))
        .collect();

    let views: Vec<ArrayView3<f32>> = part
        .positives
        .iter()
        .chain(part.negatives.iter())
        .map(|a| a.view())
        .collect();

    let size = IMAGE_SIZE as usize;
    let images = if views.is_empty() {
        Array4::zeros((0, size, size, 3))
    } else {
        ndarray::stack(Axis(0), &views)?
    };

    let (images, labels) = shuffle_pair(&images, &Array1::from(labels), rng);
    Ok(ImagePartition { images, labels })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheStore, Fingerprint, Variant};
    use image::{Rgb, RgbImage};
    use tempfile::tempdir;

    const TARGET: u32 = 18;

    fn annotation_lists(positives: usize, negatives: usize) -> Vec<Vec<Annotation>> {
        let mut lists = Vec::new();
        for _ in 0..positives {
            lists.push(vec![
                Annotation { category_id: 1 },
                Annotation { category_id: TARGET },
            ]);
        }
        for _ in 0..negatives {
            lists.push(vec![Annotation { category_id: 1 }]);
        }
        lists
    }

    fn cache(root: &std::path::Path, variant: Variant, source: &str) -> CacheStore {
        CacheStore::new(
            root,
            &Fingerprint {
                source: source.to_string(),
                category: TARGET,
                policy: SplitPolicy::default(),
                image_size: IMAGE_SIZE,
                variant,
            },
        )
    }

    fn curator() -> Curator {
        Curator {
            target: TARGET,
            policy: SplitPolicy::default(),
            seed: Some(42),
        }
    }

    #[test]
    fn test_index_pipeline_sizes_and_labels() {
        let root = tempdir().unwrap();
        let store = cache(root.path(), Variant::Indices, "synthetic");

        // 10 positives then 40 negatives: test_size = 2, test_half = 1.
        let lists = annotation_lists(10, 40);
        let dataset = curator()
            .curate_indices(lists.iter().map(|l| l.as_slice()), &store)
            .unwrap();

        assert_eq!(dataset.test.len(), 2);
        assert_eq!(dataset.train.len(), 18);
        assert_eq!(dataset.test.labels.sum(), 1);
        assert_eq!(dataset.train.labels.sum(), 9);

        // Positive samples sit at indices 0..10; labels must agree.
        for (&index, &label) in dataset
            .train
            .indices
            .iter()
            .zip(dataset.train.labels.iter())
        {
            assert_eq!(label == 1, index < 10, "index {} mislabeled", index);
        }

        // Train and test never share an index.
        let train: std::collections::HashSet<i64> =
            dataset.train.indices.iter().copied().collect();
        assert!(dataset.test.indices.iter().all(|i| !train.contains(i)));
    }

    #[test]
    fn test_index_pipeline_is_idempotent() {
        let root = tempdir().unwrap();
        let store = cache(root.path(), Variant::Indices, "synthetic");

        let lists = annotation_lists(10, 40);
        let first = curator()
            .curate_indices(lists.iter().map(|l| l.as_slice()), &store)
            .unwrap();

        // Same cache, completely different source: the hit wins.
        let changed = annotation_lists(0, 5);
        let second = curator()
            .curate_indices(changed.iter().map(|l| l.as_slice()), &store)
            .unwrap();

        assert_eq!(first.train.indices, second.train.indices);
        assert_eq!(first.train.labels, second.train.labels);
        assert_eq!(first.test.indices, second.test.indices);
        assert_eq!(first.test.labels, second.test.labels);
    }

    #[test]
    fn test_empty_positives_yield_empty_partitions() {
        let root = tempdir().unwrap();
        let store = cache(root.path(), Variant::Indices, "all-negative");

        let lists = annotation_lists(0, 500);
        let dataset = curator()
            .curate_indices(lists.iter().map(|l| l.as_slice()), &store)
            .unwrap();

        assert!(dataset.train.is_empty());
        assert!(dataset.test.is_empty());
    }

    #[test]
    fn test_image_pipeline_shapes() {
        let root = tempdir().unwrap();
        let store = cache(root.path(), Variant::Images, "synthetic-images");

        // 5 positives, 12 negatives: test_size = 1, test_half = 0, so the
        // test set is empty and training caps negatives at 5.
        let lists = annotation_lists(5, 12);
        let samples = lists.iter().enumerate().map(|(i, l)| {
            let shade = (i * 10) as u8;
            let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 8, Rgb([shade, 0, 0])));
            Ok((image, l.as_slice()))
        });

        let dataset = curator().curate_images(samples, &store).unwrap();

        assert_eq!(dataset.train.images.dim(), (10, 224, 224, 3));
        assert_eq!(dataset.train.labels.len(), 10);
        assert!((dataset.train.labels.sum() - 5.0).abs() < f32::EPSILON);

        assert_eq!(dataset.test.images.dim(), (0, 224, 224, 3));
        assert!(dataset.test.is_empty());
    }

    #[test]
    fn test_image_pipeline_propagates_decode_failure() {
        let root = tempdir().unwrap();
        let store = cache(root.path(), Variant::Images, "broken");

        let lists = annotation_lists(1, 1);
        let mut items: Vec<Result<(DynamicImage, &[Annotation])>> = vec![Err(crate::Error::Io(
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing image"),
        ))];
        items.push(Ok((
            DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 4, Rgb([0, 0, 0]))),
            lists[0].as_slice(),
        )));

        assert!(curator().curate_images(items, &store).is_err());
        assert!(!store.dir().exists(), "failed build must persist nothing");
    }

    #[test]
    fn test_seed_reproduces_order() {
        let lists = annotation_lists(20, 100);

        let root_a = tempdir().unwrap();
        let root_b = tempdir().unwrap();
        let a = curator()
            .curate_indices(
                lists.iter().map(|l| l.as_slice()),
                &cache(root_a.path(), Variant::Indices, "a"),
            )
            .unwrap();
        let b = curator()
            .curate_indices(
                lists.iter().map(|l| l.as_slice()),
                &cache(root_b.path(), Variant::Indices, "b"),
            )
            .unwrap();

        assert_eq!(a.train.indices, b.train.indices);
        assert_eq!(a.test.indices, b.test.indices);
    }
}
