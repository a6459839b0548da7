use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use image::DynamicImage;
use serde::Deserialize;

use crate::error::Result;

/// One object annotation. Only the category is consulted; everything else
/// in the corpus record (bbox, segmentation, ...) is ignored on ingest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Annotation {
    pub category_id: u32,
}

#[derive(Debug, Deserialize)]
struct ImageRecord {
    id: u64,
    file_name: String,
}

#[derive(Debug, Deserialize)]
struct AnnotationRecord {
    image_id: u64,
    category_id: u32,
}

#[derive(Debug, Deserialize)]
struct InstancesFile {
    images: Vec<ImageRecord>,
    annotations: Vec<AnnotationRecord>,
}

/// One corpus image with its annotation list.
#[derive(Debug, Clone)]
pub struct CocoSample {
    pub id: u64,
    pub file_name: String,
    pub annotations: Vec<Annotation>,
}

/// A COCO-style detection corpus loaded from an `instances_*.json`
/// annotation file. Samples iterate in ascending image-id order, matching
/// the reference `CocoDetection` loaders.
pub struct CocoSource {
    path: PathBuf,
    samples: Vec<CocoSample>,
}

impl CocoSource {
    pub fn load(annotation_file: &Path) -> Result<Self> {
        let file = File::open(annotation_file)?;
        let parsed: InstancesFile = serde_json::from_reader(BufReader::new(file))?;

        let mut by_id: BTreeMap<u64, CocoSample> = parsed
            .images
            .into_iter()
            .map(|record| {
                (
                    record.id,
                    CocoSample {
                        id: record.id,
                        file_name: record.file_name,
                        annotations: Vec::new(),
                    },
                )
            })
            .collect();

        // Annotations referencing unknown image ids are dropped.
        for record in parsed.annotations {
            if let Some(sample) = by_id.get_mut(&record.image_id) {
                sample.annotations.push(Annotation {
                    category_id: record.category_id,
                });
            }
        }

        Ok(Self {
            path: annotation_file.to_path_buf(),
            samples: by_id.into_values().collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[CocoSample] {
        &self.samples
    }

    /// Identity string for cache fingerprinting: annotation file plus the
    /// number of images it declares.
    pub fn identity(&self) -> String {
        format!("{}#{}", self.path.display(), self.samples.len())
    }

    /// Per-sample annotation lists in corpus order, for the index pipeline.
    pub fn annotation_lists(&self) -> impl Iterator<Item = &[Annotation]> {
        self.samples.iter().map(|s| s.annotations.as_slice())
    }

    /// Streams decoded images with their annotations, for the image
    /// pipeline. Decode failures surface as items.
    pub fn decoded<'a>(
        &'a self,
        image_root: &'a Path,
    ) -> impl Iterator<Item = Result<(DynamicImage, &'a [Annotation])>> + 'a {
        self.samples.iter().map(move |sample| {
            let image = image::open(image_root.join(&sample.file_name))?;
            Ok((image, sample.annotations.as_slice()))
        })
    }
}
