use crate::coco::Annotation;

/// Category id of "dog" in the COCO instances taxonomy.
pub const DOG: u32 = 18;

/// True iff any annotation carries the target category.
pub fn has_target(annotations: &[Annotation], target: u32) -> bool {
    annotations.iter().any(|a| a.category_id == target)
}
