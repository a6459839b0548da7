use image::imageops::FilterType;
use image::DynamicImage;
use ndarray::Array3;

/// Side length the downstream classifier expects.
pub const IMAGE_SIZE: u32 = 224;

const PIXEL_SCALE: f32 = 127.5;

/// Resizes an image to `IMAGE_SIZE` square RGB and rescales pixel
/// intensities from `[0, 255]` to `[-1, 1]`. Output shape is
/// `(IMAGE_SIZE, IMAGE_SIZE, 3)`.
pub fn preprocess(image: &DynamicImage) -> Array3<f32> {
    let resized = image
        .resize_exact(IMAGE_SIZE, IMAGE_SIZE, FilterType::Triangle)
        .to_rgb8();

    Array3::from_shape_fn(
        (IMAGE_SIZE as usize, IMAGE_SIZE as usize, 3),
        |(y, x, c)| {
            let pixel = resized.get_pixel(x as u32, y as u32);
            pixel[c] as f32 / PIXEL_SCALE - 1.0
        },
    )
}
