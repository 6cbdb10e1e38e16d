use image::imageops::FilterType;
use image::GenericImageView;

use crate::data::data_point::DataPoint;
use crate::error::Result;

/// A square image with pixel intensities normalised to [0, 1].
///
/// Greyscale images hold one value per pixel; colour images hold R, G, B
/// interleaved.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub size: usize,
    pub greyscale: bool,
    pub pixel_values: Vec<f64>,
    pub label: usize,
}

impl Image {
    pub fn new(size: usize, greyscale: bool, pixel_values: Vec<f64>, label: usize) -> Image {
        Image { size, greyscale, pixel_values, label }
    }

    /// Decodes PNG/JPEG/BMP/GIF bytes, resizes to `size × size` and normalises.
    pub fn from_encoded(bytes: &[u8], size: usize, greyscale: bool, label: usize) -> Result<Image> {
        let decoded = image::load_from_memory(bytes)?;
        let target = size as u32;
        let resized = if decoded.dimensions() == (target, target) {
            decoded
        } else {
            decoded.resize_exact(target, target, FilterType::Lanczos3)
        };

        let pixel_values = if greyscale {
            resized.to_luma8().pixels().map(|p| p.0[0] as f64 / 255.0).collect()
        } else {
            resized.to_rgb8().pixels().flat_map(|p| p.0.map(|c| c as f64 / 255.0)).collect()
        };

        Ok(Image::new(size, greyscale, pixel_values, label))
    }

    pub fn number_of_pixels(&self) -> usize {
        self.size * self.size
    }

    pub fn channels(&self) -> usize {
        if self.greyscale { 1 } else { 3 }
    }

    pub fn flat_index(&self, x: usize, y: usize) -> usize {
        y * self.size + x
    }

    /// Bilinear sample of the first channel at texture coordinates (u, v),
    /// both clamped to [0, 1]. An empty image samples as 0.
    pub fn sample(&self, u: f64, v: f64) -> f64 {
        self.sample_channel(u, v, 0)
    }

    pub fn sample_channel(&self, u: f64, v: f64, channel: usize) -> f64 {
        if self.size == 0 {
            return 0.0;
        }
        let max = (self.size - 1) as f64;
        let tex_x = u.clamp(0.0, 1.0) * max;
        let tex_y = v.clamp(0.0, 1.0) * max;

        let left = tex_x as usize;
        let bottom = tex_y as usize;
        let right = (left + 1).min(self.size - 1);
        let top = (bottom + 1).min(self.size - 1);

        let blend_x = tex_x - left as f64;
        let blend_y = tex_y - bottom as f64;

        let channels = self.channels();
        let px = |x: usize, y: usize| self.pixel_values[self.flat_index(x, y) * channels + channel];

        let value_bottom = px(left, bottom) + (px(right, bottom) - px(left, bottom)) * blend_x;
        let value_top = px(left, top) + (px(right, top) - px(left, top)) * blend_x;
        value_bottom + (value_top - value_bottom) * blend_y
    }

    /// Rescales the image to `size × size` by bilinear sampling.
    pub fn resampled(&self, size: usize) -> Image {
        let channels = self.channels();
        let step = if size > 1 { 1.0 / (size - 1) as f64 } else { 0.0 };
        let mut pixel_values = Vec::with_capacity(size * size * channels);
        for y in 0..size {
            for x in 0..size {
                for channel in 0..channels {
                    let value = self.sample_channel(x as f64 * step, y as f64 * step, channel);
                    pixel_values.push(value);
                }
            }
        }
        Image::new(size, self.greyscale, pixel_values, self.label)
    }

    pub fn to_data_point(&self, number_of_labels: usize) -> DataPoint {
        DataPoint::new(self.pixel_values.clone(), self.label, number_of_labels)
    }
}
