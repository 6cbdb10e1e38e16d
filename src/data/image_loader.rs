use std::path::Path;

use rayon::prelude::*;
use serde::{Serialize, Deserialize};
use tracing::{debug, info};

use crate::data::data_point::DataPoint;
use crate::data::idx;
use crate::data::image::Image;
use crate::error::{NnError, Result};

const PIXEL_MAX: f64 = 255.0;

/// How an image/label file pair is framed on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataFormat {
    /// Concatenated fixed-size image blocks and one byte per label, no header.
    #[default]
    Raw,
    /// IDX3 images and IDX1 labels (MNIST).
    Idx,
}

/// One image file and its matching label file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataFile {
    pub images: String,
    pub labels: String,
}

/// Decodes labelled image byte streams into `Image`s and `DataPoint`s.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageLoader {
    pub image_size: usize,
    pub greyscale: bool,
    pub label_names: Vec<String>,
}

impl ImageLoader {
    pub fn new(image_size: usize, greyscale: bool, label_names: Vec<String>) -> ImageLoader {
        ImageLoader { image_size, greyscale, label_names }
    }

    pub fn channels(&self) -> usize {
        if self.greyscale { 1 } else { 3 }
    }

    /// Length of the pixel vector fed to the network.
    pub fn input_size(&self) -> usize {
        self.image_size * self.image_size * self.channels()
    }

    /// Number of classes.
    pub fn output_size(&self) -> usize {
        self.label_names.len()
    }

    /// Cuts `image_data` into images and pairs them with `label_data`.
    ///
    /// The dataset holds `min(image count, label count)` entries; the longer
    /// stream is silently truncated, as is any trailing partial image.
    pub fn load_images(&self, image_data: &[u8], label_data: &[u8]) -> Vec<Image> {
        let bytes_per_image = self.input_size();
        if bytes_per_image == 0 {
            return Vec::new();
        }

        let number_of_images = image_data.len() / bytes_per_image;
        let dataset_size = number_of_images.min(label_data.len());

        let pixel_values: Vec<f64> = image_data
            .par_iter()
            .map(|&byte| byte as f64 / PIXEL_MAX)
            .collect();

        let images: Vec<Image> = (0..dataset_size)
            .into_par_iter()
            .map(|image_index| {
                let offset = image_index * bytes_per_image;
                Image::new(
                    self.image_size,
                    self.greyscale,
                    pixel_values[offset..offset + bytes_per_image].to_vec(),
                    label_data[image_index] as usize,
                )
            })
            .collect();

        debug!(
            number_of_images,
            number_of_labels = label_data.len(),
            dataset_size,
            "decoded image stream"
        );
        images
    }

    /// Reads every file pair from disk and concatenates the decoded images.
    pub fn load_files(&self, files: &[DataFile], format: DataFormat) -> Result<Vec<Image>> {
        let mut all_images = Vec::new();

        for file in files {
            let image_bytes = std::fs::read(Path::new(&file.images))?;
            let label_bytes = std::fs::read(Path::new(&file.labels))?;

            let images = match format {
                DataFormat::Raw => self.load_images(&image_bytes, &label_bytes),
                DataFormat::Idx => {
                    let (header, pixels) = idx::image_payload(&image_bytes)?;
                    let size_matches =
                        header.rows == self.image_size && header.cols == self.image_size;
                    if !self.greyscale || !size_matches {
                        return Err(NnError::InvalidData(format!(
                            "{}: IDX images are {}x{} greyscale, loader expects {}x{} {}",
                            file.images,
                            header.rows,
                            header.cols,
                            self.image_size,
                            self.image_size,
                            if self.greyscale { "greyscale" } else { "colour" },
                        )));
                    }
                    let labels = idx::label_payload(&label_bytes)?;
                    self.load_images(pixels, labels)
                }
            };

            info!(
                images = %file.images,
                labels = %file.labels,
                count = images.len(),
                "loaded data file"
            );
            all_images.extend(images);
        }

        Ok(all_images)
    }

    /// One-hot `DataPoint`s for every image.
    ///
    /// Fails if an image carries a label outside `label_names`.
    pub fn data_points(&self, images: &[Image]) -> Result<Vec<DataPoint>> {
        let output_size = self.output_size();
        if let Some(bad) = images.iter().find(|image| image.label >= output_size) {
            return Err(NnError::InvalidData(format!(
                "label {} is out of range for {} label names",
                bad.label, output_size
            )));
        }
        Ok(images.iter().map(|image| image.to_data_point(output_size)).collect())
    }
}
