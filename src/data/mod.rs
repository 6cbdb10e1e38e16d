pub mod data_point;
pub mod idx;
pub mod image;
pub mod image_loader;

pub use data_point::DataPoint;
pub use self::image::Image;
pub use image_loader::{DataFile, DataFormat, ImageLoader};
