use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Serialize, Deserialize};

use crate::data::{DataFile, DataFormat, ImageLoader};
use crate::error::{NnError, Result};
use crate::network::NetworkConfig;
use crate::train::TrainConfig;

/// Where the labelled images come from and how to decode them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub image_size: usize,
    pub greyscale: bool,
    /// One name per class, in label order.
    pub label_names: Vec<String>,
    pub format: DataFormat,
    pub files: Vec<DataFile>,
}

impl Default for DataConfig {
    fn default() -> Self {
        DataConfig {
            image_size: 28,
            greyscale: true,
            label_names: (0..10).map(|digit| digit.to_string()).collect(),
            format: DataFormat::Raw,
            files: Vec::new(),
        }
    }
}

impl DataConfig {
    pub fn loader(&self) -> ImageLoader {
        ImageLoader::new(self.image_size, self.greyscale, self.label_names.clone())
    }
}

/// Everything a training run needs, read from one JSON file:
///
/// ```json
/// { "network": { "layer_sizes": [784, 100, 10] },
///   "training": { "epochs": 5 },
///   "data": { "format": "idx", "files": [{ "images": "...", "labels": "..." }] } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub network: NetworkConfig,
    pub training: TrainConfig,
    pub data: DataConfig,
}

impl RunConfig {
    pub fn load_json(path: impl AsRef<Path>) -> Result<RunConfig> {
        let reader = BufReader::new(File::open(path)?);
        let config: RunConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks each section and that the network fits the data.
    pub fn validate(&self) -> Result<()> {
        self.network.validate()?;
        self.training.validate()?;

        let loader = self.data.loader();
        let sizes = &self.network.layer_sizes;
        if sizes[0] != loader.input_size() {
            return Err(NnError::InvalidConfig(format!(
                "network input size {} does not match {}x{} {} images ({} values)",
                sizes[0],
                self.data.image_size,
                self.data.image_size,
                if self.data.greyscale { "greyscale" } else { "colour" },
                loader.input_size()
            )));
        }
        if sizes[sizes.len() - 1] != loader.output_size() {
            return Err(NnError::InvalidConfig(format!(
                "network output size {} does not match {} label names",
                sizes[sizes.len() - 1],
                loader.output_size()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_mnist_digits() {
        let config = RunConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.data.loader().input_size(), 784);
    }

    #[test]
    fn parses_nested_sections() {
        let json = r#"{
            "network": { "layer_sizes": [4, 3, 2], "activation": "TanH" },
            "training": { "epochs": 2, "momentum": 0.0 },
            "data": {
                "image_size": 2,
                "label_names": ["off", "on"],
                "format": "idx",
                "files": [{ "images": "a.idx3", "labels": "a.idx1" }]
            }
        }"#;
        let config: RunConfig = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.data.format, DataFormat::Idx);
        assert_eq!(config.data.files[0].labels, "a.idx1");
        assert_eq!(config.training.mini_batch_size, 32);
    }

    #[test]
    fn rejects_network_that_does_not_fit_data() {
        let mut config = RunConfig::default();
        config.network.layer_sizes = vec![100, 10];
        assert!(matches!(config.validate(), Err(NnError::InvalidConfig(_))));

        config.network.layer_sizes = vec![784, 9];
        assert!(config.validate().is_err());
    }
}
