pub mod activation;

pub use activation::ActivationType;
