pub mod mse;
pub mod cross_entropy;
pub mod cost_type;

pub use mse::MseCost;
pub use cross_entropy::CrossEntropyCost;
pub use cost_type::CostType;
