pub mod features;
pub mod posterior;
pub mod svi;

pub use features::FeatureEncoder;
pub use posterior::GaussianPosterior;
pub use svi::SviEngine;
