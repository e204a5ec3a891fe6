pub mod thompson;

pub use thompson::ThompsonSampler;
