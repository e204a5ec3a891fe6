pub mod campaign;
pub mod inference;
pub mod manager;
pub mod schema;
pub mod search;
pub mod traits;

pub use campaign::CampaignConfig;
pub use inference::InferenceConfig;
pub use manager::{AppConfig, ConfigManager};
pub use schema::SchemaConfig;
pub use search::SearchConfig;
