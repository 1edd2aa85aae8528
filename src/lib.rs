pub mod analyzer;
pub mod captions;
pub mod config;
pub mod encoding;
pub mod error;
pub mod http_server;
pub mod image_gen;
pub mod in_flight;
pub mod models;
pub mod openai;
pub mod pipeline;
pub mod prompts;
pub mod provider;

pub use config::Config;
pub use error::PipelineError;
pub use models::{GeneratedResult, GenerationRequest, ImageBlob, RestaurantInfo};
pub use pipeline::FoodImagePipeline;
