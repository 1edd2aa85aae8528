use anyhow::{Context, Result};
use clap::Parser;
use dotenvy::dotenv;
use log::info;
use std::path::PathBuf;

use restogenie::{Config, FoodImagePipeline, GenerationRequest, ImageBlob, RestaurantInfo};

/// Turn raw food photos into a social-media-ready image, caption and hashtags.
#[derive(Parser, Debug)]
#[command(name = "restogenie", version)]
struct Cli {
    /// What you want the enhanced photo to look like
    #[arg(short, long, default_value = "")]
    prompt: String,

    /// Raw food photo; repeat for several (only the first is analyzed)
    #[arg(short, long = "image")]
    images: Vec<PathBuf>,

    /// Style reference photo
    #[arg(short, long)]
    reference: Option<PathBuf>,

    #[arg(long, requires = "cuisine_type", requires = "brand_personality")]
    restaurant_name: Option<String>,

    #[arg(long, requires = "restaurant_name")]
    cuisine_type: Option<String>,

    #[arg(long, requires = "restaurant_name")]
    brand_personality: Option<String>,
}

impl Cli {
    fn into_request(self) -> GenerationRequest {
        let restaurant_info = match (self.restaurant_name, self.cuisine_type, self.brand_personality) {
            (Some(name), Some(cuisine), Some(personality)) => {
                Some(RestaurantInfo::new(name, cuisine, personality))
            }
            _ => None,
        };

        GenerationRequest {
            prompt_text: self.prompt,
            raw_images: self.images.into_iter().map(ImageBlob::from_path).collect(),
            reference_image: self.reference.map(ImageBlob::from_path),
            restaurant_info,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let config = Config::from_env()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    let request = Cli::parse().into_request();
    if request.is_empty() {
        anyhow::bail!("Provide --prompt or at least one --image");
    }

    let pipeline = FoodImagePipeline::from_config(&config)?;
    info!("🍽️ Sending generation request...");

    let interrupted = async {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };
    let result = pipeline.generate_until(&request, interrupted).await?;

    let output = serde_json::to_string_pretty(&result).context("Failed to serialize result")?;
    println!("{}", output);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_builds_request() {
        let cli = Cli::try_parse_from([
            "restogenie",
            "--prompt",
            "rustic plating",
            "-i",
            "a.jpg",
            "-i",
            "b.jpg",
            "--restaurant-name",
            "Mario's",
            "--cuisine-type",
            "Italian",
            "--brand-personality",
            "cozy",
        ])
        .unwrap();

        let request = cli.into_request();
        assert_eq!(request.prompt_text, "rustic plating");
        assert_eq!(request.raw_images.len(), 2);
        assert!(request.reference_image.is_none());
        assert_eq!(
            request.restaurant_info,
            Some(RestaurantInfo::new("Mario's", "Italian", "cozy"))
        );
    }

    #[test]
    fn test_cli_requires_complete_restaurant_info() {
        let result = Cli::try_parse_from(["restogenie", "--restaurant-name", "Mario's"]);
        assert!(result.is_err());
    }
}
