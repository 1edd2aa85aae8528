//! # Prompt Assembly
//!
//! Fixed instructions and the pure functions that splice user input and
//! restaurant metadata into them. Nothing here performs I/O.

use crate::models::RestaurantInfo;

pub const ANALYSIS_INSTRUCTION: &str = "Analyze this food image and describe what you see. Focus on the dish, ingredients, presentation, and any details that would help create a professional food photo.";

pub const GENERATION_PREAMBLE: &str = "Create a professional, mouth-watering food photograph that would be perfect for restaurant social media. ";

pub const GENERATION_CLOSING: &str = "The image should be high-quality, well-lit, appetizing, and suitable for social media marketing. Focus on making the food look irresistible with professional food photography techniques.";

const CAPTION_PERSONA: &str = "You are a social media expert for restaurants. Create engaging captions and hashtags for food posts. ";

/// Number of hashtags asked of the caption model.
pub const REQUESTED_HASHTAGS: usize = 15;

/// Builds the image-synthesis prompt. Each optional clause appears only when
/// its input is non-empty or present.
pub fn compose_generation_prompt(
    prompt_text: &str,
    image_analysis: &str,
    restaurant: Option<&RestaurantInfo>,
) -> String {
    let mut prompt = GENERATION_PREAMBLE.to_string();

    if !image_analysis.is_empty() {
        prompt.push_str(&format!("Based on this food description: {}. ", image_analysis));
    }

    if !prompt_text.is_empty() {
        prompt.push_str(&format!("User's specific request: {}. ", prompt_text));
    }

    if let Some(info) = restaurant {
        prompt.push_str(&restaurant_clause("This is for", info));
        prompt.push(' ');
    }

    prompt.push_str(GENERATION_CLOSING);
    prompt
}

pub fn caption_system_prompt(restaurant: Option<&RestaurantInfo>) -> String {
    match restaurant {
        Some(info) => format!("{}{}", CAPTION_PERSONA, restaurant_clause("The restaurant is", info)),
        None => CAPTION_PERSONA.to_string(),
    }
}

pub fn caption_user_prompt(prompt_text: &str) -> String {
    format!(
        "Create a compelling social media caption and {} relevant hashtags for this food image request: {}. Return the response in JSON format with \"caption\" and \"hashtags\" fields.",
        REQUESTED_HASHTAGS, prompt_text
    )
}

fn restaurant_clause(lead: &str, info: &RestaurantInfo) -> String {
    format!(
        "{} {}, a {} restaurant with a {} personality.",
        lead, info.name, info.cuisine_type, info.brand_personality
    )
}
