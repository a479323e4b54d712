//! Describes what two images have in common.
//!
//! ```sh
//! GCP_PROJECT=my-project GOOGLE_ACCESS_TOKEN=$(gcloud auth print-access-token) \
//!     cargo run --example simple
//! ```

use dotenv::dotenv;
use gemini_multimodal::{
    logging::{init_logging, LogLevel},
    MultiModal, VertexConfig,
};
use std::error::Error;

const IMAGE_PATH: &str = "demos/frog.png";
const WRAP_WIDTH: usize = 79;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();
    init_logging(LogLevel::Info);

    // "gemini-1.5-pro" also works, if only text is sent
    let mut mm = MultiModal::new("gemini-1.0-pro-vision", 0.4);

    // Build a prompt
    mm.add_image(IMAGE_PATH)?;
    mm.add_uri("gs://generativeai-downloads/images/scones.jpg");
    mm.add_text("Describe what is common for these two images.");

    let config = VertexConfig::from_env()?;

    let token_count = mm.count_tokens(&config.project_id, &config.location).await?;
    println!("Sending {} tokens.\n", token_count);

    let response = mm.submit(&config.project_id, &config.location).await?;
    println!("{}", textwrap::fill(&response, WRAP_WIDTH));

    Ok(())
}
