use clap::{Parser, Subcommand};
use log::{error, info};
use contentgen::{
  parse_social_posts, GenerationFacade, Length, ProviderId
};

/// Generate marketing content with the configured AI provider
#[derive(Parser)]
#[command(name = "contentgen", version)]
struct Cli
{   /// Start with this provider instead of AI_PROVIDER
    #[arg(long, global = true)]
    provider: Option<ProviderId>
  , #[command(subcommand)]
    command: Command
}

#[derive(Subcommand)]
enum Command
{   /// Marketing copy for a product
    Copy
    {   product: String
      , #[arg(long)]
        audience: Option<String>
      , #[arg(long)]
        tone: Option<String>
      , #[arg(long)]
        length: Option<Length>
    }
  , /// Product description
    Desc
    {   product_name: String
      , /// Repeat for each feature
        #[arg(long = "feature")]
        features: Vec<String>
      , #[arg(long)]
        style: Option<String>
    }
  , /// Social media posts
    Social
    {   platform: String
      , topic: String
      , #[arg(long)]
        style: Option<String>
      , #[arg(long)]
        count: Option<u32>
    }
}

#[tokio::main]
async fn main()
{   env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli).await
    {   error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>>
{   let facade = GenerationFacade::from_env()?;
    if let Some(id) = cli.provider
    {   facade.switch_provider(id)?;
    }
    info!("Generating with {}", facade.provider_name());

    let (result, expected_posts) = match cli.command
    {   Command::Copy { product, audience, tone, length } => {
          let result = facade
            .generate_marketing_copy(
              &product
            , audience.as_deref()
            , tone.as_deref()
            , length
            )
            .await?;
          (result, None)
        }
      , Command::Desc { product_name, features, style } => {
          let features = if features.is_empty() { None } else { Some(features) };
          let result = facade
            .generate_product_desc(&product_name, features, style.as_deref())
            .await?;
          (result, None)
        }
      , Command::Social { platform, topic, style, count } => {
          let result = facade
            .generate_social_content(&platform, &topic, style.as_deref(), count)
            .await?;
          (result, Some(count.unwrap_or(contentgen::request::DEFAULT_POST_COUNT)))
        }
    };

    let mut output = serde_json::to_value(&result)?;
    if let (Some(expected), Some(content)) = (expected_posts, result.content())
    {   output["posts"] = serde_json::to_value(
          parse_social_posts(content, expected as usize)
        )?;
    }
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
