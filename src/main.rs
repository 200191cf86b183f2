use std::path::PathBuf;

use accessory_recolor::color::{COLOR_PRESETS, find_preset};
use accessory_recolor::config::RecolorConfig;
use accessory_recolor::{
    AspectRatio, ColorChoice, HasRecoverySuggestion, HexColor, RecolorRequest, recolor_file,
};
use anyhow::{Result, anyhow};
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Recolor the hair accessory in a photo with a generative image model.
///
/// The API key is read from GEMINI_API_KEY (or API_KEY) unless --api-key is given.
#[derive(Parser, Debug)]
#[command(name = "recolor")]
#[command(about = "🎀 Recolor the hair accessory in a photo, keeping texture and background")]
#[command(long_about = "Recolor the hair accessory in a photo, keeping its texture, shape and the background.
Choose the target color from a preset, free text, or an exact hex value.")]
struct Args {
    /// Source photo (JPEG, PNG or WebP, up to 5MB)
    #[arg(required_unless_present = "list_presets")]
    image: Option<PathBuf>,

    /// Preset color name
    #[arg(short, long, group = "target", help = "Preset color, e.g. \"navy blue\" (see --list-presets)")]
    preset: Option<String>,

    /// Free-text color description
    #[arg(short, long, group = "target", help = "Describe the color: \"dusty rose\", \"#ff8800\", ...")]
    color: Option<String>,

    /// Exact color as #RRGGBB
    #[arg(long, group = "target", help = "Exact color as #RRGGBB")]
    pick: Option<String>,

    /// Output aspect ratio override
    #[arg(short, long, value_enum, help = "Output aspect ratio (defaults to the closest match to the photo)")]
    aspect: Option<AspectRatio>,

    /// Directory for the recolored image
    #[arg(short, long, default_value = ".", help = "Where to write recolored-accessory-<millis>.<ext>")]
    out_dir: PathBuf,

    /// Model name override
    #[arg(long, help = "Image model (default: gemini-2.5-flash-image, or GEMINI_MODEL)")]
    model: Option<String>,

    /// API endpoint root override
    #[arg(long, help = "API endpoint root (default: GEMINI_API_BASE or the public endpoint)")]
    api_base: Option<String>,

    /// API key override
    #[arg(long, help = "API key (default: GEMINI_API_KEY, then API_KEY)")]
    api_key: Option<String>,

    /// Print the preset catalog and exit
    #[arg(long)]
    list_presets: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();

    let args = Args::parse();

    if args.list_presets {
        print_presets();
        return Ok(());
    }

    let image = args
        .image
        .ok_or_else(|| anyhow!("An image path is required"))?;
    let color = parse_color_choice(args.preset, args.color, args.pick)?;

    let mut config = RecolorConfig::from_env().with_output_dir(args.out_dir);
    if let Some(key) = args.api_key {
        config = config.with_api_key(key);
    }
    if let Some(base) = args.api_base {
        config = config.with_api_base(base);
    }
    if let Some(model) = args.model {
        config = config.with_model(model);
    }
    config.validate().map_err(anyhow::Error::msg)?;

    let request = RecolorRequest {
        image,
        color,
        aspect: args.aspect,
    };

    match recolor_file(&config, request).await {
        Ok(path) => {
            println!("{}", path.display());
            Ok(())
        }
        Err(e) => {
            error!(category = e.category(), "{}", e);
            let mut message = e.user_message();
            if let Some(hint) = e.recovery_suggestion() {
                message.push_str("\nhint: ");
                message.push_str(hint);
            }
            Err(anyhow::Error::msg(message))
        }
    }
}

/// Turn the mutually exclusive color flags into a color choice.
fn parse_color_choice(
    preset: Option<String>,
    color: Option<String>,
    pick: Option<String>,
) -> Result<ColorChoice> {
    if let Some(name) = preset {
        let preset = find_preset(&name).ok_or_else(|| {
            anyhow!(
                "Unknown preset: {}. Use one of: {}",
                name,
                COLOR_PRESETS.iter().map(|p| p.name).collect::<Vec<_>>().join(", ")
            )
        })?;
        return Ok(ColorChoice::Preset(preset));
    }
    if let Some(text) = color {
        return Ok(ColorChoice::Text(text));
    }
    if let Some(hex) = pick {
        return Ok(ColorChoice::Picker(hex.parse::<HexColor>()?));
    }
    Err(anyhow!("Choose a target color with --preset, --color or --pick"))
}

fn print_presets() {
    for preset in COLOR_PRESETS.iter() {
        println!("{:<14} {}  {}", preset.name, preset.hex, preset.prompt_text);
    }
}
