use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use particle_morph::text::{default_rasterizer, RasterSettings};
use particle_morph::SceneConfig;

#[derive(Parser)]
#[command(name = "particle-morph")]
#[command(about = "Particles that morph between a tree, an exploded shell and a line of text", long_about = None)]
struct Cli {
    /// Scene configuration (JSON). Defaults are used for anything missing
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Text to spell out in text mode
    #[arg(short, long)]
    text: Option<String>,

    /// Total number of particles
    #[arg(short = 'n', long)]
    particles: Option<u32>,

    /// Font file for the text canvas
    #[arg(long)]
    font: Option<PathBuf>,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    print_config: bool,

    /// Render the text canvas to a PNG file and exit
    #[arg(long, value_name = "PNG")]
    dump_text_canvas: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn scene_config(&self) -> Result<SceneConfig, particle_morph::ConfigError> {
        let mut config = match &self.config {
            Some(path) => SceneConfig::load(path)?,
            None => SceneConfig::default(),
        };
        if let Some(text) = &self.text {
            config.text.content = text.clone();
        }
        if let Some(count) = self.particles {
            config.particles.total_count = count;
        }
        if let Some(font) = &self.font {
            config.text.font_path = Some(font.clone());
        }
        config.validate()?;
        Ok(config)
    }
}

fn dump_text_canvas(config: &SceneConfig, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let settings = RasterSettings::from(&config.text);
    let rasterizer = default_rasterizer(&config.text);
    match rasterizer.render(&config.text.content, &settings) {
        Some(canvas) => {
            canvas.save(path)?;
            log::info!("wrote {}x{} text canvas to {}", canvas.width(), canvas.height(), path.display());
        }
        None => log::warn!("no text canvas could be rendered"),
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = cli.scene_config()?;

    if cli.print_config {
        println!("{}", config.to_json()?);
        return Ok(());
    }
    if let Some(path) = &cli.dump_text_canvas {
        return dump_text_canvas(&config, path);
    }

    particle_morph::run(config)?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
