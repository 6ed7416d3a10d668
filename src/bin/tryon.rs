use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use sha2::Digest as _;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "tryon", version)]
struct Cli {
    /// Engine config JSON (defaults apply to missing fields).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the heuristic placement for a photo size as JSON.
    Propose(ProposeArgs),
    /// Composite an overlay onto a photo and write a PNG.
    Compose(ComposeArgs),
    /// Replay recorded interaction steps, then export a PNG.
    Replay(ReplayArgs),
}

#[derive(Parser, Debug)]
struct ProposeArgs {
    /// Photo width in pixels.
    #[arg(long)]
    width: u32,

    /// Photo height in pixels.
    #[arg(long)]
    height: u32,
}

#[derive(Parser, Debug)]
struct ImageArgs {
    /// Input photo (PNG, JPEG, ...).
    #[arg(long)]
    photo: PathBuf,

    /// Overlay graphic (PNG or SVG).
    #[arg(long)]
    overlay: PathBuf,

    /// Width the photo was displayed at on screen. Defaults to the natural width.
    #[arg(long)]
    display_width: Option<f64>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Print the SHA-256 of the written PNG.
    #[arg(long)]
    digest: bool,
}

#[derive(Parser, Debug)]
struct ComposeArgs {
    #[command(flatten)]
    images: ImageArgs,

    /// Placement JSON (`{"x":..,"y":..,"scale":..,"rotation":..}`).
    #[arg(long)]
    state: Option<PathBuf>,

    /// Re-run the placement heuristic, even when auto-positioning on load is disabled.
    #[arg(long, conflicts_with = "state")]
    auto: bool,
}

#[derive(Parser, Debug)]
struct ReplayArgs {
    #[command(flatten)]
    images: ImageArgs,

    /// JSON array of interaction steps.
    #[arg(long)]
    script: PathBuf,

    /// Container height in on-screen pixels. Defaults to the photo aspect at `--display-width`.
    #[arg(long, requires = "display_width")]
    container_height: Option<f64>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    match cli.cmd {
        Command::Propose(args) => cmd_propose(args),
        Command::Compose(args) => cmd_compose(&config, args),
        Command::Replay(args) => cmd_replay(&config, args),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<tryon::EngineConfig> {
    let cfg = match path {
        Some(p) => tryon::EngineConfig::load(p)?,
        None => tryon::EngineConfig::default(),
    };
    Ok(cfg.with_env_overrides()?)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> anyhow::Result<T> {
    let f = File::open(path).with_context(|| format!("open {what} '{}'", path.display()))?;
    let v = serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parse {what} JSON '{}'", path.display()))?;
    Ok(v)
}

fn cmd_propose(args: ProposeArgs) -> anyhow::Result<()> {
    let state = tryon::propose(args.width, args.height)?;
    println!("{}", serde_json::to_string_pretty(&state)?);
    Ok(())
}

/// Load both images into a session and size the viewport like the on-screen preview.
fn open_session(
    config: &tryon::EngineConfig,
    args: &ImageArgs,
    container_height: Option<f64>,
) -> anyhow::Result<tryon::TryOnSession> {
    let mut session = tryon::TryOnSession::new(config)?;

    let photo_bytes = std::fs::read(&args.photo)
        .with_context(|| format!("read photo '{}'", args.photo.display()))?;
    let overlay_bytes = std::fs::read(&args.overlay)
        .with_context(|| format!("read overlay '{}'", args.overlay.display()))?;

    session.load_photo_bytes(&photo_bytes)?;
    session.load_overlay_bytes(&overlay_bytes)?;

    let natural = session.controller().photo()?;
    if let Some(w) = args.display_width {
        anyhow::ensure!(
            w.is_finite() && w > 0.0,
            "--display-width must be a positive number"
        );
        let h = match container_height {
            Some(h) => {
                anyhow::ensure!(
                    h.is_finite() && h > 0.0,
                    "--container-height must be a positive number"
                );
                h
            }
            None => w * f64::from(natural.height) / f64::from(natural.width),
        };
        session.set_viewport(tryon::Size::new(w, h))?;
    }
    Ok(session)
}

fn write_result(session: &mut tryon::TryOnSession, args: &ImageArgs) -> anyhow::Result<()> {
    let result = session.export()?;

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, result.png())
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    if args.digest {
        println!("{}", sha256_hex(result.png()));
    }
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_compose(config: &tryon::EngineConfig, args: ComposeArgs) -> anyhow::Result<()> {
    let mut session = open_session(config, &args.images, None)?;
    if let Some(path) = &args.state {
        let state: tryon::PlacementState = read_json(path, "placement")?;
        session.controller_mut().set_placement(state)?;
    } else if args.auto {
        session.controller_mut().auto_position()?;
    }
    write_result(&mut session, &args.images)
}

fn cmd_replay(config: &tryon::EngineConfig, args: ReplayArgs) -> anyhow::Result<()> {
    let steps: Vec<tryon::InteractionStep> = read_json(&args.script, "interaction script")?;
    let mut session = open_session(config, &args.images, args.container_height)?;
    for (i, step) in steps.into_iter().enumerate() {
        session
            .controller_mut()
            .replay(step)
            .with_context(|| format!("interaction step {i}"))?;
    }
    if let Some(snapshot) = session.snapshot() {
        eprintln!("placement: {}", serde_json::to_string(&snapshot)?);
    }
    write_result(&mut session, &args.images)
}

fn sha256_hex(bytes: &[u8]) -> String {
    let digest = sha2::Sha256::digest(bytes);
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest {
        out.push_str(&format!("{:02x}", b));
    }
    out
}
