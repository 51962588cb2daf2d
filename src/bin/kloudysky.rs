use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use kloudysky::{
    FrameStep, GridStyle, Page, PageEvent, Point, RenderSettings, RenderToMp4Opts, SiteConfig,
    SubmitStatus, ThemeName, Viewport, Web3FormsRelay, contact::form::ContactForm,
    encode::ffmpeg::flatten_to_opaque_rgba8,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "kloudysky", version, about = "Render the KloudySky hero and send contact messages")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Render an MP4 video (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Validate and send a contact message through the relay.
    Contact(ContactArgs),
    /// List the built-in themes.
    Themes,
}

#[derive(Args, Debug)]
struct SceneArgs {
    /// Site config JSON; built-in defaults when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, default_value_t = 1280.0)]
    width: f64,

    #[arg(long, default_value_t = 720.0)]
    height: f64,

    /// Device pixel ratio.
    #[arg(long, default_value_t = 1.0)]
    dpr: f64,

    /// Theme override (dark, light, midnight, sunset).
    #[arg(long)]
    theme: Option<ThemeName>,

    /// Use the flat scrolling grid instead of the curved horizon.
    #[arg(long)]
    perspective: bool,

    /// Seed for star placement and shooting-star spawns.
    #[arg(long)]
    seed: Option<u64>,

    /// Extra directory of .ttf/.otf fonts.
    #[arg(long)]
    fonts_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct FrameArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Scene time in seconds.
    #[arg(long, default_value_t = 2.0)]
    time: f64,

    /// Pointer position `x,y` in CSS pixels, applied before the clock starts.
    #[arg(long, value_parser = parse_point)]
    pointer: Option<Point>,

    /// Show the contact overlay.
    #[arg(long)]
    contact: bool,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    #[arg(long, default_value_t = 5.0)]
    seconds: f64,

    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Sweep a synthetic pointer across the hero.
    #[arg(long)]
    sweep: bool,
}

#[derive(Args, Debug)]
struct ContactArgs {
    #[arg(long)]
    email: String,

    #[arg(long)]
    message: String,

    /// Hidden bot-trap field; any value abandons the submission.
    #[arg(long, default_value = "")]
    botcheck: String,

    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Render(args) => cmd_render(args),
        Command::Contact(args) => cmd_contact(args),
        Command::Themes => {
            cmd_themes();
            Ok(())
        }
    }
}

fn parse_point(s: &str) -> Result<Point, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected x,y but got '{s}'"))?;
    let coord = |v: &str| {
        v.trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid coordinate '{v}': {e}"))
    };
    Ok(Point::new(coord(x)?, coord(y)?))
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<SiteConfig> {
    match path {
        Some(p) => SiteConfig::load(p).with_context(|| format!("load config '{}'", p.display())),
        None => Ok(SiteConfig::default()),
    }
}

fn build_scene(args: &SceneArgs) -> anyhow::Result<(Page, RenderSettings)> {
    let mut config = load_config(args.config.as_ref())?;
    if let Some(theme) = args.theme {
        config.theme = theme;
    }
    if args.perspective {
        config.grid_style = GridStyle::Perspective;
    }
    if args.fonts_dir.is_some() {
        config.fonts_dir = args.fonts_dir.clone();
    }

    let viewport = Viewport::new(args.width, args.height, args.dpr).context("invalid viewport")?;
    let rng = match args.seed {
        Some(seed) => fastrand::Rng::with_seed(seed),
        None => fastrand::Rng::new(),
    };
    let settings = RenderSettings {
        fonts_dir: config.fonts_dir.clone(),
        skip_system_fonts: false,
    };
    Ok((Page::with_rng(&config, viewport, rng), settings))
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let (mut page, settings) = build_scene(&args.scene)?;
    if let Some(p) = args.pointer {
        page.handle_event(PageEvent::PointerMove(p));
    }
    if args.contact {
        page.handle_event(PageEvent::Click(Point::ZERO));
    }

    let ticks = (args.time.max(0.0) * kloudysky::REFERENCE_HZ).round() as u64;
    for _ in 0..ticks {
        page.tick(FrameStep::ONE);
    }

    let mut backend = kloudysky::create_backend(&settings);
    let frame = page.render(backend.as_mut())?;

    let mut rgba = vec![0u8; frame.data.len()];
    flatten_to_opaque_rgba8(&mut rgba, &frame.data, frame.premultiplied, page.theme().background)?;

    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        &args.out,
        &rgba,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let (mut page, settings) = build_scene(&args.scene)?;
    let mut backend = kloudysky::create_backend(&settings);
    let opts = RenderToMp4Opts {
        seconds: args.seconds,
        fps: args.fps,
        sweep: args.sweep,
        overwrite: true,
    };
    let frames =
        kloudysky::render_hero_to_mp4(&mut page, backend.as_mut(), args.out.clone(), &opts)?;
    eprintln!("wrote {} ({frames} frames)", args.out.display());
    Ok(())
}

fn cmd_contact(args: ContactArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_ref())?;
    let relay = Web3FormsRelay::new(&config.relay)?;

    let mut form = ContactForm::new(config.auto_close());
    form.open();
    form.set_email(args.email);
    form.set_message(args.message);
    form.set_botcheck(args.botcheck);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("build tokio runtime")?;
    let status = runtime.block_on(form.submit(&relay));

    let errors = form.errors();
    for msg in [errors.email, errors.message].into_iter().flatten() {
        eprintln!("{msg}");
    }
    match status {
        SubmitStatus::Success => {
            println!("{}", form.status_message().unwrap_or_default());
            Ok(())
        }
        SubmitStatus::Error => anyhow::bail!("{}", form.status_message().unwrap_or_default()),
        SubmitStatus::Idle if !errors.is_empty() => anyhow::bail!("message not sent"),
        SubmitStatus::Idle | SubmitStatus::Submitting => Ok(()),
    }
}

fn cmd_themes() {
    for name in ThemeName::ALL {
        let theme = kloudysky::Theme::builtin(name);
        println!(
            "{:<9} background {}  text {}  grid {}",
            name.as_str(),
            theme.background.to_hex(),
            theme.text.to_hex(),
            theme.grid_hex()
        );
    }
}
