use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use cryptomatte::{
    ImagePlane, InputImage, LayerCatalog, Manifest, ManifestPolicy, Node, NodeSettings, PickMode,
    SamplePoint,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "cryptomatte", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the objects of a manifest JSON file.
    Manifest(ManifestArgs),
    /// List the crypto layers published in a plane's metadata.
    Layers(LayersArgs),
    /// Decode a plane and write the composited RGBA as a PNG.
    Render(RenderArgs),
    /// Pick the object under a pixel and update the settings file.
    Pick(PickArgs),
}

#[derive(Parser, Debug)]
struct ManifestArgs {
    /// Manifest JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Layer name used in diagnostics.
    #[arg(long, default_value = "manifest")]
    layer: String,

    /// Skip malformed entries instead of failing.
    #[arg(long)]
    lenient: bool,
}

#[derive(Parser, Debug)]
struct LayersArgs {
    /// Input plane JSON.
    #[arg(long)]
    scene: PathBuf,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input plane JSON.
    #[arg(long)]
    scene: PathBuf,

    /// Node settings JSON; defaults apply when omitted.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct PickArgs {
    /// Input plane JSON.
    #[arg(long)]
    scene: PathBuf,

    /// Node settings JSON; created when missing.
    #[arg(long)]
    settings: PathBuf,

    /// Sample x coordinate.
    #[arg(long, allow_negative_numbers = true)]
    x: f32,

    /// Sample y coordinate.
    #[arg(long, allow_negative_numbers = true)]
    y: f32,

    /// Add or remove the picked object.
    #[arg(long, value_enum, default_value_t = ModeChoice::Add)]
    mode: ModeChoice,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeChoice {
    Add,
    Remove,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Manifest(args) => cmd_manifest(args),
        Command::Layers(args) => cmd_layers(args),
        Command::Render(args) => cmd_render(args),
        Command::Pick(args) => cmd_pick(args),
    }
}

fn read_plane_json(path: &Path) -> anyhow::Result<ImagePlane> {
    let f = File::open(path).with_context(|| format!("open plane '{}'", path.display()))?;
    let r = BufReader::new(f);
    let plane: ImagePlane = serde_json::from_reader(r).with_context(|| "parse plane JSON")?;
    Ok(plane)
}

fn read_settings(path: Option<&Path>) -> anyhow::Result<NodeSettings> {
    match path {
        Some(p) if p.exists() => Ok(NodeSettings::load(p)?),
        _ => Ok(NodeSettings::default()),
    }
}

/// Build a node for `plane`, keeping the settings' layer when it names a published one.
fn prepare_node(settings: NodeSettings, plane: &ImagePlane) -> anyhow::Result<Node> {
    let keep_layer = !settings.layer_name.is_empty();
    let locked = settings.layer_lock;
    let mut node = Node::new(settings)?;
    if keep_layer {
        node.set_layer_lock(true);
    }
    node.input_changed(plane)?;
    node.set_layer_lock(locked);
    node.force_update()?;
    node.validate(plane);
    Ok(node)
}

fn cmd_manifest(args: ManifestArgs) -> anyhow::Result<()> {
    let raw = std::fs::read(&args.in_path)
        .with_context(|| format!("read manifest '{}'", args.in_path.display()))?;
    let policy = if args.lenient {
        ManifestPolicy::Lenient
    } else {
        ManifestPolicy::Strict
    };
    let manifest = Manifest::load(&args.layer, &raw, policy)?;
    for (name, id) in manifest.iter() {
        println!("{name}\t{id}\t{}", id.to_f32());
    }
    eprintln!("{} objects", manifest.len());
    Ok(())
}

fn cmd_layers(args: LayersArgs) -> anyhow::Result<()> {
    let plane = read_plane_json(&args.scene)?;
    let catalog = LayerCatalog::from_metadata(plane.metadata());
    for (i, name) in catalog.names().into_iter().enumerate() {
        println!("{i}\t{name}");
    }
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let plane = read_plane_json(&args.scene)?;
    let settings = read_settings(args.settings.as_deref())?;
    let node = prepare_node(settings, &plane)?;

    let rendered = node.render(&plane)?;

    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        &args.out,
        &rendered.to_rgba8(),
        rendered.width(),
        rendered.height(),
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_pick(args: PickArgs) -> anyhow::Result<()> {
    let plane = read_plane_json(&args.scene)?;
    let settings = read_settings(Some(&args.settings))?;
    let mut node = prepare_node(settings, &plane)?;

    let mode = match args.mode {
        ModeChoice::Add => PickMode::Add,
        ModeChoice::Remove => PickMode::Remove,
    };
    let outcome = node.pick(mode, SamplePoint::new(args.x, args.y), &plane);
    eprintln!("{outcome:?}");

    let settings = node.into_settings();
    settings.save(&args.settings)?;
    println!("{}", settings.matte_list);
    Ok(())
}
