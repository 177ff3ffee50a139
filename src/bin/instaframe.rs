use std::{
    path::{Path, PathBuf},
    str::FromStr,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "instaframe", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Frame a photo, place stamps and write the export PNG.
    Render(RenderArgs),
    /// Replay a JSON edit script and save the export into a directory.
    Replay(ReplayArgs),
    /// Print the effective editor configuration as JSON.
    Config(ConfigArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Photo to frame.
    #[arg(long)]
    photo: PathBuf,

    /// Caption text below the photo.
    #[arg(long, default_value = "")]
    caption: String,

    /// Stamp as `glyph@x,y[,scale[,degrees]]`; repeatable, painted in order.
    #[arg(long = "stamp")]
    stamps: Vec<StampArg>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Pixels per frame unit (defaults to the configured export scale).
    #[arg(long)]
    scale: Option<f64>,

    /// Editor config JSON.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct ReplayArgs {
    /// Edit script JSON.
    #[arg(long)]
    script: PathBuf,

    /// Directory receiving the exported PNG.
    #[arg(long)]
    out_dir: PathBuf,

    /// Editor config JSON.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct ConfigArgs {
    /// Config JSON to validate and print instead of the defaults.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Clone, Debug)]
struct StampArg {
    glyph: instaframe::StampGlyph,
    at: instaframe::Point,
    scale: Option<f64>,
    degrees: Option<f64>,
}

impl FromStr for StampArg {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let (glyph, rest) = s
            .split_once('@')
            .with_context(|| format!("stamp '{s}' must look like glyph@x,y[,scale[,degrees]]"))?;
        let nums = rest
            .split(',')
            .map(|v| {
                v.trim()
                    .parse::<f64>()
                    .with_context(|| format!("bad number '{v}' in stamp '{s}'"))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        if !(2..=4).contains(&nums.len()) {
            anyhow::bail!("stamp '{s}' needs 2 to 4 numbers after '@'");
        }
        Ok(Self {
            glyph: glyph.parse()?,
            at: instaframe::Point::new(nums[0], nums[1]),
            scale: nums.get(2).copied(),
            degrees: nums.get(3).copied(),
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Replay(args) => cmd_replay(args).await,
        Command::Config(args) => cmd_config(args),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<instaframe::EditorConfig> {
    let cfg = match path {
        Some(p) => instaframe::EditorConfig::from_json_file(p)?,
        None => instaframe::EditorConfig::default(),
    };
    let cfg = cfg.with_env_overrides();
    cfg.validate()?;
    Ok(cfg)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut cfg = load_config(args.config.as_deref())?;
    if let Some(scale) = args.scale {
        cfg.export_scale = scale;
    }
    let fonts = instaframe::FontSet::load(&cfg.fonts)?;
    let scale = cfg.export_scale;
    let spawn = cfg.layout.spawn_point;
    let mut editor = instaframe::Editor::new(cfg)?;

    let bytes = std::fs::read(&args.photo)
        .with_context(|| format!("read photo '{}'", args.photo.display()))?;
    let ticket = editor.begin_photo_load();
    let outcome = editor.complete_photo_load(ticket, instaframe::decode_photo(bytes));
    if outcome != instaframe::LoadOutcome::Applied {
        anyhow::bail!("could not load photo '{}'", args.photo.display());
    }

    editor.set_caption_text(args.caption);
    for (i, stamp) in args.stamps.iter().enumerate() {
        editor.add_stamp(stamp.glyph)?;
        place_stamp(&mut editor, instaframe::TouchSequence(i as u64), spawn, stamp);
    }

    let job = editor.begin_export()?;
    let exported = instaframe::Exporter::new(fonts, scale)?.export(&job.scene);
    let result = exported.and_then(|img| write_png(&args.out, &img));
    editor.complete_export(job.ticket, &result);
    let saved = result?;

    eprintln!("wrote {} ({} bytes)", saved.location, saved.len);
    Ok(())
}

/// Move the freshly added (topmost) stamp with one synthetic touch sequence.
fn place_stamp(
    editor: &mut instaframe::Editor,
    sequence: instaframe::TouchSequence,
    spawn: instaframe::Point,
    stamp: &StampArg,
) {
    use instaframe::{GestureChange, GestureEvent};

    let mut changes = vec![GestureChange::Drag(stamp.at)];
    changes.extend(stamp.scale.map(GestureChange::Magnify));
    changes.extend(stamp.degrees.map(|d| GestureChange::Rotate(d.to_radians())));

    editor.handle_gesture(GestureEvent::Began { sequence, at: spawn });
    for change in changes {
        editor.handle_gesture(GestureEvent::Changed { sequence, change });
    }
    editor.handle_gesture(GestureEvent::Ended { sequence });
}

fn write_png(
    out: &Path,
    img: &instaframe::ExportedImage,
) -> instaframe::InstaframeResult<instaframe::SavedMedia> {
    let png = img.encode_png()?;
    let write = || -> anyhow::Result<()> {
        if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
        std::fs::write(out, &png).with_context(|| format!("write png '{}'", out.display()))?;
        Ok(())
    };
    write().map_err(|e| instaframe::InstaframeError::persistence(format!("{e:#}")))?;
    Ok(instaframe::SavedMedia {
        location: out.display().to_string(),
        len: png.len(),
    })
}

async fn cmd_replay(args: ReplayArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.config.as_deref())?;
    let script = instaframe::EditScript::from_json_file(&args.script)?;
    let root = args.script.parent().unwrap_or_else(|| Path::new("."));

    let session = instaframe::EditorSession::new(
        cfg,
        instaframe::FsPhotoSource::with_root(root),
        instaframe::DirectoryMediaStore::new(&args.out_dir),
    )?;

    if let Some(photo) = &script.photo {
        let outcome = session.pick_photo(photo.clone().into()).await?;
        if outcome != instaframe::LoadOutcome::Applied {
            anyhow::bail!("could not load photo '{}'", photo.display());
        }
    }
    session.with_editor(|editor| script.apply(editor))?;

    let saved = session.export().await?;
    eprintln!("wrote {} ({} bytes)", saved.location, saved.len);
    Ok(())
}

fn cmd_config(args: ConfigArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.config.as_deref())?;
    println!("{}", serde_json::to_string_pretty(&cfg)?);
    Ok(())
}
