use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{anyhow, bail, Context};
use bingo_card::compositor::{
    comparison_sheet, flatten_on_white, label_comparison_sheet, label_verification_sheet,
    load_rgba, save_png, verification_sheet, CardAssets, CardRenderer,
};
use bingo_card::text::CaptionFont;
use bingo_card::{detect_wins, CardConfig, HighlightSet, Session, ShareLink, TileCoord};

const USAGE: &str = "\
usage: bingo_card <command> [options]

commands:
  render  --name N --title T [--marks TOKEN] [--mark R,C]... [--no-shuffle] [--seed S] [--out FILE]
  link    --name N --title T [--marks TOKEN] [--mark R,C]...
  open    URL [--out FILE]
  check   TOKEN
  verify  [--out FILE] [--original FILE [--compare-out FILE]]

every command accepts --config FILE";

#[derive(Debug, Default)]
struct Args {
    command: String,
    positional: Vec<String>,
    name: Option<String>,
    title: Option<String>,
    marks: Option<String>,
    mark: Vec<TileCoord>,
    no_shuffle: bool,
    seed: Option<u32>,
    config: Option<PathBuf>,
    out: Option<PathBuf>,
    original: Option<PathBuf>,
    compare_out: Option<PathBuf>,
}

fn parse_args(mut raw: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut args = Args {
        command: raw.next().ok_or("missing command")?,
        ..Args::default()
    };
    while let Some(arg) = raw.next() {
        let mut value = |flag: &str| raw.next().ok_or(format!("{flag} needs a value"));
        match arg.as_str() {
            "--name" => args.name = Some(value("--name")?),
            "--title" | "--movie" => args.title = Some(value("--title")?),
            "--marks" => args.marks = Some(value("--marks")?),
            "--mark" => {
                let text = value("--mark")?;
                let coord = TileCoord::parse_pair(&text)
                    .ok_or(format!("--mark expects R,C in 0..5, got {text:?}"))?;
                args.mark.push(coord);
            }
            "--seed" => {
                let text = value("--seed")?;
                args.seed = Some(text.parse().map_err(|_| format!("bad seed {text:?}"))?);
            }
            "--config" => args.config = Some(PathBuf::from(value("--config")?)),
            "--out" => args.out = Some(PathBuf::from(value("--out")?)),
            "--original" => args.original = Some(PathBuf::from(value("--original")?)),
            "--compare-out" => args.compare_out = Some(PathBuf::from(value("--compare-out")?)),
            "--no-shuffle" => args.no_shuffle = true,
            flag if flag.starts_with("--") => return Err(format!("unknown option {flag}")),
            _ => args.positional.push(arg.clone()),
        }
    }
    Ok(args)
}

/// Caller-side fallback when no name/title is given; the library itself never
/// draws entropy.
fn fresh_seed() -> anyhow::Result<u32> {
    let mut buf = [0u8; 4];
    getrandom::getrandom(&mut buf).map_err(|e| anyhow!("no entropy available: {e}"))?;
    Ok(u32::from_le_bytes(buf) & 0x7fff_ffff)
}

fn apply_marks(session: &mut Session, args: &Args) {
    if let Some(token) = &args.marks {
        session.set_highlights(HighlightSet::decode(token));
    }
    for &coord in &args.mark {
        if !session.toggle(coord) {
            log::warn!("{coord} is the free space and is always marked");
        }
    }
}

fn player_session(args: &Args) -> anyhow::Result<Session> {
    let name = args.name.as_deref().unwrap_or_default();
    let title = args.title.as_deref().unwrap_or_default();
    let session = match Session::generate(name, title) {
        Some(_) if args.seed.is_some() => bail!("--seed cannot be combined with --name/--title"),
        Some(session) => session,
        None => {
            let seed = match args.seed {
                Some(seed) => seed,
                None => {
                    let seed = fresh_seed()?;
                    log::info!("no name/title given; using random seed {seed}");
                    seed
                }
            };
            Session::with_seed(seed).named(name, title)
        }
    };
    Ok(if args.no_shuffle {
        session.into_unshuffled()
    } else {
        session
    })
}

fn configured_font(config: &CardConfig) -> anyhow::Result<Option<CaptionFont>> {
    config
        .assets
        .font
        .as_deref()
        .map(CaptionFont::load)
        .transpose()
        .context("loading caption font")
}

fn render(config: &CardConfig, session: &Session, out: &Path) -> anyhow::Result<()> {
    let assets = CardAssets::load(&config.assets).context("loading card assets")?;
    let font = configured_font(config)?;

    let mut renderer = CardRenderer::new(&assets, &config.style);
    if let Some(font) = &font {
        renderer = renderer.with_font(font);
    }
    let card = renderer.render(session)?;
    save_png(&flatten_on_white(&card), out)?;

    report_wins(session);
    Ok(())
}

fn report_wins(session: &Session) {
    let wins = session.wins();
    if wins.is_bingo() {
        let lines: Vec<String> = wins.lines().iter().map(ToString::to_string).collect();
        println!("BINGO: {}", lines.join(", "));
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let config = CardConfig::load_or_default(args.config.as_deref())?;
    match args.command.as_str() {
        "render" => {
            let mut session = player_session(&args)?;
            apply_marks(&mut session, &args);
            let out = args.out.clone().unwrap_or_else(|| PathBuf::from("bingo_card.png"));
            render(&config, &session, &out)
        }
        "link" => {
            let name = args.name.as_deref().unwrap_or_default();
            let title = args.title.as_deref().unwrap_or_default();
            let mut session = Session::generate(name, title)
                .context("link needs a non-empty --name and --title")?;
            apply_marks(&mut session, &args);
            println!("{}", session.share_link().to_url(&config.share.base_url));
            Ok(())
        }
        "open" => {
            let url = args.positional.first().context("open needs a URL")?;
            let link = ShareLink::parse(url);
            let session = Session::from_share_link(&link)
                .context("link is missing a name or movie parameter")?;
            let out = args.out.clone().unwrap_or_else(|| PathBuf::from("bingo_card.png"));
            render(&config, &session, &out)
        }
        "check" => {
            let token = args.positional.first().map(String::as_str).unwrap_or_default();
            let marks = HighlightSet::decode(token);
            let cells: Vec<String> = marks.iter().map(|c| c.to_string()).collect();
            println!("marked: {}", cells.join(" "));
            let wins = detect_wins(&marks);
            if wins.is_bingo() {
                for line in wins.lines() {
                    println!("win: {line}");
                }
            } else {
                println!("no bingo");
            }
            Ok(())
        }
        "verify" => {
            let assets = CardAssets::load(&config.assets).context("loading card assets")?;
            let out = args
                .out
                .clone()
                .unwrap_or_else(|| PathBuf::from("square_verification.png"));
            let font = configured_font(&config)?;
            if font.is_none() {
                log::info!("no font configured; sheets are written without labels");
            }

            let mut sheet = verification_sheet(&assets);
            if let Some(font) = &font {
                label_verification_sheet(&mut sheet, &assets, font);
            }
            save_png(&sheet, &out)?;

            if let Some(path) = &args.original {
                let original = load_rgba(path).context("loading original card")?;
                let mut comparison = comparison_sheet(&original, &assets);
                if let Some(font) = &font {
                    label_comparison_sheet(&mut comparison, original.width(), font);
                }
                let compare_out = args
                    .compare_out
                    .clone()
                    .unwrap_or_else(|| PathBuf::from("comparison.png"));
                save_png(&comparison, &compare_out)?;
            }
            Ok(())
        }
        other => bail!("unknown command {other:?}\n\n{USAGE}"),
    }
}

fn main() -> anyhow::Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{msg}\n\n{USAGE}");
            return Ok(ExitCode::from(2));
        }
    };
    run(args)?;
    Ok(ExitCode::SUCCESS)
}
