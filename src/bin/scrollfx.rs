use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "scrollfx", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse and validate a page description.
    Validate(ValidateArgs),
    /// Evaluate every binding at one scroll position and print JSON.
    Eval(EvalArgs),
    /// Sample the full scroll range and print one JSON line per step.
    Sweep(SweepArgs),
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    /// Input page JSON (omit to use the built-in film-site page).
    #[arg(long = "in")]
    in_path: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct EvalArgs {
    /// Input page JSON (omit to use the built-in film-site page).
    #[arg(long = "in")]
    in_path: Option<PathBuf>,

    /// Viewport size as WIDTHxHEIGHT, in px.
    #[arg(long, value_parser = parse_viewport, default_value = "1280x800")]
    viewport: (f64, f64),

    /// Vertical scroll position, in px.
    #[arg(long, default_value_t = 0.0)]
    scroll: f64,
}

#[derive(Parser, Debug)]
struct SweepArgs {
    /// Input page JSON (omit to use the built-in film-site page).
    #[arg(long = "in")]
    in_path: Option<PathBuf>,

    /// Viewport size as WIDTHxHEIGHT, in px.
    #[arg(long, value_parser = parse_viewport, default_value = "1280x800")]
    viewport: (f64, f64),

    /// Number of scroll steps to sample.
    #[arg(long, default_value_t = 16)]
    steps: u32,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Validate(args) => cmd_validate(args),
        Command::Eval(args) => cmd_eval(args),
        Command::Sweep(args) => cmd_sweep(args),
    }
}

fn parse_viewport(s: &str) -> Result<(f64, f64), String> {
    let (w, h) = s
        .split_once('x')
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    let w: f64 = w.parse().map_err(|_| format!("bad width '{w}'"))?;
    let h: f64 = h.parse().map_err(|_| format!("bad height '{h}'"))?;
    if w <= 0.0 || h <= 0.0 {
        return Err("viewport dimensions must be > 0".to_string());
    }
    Ok((w, h))
}

fn read_page(path: Option<&Path>) -> anyhow::Result<scrollfx::Page> {
    match path {
        Some(path) => {
            let f = File::open(path).with_context(|| format!("open page '{}'", path.display()))?;
            let r = BufReader::new(f);
            let page: scrollfx::Page =
                serde_json::from_reader(r).with_context(|| "parse page JSON")?;
            Ok(page)
        }
        None => Ok(scrollfx::presets::film_site()?),
    }
}

fn cmd_validate(args: ValidateArgs) -> anyhow::Result<()> {
    let page = read_page(args.in_path.as_deref())?;
    page.validate()?;
    eprintln!(
        "ok: {} sections, {} viewport-heights tall",
        page.sections.len(),
        page.total_height_units()
    );
    Ok(())
}

fn cmd_eval(args: EvalArgs) -> anyhow::Result<()> {
    let page = read_page(args.in_path.as_deref())?;
    let (width, height) = args.viewport;
    let viewport = scrollfx::Viewport::new(width, height);

    let hub = scrollfx::ScrollHub::new();
    let runtime = scrollfx::PageRuntime::mount(&page, &hub, &viewport)?;
    hub.emit_scroll(&viewport.at_scroll(args.scroll));

    let snapshot = runtime.snapshot()?;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

fn cmd_sweep(args: SweepArgs) -> anyhow::Result<()> {
    let page = read_page(args.in_path.as_deref())?;
    let (width, height) = args.viewport;
    let viewport = scrollfx::Viewport::new(width, height);

    let hub = scrollfx::ScrollHub::new();
    let runtime = scrollfx::PageRuntime::mount(&page, &hub, &viewport)?;

    let max = scrollfx::layout::max_scroll(&page.sections, &viewport);
    let steps = args.steps.max(1);
    for k in 0..=steps {
        let scroll = max * f64::from(k) / f64::from(steps);
        hub.emit_scroll(&viewport.at_scroll(scroll));
        let snapshot = runtime.snapshot()?;
        let line = serde_json::json!({
            "scroll": scroll,
            "sections": snapshot.sections,
        });
        println!("{line}");
    }
    Ok(())
}
