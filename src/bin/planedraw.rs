use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "planedraw", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile an expression and print its normalized form.
    Check(CheckArgs),
    /// Evaluate an expression at one coordinate.
    Eval(EvalArgs),
    /// Draw a blank frame and write every plane as a grayscale PNG.
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct CheckArgs {
    /// Postfix expression.
    #[arg(long)]
    expr: String,

    /// Also print the operand tree as JSON.
    #[arg(long)]
    tree: bool,
}

#[derive(Parser, Debug)]
struct EvalArgs {
    /// Postfix expression.
    #[arg(long)]
    expr: String,

    #[arg(long, default_value_t = 0)]
    x: u32,

    #[arg(long, default_value_t = 0)]
    y: u32,

    /// Evaluate through the tree representation.
    #[arg(long)]
    tree: bool,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Optional `DrawConfig` JSON; `--expr` replaces its expressions.
    #[arg(long)]
    config: Option<PathBuf>,

    /// One expression per plane (repeatable).
    #[arg(long = "expr")]
    exprs: Vec<String>,

    #[arg(long)]
    width: u32,

    #[arg(long)]
    height: u32,

    #[arg(long, default_value_t = 1)]
    planes: u8,

    /// log2 horizontal chroma subsampling.
    #[arg(long, default_value_t = 0)]
    subsampling_w: u8,

    /// log2 vertical chroma subsampling.
    #[arg(long, default_value_t = 0)]
    subsampling_h: u8,

    #[arg(long, default_value_t = 8)]
    bits: u8,

    /// Build LUTs through the tree representation.
    #[arg(long)]
    tree: bool,

    /// Worker thread count for LUT construction.
    #[arg(long)]
    threads: Option<usize>,

    /// Build LUTs on the calling thread only.
    #[arg(long)]
    sequential: bool,

    /// Directory receiving `plane0.png`, `plane1.png`, ...
    #[arg(long)]
    out_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Check(args) => cmd_check(args),
        Command::Eval(args) => cmd_eval(args),
        Command::Render(args) => cmd_render(args),
    }
}

fn representation(tree: bool) -> planedraw::Representation {
    if tree {
        planedraw::Representation::Tree
    } else {
        planedraw::Representation::Flat
    }
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<()> {
    let compiled = planedraw::CompiledExpr::compile(&args.expr, representation(args.tree))
        .with_context(|| format!("compile expression '{}'", args.expr))?;

    println!("{}", compiled.source());
    println!("result: {:?}", compiled.program().result_type());
    if let Some(tree) = compiled.tree() {
        println!("{}", serde_json::to_string_pretty(tree)?);
    }
    Ok(())
}

fn cmd_eval(args: EvalArgs) -> anyhow::Result<()> {
    let compiled = planedraw::CompiledExpr::compile(&args.expr, representation(args.tree))
        .with_context(|| format!("compile expression '{}'", args.expr))?;
    let v = compiled
        .evaluate(args.x, args.y)
        .with_context(|| format!("evaluate at ({}, {})", args.x, args.y))?;
    println!("{v}");
    Ok(())
}

fn read_config_json(path: &Path) -> anyhow::Result<planedraw::DrawConfig> {
    let f = File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
    let r = BufReader::new(f);
    let cfg: planedraw::DrawConfig =
        serde_json::from_reader(r).with_context(|| "parse config JSON")?;
    Ok(cfg)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut cfg = match &args.config {
        Some(path) => read_config_json(path)?,
        None => planedraw::DrawConfig::default(),
    };
    if !args.exprs.is_empty() {
        cfg.exprs = args.exprs.clone();
    }
    if args.tree {
        cfg.representation = planedraw::Representation::Tree;
    }
    if args.sequential {
        cfg.threading.parallel = false;
    }
    if args.threads.is_some() {
        cfg.threading.threads = args.threads;
    }

    let format = planedraw::VideoFormat {
        width: args.width,
        height: args.height,
        num_planes: args.planes,
        subsampling_w: args.subsampling_w,
        subsampling_h: args.subsampling_h,
        bits_per_sample: args.bits,
        sample_type: planedraw::SampleType::Integer,
    };

    let filter = planedraw::DrawFilter::new(format, &cfg).context("build draw filter")?;
    let blank = planedraw::Frame::new(format)?;
    let frame = filter.process_frame(&blank)?;

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;

    for (p, plane) in frame.planes().iter().enumerate() {
        let out = args.out_dir.join(format!("plane{p}.png"));
        write_plane_png(plane, &out)?;
        eprintln!("wrote {}", out.display());
    }
    Ok(())
}

fn write_plane_png(plane: &planedraw::Plane, out: &Path) -> anyhow::Result<()> {
    let dims = plane.dims();
    let saved = match plane.packed_samples() {
        planedraw::PlaneData::U8(data) => {
            let img = image::ImageBuffer::<image::Luma<u8>, _>::from_raw(
                dims.width,
                dims.height,
                data,
            )
            .context("plane buffer size mismatch (bug)")?;
            img.save_with_format(out, image::ImageFormat::Png)
        }
        planedraw::PlaneData::U16(data) => {
            let img = image::ImageBuffer::<image::Luma<u16>, _>::from_raw(
                dims.width,
                dims.height,
                data,
            )
            .context("plane buffer size mismatch (bug)")?;
            img.save_with_format(out, image::ImageFormat::Png)
        }
    };
    saved.with_context(|| format!("write png '{}'", out.display()))
}
