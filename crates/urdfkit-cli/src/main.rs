use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use urdfkit::{
    parse_with_config, serialize_with_config, Config, Element, FormatConfig, LinkView, Registry,
    RobotView,
};

#[derive(Debug, Parser)]
#[command(
    name = "urdfkit",
    version,
    about = "Validate, normalise and inspect URDF robot descriptions"
)]
struct Cli {
    /// Expander run on .xacro inputs; it receives the file path and must print URDF
    #[arg(long, global = true, value_name = "CMD", default_value = "xacro")]
    xacro_command: String,
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Debug, Subcommand)]
enum Cmd {
    /// Print the canonical form of a document
    Show(ShowArgs),
    /// Validate a document and print a summary
    Check(InputArgs),
    /// List visual and collision geometry per link
    Geometry(InputArgs),
    /// Print a default element of a registered type
    Create {
        #[arg(value_name = "TYPE")]
        type_name: String,
        /// Populate every optional attribute, child and extension block
        #[arg(long)]
        with_optional: bool,
    },
    /// List registered element types
    Types,
}

#[derive(Debug, Args)]
struct InputArgs {
    /// Input file (defaults to stdin)
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,
    /// Fill missing required content with defaults instead of failing
    #[arg(long)]
    lenient: bool,
}

#[derive(Debug, Args)]
struct ShowArgs {
    #[command(flatten)]
    source: InputArgs,
    /// Print the element tree as JSON
    #[arg(long)]
    json: bool,
    /// Spaces per indentation level
    #[arg(long, default_value_t = 2)]
    indent: usize,
    /// Output file (defaults to stdout)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();

    run(Cli::parse())
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Cmd::Show(args) => {
            let element = load(&args.source, &cli.xacro_command)?;
            let mut output = if args.json {
                serde_json::to_string_pretty(&element).context("failed to encode JSON")?
            } else {
                serialize_with_config(&element, &FormatConfig::new(args.indent))?
            };
            if args.json {
                output.push('\n');
            }
            write_output(&args.output, output.as_bytes())
        }
        Cmd::Check(args) => {
            let element = load(&args, &cli.xacro_command)?;
            write_output(&None, summary(&element).as_bytes())
        }
        Cmd::Geometry(args) => {
            let element = load(&args, &cli.xacro_command)?;
            write_output(&None, geometry_listing(&element)?.as_bytes())
        }
        Cmd::Create {
            type_name,
            with_optional,
        } => {
            let element = if with_optional {
                urdfkit::create_materialized(&type_name)?
            } else {
                urdfkit::create(&type_name)?
            };
            write_output(&None, urdfkit::serialize(&element).as_bytes())
        }
        Cmd::Types => {
            let mut listing = String::new();
            for schema in Registry::global().schemas() {
                let tag = if schema.tag == schema.type_name {
                    String::new()
                } else {
                    format!("<{}>", schema.tag)
                };
                listing.push_str(&format!(
                    "{:<22}{:<22}{}\n",
                    schema.type_name, tag, schema.summary
                ));
            }
            write_output(&None, listing.as_bytes())
        }
    }
}

fn load(args: &InputArgs, xacro_command: &str) -> Result<Element> {
    let label = args
        .input
        .as_ref()
        .map_or_else(|| "stdin".to_string(), |path| path.display().to_string());
    let text = match &args.input {
        Some(path) if is_xacro(path) => expand_xacro(path, xacro_command)?,
        _ => read_input(&args.input)?,
    };
    info!("Parsing {label}");
    let config = Config::default().with_lenient(args.lenient);
    parse_with_config(&text, config).with_context(|| format!("failed to parse {label}"))
}

fn is_xacro(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some("xacro")
}

fn expand_xacro(path: &Path, command: &str) -> Result<String> {
    let mut parts = command.split_whitespace();
    let Some(program) = parts.next() else {
        bail!("empty --xacro-command");
    };
    debug!(program, "expanding {}", path.display());
    let output = Command::new(program)
        .args(parts)
        .arg(path)
        .output()
        .with_context(|| format!("failed to run {command:?}"))?;
    if !output.status.success() {
        bail!(
            "{command:?} failed on {}: {}",
            path.display(),
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    String::from_utf8(output.stdout).context("expander produced invalid utf-8")
}

fn summary(element: &Element) -> String {
    match RobotView::new(element) {
        Ok(robot) => {
            let root = robot
                .root_link()
                .map_or_else(|| "none".to_string(), |link| link.name().to_string());
            format!(
                "ok: robot {:?} with {} links, {} joints, root link {root}\n",
                robot.name(),
                robot.links().count(),
                robot.joints().count(),
            )
        }
        Err(_) => format!("ok: <{}> ({})\n", element.tag(), element.type_name()),
    }
}

fn geometry_listing(element: &Element) -> Result<String> {
    let links: Vec<LinkView<'_>> = match element.type_name() {
        "robot" => RobotView::new(element)?.links().collect(),
        "link" => vec![LinkView::new(element)?],
        other => bail!("geometry listing needs a <robot> or <link>, found <{other}>"),
    };
    let mut listing = String::new();
    for link in links {
        listing.push_str(link.name());
        listing.push('\n');
        for geometry in link.visual_geometries() {
            listing.push_str(&format!("  visual    {geometry}\n"));
        }
        for geometry in link.collision_geometries() {
            listing.push_str(&format!("  collision {geometry}\n"));
        }
    }
    Ok(listing)
}

fn read_input(path: &Option<PathBuf>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read input file {}", path.display())),
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            if buffer.trim().is_empty() {
                bail!("no input provided on stdin");
            }
            Ok(buffer)
        }
    }
}

fn write_output(path: &Option<PathBuf>, data: &[u8]) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, data)
            .with_context(|| format!("failed to write output file {}", path.display())),
        None => {
            let mut stdout = io::stdout();
            stdout.write_all(data).context("failed to write stdout")?;
            Ok(())
        }
    }
}
