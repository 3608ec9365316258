use anyhow::{bail, Context, Result};
use clap::Parser;
use docdown::{build, Entity, Node, ObjectIndex, Render, RendererConfig};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "docdown", about = "Render a documentation object tree to markdown")]
struct Cli {
    /// JSON file holding an array of documented entities
    input: PathBuf,

    /// Rendering style
    #[arg(short, long, default_value = "markdown", conflicts_with = "config")]
    style: String,

    /// JSON renderer config: a style name, or a map with a `style` key and options
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Render only the object at this path (aliases are resolved)
    #[arg(long)]
    object: Option<String>,

    /// Write one `<path>.md` file per entity into this directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Header level for entity titles
    #[arg(long)]
    header_level: Option<usize>,

    /// Leave out call signatures
    #[arg(long)]
    no_signature: bool,
}

impl Cli {
    fn renderer_config(&self) -> Result<RendererConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("failed to read config {}", path.display()))?;
                let value: Value = serde_json::from_str(&text)
                    .with_context(|| format!("failed to parse config {}", path.display()))?;
                RendererConfig::try_from(value)?
            }
            None => RendererConfig::Style(self.style.clone()),
        };

        let mut overrides = Map::new();
        if let Some(level) = self.header_level {
            overrides.insert("header_level".to_string(), Value::from(level));
        }
        if self.no_signature {
            overrides.insert("show_signature".to_string(), Value::Bool(false));
        }

        if !overrides.is_empty() {
            config = match config {
                RendererConfig::Style(style) => {
                    overrides.insert("style".to_string(), Value::String(style));
                    RendererConfig::Options(overrides)
                }
                RendererConfig::Options(mut map) => {
                    map.extend(overrides);
                    RendererConfig::Options(map)
                }
                instance => instance,
            };
        }

        Ok(config)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let json = fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;
    let index = ObjectIndex::load_json(&json)
        .with_context(|| format!("failed to load object tree from {}", cli.input.display()))?;
    debug!(objects = index.len(), "loaded object tree");

    let renderer = build(cli.renderer_config()?)?;
    info!(style = renderer.style(), "built renderer");

    let pages = match &cli.object {
        Some(path) => vec![render_object(renderer.as_ref(), &index, path)?],
        None => index
            .roots()
            .iter()
            .map(|entity| render_entity(renderer.as_ref(), entity))
            .collect::<Result<Vec<_>>>()?,
    };

    match &cli.output {
        Some(dir) => write_pages(dir, &pages)?,
        None => println!(
            "{}",
            pages
                .iter()
                .map(|(_, text)| text.as_str())
                .collect::<Vec<_>>()
                .join("\n\n")
        ),
    }

    Ok(())
}

fn render_entity(renderer: &dyn Render, entity: &Entity) -> Result<(String, String)> {
    let text = renderer
        .render(Node::Entity(entity))
        .with_context(|| format!("failed to render {}", entity.canonical_path()))?;
    Ok((entity.canonical_path().to_string(), text))
}

fn render_object(renderer: &dyn Render, index: &ObjectIndex, path: &str) -> Result<(String, String)> {
    if let Some(entity) = index.get(path) {
        return render_entity(renderer, entity);
    }

    let Some(alias) = index.find_alias(path) else {
        bail!("no object named `{}` in the tree", path);
    };

    let target = index.resolve(alias)?;
    let text = renderer
        .render(Node::Alias { alias, target })
        .with_context(|| format!("failed to render alias {}", path))?;
    Ok((path.to_string(), text))
}

fn write_pages(dir: &Path, pages: &[(String, String)]) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory {}", dir.display()))?;

    for (path, text) in pages {
        let file = dir.join(format!("{}.md", path));
        fs::write(&file, format!("{}\n", text))
            .with_context(|| format!("failed to write {}", file.display()))?;
        info!(file = %file.display(), "wrote page");
    }

    Ok(())
}
