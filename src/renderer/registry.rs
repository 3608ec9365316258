//! Style registry: maps style identifiers to renderer constructors.

use std::collections::HashMap;
use std::fmt;
use std::sync::{LazyLock, RwLock};

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::StyleError;
use crate::renderer::markdown::{MdRenderer, MARKDOWN_STYLE};
use crate::renderer::traits::Render;

/// Builds a renderer from the option fields of a config map (everything but `style`).
pub type Constructor = fn(&Map<String, Value>) -> Result<Box<dyn Render>, StyleError>;

/// What `build` accepts.
pub enum RendererConfig {
    /// An already-built renderer, returned unchanged.
    Instance(Box<dyn Render>),
    /// A bare style name, built with default options.
    Style(String),
    /// A map holding a `style` key plus option fields.
    Options(Map<String, Value>),
}

impl fmt::Debug for RendererConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RendererConfig::Instance(renderer) => {
                f.debug_tuple("Instance").field(renderer).finish()
            }
            RendererConfig::Style(style) => f.debug_tuple("Style").field(style).finish(),
            RendererConfig::Options(map) => f.debug_tuple("Options").field(map).finish(),
        }
    }
}

impl From<Box<dyn Render>> for RendererConfig {
    fn from(renderer: Box<dyn Render>) -> Self {
        RendererConfig::Instance(renderer)
    }
}

impl From<&str> for RendererConfig {
    fn from(style: &str) -> Self {
        RendererConfig::Style(style.to_string())
    }
}

impl From<String> for RendererConfig {
    fn from(style: String) -> Self {
        RendererConfig::Style(style)
    }
}

impl From<Map<String, Value>> for RendererConfig {
    fn from(map: Map<String, Value>) -> Self {
        RendererConfig::Options(map)
    }
}

impl TryFrom<Value> for RendererConfig {
    type Error = StyleError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(style) => Ok(RendererConfig::Style(style)),
            Value::Object(map) => Ok(RendererConfig::Options(map)),
            other => Err(StyleError::ConfigShape(json_type_name(&other).to_string())),
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Registered renderer constructors, keyed by style identifier.
#[derive(Default)]
pub struct StyleRegistry {
    styles: HashMap<String, Constructor>,
}

impl fmt::Debug for StyleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StyleRegistry")
            .field("styles", &self.styles())
            .finish()
    }
}

impl StyleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the styles this crate ships.
    pub fn with_builtin_styles() -> Result<Self, StyleError> {
        let mut registry = Self::new();
        register_builtin_styles(&mut registry)?;
        Ok(registry)
    }

    /// Associate `style` with `constructor`. The first registration wins for good.
    pub fn register(&mut self, style: &str, constructor: Constructor) -> Result<(), StyleError> {
        if self.styles.contains_key(style) {
            warn!(style, "rejected duplicate style registration");
            return Err(StyleError::DuplicateStyle(style.to_string()));
        }

        debug!(style, "registered renderer style");
        self.styles.insert(style.to_string(), constructor);
        Ok(())
    }

    pub fn contains(&self, style: &str) -> bool {
        self.styles.contains_key(style)
    }

    pub fn styles(&self) -> Vec<&str> {
        let mut styles: Vec<&str> = self.styles.keys().map(String::as_str).collect();
        styles.sort_unstable();
        styles
    }

    pub fn build(&self, config: impl Into<RendererConfig>) -> Result<Box<dyn Render>, StyleError> {
        let (style, options) = match config.into() {
            RendererConfig::Instance(renderer) => return Ok(renderer),
            RendererConfig::Style(style) => (style, Map::new()),
            RendererConfig::Options(mut map) => match map.remove("style") {
                Some(Value::String(style)) => (style, map),
                Some(other) => {
                    return Err(StyleError::ConfigShape(format!(
                        "a map whose `style` is {}",
                        json_type_name(&other)
                    )))
                }
                None => {
                    return Err(StyleError::ConfigShape(
                        "a map without a `style` key".to_string(),
                    ))
                }
            },
        };

        let constructor = self
            .styles
            .get(&style)
            .ok_or_else(|| StyleError::UnknownStyle(style.clone()))?;

        debug!(style = %style, options = options.len(), "building renderer");
        constructor(&options)
    }
}

fn build_markdown(options: &Map<String, Value>) -> Result<Box<dyn Render>, StyleError> {
    Ok(Box::new(MdRenderer::from_options(options)?))
}

pub fn register_builtin_styles(registry: &mut StyleRegistry) -> Result<(), StyleError> {
    registry.register(MARKDOWN_STYLE, build_markdown)
}

static REGISTRY: LazyLock<RwLock<StyleRegistry>> = LazyLock::new(|| {
    let mut registry = StyleRegistry::new();
    register_builtin_styles(&mut registry).expect("built-in styles collide in an empty registry");
    RwLock::new(registry)
});

/// The process-wide registry, holding the built-in styles.
pub fn registry() -> &'static RwLock<StyleRegistry> {
    &REGISTRY
}

/// Register a style in the process-wide registry.
pub fn register_style(style: &str, constructor: Constructor) -> Result<(), StyleError> {
    registry()
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .register(style, constructor)
}

/// Build a renderer from the process-wide registry.
pub fn build(config: impl Into<RendererConfig>) -> Result<Box<dyn Render>, StyleError> {
    registry()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .build(config)
}
