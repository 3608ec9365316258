//! Markdown rendering style.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::trace;

use crate::error::{RenderError, RenderResult, StyleError};
use crate::model::*;
use crate::renderer::components::*;
use crate::renderer::traits::*;

pub const MARKDOWN_STYLE: &str = "markdown";

/// Callback applied to an entity before it is rendered.
pub type PreHook = Arc<dyn Fn(&Entity) -> Entity + Send + Sync>;

fn default_header_level() -> usize {
    2
}

fn default_show_signature() -> bool {
    true
}

/// Options accepted by the markdown style.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MdOptions {
    /// Number of `#` used for entity headers.
    #[serde(default = "default_header_level", alias = "headerLevel")]
    pub header_level: usize,
    /// Emit the call signature line under each header.
    #[serde(default = "default_show_signature", alias = "showSignature")]
    pub show_signature: bool,
}

impl Default for MdOptions {
    fn default() -> Self {
        Self {
            header_level: default_header_level(),
            show_signature: default_show_signature(),
        }
    }
}

/// Renders documentation nodes as markdown.
#[derive(Clone, Default)]
pub struct MdRenderer {
    pub options: MdOptions,
    pre_hook: Option<PreHook>,
}

impl fmt::Debug for MdRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MdRenderer")
            .field("options", &self.options)
            .field("pre_hook", &self.pre_hook.is_some())
            .finish()
    }
}

impl MdRenderer {
    pub fn new(options: MdOptions) -> Self {
        Self {
            options,
            pre_hook: None,
        }
    }

    /// Build from the option fields of a renderer config map.
    pub fn from_options(options: &Map<String, Value>) -> Result<Self, StyleError> {
        let invalid = |message: String| StyleError::InvalidOptions {
            style: MARKDOWN_STYLE.to_string(),
            message,
        };

        let options: MdOptions = serde_json::from_value(Value::Object(options.clone()))
            .map_err(|e| invalid(e.to_string()))?;
        // Section sub-headers sit one level deeper and markdown stops at six.
        if !(1..=5).contains(&options.header_level) {
            return Err(invalid(format!(
                "header_level must be between 1 and 5, got {}",
                options.header_level
            )));
        }

        Ok(Self::new(options))
    }

    pub fn with_pre_hook(mut self, hook: PreHook) -> Self {
        self.pre_hook = Some(hook);
        self
    }

    /// Run the pre-hook, if any, over an entity. `render` never calls this itself.
    pub fn prepare<'a>(&self, entity: &'a Entity) -> Cow<'a, Entity> {
        match &self.pre_hook {
            Some(hook) => Cow::Owned(hook(entity)),
            None => Cow::Borrowed(entity),
        }
    }

    fn render_entity(
        &self,
        name: &str,
        entity: &Entity,
        context: &RenderContext,
    ) -> RenderResult<String> {
        let context = context.for_entity(entity);
        let level = self.options.header_level;

        let mut parts = vec![format!("{} {} {{ #{} }}", "#".repeat(level), name, name)];

        if self.options.show_signature && entity.kind.is_callable() {
            let params = self.render_with(Node::Parameters(&entity.parameters), &context)?;
            parts.push(format!("`{}({})`", name, params));
        }

        if let Some(docstring) = &entity.docstring {
            for section in &docstring.sections {
                let body = self.render_with(Node::Section(section), &context)?;
                match section {
                    DocstringSection::Text(_) => parts.push(body),
                    _ => parts.push(format!(
                        "{} {}\n\n{}",
                        "#".repeat(level + 1),
                        section.heading(),
                        body
                    )),
                }
            }
        }

        Ok(parts.join("\n\n"))
    }

    fn render_parameter(&self, param: &Parameter) -> String {
        match (&param.annotation, param.usable_default()) {
            (Some(annotation), Some(default)) => {
                format!("{}: {} = {}", param.name, annotation, default)
            }
            (Some(annotation), None) => format!("{}: {}", param.name, annotation),
            (None, Some(default)) => format!("{}={}", param.name, default),
            (None, None) => param.name.clone(),
        }
    }

    fn render_section(
        &self,
        section: &DocstringSection,
        context: &RenderContext,
    ) -> RenderResult<String> {
        match section {
            DocstringSection::Text(value) => Ok(value.clone()),
            DocstringSection::Parameters(params) | DocstringSection::OtherParameters(params) => {
                let rows = params
                    .iter()
                    .map(|p| self.parameter_row(p, context))
                    .collect::<RenderResult<Vec<_>>>()?;
                Ok(tabulate(&rows, &["Name", "Type", "Description", "Default"]))
            }
            DocstringSection::Attributes(attrs) => {
                let rows = attrs
                    .iter()
                    .map(|a| self.attribute_row(a, context))
                    .collect::<RenderResult<Vec<_>>>()?;
                Ok(tabulate(&rows, &["Name", "Type", "Description"]))
            }
            DocstringSection::Returns(returns) => {
                let rows = returns
                    .iter()
                    .map(|r| self.return_row(r, context))
                    .collect::<RenderResult<Vec<_>>>()?;
                Ok(tabulate(&rows, &["Type", "Description"]))
            }
            DocstringSection::Examples(pairs) => {
                let blocks = pairs
                    .iter()
                    .map(|pair| self.render_with(Node::ExamplePair(pair), context))
                    .collect::<RenderResult<Vec<_>>>()?;
                Ok(blocks.join("\n\n"))
            }
            DocstringSection::Admonition(_)
            | DocstringSection::Deprecated(_)
            | DocstringSection::Raises(_)
            | DocstringSection::Warns(_)
            | DocstringSection::Yields(_)
            | DocstringSection::Receives(_) => Err(RenderError::UnsupportedNode(
                Node::Section(section).describe(),
            )),
        }
    }

    fn type_cell(
        &self,
        annotation: Option<&Annotation>,
        context: &RenderContext,
    ) -> RenderResult<String> {
        match annotation {
            Some(annotation) => self.render_with(annotation.into(), context),
            None => Ok(String::new()),
        }
    }

    fn parameter_row(
        &self,
        param: &DocstringParameter,
        context: &RenderContext,
    ) -> RenderResult<Vec<String>> {
        let default = match &param.default {
            Some(default) => escape(default),
            None => "required".to_string(),
        };
        Ok(vec![
            escape(&param.name),
            self.type_cell(param.annotation.as_ref(), context)?,
            sanitize(&param.description),
            default,
        ])
    }

    fn attribute_row(
        &self,
        attr: &DocstringAttribute,
        context: &RenderContext,
    ) -> RenderResult<Vec<String>> {
        Ok(vec![
            attr.name.clone(),
            self.type_cell(attr.annotation.as_ref(), context)?,
            sanitize(&attr.description),
        ])
    }

    fn return_row(
        &self,
        ret: &DocstringReturn,
        context: &RenderContext,
    ) -> RenderResult<Vec<String>> {
        Ok(vec![
            self.type_cell(ret.annotation.as_ref(), context)?,
            sanitize(&ret.description),
        ])
    }
}

fn single_row(cells: &[String]) -> String {
    let widths: Vec<usize> = cells.iter().map(|c| c.chars().count()).collect();
    table_row(cells.iter().map(String::as_str), &widths)
}

impl Render for MdRenderer {
    fn style(&self) -> &str {
        MARKDOWN_STYLE
    }

    fn render_with(&self, node: Node<'_>, context: &RenderContext) -> RenderResult<String> {
        trace!(node = %node.describe(), "rendering markdown");

        match node {
            Node::Str(text) => Ok(text.to_string()),
            Node::Name(name) => Ok(name.full.clone()),
            Node::Expression(expr) => Ok(expr.full()),
            Node::Entity(entity) => self.render_entity(&entity.name, entity, context),
            Node::Alias { alias, target } => self.render_entity(&alias.name, target, context),
            Node::Parameters(params) => Ok(params
                .iter()
                .map(|p| self.render_parameter(p))
                .collect::<Vec<_>>()
                .join(", ")),
            Node::Parameter(param) => Ok(self.render_parameter(param)),
            Node::Section(section) => self.render_section(section, context),
            Node::DocParameter(param) => Ok(single_row(&self.parameter_row(param, context)?)),
            Node::DocReturn(ret) => Ok(single_row(&self.return_row(ret, context)?)),
            // Attributes only render as rows of their section table.
            Node::DocAttribute(_) => Err(RenderError::UnsupportedNode(node.describe())),
            Node::ExamplePair(pair) => {
                let item = ExampleItem::try_from(pair)?;
                self.render_with(Node::Example(&item), context)
            }
            Node::Example(ExampleItem::Code(source)) => {
                Ok(format!("```{}\n{}\n```", context.language, source))
            }
            Node::Example(ExampleItem::Prose(text)) => Ok(text.clone()),
        }
    }
}
