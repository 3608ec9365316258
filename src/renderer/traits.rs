use std::fmt;

use crate::error::RenderResult;
use crate::model::*;

/// Per-call state threaded through a recursive render.
#[derive(Debug, Clone)]
pub struct RenderContext {
    /// Language tag for fenced code examples.
    pub language: String,
}

impl RenderContext {
    pub fn new() -> Self {
        Self {
            language: "python".to_string(),
        }
    }

    /// Context for the children of `entity`, picking up its source language.
    pub fn for_entity(&self, entity: &Entity) -> Self {
        match &entity.language {
            Some(language) => Self {
                language: language.clone(),
            },
            None => self.clone(),
        }
    }
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Every shape the render dispatcher knows about, borrowed from the tree.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    Str(&'a str),
    Name(&'a Name),
    Expression(&'a Expression),
    Entity(&'a Entity),
    /// An alias already resolved to its target.
    Alias {
        alias: &'a Alias,
        target: &'a Entity,
    },
    Parameters(&'a [Parameter]),
    Parameter(&'a Parameter),
    Section(&'a DocstringSection),
    DocParameter(&'a DocstringParameter),
    DocAttribute(&'a DocstringAttribute),
    DocReturn(&'a DocstringReturn),
    ExamplePair(&'a ExamplePair),
    Example(&'a ExampleItem),
}

impl Node<'_> {
    /// Short name of the node shape, for diagnostics.
    pub fn describe(&self) -> String {
        match self {
            Node::Str(_) => "string".to_string(),
            Node::Name(name) => format!("name `{}`", name.full),
            Node::Expression(_) => "expression".to_string(),
            Node::Entity(entity) => format!("{} `{}`", entity.kind, entity.name),
            Node::Alias { alias, .. } => format!("alias `{}`", alias.name),
            Node::Parameters(_) => "parameters".to_string(),
            Node::Parameter(param) => format!("parameter `{}`", param.name),
            Node::Section(section) => format!("{} section", section.title()),
            Node::DocParameter(param) => format!("docstring parameter `{}`", param.name),
            Node::DocAttribute(attr) => format!("docstring attribute `{}`", attr.name),
            Node::DocReturn(_) => "docstring return".to_string(),
            Node::ExamplePair(ExamplePair(kind, _)) => format!("example pair `{}`", kind),
            Node::Example(_) => "example".to_string(),
        }
    }
}

impl<'a> From<&'a str> for Node<'a> {
    fn from(text: &'a str) -> Self {
        Node::Str(text)
    }
}

impl<'a> From<&'a String> for Node<'a> {
    fn from(text: &'a String) -> Self {
        Node::Str(text)
    }
}

impl<'a> From<&'a Annotation> for Node<'a> {
    fn from(annotation: &'a Annotation) -> Self {
        match annotation {
            Annotation::Plain(text) => Node::Str(text),
            Annotation::Name(name) => Node::Name(name),
            Annotation::Expression(expr) => Node::Expression(expr),
        }
    }
}

macro_rules! node_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl<'a> From<&'a $ty> for Node<'a> {
                fn from(value: &'a $ty) -> Self {
                    Node::$variant(value)
                }
            }
        )*
    };
}

node_from! {
    Name => Name,
    Expression => Expression,
    Entity => Entity,
    Parameter => Parameter,
    DocstringSection => Section,
    DocstringParameter => DocParameter,
    DocstringAttribute => DocAttribute,
    DocstringReturn => DocReturn,
    ExamplePair => ExamplePair,
    ExampleItem => Example,
}

impl<'a> From<&'a [Parameter]> for Node<'a> {
    fn from(params: &'a [Parameter]) -> Self {
        Node::Parameters(params)
    }
}

impl<'a> From<&'a Vec<Parameter>> for Node<'a> {
    fn from(params: &'a Vec<Parameter>) -> Self {
        Node::Parameters(params)
    }
}

/// A named rendering style.
///
/// Each implementation handles every [`Node`] variant in a single match, so a
/// new node shape has to be dealt with by every style before it compiles.
pub trait Render: Send + Sync + fmt::Debug {
    /// Identifier the style is registered under.
    fn style(&self) -> &str;

    fn render_with(&self, node: Node<'_>, context: &RenderContext) -> RenderResult<String>;

    fn render(&self, node: Node<'_>) -> RenderResult<String> {
        self.render_with(node, &RenderContext::default())
    }
}
