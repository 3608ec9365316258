use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ModelError, RenderError};

/// What sort of code element an [`Entity`] documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Module,
    Class,
    Function,
    Attribute,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Module => "module",
            Kind::Class => "class",
            Kind::Function => "function",
            Kind::Attribute => "attribute",
        };
        write!(f, "{}", name)
    }
}

impl Kind {
    /// Classes and functions carry a parameter list; modules and attributes never do.
    pub fn is_callable(&self) -> bool {
        matches!(self, Kind::Class | Kind::Function)
    }
}

/// A documented code element, as produced by the object resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub kind: Kind,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docstring: Option<Docstring>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<Member>,
    /// Source language of the element, used to tag code examples.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl Entity {
    pub fn new(kind: Kind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            path: None,
            parameters: Vec::new(),
            docstring: None,
            members: Vec::new(),
            language: None,
        }
    }

    pub fn with_parameters(mut self, parameters: Vec<Parameter>) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn with_sections(mut self, sections: Vec<DocstringSection>) -> Self {
        self.docstring = Some(Docstring { sections });
        self
    }

    pub fn canonical_path(&self) -> &str {
        self.path.as_deref().unwrap_or(&self.name)
    }

    /// Check the structural invariants of this entity and all of its members.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.name.is_empty() {
            return Err(ModelError::InvalidEntity {
                name: self.canonical_path().to_string(),
                reason: "name is empty".to_string(),
            });
        }

        if !self.kind.is_callable() && !self.parameters.is_empty() {
            return Err(ModelError::InvalidEntity {
                name: self.canonical_path().to_string(),
                reason: format!("a {} cannot have parameters", self.kind),
            });
        }

        for member in &self.members {
            if let Member::Object(entity) = member {
                entity.validate()?;
            }
        }

        Ok(())
    }
}

/// A reference to an entity defined elsewhere, looked up by canonical path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename = "alias")]
pub struct Alias {
    pub name: String,
    pub target_path: String,
}

/// A child of a module or class: either a full entity or an alias to one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Member {
    Alias(Alias),
    Object(Entity),
}

impl Member {
    pub fn name(&self) -> &str {
        match self {
            Member::Alias(alias) => &alias.name,
            Member::Object(entity) => &entity.name,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ParameterKind {
    #[serde(rename = "positional-only")]
    PositionalOnly,
    #[default]
    #[serde(rename = "positional or keyword")]
    PositionalOrKeyword,
    #[serde(rename = "keyword-only")]
    KeywordOnly,
    #[serde(rename = "variadic positional")]
    VarPositional,
    #[serde(rename = "variadic keyword")]
    VarKeyword,
}

impl ParameterKind {
    /// `*args` and `**kwargs` style parameters.
    pub fn is_splat(&self) -> bool {
        matches!(self, ParameterKind::VarPositional | ParameterKind::VarKeyword)
    }
}

/// One formal parameter of a callable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation: Option<Annotation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default)]
    pub kind: ParameterKind,
}

impl Parameter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            annotation: None,
            default: None,
            kind: ParameterKind::default(),
        }
    }

    pub fn annotated(mut self, annotation: impl Into<Annotation>) -> Self {
        self.annotation = Some(annotation.into());
        self
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_kind(mut self, kind: ParameterKind) -> Self {
        self.kind = kind;
        self
    }

    /// The default as it should appear in a signature.
    ///
    /// Splat parameters never report a default, even when one is present
    /// textually, and an empty default counts as none.
    pub fn usable_default(&self) -> Option<&str> {
        match self.default.as_deref() {
            Some(default) if !default.is_empty() && !self.kind.is_splat() => Some(default),
            _ => None,
        }
    }
}

/// A resolved name inside a type expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Name {
    /// The name as written in the source.
    pub source: String,
    /// The fully qualified path the name resolves to.
    pub full: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExprPart {
    Text(String),
    Name(Name),
}

/// A structured type expression, e.g. `list[` + Name(`Foo`) + `]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Expression {
    pub parts: Vec<ExprPart>,
}

impl Expression {
    pub fn full(&self) -> String {
        self.parts
            .iter()
            .map(|part| match part {
                ExprPart::Text(text) => text.as_str(),
                ExprPart::Name(name) => name.full.as_str(),
            })
            .collect()
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for part in &self.parts {
            match part {
                ExprPart::Text(text) => write!(f, "{}", text)?,
                ExprPart::Name(name) => write!(f, "{}", name.source)?,
            }
        }
        Ok(())
    }
}

/// A type annotation: either plain text or a structured expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Annotation {
    Plain(String),
    Name(Name),
    Expression(Expression),
}

impl Annotation {
    /// The canonical full-text form used in documentation tables.
    pub fn full(&self) -> String {
        match self {
            Annotation::Plain(text) => text.clone(),
            Annotation::Name(name) => name.full.clone(),
            Annotation::Expression(expr) => expr.full(),
        }
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Annotation::Plain(text) => write!(f, "{}", text),
            Annotation::Name(name) => write!(f, "{}", name.source),
            Annotation::Expression(expr) => write!(f, "{}", expr),
        }
    }
}

impl From<&str> for Annotation {
    fn from(text: &str) -> Self {
        Annotation::Plain(text.to_string())
    }
}

impl From<String> for Annotation {
    fn from(text: String) -> Self {
        Annotation::Plain(text)
    }
}

impl From<Name> for Annotation {
    fn from(name: Name) -> Self {
        Annotation::Name(name)
    }
}

impl From<Expression> for Annotation {
    fn from(expr: Expression) -> Self {
        Annotation::Expression(expr)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Docstring {
    #[serde(default, alias = "parsed")]
    pub sections: Vec<DocstringSection>,
}

/// One typed block of a parsed docstring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum DocstringSection {
    Text(String),
    Parameters(Vec<DocstringParameter>),
    #[serde(rename = "other parameters", alias = "other_parameters")]
    OtherParameters(Vec<DocstringParameter>),
    Attributes(Vec<DocstringAttribute>),
    Returns(Vec<DocstringReturn>),
    Examples(Vec<ExamplePair>),
    Admonition(serde_json::Value),
    Deprecated(serde_json::Value),
    Raises(serde_json::Value),
    Warns(serde_json::Value),
    Yields(serde_json::Value),
    Receives(serde_json::Value),
}

impl DocstringSection {
    /// The section kind as it appears in the serialized tree.
    pub fn title(&self) -> &'static str {
        match self {
            DocstringSection::Text(_) => "text",
            DocstringSection::Parameters(_) => "parameters",
            DocstringSection::OtherParameters(_) => "other parameters",
            DocstringSection::Attributes(_) => "attributes",
            DocstringSection::Returns(_) => "returns",
            DocstringSection::Examples(_) => "examples",
            DocstringSection::Admonition(_) => "admonition",
            DocstringSection::Deprecated(_) => "deprecated",
            DocstringSection::Raises(_) => "raises",
            DocstringSection::Warns(_) => "warns",
            DocstringSection::Yields(_) => "yields",
            DocstringSection::Receives(_) => "receives",
        }
    }

    /// Title with each word capitalised, for use as a sub-header.
    pub fn heading(&self) -> String {
        self.title()
            .split(' ')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocstringParameter {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation: Option<Annotation>,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocstringAttribute {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation: Option<Annotation>,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocstringReturn {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation: Option<Annotation>,
    #[serde(default)]
    pub description: String,
}

/// Raw `(kind, text)` pair as stored in an examples section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamplePair(pub String, pub String);

impl ExamplePair {
    pub fn code(source: impl Into<String>) -> Self {
        Self("examples".to_string(), source.into())
    }

    pub fn prose(text: impl Into<String>) -> Self {
        Self("text".to_string(), text.into())
    }
}

/// An example block after its kind tag has been interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExampleItem {
    Code(String),
    Prose(String),
}

impl TryFrom<&ExamplePair> for ExampleItem {
    type Error = RenderError;

    fn try_from(pair: &ExamplePair) -> Result<Self, Self::Error> {
        let ExamplePair(kind, value) = pair;
        match kind.as_str() {
            "examples" => Ok(ExampleItem::Code(value.clone())),
            "text" => Ok(ExampleItem::Prose(value.clone())),
            other => Err(RenderError::MalformedExample(other.to_string())),
        }
    }
}
