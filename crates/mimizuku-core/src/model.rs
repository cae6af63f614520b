//! RDF term and triple models

use crate::vocabulary::xsd;
use crate::CoreError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// RDF Literal
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal {
    pub lexical: String,
    pub datatype: Option<String>,
    pub language: Option<String>,
}

/// RDF term: named resource, anonymous resource, literal or query variable
///
/// Serialized as its text form (`<iri>`, `_:b0`, `"text"@en`, `?var`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Node {
    Iri(String),
    Blank(String),
    Literal(Literal),
    Variable(String),
}

impl Node {
    pub fn iri<S: Into<String>>(iri: S) -> Self {
        Node::Iri(iri.into())
    }

    pub fn blank<S: Into<String>>(label: S) -> Self {
        Node::Blank(label.into())
    }

    pub fn variable<S: Into<String>>(name: S) -> Self {
        Node::Variable(name.into())
    }

    /// Plain literal (xsd:string)
    pub fn literal<S: Into<String>>(lexical: S) -> Self {
        Node::Literal(Literal {
            lexical: lexical.into(),
            datatype: None,
            language: None,
        })
    }

    /// Typed literal; `xsd:string` is stored as a plain literal
    pub fn typed_literal<S: Into<String>, D: Into<String>>(lexical: S, datatype: D) -> Self {
        let datatype = datatype.into();
        Node::Literal(Literal {
            lexical: lexical.into(),
            datatype: (datatype != xsd::STRING).then_some(datatype),
            language: None,
        })
    }

    pub fn lang_literal<S: Into<String>, L: Into<String>>(lexical: S, language: L) -> Self {
        Node::Literal(Literal {
            lexical: lexical.into(),
            datatype: None,
            language: Some(language.into()),
        })
    }

    pub fn integer(value: i64) -> Self {
        Node::typed_literal(value.to_string(), xsd::INTEGER)
    }

    /// Mint a blank node that no other call will return
    pub fn fresh_blank() -> Self {
        Node::Blank(format!("b{}", uuid::Uuid::new_v4().simple()))
    }

    pub fn is_iri(&self) -> bool {
        matches!(self, Node::Iri(_))
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Node::Blank(_))
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Node::Literal(_))
    }

    pub fn is_variable(&self) -> bool {
        matches!(self, Node::Variable(_))
    }

    /// Named or anonymous resource
    pub fn is_resource(&self) -> bool {
        self.is_iri() || self.is_blank()
    }

    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Node::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    pub fn as_variable(&self) -> Option<&str> {
        match self {
            Node::Variable(name) => Some(name),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Node::Literal(literal) => Some(literal),
            _ => None,
        }
    }

    /// IRI の '#' または '/' 以降の部分
    pub fn local_name(&self) -> Option<&str> {
        let iri = self.as_iri()?;
        let start = iri.rfind(|c: char| c == '#' || c == '/').map(|i| i + 1).unwrap_or(0);
        let name = &iri[start..];
        if name.is_empty() { None } else { Some(name) }
    }

    /// Text without term syntax: the IRI, blank label, literal lexical form or variable name
    pub fn lexical_form(&self) -> &str {
        match self {
            Node::Iri(iri) => iri,
            Node::Blank(label) => label,
            Node::Literal(literal) => &literal.lexical,
            Node::Variable(name) => name,
        }
    }

    /// Numeric value of a literal whose lexical form parses as a number
    pub fn numeric_value(&self) -> Option<f64> {
        match self {
            Node::Literal(literal) if literal.language.is_none() => {
                literal.lexical.trim().parse::<f64>().ok()
            }
            _ => None,
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Iri(iri) => write!(f, "<{}>", iri),
            Node::Blank(label) => write!(f, "_:{}", label),
            Node::Variable(name) => write!(f, "?{}", name),
            Node::Literal(literal) => {
                write!(f, "\"{}\"", escape(&literal.lexical))?;
                if let Some(language) = &literal.language {
                    write!(f, "@{}", language)
                } else if let Some(datatype) = &literal.datatype {
                    write!(f, "^^<{}>", datatype)
                } else {
                    Ok(())
                }
            }
        }
    }
}

fn escape(lexical: &str) -> String {
    let mut out = String::with_capacity(lexical.len());
    for c in lexical.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out
}

impl FromStr for Node {
    type Err = CoreError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let text = input.trim();
        let invalid = |reason: &str| CoreError::InvalidTerm {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        if text.is_empty() {
            return Err(invalid("empty term"));
        }

        if let Some(rest) = text.strip_prefix('<') {
            let iri = rest.strip_suffix('>').ok_or_else(|| invalid("unterminated IRI"))?;
            if iri.is_empty() || iri.contains(|c: char| c == '<' || c == '>' || c.is_whitespace()) {
                return Err(invalid("malformed IRI"));
            }
            return Ok(Node::iri(iri));
        }

        if let Some(label) = text.strip_prefix("_:") {
            if label.is_empty() || label.contains(char::is_whitespace) {
                return Err(invalid("malformed blank node label"));
            }
            return Ok(Node::blank(label));
        }

        if let Some(name) = text.strip_prefix('?').or_else(|| text.strip_prefix('$')) {
            if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
                return Err(invalid("malformed variable name"));
            }
            return Ok(Node::variable(name));
        }

        if text.starts_with('"') {
            return parse_literal(text).ok_or_else(|| invalid("malformed literal"));
        }

        match text {
            "true" | "false" => return Ok(Node::typed_literal(text, xsd::BOOLEAN)),
            _ => {}
        }
        if text.parse::<i64>().is_ok() {
            return Ok(Node::typed_literal(text, xsd::INTEGER));
        }
        if text.contains('.') && text.parse::<f64>().is_ok() {
            return Ok(Node::typed_literal(text, xsd::DECIMAL));
        }

        Err(invalid("expected <iri>, _:label, \"literal\" or ?variable"))
    }
}

fn parse_literal(text: &str) -> Option<Node> {
    let mut lexical = String::new();
    let mut chars = text.char_indices().skip(1);
    let mut end = None;

    while let Some((i, c)) = chars.next() {
        match c {
            '"' => {
                end = Some(i);
                break;
            }
            '\\' => {
                let (_, escaped) = chars.next()?;
                lexical.push(match escaped {
                    'n' => '\n',
                    'r' => '\r',
                    't' => '\t',
                    other => other,
                });
            }
            c => lexical.push(c),
        }
    }

    let suffix = &text[end? + 1..];
    if suffix.is_empty() {
        Some(Node::literal(lexical))
    } else if let Some(language) = suffix.strip_prefix('@') {
        if language.is_empty() { None } else { Some(Node::lang_literal(lexical, language)) }
    } else {
        let datatype = suffix.strip_prefix("^^<")?.strip_suffix('>')?;
        if datatype.is_empty() { None } else { Some(Node::typed_literal(lexical, datatype)) }
    }
}

impl TryFrom<String> for Node {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Node> for String {
    fn from(node: Node) -> Self {
        node.to_string()
    }
}

/// RDF Triple; a triple holding variables doubles as a triple pattern
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triple {
    pub subject: Node,
    pub predicate: Node,
    pub object: Node,
}

impl Triple {
    pub fn new(subject: Node, predicate: Node, object: Node) -> Self {
        Self { subject, predicate, object }
    }

    /// True when no position holds a variable
    pub fn is_ground(&self) -> bool {
        !self.subject.is_variable() && !self.predicate.is_variable() && !self.object.is_variable()
    }

    /// Replace bound variables with their values
    pub fn substitute(&self, binding: &Binding) -> Triple {
        Triple {
            subject: binding.resolve(&self.subject),
            predicate: binding.resolve(&self.predicate),
            object: binding.resolve(&self.object),
        }
    }

    pub fn nodes(&self) -> [&Node; 3] {
        [&self.subject, &self.predicate, &self.object]
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} .", self.subject, self.predicate, self.object)
    }
}

/// Variable bindings (solution mapping), ordered by variable name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    values: BTreeMap<String, Node>,
}

impl Binding {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, var: &str) -> Option<&Node> {
        self.values.get(var)
    }

    pub fn contains(&self, var: &str) -> bool {
        self.values.contains_key(var)
    }

    /// Bind `var`, replacing any previous value
    pub fn insert<S: Into<String>>(&mut self, var: S, value: Node) -> Option<Node> {
        self.values.insert(var.into(), value)
    }

    /// Bind `var` unless it is already bound to a different value
    pub fn try_insert(&mut self, var: &str, value: &Node) -> bool {
        match self.values.get(var) {
            Some(existing) => existing == value,
            None => {
                self.values.insert(var.to_string(), value.clone());
                true
            }
        }
    }

    /// Builder-style insert
    pub fn with<S: Into<String>>(mut self, var: S, value: Node) -> Self {
        self.insert(var, value);
        self
    }

    /// Copy every binding of `other` into `self`; values from `other` win
    pub fn extend(&mut self, other: &Binding) {
        for (var, value) in &other.values {
            self.values.insert(var.clone(), value.clone());
        }
    }

    /// Value of `node` under this binding (unbound variables stay variables)
    pub fn resolve(&self, node: &Node) -> Node {
        match node {
            Node::Variable(name) => self.values.get(name).cloned().unwrap_or_else(|| node.clone()),
            other => other.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.values.iter().map(|(var, value)| (var.as_str(), value))
    }

    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

impl FromIterator<(String, Node)> for Binding {
    fn from_iter<I: IntoIterator<Item = (String, Node)>>(iter: I) -> Self {
        Self { values: iter.into_iter().collect() }
    }
}
