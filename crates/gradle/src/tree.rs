use std::sync::Arc;

use regroup_core::ResolvedModel;

/// A scanned build script: declaration sites interleaved with raw source runs,
/// in document order. Printing is exact in-order concatenation, so an unedited
/// script prints byte-identically to the text it was scanned from.
///
/// Nodes are reference-counted; a rewrite produces a new `Script` that shares
/// every untouched node with the old one, so holders of the old value keep a
/// valid stale view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    pub nodes: Vec<Arc<Node>>,
    /// Optional resolved-project snapshot attached at the root. Absence is legal;
    /// rewriting never depends on it.
    pub resolved: Option<ResolvedModel>,
}

impl Script {
    #[must_use]
    pub fn to_source(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            node.print(&mut out);
        }
        out
    }

    /// Declaration sites in document order, paired with their node index.
    pub fn declarations(&self) -> impl Iterator<Item = (usize, &Declaration)> {
        self.nodes.iter().enumerate().filter_map(|(i, node)| {
            if let Node::Declaration(declaration) = node.as_ref() {
                Some((i, declaration))
            } else {
                None
            }
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Source text the engine does not interpret, preserved byte-for-byte.
    Raw(String),
    /// One dependency declaration inside a `dependencies { }` block.
    Declaration(Declaration),
}

impl Node {
    pub fn print(&self, out: &mut String) {
        match self {
            Node::Raw(text) => out.push_str(text),
            Node::Declaration(declaration) => declaration.print(out),
        }
    }
}

/// One dependency declaration: configuration name, exact call punctuation, and
/// the coordinate argument in whichever shape the author wrote it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Configuration method name, e.g. `implementation` or `api`.
    pub configuration: String,
    /// Exact text between the configuration name and the argument: whitespace
    /// for command syntax, `(` plus any inner whitespace for call syntax.
    pub open: String,
    pub arg: DependencyArg,
    /// Exact closing text for call syntax (whitespace plus `)`), empty otherwise.
    pub close: String,
}

impl Declaration {
    pub fn print(&self, out: &mut String) {
        out.push_str(&self.configuration);
        out.push_str(&self.open);
        self.arg.print(out);
        out.push_str(&self.close);
    }
}

/// The closed set of declaration shapes the engine understands. One match arm
/// per shape in the coordinate parser and the rewrite planner keeps the set
/// exhaustive at compile time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencyArg {
    /// `'g:a:v'` or `"g:a:v"` with no embedded expressions; `value` excludes the
    /// quote characters.
    StringLiteral { quote: char, value: String },
    /// Double-quoted string with embedded `${...}` or `$name` expressions.
    GString { segments: Vec<GStringSegment> },
    /// `group: 'g', name: 'a', ...` keyword arguments.
    MapStyle { entries: Vec<MapEntry> },
    /// `platform(...)` / `enforcedPlatform(...)` around one of the above.
    Platform {
        function: String,
        open: String,
        inner: Box<DependencyArg>,
        close: String,
    },
}

impl DependencyArg {
    pub fn print(&self, out: &mut String) {
        match self {
            DependencyArg::StringLiteral { quote, value } => {
                out.push(*quote);
                out.push_str(value);
                out.push(*quote);
            }
            DependencyArg::GString { segments } => {
                out.push('"');
                for segment in segments {
                    match segment {
                        GStringSegment::Literal(text) => out.push_str(text),
                        GStringSegment::Interpolation(text) => out.push_str(text),
                    }
                }
                out.push('"');
            }
            DependencyArg::MapStyle { entries } => {
                for entry in entries {
                    entry.print(out);
                }
            }
            DependencyArg::Platform {
                function,
                open,
                inner,
                close,
            } => {
                out.push_str(function);
                out.push_str(open);
                inner.print(out);
                out.push_str(close);
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GStringSegment {
    Literal(String),
    /// Raw embedded-expression text including its delimiters, e.g. `${version}`
    /// or `$version`.
    Interpolation(String),
}

/// One `key: 'value'` pair of a map-style declaration, with its exact
/// surrounding punctuation so printing is lossless.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapEntry {
    /// Text before the key: empty for the first entry, comma plus whitespace
    /// afterwards.
    pub leading: String,
    pub key: String,
    /// Exact text between key and value, normally `: `.
    pub separator: String,
    pub quote: char,
    pub value: String,
}

impl MapEntry {
    pub fn print(&self, out: &mut String) {
        out.push_str(&self.leading);
        out.push_str(&self.key);
        out.push_str(&self.separator);
        out.push(self.quote);
        out.push_str(&self.value);
        out.push(self.quote);
    }
}
