use regroup_core::Coordinate;

use crate::tree::{Declaration, DependencyArg, GStringSegment};

/// Reserved token standing in for one embedded expression when an interpolated
/// string is shaped for the colon split. A coordinate position containing it is
/// known only dynamically and can never be part of a replacement span.
pub const PLACEHOLDER: char = '\u{0}';

/// True when a map-entry value is itself a GString carrying an embedded
/// expression, so its text is not a literal.
pub(crate) fn is_dynamic_value(quote: char, value: &str) -> bool {
    quote == '"' && value.contains('$')
}

impl Declaration {
    /// Extract the logical coordinate this declaration expresses, or `None` when
    /// the argument is not a recognizable dependency form. Pure; the node is
    /// never touched.
    #[must_use]
    pub fn coordinate(&self) -> Option<Coordinate> {
        arg_coordinate(&self.arg)
    }
}

fn arg_coordinate(arg: &DependencyArg) -> Option<Coordinate> {
    match arg {
        DependencyArg::StringLiteral { value, .. } => Coordinate::parse(value),
        DependencyArg::GString { segments } => {
            let shape: String = segments
                .iter()
                .map(|segment| match segment {
                    GStringSegment::Literal(text) => text.clone(),
                    GStringSegment::Interpolation(_) => PLACEHOLDER.to_string(),
                })
                .collect();
            Coordinate::parse(&shape)
        }
        DependencyArg::MapStyle { entries } => {
            let field = |key: &str| {
                entries
                    .iter()
                    .find(|entry| entry.key == key)
                    .map(|entry| entry.value.clone())
            };
            let group = entries.iter().find(|entry| entry.key == "group")?;
            let artifact = field("name")?;
            let group_text = if is_dynamic_value(group.quote, &group.value) {
                // Dynamic group: representable for matching, never rewritable.
                PLACEHOLDER.to_string()
            } else {
                group.value.clone()
            };
            Some(Coordinate {
                group: group_text,
                artifact,
                version: field("version"),
                classifier: field("classifier"),
                extension: field("ext"),
            })
        }
        DependencyArg::Platform { inner, .. } => arg_coordinate(inner),
    }
}
