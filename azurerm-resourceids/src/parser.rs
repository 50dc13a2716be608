//! Segment-by-segment resource ID parser

use thiserror::Error;

use crate::segment::{Segment, SegmentKind};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("parsing {id_type} ID: the input was empty")]
    Empty { id_type: String },

    #[error("parsing {id_type} ID {input:?}: expected the ID to start with '/'")]
    MissingLeadingSlash { id_type: String, input: String },

    #[error("parsing {id_type} ID {input:?}: the segment {segment:?} was not found")]
    MissingSegment {
        id_type: String,
        input: String,
        segment: String,
    },

    #[error(
        "parsing {id_type} ID {input:?}: expected the segment {segment:?} to be {expected:?} but got {got:?}"
    )]
    UnexpectedSegment {
        id_type: String,
        input: String,
        segment: String,
        expected: String,
        got: String,
    },

    #[error("parsing {id_type} ID {input:?}: unexpected trailing segments {trailing:?}")]
    TrailingSegments {
        id_type: String,
        input: String,
        trailing: String,
    },
}

/// Values parsed out of an ID, keyed by segment name in template order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParseResult {
    pub values: Vec<(String, String)>,
}

impl ParseResult {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Values only, in template order
    pub fn into_values(self) -> Vec<String> {
        self.values.into_iter().map(|(_, v)| v).collect()
    }
}

/// Parses IDs against a fixed list of segments
pub struct Parser<'a> {
    id_type: &'a str,
    segments: &'a [Segment],
}

impl<'a> Parser<'a> {
    pub fn new(id_type: &'a str, segments: &'a [Segment]) -> Self {
        Self { id_type, segments }
    }

    /// Parse `input`
    ///
    /// Fixed segments must match exactly unless `insensitively` is set, in
    /// which case any ASCII casing is accepted. Value segments keep their
    /// casing either way.
    pub fn parse(&self, input: &str, insensitively: bool) -> Result<ParseResult, ParseError> {
        if input.is_empty() {
            return Err(ParseError::Empty {
                id_type: self.id_type.to_string(),
            });
        }
        let Some(path) = input.strip_prefix('/') else {
            return Err(ParseError::MissingLeadingSlash {
                id_type: self.id_type.to_string(),
                input: input.to_string(),
            });
        };

        let components: Vec<&str> = path.split('/').collect();
        let mut result = ParseResult::default();

        for (index, segment) in self.segments.iter().enumerate() {
            let component = components.get(index).copied().unwrap_or("");
            if component.is_empty() {
                return Err(self.missing(input, segment));
            }

            match &segment.kind {
                SegmentKind::Static(expected) | SegmentKind::ResourceProvider(expected) => {
                    let matches = if insensitively {
                        component.eq_ignore_ascii_case(expected)
                    } else {
                        component == expected
                    };
                    if !matches {
                        return Err(ParseError::UnexpectedSegment {
                            id_type: self.id_type.to_string(),
                            input: input.to_string(),
                            segment: segment.name.clone(),
                            expected: expected.clone(),
                            got: component.to_string(),
                        });
                    }
                }
                SegmentKind::SubscriptionId
                | SegmentKind::ResourceGroup
                | SegmentKind::UserSpecified => {
                    result
                        .values
                        .push((segment.name.clone(), component.to_string()));
                }
            }
        }

        if components.len() > self.segments.len() {
            return Err(ParseError::TrailingSegments {
                id_type: self.id_type.to_string(),
                input: input.to_string(),
                trailing: components[self.segments.len()..].join("/"),
            });
        }

        Ok(result)
    }

    fn missing(&self, input: &str, segment: &Segment) -> ParseError {
        ParseError::MissingSegment {
            id_type: self.id_type.to_string(),
            input: input.to_string(),
            segment: segment.name.clone(),
        }
    }
}

/// Render an ID from segments and the values of its value segments
///
/// Fixed segments are always written in their canonical casing.
pub fn format_id<S: AsRef<str>>(segments: &[Segment], values: &[S]) -> String {
    let mut values = values.iter();
    let mut id = String::new();
    for segment in segments {
        id.push('/');
        match segment.fixed_value() {
            Some(fixed) => id.push_str(fixed),
            None => {
                if let Some(v) = values.next() {
                    id.push_str(v.as_ref());
                }
            }
        }
    }
    id
}
