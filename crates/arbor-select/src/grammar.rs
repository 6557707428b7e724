//! Simple selector grammar
//!
//! The registry of simple-selector kinds. Each kind owns a regex fragment
//! and knows how to turn matched text into a [`SimpleSelector`]; the
//! fragments are also composed into the whole-selector grammar used to
//! reject unsupported input up front.
//!
//! Kinds are tried in [`SimpleKind::ALL`] order. The fragments are
//! disjoint by their first character except universal/tag, which may only
//! open a compound.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::Combinator;
use crate::walker::DomRead;

const TAG: &str = r"[A-Za-z][A-Za-z0-9_-]*";
const IDENT: &str = r"[A-Za-z0-9_-]+";
const ATTR_NAME: &str = r"[A-Za-z_:][A-Za-z0-9_:.-]*";

/// Simple selector kinds, in precedence order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimpleKind {
    Universal,
    Tag,
    Attribute,
    Id,
    Class,
}

impl SimpleKind {
    pub const ALL: [SimpleKind; 5] = [
        SimpleKind::Universal,
        SimpleKind::Tag,
        SimpleKind::Attribute,
        SimpleKind::Id,
        SimpleKind::Class,
    ];

    /// Regex fragment for this kind (unanchored)
    pub fn fragment(self) -> String {
        match self {
            Self::Universal => r"\*".to_string(),
            Self::Tag => TAG.to_string(),
            Self::Attribute => format!(r#"\[({ATTR_NAME})(?:([~|^$*]?=)"([^"]*)")?\]"#),
            Self::Id => format!(r"#({IDENT})"),
            Self::Class => format!(r"(?:\.{IDENT})+"),
        }
    }

    /// Universal and tag selectors may only open a compound
    #[inline]
    pub fn leads_compound(self) -> bool {
        matches!(self, Self::Universal | Self::Tag)
    }

    fn pattern(self) -> &'static Regex {
        static PATTERNS: OnceLock<[Regex; 5]> = OnceLock::new();
        let patterns = PATTERNS.get_or_init(|| SimpleKind::ALL.map(|kind| anchored(&kind.fragment())));
        &patterns[self as usize]
    }

    /// Recognize this kind at the start of `input`.
    ///
    /// Returns the parsed selector and the number of bytes consumed.
    pub fn recognize(self, input: &str) -> Option<(SimpleSelector, usize)> {
        let caps = self.pattern().captures(input)?;
        let whole = caps.get(0)?;
        let selector = match self {
            Self::Universal => SimpleSelector::Universal,
            Self::Tag => SimpleSelector::Tag(whole.as_str().to_string()),
            Self::Attribute => {
                let name = caps.get(1)?.as_str().to_string();
                let test = match caps.get(2) {
                    Some(op) => AttributeTest {
                        name,
                        operator: AttrOperator::from_symbol(op.as_str())?,
                        value: caps.get(3).map_or("", |v| v.as_str()).to_string(),
                    },
                    None => AttributeTest::exists(name),
                };
                SimpleSelector::Attribute(test)
            }
            Self::Id => SimpleSelector::Id(caps.get(1)?.as_str().to_string()),
            Self::Class => SimpleSelector::Class(
                whole
                    .as_str()
                    .split('.')
                    .filter(|c| !c.is_empty())
                    .map(str::to_string)
                    .collect(),
            ),
        };
        Some((selector, whole.end()))
    }
}

fn anchored(fragment: &str) -> Regex {
    Regex::new(&format!("^(?:{fragment})"))
        .unwrap_or_else(|err| panic!("invalid selector fragment {fragment:?}: {err}"))
}

/// Full-string grammar: `alternative (, alternative)*`
fn supported_selector() -> &'static Regex {
    static SUPPORTED: OnceLock<Regex> = OnceLock::new();
    SUPPORTED.get_or_init(|| {
        let fragment = |kind: SimpleKind| kind.fragment();
        let lead = format!(
            "(?:{}|{})",
            fragment(SimpleKind::Universal),
            fragment(SimpleKind::Tag)
        );
        let tail = format!(
            "(?:{}|{}|{})",
            fragment(SimpleKind::Attribute),
            fragment(SimpleKind::Id),
            fragment(SimpleKind::Class)
        );
        let compound = format!("(?:{lead}{tail}*|{tail}+)");
        let combinators: Vec<String> = Combinator::ALL.iter().map(|c| c.fragment()).collect();
        let combinator = format!("(?:{})", combinators.join("|"));
        let alternative = format!("{compound}(?:{combinator}{compound})*");
        let pattern = format!(r"^{alternative}(?:\s*,\s*{alternative})*$");
        Regex::new(&pattern).unwrap_or_else(|err| panic!("invalid selector grammar: {err}"))
    })
}

/// Check a trimmed selector string against the supported grammar
pub(crate) fn is_supported(selector: &str) -> bool {
    supported_selector().is_match(selector)
}

/// Attribute comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttrOperator {
    /// `[attr]` - present and non-empty
    Exists,
    /// `[attr="v"]` - exact match
    Equals,
    /// `[attr~="v"]` - whitespace-separated list contains
    Includes,
    /// `[attr|="v"]` - exact or prefix with hyphen
    DashMatch,
    /// `[attr^="v"]` - starts with
    Prefix,
    /// `[attr$="v"]` - ends with
    Suffix,
    /// `[attr*="v"]` - contains substring
    Substring,
}

impl AttrOperator {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "=" => Some(Self::Equals),
            "~=" => Some(Self::Includes),
            "|=" => Some(Self::DashMatch),
            "^=" => Some(Self::Prefix),
            "$=" => Some(Self::Suffix),
            "*=" => Some(Self::Substring),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Exists => "",
            Self::Equals => "=",
            Self::Includes => "~=",
            Self::DashMatch => "|=",
            Self::Prefix => "^=",
            Self::Suffix => "$=",
            Self::Substring => "*=",
        }
    }
}

/// One `[name op "value"]` test
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttributeTest {
    pub name: String,
    pub operator: AttrOperator,
    pub value: String,
}

impl AttributeTest {
    pub fn exists(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            operator: AttrOperator::Exists,
            value: String::new(),
        }
    }

    pub fn new(name: impl Into<String>, operator: AttrOperator, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            operator,
            value: value.into(),
        }
    }

    /// Check an attribute value; a missing attribute reads as `""`
    pub fn matches(&self, value: &str) -> bool {
        let token = self.value.as_str();
        match self.operator {
            AttrOperator::Exists => !value.is_empty(),
            AttrOperator::Equals => value == token,
            AttrOperator::Includes => value.split_ascii_whitespace().any(|t| t == token),
            AttrOperator::DashMatch => {
                value == token
                    || value
                        .strip_prefix(token)
                        .is_some_and(|rest| rest.starts_with('-'))
            }
            AttrOperator::Prefix => value.starts_with(token),
            AttrOperator::Suffix => value.ends_with(token),
            AttrOperator::Substring => value.contains(token),
        }
    }
}

impl fmt::Display for AttributeTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.operator {
            AttrOperator::Exists => write!(f, "[{}]", self.name),
            op => write!(f, "[{}{}\"{}\"]", self.name, op.symbol(), self.value),
        }
    }
}

/// A single simple selector; compounds hold one or more of these
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimpleSelector {
    /// `*`
    Universal,
    /// `div`
    Tag(String),
    /// `[attr]`, `[attr="v"]`, ...
    Attribute(AttributeTest),
    /// `#id`
    Id(String),
    /// `.a.b` - every listed token must be present
    Class(Vec<String>),
}

impl SimpleSelector {
    pub fn kind(&self) -> SimpleKind {
        match self {
            Self::Universal => SimpleKind::Universal,
            Self::Tag(_) => SimpleKind::Tag,
            Self::Attribute(_) => SimpleKind::Attribute,
            Self::Id(_) => SimpleKind::Id,
            Self::Class(_) => SimpleKind::Class,
        }
    }

    /// Check one element against this selector.
    ///
    /// Callers make sure `node` is an element.
    pub fn validate<T: DomRead + ?Sized>(&self, tree: &T, node: T::NodeId) -> bool {
        match self {
            Self::Universal => true,
            Self::Tag(tag) => tree.tag_name(node) == Some(tag.as_str()),
            // Elements without any attribute never match; otherwise a
            // missing attribute reads as an empty value
            Self::Attribute(test) => {
                tree.attribute_count(node) > 0
                    && test.matches(tree.attribute(node, &test.name).unwrap_or(""))
            }
            Self::Id(id) => {
                tree.attribute_count(node) > 0 && tree.attribute(node, "id") == Some(id.as_str())
            }
            Self::Class(classes) => {
                if tree.attribute_count(node) == 0 {
                    return false;
                }
                let Some(class_attr) = tree.attribute(node, "class") else {
                    return false;
                };
                classes
                    .iter()
                    .all(|class| class_attr.split_ascii_whitespace().any(|t| t == class))
            }
        }
    }
}

impl fmt::Display for SimpleSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Universal => f.write_str("*"),
            Self::Tag(tag) => f.write_str(tag),
            Self::Attribute(test) => write!(f, "{test}"),
            Self::Id(id) => write!(f, "#{id}"),
            Self::Class(classes) => {
                for class in classes {
                    write!(f, ".{class}")?;
                }
                Ok(())
            }
        }
    }
}
