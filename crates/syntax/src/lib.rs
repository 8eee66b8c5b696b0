//! CSS selector syntax — data model, tokenizer adapter, parser, serializer.
//! Spec: <https://www.w3.org/TR/selectors-3/>
//!
//! This crate holds the parsed representation shared by the intersection
//! engine:
//! - Compound selectors (type, pseudo-element, pseudo-classes, attribute
//!   assertions)
//! - Sibling groups (compounds related by `+`/`~`, which are collapsed to a
//!   single sibling relation)
//! - Chains of sibling groups under descendant/child combinators
//! - Comma-separated selector lists
//!
//! Tokenization is delegated to `cssparser`; see [`tokenize`].

mod parser;
mod serialize;
mod tokenizer;

// Re-export public API
pub use parser::{extract_compound, parse_selector_list};
pub use tokenizer::{RawCombinator, SelectorParseError, SelectorToken, tokenize};

/// Attribute selector operators.
/// Spec: Section 8 — Attribute selectors
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttrOperator {
    /// `[attr]` — the attribute is present.
    Exists,
    /// `[attr=value]`
    Equal,
    /// `[attr~=value]` — whitespace-delimited token match.
    Includes,
    /// `[attr|=value]` — exact match or `value-` prefix.
    DashMatch,
    /// `[attr^=value]`
    Prefix,
    /// `[attr$=value]`
    Suffix,
    /// `[attr*=value]`
    Substring,
}

impl AttrOperator {
    /// Serialized operator as written between the attribute name and value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Exists => "",
            Self::Equal => "=",
            Self::Includes => "~=",
            Self::DashMatch => "|=",
            Self::Prefix => "^=",
            Self::Suffix => "$=",
            Self::Substring => "*=",
        }
    }

    /// Evaluate the operator against an element's attribute value.
    /// Spec: Section 8 — semantics of each operator; the case-insensitive
    /// variants compare under Unicode simple lower-case folding.
    pub fn eval(self, attr_value: &str, selector_value: &str, case_sensitive: bool) -> bool {
        if case_sensitive {
            Self::eval_folded(self, attr_value, selector_value)
        } else {
            Self::eval_folded(
                self,
                &attr_value.to_lowercase(),
                &selector_value.to_lowercase(),
            )
        }
    }

    fn eval_folded(self, attr_value: &str, selector_value: &str) -> bool {
        match self {
            Self::Exists => true,
            Self::Equal => attr_value == selector_value,
            Self::Includes => attr_value
                .split_ascii_whitespace()
                .any(|token| token == selector_value),
            Self::DashMatch => {
                attr_value == selector_value
                    || attr_value
                        .strip_prefix(selector_value)
                        .is_some_and(|rest| rest.starts_with('-'))
            }
            Self::Prefix => attr_value.starts_with(selector_value),
            Self::Suffix => attr_value.ends_with(selector_value),
            Self::Substring => attr_value.contains(selector_value),
        }
    }
}

/// A single assertion on one attribute key.
/// Spec: Section 8 — Attribute selectors
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AttrAssertion {
    /// Attribute name, lowercased by the tokenizer (matched case-insensitively).
    pub name: String,
    /// Operator relating the attribute value to `value`.
    pub operator: AttrOperator,
    /// Expected value, unquoted. Empty for [`AttrOperator::Exists`].
    pub value: String,
    /// False when the selector carried the `i` flag.
    pub case_sensitive: bool,
}

impl AttrAssertion {
    /// Construct a case-sensitive assertion.
    pub fn new(name: impl Into<String>, operator: AttrOperator, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            operator,
            value: value.into(),
            case_sensitive: true,
        }
    }

    /// Construct an existence assertion (`[attr]`).
    pub fn exists(name: impl Into<String>) -> Self {
        Self::new(name, AttrOperator::Exists, String::new())
    }
}

/// A pseudo-class with an optional raw argument, treated as an opaque label.
/// Spec: Section 6.6 — Pseudo-classes
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PseudoClass {
    /// Lowercased pseudo-class name.
    pub name: String,
    /// Raw text between the parentheses, if any. Compared structurally;
    /// no argument arithmetic is performed.
    pub argument: Option<String>,
}

/// A compound selector: everything between two combinators.
/// Spec: Section 5 — Simple selector sequences
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompoundSelector {
    /// Element type name. `None` is the universal selector; a literal `*`
    /// is normalized to `None` at parse time.
    pub element: Option<String>,
    /// At most one pseudo-element.
    pub pseudo_element: Option<String>,
    /// Pseudo-classes, order-preserving, structurally deduplicated.
    pub pseudo_classes: Vec<PseudoClass>,
    /// Attribute assertions; the list is a conjunction and may carry several
    /// assertions per key.
    pub attributes: Vec<AttrAssertion>,
}

impl CompoundSelector {
    /// Compound with only an element type.
    pub fn with_element(name: impl Into<String>) -> Self {
        Self {
            element: Some(name.into()),
            ..Self::default()
        }
    }

    /// True for the universal compound (`*` with no further constraints).
    pub fn is_universal(&self) -> bool {
        self.element.is_none()
            && self.pseudo_element.is_none()
            && self.pseudo_classes.is_empty()
            && self.attributes.is_empty()
    }
}

/// Compounds related by the (collapsed) sibling relation.
///
/// `members[0]` carries the structural relation of the group — it is the
/// element the enclosing chain entry links to. The remaining members are
/// sibling constraints; the sibling relation is commutative, so their order
/// is not semantically meaningful and is fixed only at serialization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SiblingGroup {
    /// Nonempty by construction.
    pub members: Vec<CompoundSelector>,
}

impl SiblingGroup {
    /// A group with a single member.
    pub fn single(compound: CompoundSelector) -> Self {
        Self {
            members: vec![compound],
        }
    }

    /// The universal group used to pad short chains.
    pub fn universal() -> Self {
        Self::single(CompoundSelector::default())
    }

    /// True when the group is exactly the universal compound.
    pub fn is_universal(&self) -> bool {
        matches!(self.members.as_slice(), [only] if only.is_universal())
    }
}

/// Combinators linking a chain entry to the entry on its right.
/// Spec: Section 11 — Combinators (siblings are handled by [`SiblingGroup`])
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Combinator {
    /// Whitespace — ancestor relation.
    Descendant,
    /// `>` — parent relation.
    Child,
}

/// One ancestor entry of a chain: a sibling group plus the combinator that
/// relates it to the next entry toward the subject.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChainEntry {
    /// Relation to the next entry on the right.
    pub combinator: Combinator,
    /// The constraints at this tree position.
    pub group: SiblingGroup,
}

/// A complex selector: ancestor context (outermost first) plus the subject
/// group whose first member is the matched element.
/// Spec: Section 3, 11
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComplexSelector {
    /// Ancestor entries, outermost first. May be empty.
    pub context: Vec<ChainEntry>,
    /// The rightmost sibling group; `members[0]` is the matched element.
    pub subject: SiblingGroup,
}

impl ComplexSelector {
    /// A chain with no ancestor context.
    pub fn from_subject(subject: SiblingGroup) -> Self {
        Self {
            context: Vec::new(),
            subject,
        }
    }
}

/// A selector list separated by commas.
/// Spec: Section 4 — Groups of selectors
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectorList {
    /// Union branches in source order.
    pub selectors: Vec<ComplexSelector>,
}
