//! Canonical serialization of the selector model.
//!
//! The rendering round-trips through the tokenizer: `parse(render(x))`
//! reproduces `x` for every value the parser can produce. Sibling relations
//! always render as `~`; `+` never appears in output.

use crate::{
    AttrAssertion, AttrOperator, ChainEntry, Combinator, CompoundSelector, ComplexSelector,
    PseudoClass, SelectorList, SiblingGroup,
};
use core::fmt;

/// True when the value can be written unquoted (and unescaped) in CSS.
fn is_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_ascii_alphabetic() || first == '_' || first == '-') {
        return false;
    }
    if first == '-' {
        // `-` alone and `-5x` are not identifiers.
        match value.chars().nth(1) {
            None => return false,
            Some(second) if second.is_ascii_digit() => return false,
            Some(_) => {}
        }
    }
    chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
}

/// Write an attribute value quoted so that it re-tokenizes to itself:
/// `'` by default, `"` when the value itself contains `'`.
fn write_quoted(formatter: &mut fmt::Formatter<'_>, value: &str) -> fmt::Result {
    let quote = if value.contains('\'') { '"' } else { '\'' };
    write!(formatter, "{quote}")?;
    for ch in value.chars() {
        match ch {
            '\\' => write!(formatter, "\\\\")?,
            '\n' => write!(formatter, "\\a ")?,
            _ if ch == quote => write!(formatter, "\\{ch}")?,
            _ => write!(formatter, "{ch}")?,
        }
    }
    write!(formatter, "{quote}")
}

impl AttrAssertion {
    /// True for sensitive `class ~=` assertions rendered with `.` sugar.
    fn is_class_sugar(&self) -> bool {
        self.name == "class"
            && self.operator == AttrOperator::Includes
            && self.case_sensitive
            && is_identifier(&self.value)
    }

    /// True for sensitive `id =` assertions rendered with `#` sugar.
    fn is_id_sugar(&self) -> bool {
        self.name == "id"
            && self.operator == AttrOperator::Equal
            && self.case_sensitive
            && is_identifier(&self.value)
    }
}

impl fmt::Display for AttrAssertion {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.operator == AttrOperator::Exists {
            return write!(formatter, "[{}]", self.name);
        }
        write!(formatter, "[{}{}", self.name, self.operator.as_str())?;
        write_quoted(formatter, &self.value)?;
        if !self.case_sensitive {
            write!(formatter, " i")?;
        }
        write!(formatter, "]")
    }
}

impl fmt::Display for PseudoClass {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.argument {
            Some(argument) => write!(formatter, ":{}({argument})", self.name),
            None => write!(formatter, ":{}", self.name),
        }
    }
}

impl fmt::Display for CompoundSelector {
    /// Canonical component order: element, pseudo-element, classes,
    /// attributes, pseudo-classes, ids. An otherwise empty compound
    /// renders as `*`.
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut wrote_any = false;
        if let Some(element) = &self.element {
            write!(formatter, "{element}")?;
            wrote_any = true;
        }
        if let Some(pseudo_element) = &self.pseudo_element {
            write!(formatter, "::{pseudo_element}")?;
            wrote_any = true;
        }
        for attr in self.attributes.iter().filter(|attr| attr.is_class_sugar()) {
            write!(formatter, ".{}", attr.value)?;
            wrote_any = true;
        }
        for attr in self
            .attributes
            .iter()
            .filter(|attr| !attr.is_class_sugar() && !attr.is_id_sugar())
        {
            write!(formatter, "{attr}")?;
            wrote_any = true;
        }
        for pseudo in &self.pseudo_classes {
            write!(formatter, "{pseudo}")?;
            wrote_any = true;
        }
        for attr in self.attributes.iter().filter(|attr| attr.is_id_sugar()) {
            write!(formatter, "#{}", attr.value)?;
            wrote_any = true;
        }
        if !wrote_any {
            write!(formatter, "*")?;
        }
        Ok(())
    }
}

impl fmt::Display for SiblingGroup {
    /// Sibling constraints first (source order), the relation-bearing
    /// member last, joined by ` ~ `.
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        for member in self.members.iter().skip(1).rev() {
            write!(formatter, "{member} ~ ")?;
        }
        match self.members.first() {
            Some(first) => write!(formatter, "{first}"),
            None => Ok(()),
        }
    }
}

impl fmt::Display for ChainEntry {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let separator = match self.combinator {
            Combinator::Descendant => " ",
            Combinator::Child => " > ",
        };
        write!(formatter, "{}{separator}", self.group)
    }
}

impl fmt::Display for ComplexSelector {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.context {
            write!(formatter, "{entry}")?;
        }
        write!(formatter, "{}", self.subject)
    }
}

impl fmt::Display for SelectorList {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for selector in &self.selectors {
            if !first {
                write!(formatter, ", ")?;
            }
            first = false;
            write!(formatter, "{selector}")?;
        }
        Ok(())
    }
}
