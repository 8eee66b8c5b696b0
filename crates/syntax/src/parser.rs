//! Selector structuring — from flat tokens to chains of sibling groups.
//! Spec: <https://www.w3.org/TR/selectors-3/>

use crate::tokenizer::{RawCombinator, SelectorParseError, SelectorToken, tokenize};
use crate::{
    AttrAssertion, AttrOperator, ChainEntry, Combinator, CompoundSelector, ComplexSelector,
    SelectorList, SiblingGroup,
};
use core::mem::take;
use log::trace;

/// Parse a selector list from CSS text.
/// Spec: Section 4 — Groups of selectors
///
/// Commas split the token stream into union branches; an empty branch
/// matches nothing and contributes nothing.
pub fn parse_selector_list(input: &str) -> Result<SelectorList, SelectorParseError> {
    let tokens = tokenize(input)?;
    let mut list = SelectorList::default();
    for branch in tokens.split(|token| matches!(token, SelectorToken::Comma)) {
        if branch.is_empty() {
            continue;
        }
        list.selectors.push(structure_branch(branch)?);
    }
    trace!("[PARSE] `{input}` -> {} branch(es)", list.selectors.len());
    Ok(list)
}

/// Structure one comma-free branch into a chain.
///
/// The walk is right-to-left: the rightmost compound is the subject. `>`
/// and whitespace open a new chain entry; `+`/`~` append a sibling slot to
/// the entry under construction (adjacent and general sibling are
/// deliberately merged into one relation).
fn structure_branch(branch: &[SelectorToken]) -> Result<ComplexSelector, SelectorParseError> {
    let mut compounds: Vec<CompoundSelector> = Vec::new();
    let mut links: Vec<RawCombinator> = Vec::new();
    let mut run_start = 0;
    for (index, token) in branch.iter().enumerate() {
        if let SelectorToken::Combinator(raw) = token {
            if index == run_start {
                return Err(SelectorParseError::DanglingCombinator);
            }
            compounds.push(extract_compound(&branch[run_start..index])?);
            links.push(*raw);
            run_start = index.saturating_add(1);
        }
    }
    if run_start >= branch.len() {
        return Err(SelectorParseError::DanglingCombinator);
    }
    compounds.push(extract_compound(&branch[run_start..])?);

    // Right-to-left fold into (link, sibling group) pairs; the first closed
    // group is the subject and carries no link.
    let Some(subject_seed) = compounds.pop() else {
        return Err(SelectorParseError::UnexpectedEnd);
    };
    let mut closed: Vec<(Option<Combinator>, SiblingGroup)> = Vec::new();
    let mut members = vec![subject_seed];
    let mut link: Option<Combinator> = None;
    while let (Some(compound), Some(raw)) = (compounds.pop(), links.pop()) {
        match raw {
            RawCombinator::AdjacentSibling | RawCombinator::GeneralSibling => {
                members.push(compound);
            }
            RawCombinator::Child | RawCombinator::Descendant => {
                closed.push((link, SiblingGroup {
                    members: take(&mut members),
                }));
                members = vec![compound];
                link = Some(if raw == RawCombinator::Child {
                    Combinator::Child
                } else {
                    Combinator::Descendant
                });
            }
        }
    }
    closed.push((link, SiblingGroup { members }));

    let mut groups = closed.into_iter();
    let Some((_, subject)) = groups.next() else {
        return Err(SelectorParseError::UnexpectedEnd);
    };
    let mut context: Vec<ChainEntry> = groups
        .map(|(entry_link, group)| ChainEntry {
            combinator: entry_link.unwrap_or(Combinator::Descendant),
            group,
        })
        .collect();
    context.reverse();
    Ok(ComplexSelector { context, subject })
}

/// Convert a run of compound tokens into a [`CompoundSelector`].
/// Spec: Section 5 — Simple selector sequences
///
/// Ids and classes become attribute assertions (`id =` and `class ~=`), so
/// the intersection engine sees one uniform representation.
pub fn extract_compound(tokens: &[SelectorToken]) -> Result<CompoundSelector, SelectorParseError> {
    let mut compound = CompoundSelector::default();
    for token in tokens {
        match token {
            SelectorToken::Type(name) => {
                if name != "*" {
                    compound.element = Some(name.clone());
                }
            }
            SelectorToken::Id(name) => {
                compound
                    .attributes
                    .push(AttrAssertion::new("id", AttrOperator::Equal, name.clone()));
            }
            SelectorToken::Class(name) => {
                compound.attributes.push(AttrAssertion::new(
                    "class",
                    AttrOperator::Includes,
                    name.clone(),
                ));
            }
            SelectorToken::Attribute(assertion) => {
                compound.attributes.push(assertion.clone());
            }
            SelectorToken::PseudoClass(pseudo) => {
                if !compound.pseudo_classes.contains(pseudo) {
                    compound.pseudo_classes.push(pseudo.clone());
                }
            }
            SelectorToken::PseudoElement(name) => match &compound.pseudo_element {
                Some(existing) if existing != name => {
                    return Err(SelectorParseError::ConflictingPseudoElements(
                        existing.clone(),
                        name.clone(),
                    ));
                }
                _ => compound.pseudo_element = Some(name.clone()),
            },
            SelectorToken::Combinator(_) | SelectorToken::Comma => {
                return Err(SelectorParseError::UnexpectedToken(format!("{token:?}")));
            }
        }
    }
    Ok(compound)
}
