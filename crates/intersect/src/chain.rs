//! Chain intersection — aligning two complex selectors under combinators.
//!
//! Chains are compared entry by entry after the shorter ancestor context is
//! left-padded with universal descendant entries. Two descendant entries
//! with different groups cannot be ordered relative to each other, so both
//! orders are enumerated and emitted as union branches.

use crate::compound::intersect_compounds;
use log::trace;
use selector_syntax::{ChainEntry, Combinator, ComplexSelector, SiblingGroup};

/// One aligned slot of the output chain, before linearization.
#[derive(Clone, Debug)]
enum Segment {
    /// The slot produced a fixed run of entries (possibly empty after
    /// universal entries were dropped).
    Fixed(Vec<ChainEntry>),
    /// Two descendant entries with no inherent order.
    Swappable(ChainEntry, ChainEntry),
}

/// Intersect two sibling groups: the relation-bearing members intersect
/// compound-wise, the remaining sibling constraints of both groups are
/// appended (the sibling relation is commutative) and deduplicated.
fn intersect_groups(left: &SiblingGroup, right: &SiblingGroup) -> Option<SiblingGroup> {
    let first_left = left.members.first()?;
    let first_right = right.members.first()?;
    let merged = intersect_compounds(first_left, first_right)?;
    // Serialization renders sibling constraints last-pushed first, so the
    // right side's constraints go in before the left side's.
    let mut members = vec![merged];
    for extra in right
        .members
        .iter()
        .skip(1)
        .chain(left.members.iter().skip(1))
    {
        if !members
            .iter()
            .skip(1)
            .any(|existing| existing == extra)
        {
            members.push(extra.clone());
        }
    }
    Some(SiblingGroup { members })
}

/// Pad a context on the left with universal descendant entries.
fn pad_context(context: &[ChainEntry], target_len: usize) -> Vec<ChainEntry> {
    let missing = target_len.saturating_sub(context.len());
    let mut padded = vec![
        ChainEntry {
            combinator: Combinator::Descendant,
            group: SiblingGroup::universal(),
        };
        missing
    ];
    padded.extend(context.iter().cloned());
    padded
}

/// Pair two aligned context entries into an output segment.
fn pair_entries(left: &ChainEntry, right: &ChainEntry) -> Option<Segment> {
    match (left.combinator, right.combinator) {
        (Combinator::Child, Combinator::Child) => {
            let group = intersect_groups(&left.group, &right.group)?;
            Some(Segment::Fixed(vec![ChainEntry {
                combinator: Combinator::Child,
                group,
            }]))
        }
        (Combinator::Descendant, Combinator::Descendant) => {
            // Universal entries (including alignment padding) impose no
            // constraint next to another ancestor entry.
            if left.group.is_universal() && right.group.is_universal() {
                Some(Segment::Fixed(Vec::new()))
            } else if left.group.is_universal() {
                Some(Segment::Fixed(vec![right.clone()]))
            } else if right.group.is_universal() {
                Some(Segment::Fixed(vec![left.clone()]))
            } else if left.group == right.group {
                Some(Segment::Fixed(vec![left.clone()]))
            } else {
                Some(Segment::Swappable(left.clone(), right.clone()))
            }
        }
        (Combinator::Child, Combinator::Descendant) => Some(split_mixed(left, right)),
        (Combinator::Descendant, Combinator::Child) => Some(split_mixed(right, left)),
    }
}

/// A parent entry against an ancestor entry: the ancestor constraint moves
/// above the parent constraint; a universal ancestor is dropped.
fn split_mixed(parent_side: &ChainEntry, ancestor_side: &ChainEntry) -> Segment {
    let mut entries = Vec::new();
    if !ancestor_side.group.is_universal() {
        entries.push(ChainEntry {
            combinator: Combinator::Descendant,
            group: ancestor_side.group.clone(),
        });
    }
    entries.push(ChainEntry {
        combinator: Combinator::Child,
        group: parent_side.group.clone(),
    });
    Segment::Fixed(entries)
}

/// Expand the swappable segments into every linearization.
fn linearize(segments: Vec<Segment>, subject: SiblingGroup) -> Vec<ComplexSelector> {
    let mut contexts: Vec<Vec<ChainEntry>> = vec![Vec::new()];
    for segment in segments {
        match segment {
            Segment::Fixed(entries) => {
                for context in &mut contexts {
                    context.extend(entries.iter().cloned());
                }
            }
            Segment::Swappable(first, second) => {
                let mut swapped = contexts.clone();
                for context in &mut contexts {
                    context.push(first.clone());
                    context.push(second.clone());
                }
                for context in &mut swapped {
                    context.push(second.clone());
                    context.push(first.clone());
                }
                contexts.append(&mut swapped);
            }
        }
    }
    contexts
        .into_iter()
        .map(|context| ComplexSelector {
            context,
            subject: subject.clone(),
        })
        .collect()
}

/// Intersect two chains. Returns every canonical linearization of the
/// result, or `None` when the intersection is unsatisfiable.
pub fn intersect_complex(
    left: &ComplexSelector,
    right: &ComplexSelector,
) -> Option<Vec<ComplexSelector>> {
    let subject = intersect_groups(&left.subject, &right.subject)?;

    let target_len = left.context.len().max(right.context.len());
    let left_context = pad_context(&left.context, target_len);
    let right_context = pad_context(&right.context, target_len);

    let mut segments = Vec::new();
    for (left_entry, right_entry) in left_context.iter().zip(right_context.iter()) {
        segments.push(pair_entries(left_entry, right_entry)?);
    }

    let variants = linearize(segments, subject);
    trace!("[CHAIN] intersection produced {} variant(s)", variants.len());
    Some(variants)
}

#[cfg(test)]
mod tests {
    use super::*;
    use selector_syntax::parse_selector_list;

    fn first_chain(input: &str) -> ComplexSelector {
        parse_selector_list(input)
            .ok()
            .and_then(|list| list.selectors.into_iter().next())
            .unwrap_or_else(|| ComplexSelector::from_subject(SiblingGroup::universal()))
    }

    fn render(chains: Option<Vec<ComplexSelector>>) -> Vec<String> {
        chains
            .unwrap_or_default()
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn conflicting_subjects_are_bottom() {
        assert_eq!(
            intersect_complex(&first_chain("a"), &first_chain("b")),
            None
        );
    }

    #[test]
    fn shorter_chains_pad_with_universal_ancestors() {
        assert_eq!(
            render(intersect_complex(
                &first_chain("div > span"),
                &first_chain("span"),
            )),
            vec![String::from("div > span")]
        );
    }

    #[test]
    fn child_against_descendant_stacks_the_ancestor_above() {
        assert_eq!(
            render(intersect_complex(
                &first_chain("a > b"),
                &first_chain("c b"),
            )),
            vec![String::from("c a > b")]
        );
        // Mirrored inputs give the same stacking.
        assert_eq!(
            render(intersect_complex(
                &first_chain("c b"),
                &first_chain("a > b"),
            )),
            vec![String::from("c a > b")]
        );
    }

    #[test]
    fn equal_descendant_entries_merge() {
        assert_eq!(
            render(intersect_complex(
                &first_chain("d b"),
                &first_chain("d b"),
            )),
            vec![String::from("d b")]
        );
    }

    #[test]
    fn unordered_descendant_entries_enumerate_both_orders() {
        assert_eq!(
            render(intersect_complex(
                &first_chain(".x b"),
                &first_chain(".y b"),
            )),
            vec![String::from(".x .y b"), String::from(".y .x b")]
        );
    }

    #[test]
    fn sibling_constraints_accumulate_on_the_subject() {
        assert_eq!(
            render(intersect_complex(
                &first_chain("a ~ b"),
                &first_chain("c ~ b"),
            )),
            vec![String::from("a ~ c ~ b")]
        );
        // Identical constraints are not duplicated.
        assert_eq!(
            render(intersect_complex(
                &first_chain("a ~ b"),
                &first_chain("a ~ b"),
            )),
            vec![String::from("a ~ b")]
        );
    }
}
