//! Compound selector intersection.

use crate::attribute;
use log::trace;
use selector_syntax::{AttrAssertion, CompoundSelector};

/// Intersect two compound selectors component-wise; `None` means the
/// intersection is unsatisfiable.
///
/// The element type and pseudo-element must agree (the non-universal and
/// the present one win); pseudo-classes union as a structural set;
/// attribute assertions are grouped by key and reduced together.
pub fn intersect_compounds(
    left: &CompoundSelector,
    right: &CompoundSelector,
) -> Option<CompoundSelector> {
    let element = match (&left.element, &right.element) {
        (Some(first), Some(second)) if first != second => {
            trace!("[COMPOUND] element types `{first}` and `{second}` conflict");
            return None;
        }
        (Some(element), _) | (_, Some(element)) => Some(element.clone()),
        (None, None) => None,
    };

    let pseudo_element = match (&left.pseudo_element, &right.pseudo_element) {
        (Some(first), Some(second)) if first != second => {
            trace!("[COMPOUND] pseudo-elements `{first}` and `{second}` conflict");
            return None;
        }
        (Some(pseudo), _) | (_, Some(pseudo)) => Some(pseudo.clone()),
        (None, None) => None,
    };

    let mut pseudo_classes = left.pseudo_classes.clone();
    for pseudo in &right.pseudo_classes {
        if !pseudo_classes.contains(pseudo) {
            pseudo_classes.push(pseudo.clone());
        }
    }

    let combined: Vec<&AttrAssertion> =
        left.attributes.iter().chain(&right.attributes).collect();
    let mut keys: Vec<String> = Vec::new();
    for assertion in &combined {
        if !keys.contains(&assertion.name) {
            keys.push(assertion.name.clone());
        }
    }
    let mut attributes = Vec::new();
    for key in &keys {
        let group: Vec<AttrAssertion> = combined
            .iter()
            .filter(|assertion| &assertion.name == key)
            .map(|assertion| (*assertion).clone())
            .collect();
        attributes.extend(attribute::reduce(&group)?);
    }

    Some(CompoundSelector {
        element,
        pseudo_element,
        pseudo_classes,
        attributes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use selector_syntax::{AttrOperator, PseudoClass};

    #[test]
    fn element_types_must_agree() {
        let left = CompoundSelector::with_element("a");
        let right = CompoundSelector::with_element("b");
        assert_eq!(intersect_compounds(&left, &right), None);

        let universal = CompoundSelector::default();
        assert_eq!(intersect_compounds(&left, &universal), Some(left.clone()));
        assert_eq!(intersect_compounds(&universal, &left), Some(left));
    }

    #[test]
    fn pseudo_elements_must_agree() {
        let mut first_line = CompoundSelector::with_element("p");
        first_line.pseudo_element = Some(String::from("first-line"));
        let mut first_letter = CompoundSelector::with_element("p");
        first_letter.pseudo_element = Some(String::from("first-letter"));
        assert_eq!(intersect_compounds(&first_line, &first_letter), None);
        assert_eq!(
            intersect_compounds(&first_line, &first_line),
            Some(first_line)
        );
    }

    #[test]
    fn pseudo_classes_union_structurally() {
        let mut left = CompoundSelector::with_element("b");
        left.pseudo_classes.push(PseudoClass {
            name: String::from("nth-child"),
            argument: Some(String::from("4")),
        });
        let mut right = CompoundSelector::with_element("b");
        right.pseudo_classes.push(PseudoClass {
            name: String::from("not"),
            argument: Some(String::from("[attr~='yo']")),
        });
        right.pseudo_classes.push(PseudoClass {
            name: String::from("nth-child"),
            argument: Some(String::from("4")),
        });

        let merged = intersect_compounds(&left, &right);
        assert_eq!(
            merged.map(|compound| compound.pseudo_classes),
            Some(vec![
                PseudoClass {
                    name: String::from("nth-child"),
                    argument: Some(String::from("4")),
                },
                PseudoClass {
                    name: String::from("not"),
                    argument: Some(String::from("[attr~='yo']")),
                },
            ])
        );
    }

    #[test]
    fn attributes_group_by_key_before_reduction() {
        let mut left = CompoundSelector::default();
        left.attributes
            .push(AttrAssertion::new("href", AttrOperator::Prefix, "https://"));
        left.attributes
            .push(AttrAssertion::new("class", AttrOperator::Includes, "x"));
        let mut right = CompoundSelector::default();
        right.attributes.push(AttrAssertion::new(
            "href",
            AttrOperator::Prefix,
            "https://example",
        ));

        let merged = intersect_compounds(&left, &right);
        assert_eq!(
            merged.map(|compound| compound.attributes),
            Some(vec![
                AttrAssertion::new("href", AttrOperator::Prefix, "https://example"),
                AttrAssertion::new("class", AttrOperator::Includes, "x"),
            ])
        );
    }

    #[test]
    fn attribute_conflicts_propagate() {
        let mut left = CompoundSelector::default();
        left.attributes
            .push(AttrAssertion::new("x", AttrOperator::Equal, "a"));
        let mut right = CompoundSelector::default();
        right
            .attributes
            .push(AttrAssertion::new("x", AttrOperator::Equal, "b"));
        assert_eq!(intersect_compounds(&left, &right), None);
    }
}
