//! Attribute assertion intersection.
//!
//! Reduces a conjunction of assertions on one attribute key to a minimal
//! equivalent conjunction, or nothing when the conjunction is unsatisfiable.
//! Case-insensitive values are compared (and re-emitted) under Unicode
//! lower-case folding.

use log::trace;
use selector_syntax::{AttrAssertion, AttrOperator};

/// The three anchoring operators share one reconciliation routine,
/// parameterized by the string predicate and the piping rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AnchorKind {
    /// `^=` — prefix predicate.
    Prefix,
    /// `$=` — suffix predicate.
    Suffix,
    /// `|=` — prefix predicate over `-`-stripped canonical forms.
    Dash,
}

impl AnchorKind {
    fn operator(self) -> AttrOperator {
        match self {
            Self::Prefix => AttrOperator::Prefix,
            Self::Suffix => AttrOperator::Suffix,
            Self::Dash => AttrOperator::DashMatch,
        }
    }
}

/// Canonical form of a `|=` value: any trailing `-` is insignificant.
fn strip_dash(value: &str) -> &str {
    value.trim_end_matches('-')
}

/// True when every attribute value matching `specific` also matches
/// `general` under `kind`'s predicate.
fn extends(kind: AnchorKind, specific: &str, general: &str) -> bool {
    match kind {
        AnchorKind::Prefix => specific.starts_with(general),
        AnchorKind::Suffix => specific.ends_with(general),
        AnchorKind::Dash => {
            let specific = strip_dash(specific);
            let general = strip_dash(general);
            specific == general
                || specific
                    .strip_prefix(general)
                    .is_some_and(|rest| rest.starts_with('-'))
        }
    }
}

/// True when a fixed equality value satisfies the anchoring assertion.
fn eq_satisfies(kind: AnchorKind, eq_value: &str, anchor: &str) -> bool {
    match kind {
        AnchorKind::Prefix => eq_value.starts_with(anchor),
        AnchorKind::Suffix => eq_value.ends_with(anchor),
        AnchorKind::Dash => {
            let stripped = strip_dash(anchor);
            eq_value == stripped
                || eq_value
                    .strip_prefix(stripped)
                    .is_some_and(|rest| rest.starts_with('-'))
        }
    }
}

/// Merge an incoming anchoring value into the slot for its case class:
/// the more specific value survives; incompatible values are unsatisfiable.
fn merge_anchor(kind: AnchorKind, current: Option<String>, incoming: &str) -> Option<String> {
    match current {
        None => Some(incoming.to_owned()),
        Some(existing) => {
            if extends(kind, incoming, &existing) {
                Some(incoming.to_owned())
            } else if extends(kind, &existing, incoming) {
                Some(existing)
            } else {
                trace!("[ATTR] {kind:?} anchors `{existing}` and `{incoming}` conflict");
                None
            }
        }
    }
}

/// At most one sensitive and one insensitive anchoring per operator.
/// Insensitive values are stored folded.
#[derive(Debug, Default)]
struct AnchorPair {
    sensitive: Option<String>,
    insensitive: Option<String>,
}

/// Accumulator for one attribute key. `None` from any method means the
/// conjunction is unsatisfiable.
#[derive(Debug)]
struct Reduction {
    name: String,
    sensitive_eq: Option<String>,
    /// Folded representative of all case-insensitive equalities.
    insensitive_eq: Option<String>,
    prefix: AnchorPair,
    suffix: AnchorPair,
    dash: AnchorPair,
    sensitive_includes: Vec<String>,
    /// Folded.
    insensitive_includes: Vec<String>,
    token_matches: Vec<(String, bool)>,
}

impl Reduction {
    fn new(name: String) -> Self {
        Self {
            name,
            sensitive_eq: None,
            insensitive_eq: None,
            prefix: AnchorPair::default(),
            suffix: AnchorPair::default(),
            dash: AnchorPair::default(),
            sensitive_includes: Vec::new(),
            insensitive_includes: Vec::new(),
            token_matches: Vec::new(),
        }
    }

    fn pair_mut(&mut self, kind: AnchorKind) -> &mut AnchorPair {
        match kind {
            AnchorKind::Prefix => &mut self.prefix,
            AnchorKind::Suffix => &mut self.suffix,
            AnchorKind::Dash => &mut self.dash,
        }
    }

    /// Stage (b): equality reconciliation.
    fn add_equality(&mut self, assertion: &AttrAssertion) -> Option<()> {
        if assertion.case_sensitive {
            if self
                .sensitive_eq
                .as_ref()
                .is_some_and(|existing| existing != &assertion.value)
            {
                trace!("[ATTR] conflicting `=` values on {}", self.name);
                return None;
            }
            if self
                .insensitive_eq
                .as_ref()
                .is_some_and(|folded| folded != &assertion.value.to_lowercase())
            {
                trace!("[ATTR] `=` value contradicts insensitive `=` on {}", self.name);
                return None;
            }
            self.sensitive_eq = Some(assertion.value.clone());
        } else {
            let folded = assertion.value.to_lowercase();
            if self
                .sensitive_eq
                .as_ref()
                .is_some_and(|existing| existing.to_lowercase() != folded)
            {
                trace!("[ATTR] insensitive `=` contradicts `=` on {}", self.name);
                return None;
            }
            if self
                .insensitive_eq
                .as_ref()
                .is_some_and(|existing| existing != &folded)
            {
                trace!("[ATTR] conflicting insensitive `=` values on {}", self.name);
                return None;
            }
            self.insensitive_eq = Some(folded);
        }
        Some(())
    }

    /// Stage (c): fold one anchoring assertion into its operator's pair.
    fn add_anchor(&mut self, kind: AnchorKind, assertion: &AttrAssertion) -> Option<()> {
        let pair = self.pair_mut(kind);
        if assertion.case_sensitive {
            pair.sensitive = Some(merge_anchor(kind, pair.sensitive.take(), &assertion.value)?);
        } else {
            let folded = assertion.value.to_lowercase();
            pair.insensitive = Some(merge_anchor(kind, pair.insensitive.take(), &folded)?);
        }
        self.reconcile_pair(kind)
    }

    /// Cross-case reconciliation within one operator: if the sensitive
    /// anchoring already covers the insensitive one under folding, the
    /// insensitive one is subsumed; if the two folded values are unrelated
    /// the conjunction is unsatisfiable; an insensitive anchoring that is strictly more
    /// specific is kept alongside.
    fn reconcile_pair(&mut self, kind: AnchorKind) -> Option<()> {
        let pair = self.pair_mut(kind);
        if let (Some(sensitive), Some(insensitive)) = (&pair.sensitive, &pair.insensitive) {
            let folded = sensitive.to_lowercase();
            if extends(kind, &folded, insensitive) {
                pair.insensitive = None;
            } else if !extends(kind, insensitive, &folded) {
                trace!("[ATTR] cross-case {kind:?} anchors conflict on {}", self.name);
                return None;
            }
        }
        Some(())
    }

    /// Stage (c), tail: a fixed equality value subsumes every anchoring it
    /// satisfies and contradicts every one it does not. With only an
    /// insensitive equality, a sensitive anchoring is checked under folding
    /// but kept — the equality does not pin the case.
    fn reconcile_anchors_with_equality(&mut self) -> Option<()> {
        for kind in [AnchorKind::Prefix, AnchorKind::Suffix, AnchorKind::Dash] {
            if let Some(eq_value) = self.sensitive_eq.clone() {
                let eq_folded = eq_value.to_lowercase();
                let pair = self.pair_mut(kind);
                if let Some(anchor) = pair.sensitive.take()
                    && !eq_satisfies(kind, &eq_value, &anchor)
                {
                    trace!("[ATTR] `=` value fails {kind:?} anchor `{anchor}`");
                    return None;
                }
                if let Some(anchor) = pair.insensitive.take()
                    && !eq_satisfies(kind, &eq_folded, &anchor)
                {
                    trace!("[ATTR] `=` value fails insensitive {kind:?} anchor `{anchor}`");
                    return None;
                }
            } else if let Some(eq_folded) = self.insensitive_eq.clone() {
                let pair = self.pair_mut(kind);
                if let Some(anchor) = pair.insensitive.take()
                    && !eq_satisfies(kind, &eq_folded, &anchor)
                {
                    trace!("[ATTR] insensitive `=` fails {kind:?} anchor `{anchor}`");
                    return None;
                }
                if let Some(anchor) = &pair.sensitive
                    && !eq_satisfies(kind, &eq_folded, &anchor.to_lowercase())
                {
                    trace!("[ATTR] insensitive `=` fails sensitive {kind:?} anchor");
                    return None;
                }
            }
        }
        Some(())
    }

    /// Stage (e): `^=` and `|=` both anchor the front of the value; the
    /// implied side is dropped, incompatible prefixes are unsatisfiable.
    fn reconcile_prefix_with_dash(&mut self) -> Option<()> {
        // Same-class, sensitive.
        if let (Some(prefix_value), Some(dash_value)) =
            (self.prefix.sensitive.clone(), self.dash.sensitive.clone())
        {
            let stripped = strip_dash(&dash_value);
            if stripped.starts_with(prefix_value.as_str()) {
                self.prefix.sensitive = None;
            } else if prefix_value
                .strip_prefix(stripped)
                .is_some_and(|rest| rest.starts_with('-'))
            {
                self.dash.sensitive = None;
            } else {
                trace!("[ATTR] `^=` `{prefix_value}` and `|=` `{dash_value}` conflict");
                return None;
            }
        }
        // Same-class, insensitive (both folded already).
        if let (Some(prefix_value), Some(dash_value)) = (
            self.prefix.insensitive.clone(),
            self.dash.insensitive.clone(),
        ) {
            let stripped = strip_dash(&dash_value);
            if stripped.starts_with(prefix_value.as_str()) {
                self.prefix.insensitive = None;
            } else if prefix_value
                .strip_prefix(stripped)
                .is_some_and(|rest| rest.starts_with('-'))
            {
                self.dash.insensitive = None;
            } else {
                trace!("[ATTR] insensitive `^=`/`|=` conflict on {}", self.name);
                return None;
            }
        }
        // Sensitive `^=` against insensitive `|=`: dropping is only sound
        // for the insensitive (implied) side.
        if let (Some(prefix_value), Some(dash_value)) = (
            self.prefix.sensitive.clone(),
            self.dash.insensitive.clone(),
        ) {
            let folded_prefix = prefix_value.to_lowercase();
            let stripped = strip_dash(&dash_value);
            if folded_prefix
                .strip_prefix(stripped)
                .is_some_and(|rest| rest.starts_with('-'))
            {
                self.dash.insensitive = None;
            } else if !stripped.starts_with(folded_prefix.as_str()) {
                trace!("[ATTR] `^=` conflicts with insensitive `|=` on {}", self.name);
                return None;
            }
        }
        // Insensitive `^=` against sensitive `|=`.
        if let (Some(prefix_value), Some(dash_value)) = (
            self.prefix.insensitive.clone(),
            self.dash.sensitive.clone(),
        ) {
            let folded_stripped = strip_dash(&dash_value).to_lowercase();
            if folded_stripped.starts_with(prefix_value.as_str()) {
                self.prefix.insensitive = None;
            } else if prefix_value
                .strip_prefix(folded_stripped.as_str())
                .is_none_or(|rest| !rest.starts_with('-'))
            {
                trace!("[ATTR] insensitive `^=` conflicts with `|=` on {}", self.name);
                return None;
            }
        }
        Some(())
    }

    /// Stage (d): fold one `*=` assertion into the include sets. A covered
    /// incoming value is skipped; existing values that are substrings of
    /// the incoming one are replaced by it.
    fn add_include(&mut self, assertion: &AttrAssertion) {
        if assertion.case_sensitive {
            let value = &assertion.value;
            if self
                .sensitive_includes
                .iter()
                .any(|existing| existing.contains(value.as_str()))
            {
                return;
            }
            self.sensitive_includes
                .retain(|existing| !value.contains(existing.as_str()));
            self.sensitive_includes.push(value.clone());
        } else {
            let folded = assertion.value.to_lowercase();
            if self
                .sensitive_includes
                .iter()
                .any(|existing| existing.to_lowercase().contains(folded.as_str()))
            {
                return;
            }
            if self
                .insensitive_includes
                .iter()
                .any(|existing| existing.contains(folded.as_str()))
            {
                return;
            }
            self.insensitive_includes
                .retain(|existing| !folded.contains(existing.as_str()));
            self.insensitive_includes.push(folded);
        }
    }

    /// Stage (d), tail: validate includes against a fixed equality value
    /// and drop the subsumed sets. An absent equality value imposes no
    /// constraint.
    fn validate_includes(&mut self) -> Option<()> {
        if let Some(eq_value) = &self.sensitive_eq {
            if self
                .sensitive_includes
                .iter()
                .any(|include| !eq_value.contains(include.as_str()))
            {
                trace!("[ATTR] `=` value fails a `*=` include on {}", self.name);
                return None;
            }
            let eq_folded = eq_value.to_lowercase();
            if self
                .insensitive_includes
                .iter()
                .any(|include| !eq_folded.contains(include.as_str()))
            {
                trace!("[ATTR] `=` value fails an insensitive `*=` include");
                return None;
            }
            self.sensitive_includes.clear();
            self.insensitive_includes.clear();
        } else if let Some(eq_folded) = &self.insensitive_eq {
            if self
                .sensitive_includes
                .iter()
                .any(|include| !eq_folded.contains(include.to_lowercase().as_str()))
            {
                trace!("[ATTR] insensitive `=` fails a `*=` include on {}", self.name);
                return None;
            }
            if self
                .insensitive_includes
                .iter()
                .any(|include| !eq_folded.contains(include.as_str()))
            {
                trace!("[ATTR] insensitive `=` fails an insensitive `*=` include");
                return None;
            }
            // The folded equality subsumes insensitive includes only; a
            // sensitive include still constrains the case.
            self.insensitive_includes.clear();
        }
        Some(())
    }

    /// Stage (f): `~=` deduplication by `(value, case_sensitive)`.
    fn add_token_match(&mut self, assertion: &AttrAssertion) {
        let entry = (assertion.value.clone(), assertion.case_sensitive);
        if !self.token_matches.contains(&entry) {
            self.token_matches.push(entry);
        }
    }

    /// Emit the surviving conjunction in deterministic order.
    fn into_assertions(self) -> Vec<AttrAssertion> {
        let name = self.name;
        let mut out = Vec::new();
        if let Some(value) = self.sensitive_eq {
            out.push(AttrAssertion::new(name.clone(), AttrOperator::Equal, value));
        } else if let Some(folded) = self.insensitive_eq {
            out.push(AttrAssertion {
                name: name.clone(),
                operator: AttrOperator::Equal,
                value: folded,
                case_sensitive: false,
            });
        }
        for (pair, operator) in [
            (self.prefix, AttrOperator::Prefix),
            (self.suffix, AttrOperator::Suffix),
            (self.dash, AttrOperator::DashMatch),
        ] {
            if let Some(value) = pair.sensitive {
                out.push(AttrAssertion::new(name.clone(), operator, value));
            }
            if let Some(folded) = pair.insensitive {
                out.push(AttrAssertion {
                    name: name.clone(),
                    operator,
                    value: folded,
                    case_sensitive: false,
                });
            }
        }
        for value in self.sensitive_includes {
            out.push(AttrAssertion::new(
                name.clone(),
                AttrOperator::Substring,
                value,
            ));
        }
        for folded in self.insensitive_includes {
            out.push(AttrAssertion {
                name: name.clone(),
                operator: AttrOperator::Substring,
                value: folded,
                case_sensitive: false,
            });
        }
        for (value, case_sensitive) in self.token_matches {
            out.push(AttrAssertion {
                name: name.clone(),
                operator: AttrOperator::Includes,
                value,
                case_sensitive,
            });
        }
        out
    }
}

/// Reduce a conjunction of assertions sharing one attribute key to a
/// minimal equivalent conjunction; `None` means unsatisfiable. Idempotent, and
/// order-insensitive when results are compared as sets.
pub fn reduce(assertions: &[AttrAssertion]) -> Option<Vec<AttrAssertion>> {
    let Some(first) = assertions.first() else {
        return Some(Vec::new());
    };

    // Stage (a): existence assertions are subsumed by any operator-bearing
    // assertion on the same key.
    if assertions
        .iter()
        .all(|assertion| assertion.operator == AttrOperator::Exists)
    {
        return Some(vec![first.clone()]);
    }

    let mut reduction = Reduction::new(first.name.clone());
    for assertion in assertions
        .iter()
        .filter(|assertion| assertion.operator == AttrOperator::Equal)
    {
        reduction.add_equality(assertion)?;
    }
    for assertion in assertions {
        let kind = match assertion.operator {
            AttrOperator::Prefix => AnchorKind::Prefix,
            AttrOperator::Suffix => AnchorKind::Suffix,
            AttrOperator::DashMatch => AnchorKind::Dash,
            AttrOperator::Exists
            | AttrOperator::Equal
            | AttrOperator::Includes
            | AttrOperator::Substring => continue,
        };
        reduction.add_anchor(kind, assertion)?;
    }
    reduction.reconcile_anchors_with_equality()?;
    reduction.reconcile_prefix_with_dash()?;
    for assertion in assertions
        .iter()
        .filter(|assertion| assertion.operator == AttrOperator::Substring)
    {
        reduction.add_include(assertion);
    }
    reduction.validate_includes()?;
    for assertion in assertions
        .iter()
        .filter(|assertion| assertion.operator == AttrOperator::Includes)
    {
        reduction.add_token_match(assertion);
    }
    Some(reduction.into_assertions())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sensitive(operator: AttrOperator, value: &str) -> AttrAssertion {
        AttrAssertion::new("x", operator, value)
    }

    fn insensitive(operator: AttrOperator, value: &str) -> AttrAssertion {
        AttrAssertion {
            name: String::from("x"),
            operator,
            value: String::from(value),
            case_sensitive: false,
        }
    }

    #[test]
    fn existence_is_subsumed_by_any_operator() {
        assert_eq!(
            reduce(&[
                AttrAssertion::exists("x"),
                sensitive(AttrOperator::Equal, "a"),
            ]),
            Some(vec![sensitive(AttrOperator::Equal, "a")])
        );
        assert_eq!(
            reduce(&[AttrAssertion::exists("x"), AttrAssertion::exists("x")]),
            Some(vec![AttrAssertion::exists("x")])
        );
    }

    #[test]
    fn equality_conflicts_are_bottom() {
        assert_eq!(
            reduce(&[
                sensitive(AttrOperator::Equal, "a"),
                sensitive(AttrOperator::Equal, "b"),
            ]),
            None
        );
        assert_eq!(
            reduce(&[
                sensitive(AttrOperator::Equal, "Foo"),
                insensitive(AttrOperator::Equal, "bar"),
            ]),
            None
        );
    }

    #[test]
    fn sensitive_equality_subsumes_insensitive() {
        assert_eq!(
            reduce(&[
                insensitive(AttrOperator::Equal, "Foo"),
                sensitive(AttrOperator::Equal, "foo"),
            ]),
            Some(vec![sensitive(AttrOperator::Equal, "foo")])
        );
    }

    #[test]
    fn insensitive_equalities_fold_together() {
        assert_eq!(
            reduce(&[
                insensitive(AttrOperator::Equal, "FOO"),
                insensitive(AttrOperator::Equal, "foo"),
            ]),
            Some(vec![insensitive(AttrOperator::Equal, "foo")])
        );
    }

    #[test]
    fn anchoring_keeps_the_longer_value() {
        assert_eq!(
            reduce(&[
                sensitive(AttrOperator::Prefix, "ab"),
                sensitive(AttrOperator::Prefix, "abc"),
            ]),
            Some(vec![sensitive(AttrOperator::Prefix, "abc")])
        );
        assert_eq!(
            reduce(&[
                sensitive(AttrOperator::Suffix, "ng"),
                sensitive(AttrOperator::Suffix, "png"),
            ]),
            Some(vec![sensitive(AttrOperator::Suffix, "png")])
        );
        assert_eq!(
            reduce(&[
                sensitive(AttrOperator::Prefix, "ab"),
                sensitive(AttrOperator::Prefix, "ax"),
            ]),
            None
        );
    }

    #[test]
    fn piped_anchors_compare_stripped_forms() {
        assert_eq!(
            reduce(&[
                sensitive(AttrOperator::DashMatch, "en"),
                sensitive(AttrOperator::DashMatch, "en-US"),
            ]),
            Some(vec![sensitive(AttrOperator::DashMatch, "en-US")])
        );
        assert_eq!(
            reduce(&[
                sensitive(AttrOperator::DashMatch, "en-"),
                sensitive(AttrOperator::DashMatch, "en"),
            ]),
            Some(vec![sensitive(AttrOperator::DashMatch, "en")])
        );
        assert_eq!(
            reduce(&[
                sensitive(AttrOperator::DashMatch, "en"),
                sensitive(AttrOperator::DashMatch, "fr"),
            ]),
            None
        );
    }

    #[test]
    fn cross_case_anchoring() {
        // The sensitive anchor covers the folded insensitive one.
        assert_eq!(
            reduce(&[
                insensitive(AttrOperator::Prefix, "AB"),
                sensitive(AttrOperator::Prefix, "abc"),
            ]),
            Some(vec![sensitive(AttrOperator::Prefix, "abc")])
        );
        // The insensitive anchor is strictly more specific: keep both.
        assert_eq!(
            reduce(&[
                sensitive(AttrOperator::Prefix, "Ab"),
                insensitive(AttrOperator::Prefix, "ABCD"),
            ]),
            Some(vec![
                sensitive(AttrOperator::Prefix, "Ab"),
                insensitive(AttrOperator::Prefix, "abcd"),
            ])
        );
        // Unrelated under folding.
        assert_eq!(
            reduce(&[
                sensitive(AttrOperator::Prefix, "ab"),
                insensitive(AttrOperator::Prefix, "AX"),
            ]),
            None
        );
    }

    #[test]
    fn equality_subsumes_satisfied_anchors() {
        assert_eq!(
            reduce(&[
                sensitive(AttrOperator::Prefix, "ab"),
                sensitive(AttrOperator::Equal, "abc"),
            ]),
            Some(vec![sensitive(AttrOperator::Equal, "abc")])
        );
        assert_eq!(
            reduce(&[
                sensitive(AttrOperator::Suffix, "zz"),
                sensitive(AttrOperator::Equal, "abc"),
            ]),
            None
        );
        assert_eq!(
            reduce(&[
                sensitive(AttrOperator::DashMatch, "en"),
                sensitive(AttrOperator::Equal, "en-US"),
            ]),
            Some(vec![sensitive(AttrOperator::Equal, "en-US")])
        );
    }

    #[test]
    fn insensitive_equality_keeps_sensitive_anchor() {
        assert_eq!(
            reduce(&[
                sensitive(AttrOperator::Prefix, "Ab"),
                insensitive(AttrOperator::Equal, "ABC"),
            ]),
            Some(vec![
                insensitive(AttrOperator::Equal, "abc"),
                sensitive(AttrOperator::Prefix, "Ab"),
            ])
        );
        assert_eq!(
            reduce(&[
                sensitive(AttrOperator::Prefix, "zz"),
                insensitive(AttrOperator::Equal, "ABC"),
            ]),
            None
        );
    }

    #[test]
    fn prefix_and_dash_reduce_to_the_implied_side() {
        assert_eq!(
            reduce(&[
                sensitive(AttrOperator::Prefix, "en"),
                sensitive(AttrOperator::DashMatch, "en-US"),
            ]),
            Some(vec![sensitive(AttrOperator::DashMatch, "en-US")])
        );
        assert_eq!(
            reduce(&[
                sensitive(AttrOperator::Prefix, "en-US-x"),
                sensitive(AttrOperator::DashMatch, "en"),
            ]),
            Some(vec![sensitive(AttrOperator::Prefix, "en-US-x")])
        );
        assert_eq!(
            reduce(&[
                sensitive(AttrOperator::Prefix, "enx"),
                sensitive(AttrOperator::DashMatch, "en"),
            ]),
            None
        );
    }

    #[test]
    fn includes_keep_the_strictest_substrings() {
        assert_eq!(
            reduce(&[
                sensitive(AttrOperator::Substring, "bc"),
                sensitive(AttrOperator::Substring, "abcd"),
                sensitive(AttrOperator::Substring, "cd"),
            ]),
            Some(vec![sensitive(AttrOperator::Substring, "abcd")])
        );
        // Unrelated includes accumulate.
        assert_eq!(
            reduce(&[
                sensitive(AttrOperator::Substring, "ab"),
                sensitive(AttrOperator::Substring, "xy"),
            ]),
            Some(vec![
                sensitive(AttrOperator::Substring, "ab"),
                sensitive(AttrOperator::Substring, "xy"),
            ])
        );
        // An insensitive include covered by a sensitive one is dropped.
        assert_eq!(
            reduce(&[
                sensitive(AttrOperator::Substring, "aBc"),
                insensitive(AttrOperator::Substring, "AB"),
            ]),
            Some(vec![sensitive(AttrOperator::Substring, "aBc")])
        );
    }

    #[test]
    fn includes_validate_against_equality() {
        assert_eq!(
            reduce(&[
                sensitive(AttrOperator::Substring, "bc"),
                sensitive(AttrOperator::Equal, "abcd"),
            ]),
            Some(vec![sensitive(AttrOperator::Equal, "abcd")])
        );
        assert_eq!(
            reduce(&[
                sensitive(AttrOperator::Substring, "zz"),
                sensitive(AttrOperator::Equal, "abcd"),
            ]),
            None
        );
        // Insensitive equality keeps a sensitive include alive.
        assert_eq!(
            reduce(&[
                sensitive(AttrOperator::Substring, "Bc"),
                insensitive(AttrOperator::Equal, "aBcD"),
            ]),
            Some(vec![
                insensitive(AttrOperator::Equal, "abcd"),
                sensitive(AttrOperator::Substring, "Bc"),
            ])
        );
    }

    #[test]
    fn token_matches_deduplicate_by_value_and_case() {
        assert_eq!(
            reduce(&[
                sensitive(AttrOperator::Includes, "tag"),
                sensitive(AttrOperator::Includes, "tag"),
                insensitive(AttrOperator::Includes, "tag"),
            ]),
            Some(vec![
                sensitive(AttrOperator::Includes, "tag"),
                insensitive(AttrOperator::Includes, "tag"),
            ])
        );
    }

    #[test]
    fn reduction_is_idempotent() {
        let input = vec![
            sensitive(AttrOperator::Prefix, "https://"),
            sensitive(AttrOperator::Suffix, ".png"),
            insensitive(AttrOperator::Substring, "CDN"),
        ];
        let once = reduce(&input);
        let twice = once.as_deref().and_then(reduce);
        assert_eq!(once, twice);
    }
}
