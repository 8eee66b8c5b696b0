//! CSS selector intersection.
//!
//! Computes, for one or more CSS selector strings, a single selector string
//! whose matched element set equals the intersection of the matched sets of
//! the inputs. A provably empty intersection is the empty string, never an
//! error.
//!
//! The engine is pure and synchronous: no I/O, no shared state, and a fixed
//! output for fixed inputs. Unsatisfiable combinations propagate internally
//! as `None` and are converted to `""` at the public boundary.
//!
//! ```
//! use selector_intersect::intersect;
//!
//! let merged = intersect(["a.x", "a.y"])?;
//! assert_eq!(merged, "a.x.y");
//!
//! let empty = intersect(["p::first-line", "p::first-letter"])?;
//! assert_eq!(empty, "");
//! # Ok::<(), selector_intersect::IntersectError>(())
//! ```

mod attribute;
mod chain;
mod compound;

// Re-export public API
pub use attribute::reduce as intersect_attributes;
pub use chain::intersect_complex;
pub use compound::intersect_compounds;
pub use selector_syntax::{
    AttrAssertion, AttrOperator, ChainEntry, Combinator, ComplexSelector, CompoundSelector,
    PseudoClass, SelectorList, SelectorParseError, SiblingGroup, parse_selector_list,
};

use log::debug;
use thiserror::Error;

/// Errors surfaced by [`intersect`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum IntersectError {
    /// The operation needs at least one selector.
    #[error("at least one selector is required")]
    NoSelectors,
    /// An input was not a valid CSS selector.
    #[error(transparent)]
    Parse(#[from] SelectorParseError),
}

/// Intersect two parsed selector lists.
///
/// Every pair of union branches is intersected; successful results are
/// flattened into one list, and branches that render identically are
/// emitted once.
pub fn intersect_lists(left: &SelectorList, right: &SelectorList) -> SelectorList {
    let mut selectors = Vec::new();
    let mut seen: Vec<String> = Vec::new();
    for left_branch in &left.selectors {
        for right_branch in &right.selectors {
            let Some(variants) = intersect_complex(left_branch, right_branch) else {
                continue;
            };
            for variant in variants {
                let rendered = variant.to_string();
                if !seen.contains(&rendered) {
                    seen.push(rendered);
                    selectors.push(variant);
                }
            }
        }
    }
    debug!(
        "[INTERSECT] {} x {} branches -> {}",
        left.selectors.len(),
        right.selectors.len(),
        selectors.len()
    );
    SelectorList { selectors }
}

/// Intersect one or more CSS selector strings.
///
/// A single selector is returned in canonical form (a parse/serialize round
/// trip). With more inputs the lists are folded pairwise; the fold is
/// left-associative, which is equivalent to any other grouping because list
/// intersection is associative. The empty string denotes a provably empty
/// intersection.
///
/// # Errors
/// [`IntersectError::NoSelectors`] when called with no selectors, and
/// [`IntersectError::Parse`] when any input fails to parse.
pub fn intersect<I, S>(selectors: I) -> Result<String, IntersectError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut lists = Vec::new();
    for selector in selectors {
        lists.push(parse_selector_list(selector.as_ref())?);
    }
    let mut remaining = lists.into_iter();
    let Some(first) = remaining.next() else {
        return Err(IntersectError::NoSelectors);
    };
    let folded = remaining.fold(first, |accumulated, next| {
        intersect_lists(&accumulated, &next)
    });
    Ok(folded.to_string())
}
