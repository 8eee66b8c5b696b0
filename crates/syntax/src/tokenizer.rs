//! Tokenizer adapter over `cssparser`.
//! Spec: <https://www.w3.org/TR/css-syntax-3/>
//!
//! Flattens a selector string into [`SelectorToken`]s. All lexical concerns
//! (escapes, string quoting, comments) are delegated to `cssparser`; this
//! module only reassembles selector-level tokens from the CSS token stream.

use crate::{AttrAssertion, AttrOperator, PseudoClass};
use cssparser::{
    BasicParseErrorKind, ParseError, ParseErrorKind, Parser, ParserInput, Token as CssToken,
};
use thiserror::Error;

/// Pseudo-elements that CSS2 allowed with single-colon syntax.
const LEGACY_PSEUDO_ELEMENTS: [&str; 4] = ["before", "after", "first-line", "first-letter"];

/// Errors produced while tokenizing or structuring a selector.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SelectorParseError {
    /// The input contained a token that cannot appear in a selector.
    #[error("unexpected token in selector: {0}")]
    UnexpectedToken(String),
    /// The selector ended in the middle of a construct.
    #[error("selector ended unexpectedly")]
    UnexpectedEnd,
    /// An attribute block was malformed.
    #[error("malformed attribute selector: {0}")]
    InvalidAttribute(String),
    /// A combinator had no compound selector on one of its sides.
    #[error("combinator with no selector to combine")]
    DanglingCombinator,
    /// One compound carried two different pseudo-elements.
    #[error("conflicting pseudo-elements `{0}` and `{1}` in one compound")]
    ConflictingPseudoElements(String, String),
}

/// Combinator tokens as written, before `+`/`~` are collapsed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RawCombinator {
    /// Whitespace.
    Descendant,
    /// `>`
    Child,
    /// `+`
    AdjacentSibling,
    /// `~`
    GeneralSibling,
}

/// A flat selector token, per the collaborator contract.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectorToken {
    /// Element type name, lowercased; the universal selector is `*`.
    Type(String),
    /// `#id`
    Id(String),
    /// `.class`
    Class(String),
    /// `[name]`, `[name op value]`, `[name op value i]`
    Attribute(AttrAssertion),
    /// `:name` or `:name(argument)`
    PseudoClass(PseudoClass),
    /// `::name` (or a legacy single-colon pseudo-element)
    PseudoElement(String),
    /// ` `, `>`, `+`, `~`
    Combinator(RawCombinator),
    /// `,`
    Comma,
}

impl SelectorToken {
    /// True for tokens that form part of a compound selector.
    fn is_compound_part(&self) -> bool {
        !matches!(self, Self::Combinator(_) | Self::Comma)
    }
}

/// Tokenize one selector string into a flat token sequence.
///
/// Whitespace is tracked with a pending flag and becomes a descendant
/// combinator only between two compound tokens, so `a > b` and `a>b`
/// tokenize identically.
pub fn tokenize(input: &str) -> Result<Vec<SelectorToken>, SelectorParseError> {
    let mut parser_input = ParserInput::new(input);
    let mut parser = Parser::new(&mut parser_input);
    let mut tokens: Vec<SelectorToken> = Vec::new();
    let mut pending_whitespace = false;

    loop {
        let token = match parser.next_including_whitespace() {
            Ok(token) => token.clone(),
            Err(_) => break,
        };
        match token {
            CssToken::WhiteSpace(_) => {
                pending_whitespace = true;
                continue;
            }
            CssToken::Comma => {
                pending_whitespace = false;
                tokens.push(SelectorToken::Comma);
            }
            CssToken::Delim('>') => {
                pending_whitespace = false;
                tokens.push(SelectorToken::Combinator(RawCombinator::Child));
            }
            CssToken::Delim('+') => {
                pending_whitespace = false;
                tokens.push(SelectorToken::Combinator(RawCombinator::AdjacentSibling));
            }
            CssToken::Delim('~') => {
                pending_whitespace = false;
                tokens.push(SelectorToken::Combinator(RawCombinator::GeneralSibling));
            }
            compound_start => {
                if pending_whitespace
                    && tokens
                        .last()
                        .is_some_and(SelectorToken::is_compound_part)
                {
                    tokens.push(SelectorToken::Combinator(RawCombinator::Descendant));
                }
                pending_whitespace = false;
                let token = compound_token(&mut parser, compound_start)?;
                tokens.push(token);
            }
        }
    }
    Ok(tokens)
}

/// Map a non-combinator CSS token (plus any continuation tokens) onto one
/// compound-selector token.
fn compound_token(
    parser: &mut Parser<'_, '_>,
    first: CssToken,
) -> Result<SelectorToken, SelectorParseError> {
    match first {
        CssToken::Ident(name) => Ok(SelectorToken::Type(name.as_ref().to_ascii_lowercase())),
        CssToken::Delim('*') => Ok(SelectorToken::Type(String::from("*"))),
        CssToken::IDHash(name) => Ok(SelectorToken::Id(name.as_ref().to_owned())),
        CssToken::Delim('.') => match parser.next_including_whitespace() {
            Ok(&CssToken::Ident(ref name)) => {
                Ok(SelectorToken::Class(name.as_ref().to_owned()))
            }
            Ok(other) => Err(SelectorParseError::UnexpectedToken(format!("{other:?}"))),
            Err(_) => Err(SelectorParseError::UnexpectedEnd),
        },
        CssToken::SquareBracketBlock => {
            let assertion = parser
                .parse_nested_block(attribute_block)
                .map_err(flatten_error)?;
            Ok(SelectorToken::Attribute(assertion))
        }
        CssToken::Colon => pseudo_token(parser),
        other => Err(SelectorParseError::UnexpectedToken(format!("{other:?}"))),
    }
}

/// Parse the tokens following a `:` into a pseudo-class or pseudo-element.
fn pseudo_token(parser: &mut Parser<'_, '_>) -> Result<SelectorToken, SelectorParseError> {
    let token = match parser.next_including_whitespace() {
        Ok(token) => token.clone(),
        Err(_) => return Err(SelectorParseError::UnexpectedEnd),
    };
    match token {
        CssToken::Colon => match parser.next_including_whitespace() {
            Ok(&CssToken::Ident(ref name)) => {
                Ok(SelectorToken::PseudoElement(name.as_ref().to_ascii_lowercase()))
            }
            Ok(other) => Err(SelectorParseError::UnexpectedToken(format!("{other:?}"))),
            Err(_) => Err(SelectorParseError::UnexpectedEnd),
        },
        CssToken::Ident(name) => {
            let name = name.as_ref().to_ascii_lowercase();
            if LEGACY_PSEUDO_ELEMENTS.contains(&name.as_str()) {
                Ok(SelectorToken::PseudoElement(name))
            } else {
                Ok(SelectorToken::PseudoClass(PseudoClass {
                    name,
                    argument: None,
                }))
            }
        }
        CssToken::Function(name) => {
            let name = name.as_ref().to_ascii_lowercase();
            let argument = parser.parse_nested_block(raw_block).map_err(flatten_error)?;
            Ok(SelectorToken::PseudoClass(PseudoClass {
                name,
                argument: Some(argument),
            }))
        }
        other => Err(SelectorParseError::UnexpectedToken(format!("{other:?}"))),
    }
}

/// Parse the interior of `[...]` into an attribute assertion.
fn attribute_block<'input>(
    parser: &mut Parser<'input, '_>,
) -> Result<AttrAssertion, ParseError<'input, SelectorParseError>> {
    let name = parser.expect_ident()?.as_ref().to_ascii_lowercase();

    let operator_token = match parser.next() {
        Ok(token) => token.clone(),
        Err(_) => return Ok(AttrAssertion::exists(name)),
    };
    let operator = match operator_token {
        CssToken::Delim('=') => AttrOperator::Equal,
        CssToken::IncludeMatch => AttrOperator::Includes,
        CssToken::DashMatch => AttrOperator::DashMatch,
        CssToken::PrefixMatch => AttrOperator::Prefix,
        CssToken::SuffixMatch => AttrOperator::Suffix,
        CssToken::SubstringMatch => AttrOperator::Substring,
        other => {
            return Err(parser.new_custom_error(SelectorParseError::InvalidAttribute(format!(
                "expected operator, found {other:?}"
            ))));
        }
    };

    let value = match parser.next() {
        Ok(&CssToken::Ident(ref value)) | Ok(&CssToken::QuotedString(ref value)) => {
            value.as_ref().to_owned()
        }
        Ok(other) => {
            let message = format!("expected value, found {other:?}");
            return Err(parser.new_custom_error(SelectorParseError::InvalidAttribute(message)));
        }
        Err(_) => {
            return Err(parser.new_custom_error(SelectorParseError::InvalidAttribute(
                String::from("missing value"),
            )));
        }
    };

    let case_sensitive = match parser.next() {
        Ok(&CssToken::Ident(ref flag)) => match flag.as_ref() {
            "i" | "I" => false,
            "s" | "S" => true,
            other => {
                let message = format!("unknown case flag `{other}`");
                return Err(
                    parser.new_custom_error(SelectorParseError::InvalidAttribute(message))
                );
            }
        },
        Ok(other) => {
            let message = format!("unexpected trailing {other:?}");
            return Err(parser.new_custom_error(SelectorParseError::InvalidAttribute(message)));
        }
        Err(_) => true,
    };
    parser.expect_exhausted()?;

    Ok(AttrAssertion {
        name,
        operator,
        value,
        case_sensitive,
    })
}

/// Consume a nested block and return its raw text, `cssparser` style.
fn raw_block<'input>(
    parser: &mut Parser<'input, '_>,
) -> Result<String, ParseError<'input, SelectorParseError>> {
    let start = parser.position();
    while parser.next_including_whitespace_and_comments().is_ok() {}
    Ok(parser.slice_from(start).to_owned())
}

/// Collapse a `cssparser` error into the library error type.
fn flatten_error(error: ParseError<'_, SelectorParseError>) -> SelectorParseError {
    match error.kind {
        ParseErrorKind::Custom(inner) => inner,
        ParseErrorKind::Basic(BasicParseErrorKind::EndOfInput) => SelectorParseError::UnexpectedEnd,
        ParseErrorKind::Basic(other) => SelectorParseError::UnexpectedToken(format!("{other:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_compound_parts() {
        assert_eq!(
            tokenize("div#main.item[href^='https://']:hover::before"),
            Ok(vec![
                SelectorToken::Type(String::from("div")),
                SelectorToken::Id(String::from("main")),
                SelectorToken::Class(String::from("item")),
                SelectorToken::Attribute(AttrAssertion::new(
                    "href",
                    AttrOperator::Prefix,
                    "https://",
                )),
                SelectorToken::PseudoClass(PseudoClass {
                    name: String::from("hover"),
                    argument: None,
                }),
                SelectorToken::PseudoElement(String::from("before")),
            ])
        );
    }

    #[test]
    fn whitespace_becomes_descendant_only_between_compounds() {
        assert_eq!(tokenize("a > b"), tokenize("a>b"));

        assert_eq!(
            tokenize("  a  b  "),
            Ok(vec![
                SelectorToken::Type(String::from("a")),
                SelectorToken::Combinator(RawCombinator::Descendant),
                SelectorToken::Type(String::from("b")),
            ])
        );
    }

    #[test]
    fn attribute_flags_and_quoting() {
        assert_eq!(
            tokenize("[Data-X=\"a'b\" i]"),
            Ok(vec![SelectorToken::Attribute(AttrAssertion {
                name: String::from("data-x"),
                operator: AttrOperator::Equal,
                value: String::from("a'b"),
                case_sensitive: false,
            })])
        );

        assert!(matches!(
            tokenize("[x=1]"),
            Err(SelectorParseError::InvalidAttribute(_))
        ));
        assert!(matches!(
            tokenize("[x='y' q]"),
            Err(SelectorParseError::InvalidAttribute(_))
        ));
    }

    #[test]
    fn pseudo_class_arguments_are_raw() {
        assert_eq!(
            tokenize(":nth-child(2n+1)"),
            Ok(vec![SelectorToken::PseudoClass(PseudoClass {
                name: String::from("nth-child"),
                argument: Some(String::from("2n+1")),
            })])
        );

        assert_eq!(
            tokenize(":not([attr~='yo'])"),
            Ok(vec![SelectorToken::PseudoClass(PseudoClass {
                name: String::from("not"),
                argument: Some(String::from("[attr~='yo']")),
            })])
        );
    }

    #[test]
    fn legacy_pseudo_elements_promote() {
        assert_eq!(tokenize("p:first-line"), tokenize("p::first-line"));
    }

    #[test]
    fn rejects_non_selector_tokens() {
        assert!(matches!(
            tokenize("a { color: red }"),
            Err(SelectorParseError::UnexpectedToken(_))
        ));
        assert!(matches!(
            tokenize("50%"),
            Err(SelectorParseError::UnexpectedToken(_))
        ));
    }
}
