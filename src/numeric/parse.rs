//! Nom-based parser for the raw profile text format.
//!
//! ```text
//! # comment
//! RPL_WELCOME = 1
//! RPL_HELLO   = RPL_WELCOME   # trailing comment
//! ```

use nom::{
    bytes::complete::take_while1,
    character::complete::{char, space0},
    combinator::{all_consuming, opt, rest},
    error::{context, VerboseError, VerboseErrorKind},
    sequence::{delimited, preceded, separated_pair, tuple},
    IResult,
};

use super::raw::{RawProfile, RawTarget};
use super::is_valid_code;
use crate::error::{NumericError, ProfileParseError};

type ParseResult<I, O> = IResult<I, O, VerboseError<I>>;

/// Parse a symbolic name or a code (both are word tokens).
fn token(input: &str) -> ParseResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_')(input)
}

fn comment(input: &str) -> ParseResult<&str, &str> {
    context("parsing comment", preceded(char('#'), rest))(input)
}

fn definition(input: &str) -> ParseResult<&str, (&str, &str)> {
    context(
        "parsing definition",
        separated_pair(
            context("parsing numeric name", token),
            context("expecting '='", tuple((space0, char('='), space0))),
            context("parsing numeric code or alias", token),
        ),
    )(input)
}

/// Parse one line; `None` for blank and comment-only lines.
fn line(input: &str) -> ParseResult<&str, Option<(&str, &str)>> {
    all_consuming(delimited(
        space0,
        opt(definition),
        tuple((space0, opt(comment))),
    ))(input)
}

fn syntax_error(line_no: usize, input: &str, err: nom::Err<VerboseError<&str>>) -> ProfileParseError {
    let context = match err {
        nom::Err::Error(e) | nom::Err::Failure(e) => {
            let position = e
                .errors
                .first()
                .map_or(input.len(), |(rest, _)| input.len() - rest.len());
            let what = e
                .errors
                .iter()
                .rev()
                .find_map(|(_, kind)| match kind {
                    VerboseErrorKind::Context(ctx) => Some(*ctx),
                    _ => None,
                })
                .unwrap_or("unexpected trailing input");
            format!("{} at column {}", what, position + 1)
        }
        nom::Err::Incomplete(_) => "incomplete input".to_owned(),
    };
    ProfileParseError::Syntax {
        line: line_no,
        context,
    }
}

impl RawProfile {
    /// Parse a profile from its text form.
    ///
    /// Each non-blank line holds `NAME = CODE` or `NAME = OTHER_NAME`;
    /// `#` starts a comment.
    ///
    /// # Example
    ///
    /// ```
    /// use erebot_core::numeric::{RawProfile, RawTarget};
    ///
    /// let profile = RawProfile::parse("local", "# ours\nRPL_HELLO = 1\nRPL_HI = rpl_hello\n").unwrap();
    /// assert_eq!(profile.get("RPL_HI"), Some(&RawTarget::Alias("RPL_HELLO".into())));
    /// ```
    pub fn parse(name: impl Into<String>, text: &str) -> Result<Self, ProfileParseError> {
        let mut builder = RawProfile::builder(name);

        for (i, raw) in text.lines().enumerate() {
            let line_no = i + 1;
            let (_, parsed) = line(raw).map_err(|e| syntax_error(line_no, raw, e))?;
            let Some((name, value)) = parsed else {
                continue;
            };

            let target = if value.bytes().all(|b| b.is_ascii_digit()) {
                let code: u32 = value.parse().map_err(|_| ProfileParseError::Syntax {
                    line: line_no,
                    context: format!("numeric code {} is too large", value),
                })?;
                if !is_valid_code(code) {
                    return Err(ProfileParseError::Definition {
                        line: line_no,
                        source: NumericError::OutOfRange {
                            name: name.to_ascii_uppercase(),
                            code,
                        },
                    });
                }
                // Range checked above.
                RawTarget::Code(code as u16)
            } else {
                RawTarget::Alias(value.to_owned())
            };

            builder
                .entry(name, target)
                .map_err(|source| ProfileParseError::Definition {
                    line: line_no,
                    source,
                })?;
        }

        Ok(builder.build())
    }
}
