use crate::caption::CaptionFragment;
use crate::error::AcquisitionError;

use std::time::Duration;

use nom::branch::alt;
use nom::bytes::complete::{tag, take_till, take_until, take_while1};
use nom::character::complete::{char, multispace0, multispace1};
use nom::combinator::{opt, value};
use nom::error::{convert_error, ErrorKind, VerboseError, VerboseErrorKind};
use nom::multi::many0;
use nom::sequence::{delimited, preceded, separated_pair};
use nom::{error_position, Err, IResult};
use once_cell::sync::Lazy;
use regex::Regex;

static MARKUP: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Parser for YouTube timed-text (`<transcript><text start=".." dur="..">`) documents.
pub struct Parser;
impl Parser {
    pub fn new() -> Self {
        Self {}
    }

    pub fn parse(&self, input: &str) -> Result<Vec<CaptionFragment>, AcquisitionError> {
        match timed_text(input) {
            Ok((_, fragments)) => Ok(fragments),
            Err(Err::Error(err)) | Err(Err::Failure(err)) => {
                Err(AcquisitionError::MalformedTranscript(convert_error(input, err)))
            }
            Err(Err::Incomplete(_)) => {
                unreachable!("Incomplete data received by non-streaming parser.")
            }
        }
    }
}

fn optional_bom(input: &str) -> IResult<&str, Option<&str>, VerboseError<&str>> {
    opt(tag("\u{FEFF}"))(input)
}

fn xml_declaration(input: &str) -> IResult<&str, &str, VerboseError<&str>> {
    delimited(tag("<?xml"), take_until("?>"), tag("?>"))(input)
}

fn timed_text(input: &str) -> IResult<&str, Vec<CaptionFragment>, VerboseError<&str>> {
    let (input, _) = optional_bom(input)?;
    let (input, _) = multispace0(input)?;
    let (input, _) = opt(xml_declaration)(input)?;
    let (input, _) = multispace0(input)?;
    let (input, mut fragments) = alt((value(Vec::new(), tag("<transcript/>")), transcript_body))(input)?;
    let (input, _) = multispace0(input)?;
    let (input, _) = end_of_file(input)?;
    fragments.sort_by_key(|f| f.start);
    Ok((input, fragments))
}

fn transcript_body(input: &str) -> IResult<&str, Vec<CaptionFragment>, VerboseError<&str>> {
    let (input, _) = tag("<transcript>")(input)?;
    let (input, fragments) = many0(preceded(multispace0, fragment))(input)?;
    let (input, _) = preceded(multispace0, tag("</transcript>"))(input)?;
    Ok((input, fragments))
}

fn end_of_file(input: &str) -> IResult<&str, &str, VerboseError<&str>> {
    if input.is_empty() {
        Ok((input, input))
    } else {
        std::result::Result::Err(Err::Error(error_position!(input, ErrorKind::Eof)))
    }
}

fn fragment(input: &str) -> IResult<&str, CaptionFragment, VerboseError<&str>> {
    let (input, _) = tag("<text")(input)?;
    let (input, attrs) = many0(attribute)(input)?;
    let (input, _) = multispace0(input)?;
    let (rest, body) = alt((
        value("", tag("/>")),
        delimited(char('>'), take_until("</text>"), tag("</text>")),
    ))(input)?;

    let lookup = |name: &str| attrs.iter().find(|(k, _)| *k == name).map(|(_, v)| *v);
    let start = match lookup("start") {
        Some(raw) => seconds(raw).ok_or_else(|| invalid(input, "start attribute"))?,
        None => return Err(invalid(input, "missing start attribute")),
    };
    let duration = match lookup("dur") {
        Some(raw) => seconds(raw).ok_or_else(|| invalid(input, "dur attribute"))?,
        None => Duration::ZERO,
    };

    Ok((
        rest,
        CaptionFragment {
            start,
            duration,
            text: decode_text(body),
        },
    ))
}

fn attribute(input: &str) -> IResult<&str, (&str, &str), VerboseError<&str>> {
    preceded(
        multispace1,
        separated_pair(
            take_while1(|c: char| c.is_alphanumeric() || c == '_' || c == '-' || c == ':'),
            char('='),
            delimited(char('"'), take_till(|c: char| c == '"'), char('"')),
        ),
    )(input)
}

fn invalid<'a>(input: &'a str, what: &'static str) -> Err<VerboseError<&'a str>> {
    Err::Failure(VerboseError {
        errors: vec![(input, VerboseErrorKind::Context(what))],
    })
}

fn seconds(raw: &str) -> Option<Duration> {
    let secs: f64 = raw.trim().parse().ok()?;
    Duration::try_from_secs_f64(secs).ok()
}

// Timed text arrives escaped twice: once by XML, once by the caption
// authoring pipeline (`&amp;#39;`).
fn decode_text(raw: &str) -> String {
    let decoded = decode_entities(&decode_entities(raw));
    MARKUP.replace_all(&decoded, "").trim().to_string()
}

pub(crate) fn decode_entities(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        match tail
            .find(';')
            .and_then(|end| entity(&tail[1..end]).map(|c| (c, end)))
        {
            Some((c, end)) => {
                out.push(c);
                rest = &tail[end + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let numeric = name.strip_prefix('#')?;
            let code = match numeric.strip_prefix('x').or_else(|| numeric.strip_prefix('X')) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => numeric.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}
