//! The format-spec mini-language applied after a placeholder's `:`.
//!
//! Grammar: `[[fill]align][sign][z][#][0][width][grouping][.precision][type]`
//!
//! - align: `<` left, `>` right, `^` center, `=` pad after the sign
//! - sign: `+`, `-` or space
//! - grouping: `,` or `_` thousands separators
//! - integer types: `b c d o x X n`; float types: `e E f F g G n %`;
//!   string type: `s`
//!
//! Numbers align right by default and strings align left. A `0` before the
//! width zero-pads after the sign unless an explicit alignment is given.
//! Width and precision are limited to [`MAX_FIELD_SIZE`].

use thiserror::Error;
use winnow::combinator::{alt, opt, preceded};
use winnow::prelude::*;
use winnow::token::{any, one_of, take_while};

use crate::types::{Value, ValueKind};

/// The largest width or precision a spec may ask for.
pub const MAX_FIELD_SIZE: usize = 10_000;

/// An error applying a format spec to a value.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FormatSpecError {
    /// The spec does not follow the mini-language grammar.
    #[error("invalid format spec '{spec}'")]
    Syntax { spec: String },

    /// The type code does not apply to the value.
    #[error("unknown format code '{code}' for {kind} value")]
    UnknownCode { code: char, kind: ValueKind },

    /// An option that the value's kind does not support.
    #[error("{option} not allowed for {kind} value")]
    NotAllowed {
        option: &'static str,
        kind: ValueKind,
    },

    /// `c` was used with an integer that is not a valid code point.
    #[error("{value} is not a valid character code")]
    CharOutOfRange { value: i64 },
}

/// Alignment of content within the field width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
    Center,
    AfterSign,
}

/// How the sign of a number is shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Sign {
    /// Only negative numbers get a sign.
    #[default]
    Minus,
    /// Always show a sign.
    Plus,
    /// A space in front of non-negative numbers.
    Space,
}

/// A parsed format spec.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatSpec {
    pub fill: Option<char>,
    pub align: Option<Align>,
    pub sign: Sign,
    pub coerce_zero: bool,
    pub alternate: bool,
    pub zero_pad: bool,
    pub width: Option<usize>,
    pub grouping: Option<char>,
    pub precision: Option<usize>,
    pub kind: Option<char>,
}

impl FormatSpec {
    /// Parse a format spec.
    ///
    /// # Errors
    ///
    /// Returns [`FormatSpecError::Syntax`] if `spec` is not a valid spec or
    /// asks for a width or precision above [`MAX_FIELD_SIZE`].
    pub fn parse(spec: &str) -> Result<FormatSpec, FormatSpecError> {
        let mut remaining = spec;
        match format_spec.parse_next(&mut remaining) {
            Ok(parsed)
                if remaining.is_empty()
                    && parsed.width.unwrap_or(0) <= MAX_FIELD_SIZE
                    && parsed.precision.unwrap_or(0) <= MAX_FIELD_SIZE =>
            {
                Ok(parsed)
            }
            _ => Err(FormatSpecError::Syntax {
                spec: spec.to_string(),
            }),
        }
    }
}

/// Format `value` according to `spec`.
///
/// `None` and an empty spec both produce the value's plain text form.
///
/// # Errors
///
/// Returns an error if the spec is malformed or does not apply to the value.
pub fn apply_format_spec(value: &Value, spec: Option<&str>) -> Result<String, FormatSpecError> {
    let spec = match spec {
        Some(spec) if !spec.is_empty() => FormatSpec::parse(spec)?,
        _ => FormatSpec::default(),
    };
    let kind = value.kind();
    match value {
        Value::Number(n) => format_integer(*n, &spec, kind),
        Value::Float(f) => format_float(*f, &spec, kind),
        // An empty spec prints the name; any other spec formats it as 0 or 1.
        Value::Bool(b) if spec == FormatSpec::default() => {
            Ok(if *b { "True" } else { "False" }.to_string())
        }
        Value::Bool(b) => format_integer(i64::from(*b), &spec, kind),
        Value::String(s) => format_text(s, &spec, kind),
        Value::Formattable(f) => format_text(&f.to_template_string(), &spec, kind),
        Value::Null | Value::List(_) | Value::Map(_) => Err(FormatSpecError::NotAllowed {
            option: "formatting",
            kind,
        }),
    }
}

// =============================================================================
// Parsing
// =============================================================================

fn format_spec(input: &mut &str) -> ModalResult<FormatSpec> {
    let (fill, align) = fill_align(input)?;
    let sign = opt(one_of(['+', '-', ' '])).parse_next(input)?;
    let coerce_zero = opt('z').parse_next(input)?.is_some();
    let alternate = opt('#').parse_next(input)?.is_some();
    let zero_pad = opt('0').parse_next(input)?.is_some();
    let width = opt(number).parse_next(input)?;
    let grouping = opt(one_of([',', '_'])).parse_next(input)?;
    let precision = opt(preceded('.', number)).parse_next(input)?;
    let kind = opt(one_of([
        'b', 'c', 'd', 'e', 'E', 'f', 'F', 'g', 'G', 'n', 'o', 's', 'x', 'X', '%',
    ]))
    .parse_next(input)?;

    Ok(FormatSpec {
        fill,
        align,
        sign: match sign {
            Some('+') => Sign::Plus,
            Some(' ') => Sign::Space,
            _ => Sign::Minus,
        },
        coerce_zero,
        alternate,
        zero_pad,
        width,
        grouping,
        precision,
        kind,
    })
}

/// Parse `[[fill]align]`; a fill character is only recognized when followed
/// by an alignment character.
fn fill_align(input: &mut &str) -> ModalResult<(Option<char>, Option<Align>)> {
    alt((
        (any, align).map(|(fill, align)| (Some(fill), Some(align))),
        align.map(|align| (None, Some(align))),
        "".value((None, None)),
    ))
    .parse_next(input)
}

fn align(input: &mut &str) -> ModalResult<Align> {
    alt((
        '<'.value(Align::Left),
        '>'.value(Align::Right),
        '^'.value(Align::Center),
        '='.value(Align::AfterSign),
    ))
    .parse_next(input)
}

fn number(input: &mut &str) -> ModalResult<usize> {
    take_while(1.., |c: char| c.is_ascii_digit())
        .try_map(str::parse::<usize>)
        .parse_next(input)
}

// =============================================================================
// Strings
// =============================================================================

fn format_text(text: &str, spec: &FormatSpec, kind: ValueKind) -> Result<String, FormatSpecError> {
    if let Some(code) = spec.kind.filter(|code| *code != 's') {
        return Err(FormatSpecError::UnknownCode { code, kind });
    }
    reject_numeric_options(spec, kind)?;

    let body: String = match spec.precision {
        Some(precision) => text.chars().take(precision).collect(),
        None => text.to_string(),
    };
    let fill = spec.fill.unwrap_or(if spec.zero_pad { '0' } else { ' ' });
    Ok(pad(
        "",
        &body,
        spec.width,
        spec.align.unwrap_or(Align::Left),
        fill,
    ))
}

/// Reject the sign, `#`, grouping and `=` options, which only numbers take.
fn reject_numeric_options(spec: &FormatSpec, kind: ValueKind) -> Result<(), FormatSpecError> {
    if spec.sign != Sign::Minus {
        return Err(FormatSpecError::NotAllowed {
            option: "sign",
            kind,
        });
    }
    if spec.alternate {
        return Err(FormatSpecError::NotAllowed {
            option: "alternate form (#)",
            kind,
        });
    }
    if spec.grouping.is_some() {
        return Err(FormatSpecError::NotAllowed {
            option: "grouping",
            kind,
        });
    }
    if spec.align == Some(Align::AfterSign) {
        return Err(FormatSpecError::NotAllowed {
            option: "'=' alignment",
            kind,
        });
    }
    Ok(())
}

// =============================================================================
// Integers
// =============================================================================

fn format_integer(n: i64, spec: &FormatSpec, kind: ValueKind) -> Result<String, FormatSpecError> {
    let code = spec.kind.unwrap_or('d');
    if matches!(code, 'e' | 'E' | 'f' | 'F' | 'g' | 'G' | '%') {
        return format_float(n as f64, spec, kind);
    }
    if spec.precision.is_some() {
        return Err(FormatSpecError::NotAllowed {
            option: "precision",
            kind,
        });
    }

    let magnitude = n.unsigned_abs();
    let (digits, prefix, group_size) = match code {
        'd' | 'n' => (magnitude.to_string(), "", 3),
        'b' => (format!("{magnitude:b}"), "0b", 4),
        'o' => (format!("{magnitude:o}"), "0o", 4),
        'x' => (format!("{magnitude:x}"), "0x", 4),
        'X' => (format!("{magnitude:X}"), "0X", 4),
        'c' => return format_char(n, spec, kind),
        other => return Err(FormatSpecError::UnknownCode { code: other, kind }),
    };

    let mut lead = sign_prefix(n < 0, spec.sign).to_string();
    if spec.alternate {
        lead.push_str(prefix);
    }

    let digits = match spec.grouping {
        Some(',') if code != 'd' && code != 'n' => {
            return Err(FormatSpecError::NotAllowed {
                option: "',' grouping",
                kind,
            });
        }
        Some(separator) => {
            let min_len = zero_fill_len(spec, lead.chars().count());
            group_zero_padded(&digits, separator, group_size, min_len)
        }
        None => digits,
    };

    Ok(pad_number(&lead, &digits, spec))
}

/// Format an integer as the character with that code point.
fn format_char(n: i64, spec: &FormatSpec, kind: ValueKind) -> Result<String, FormatSpecError> {
    reject_numeric_options(spec, kind)?;
    let c = u32::try_from(n)
        .ok()
        .and_then(char::from_u32)
        .ok_or(FormatSpecError::CharOutOfRange { value: n })?;
    Ok(pad_number("", &c.to_string(), spec))
}

// =============================================================================
// Floats
// =============================================================================

fn format_float(f: f64, spec: &FormatSpec, kind: ValueKind) -> Result<String, FormatSpecError> {
    let code = spec.kind;
    if matches!(code, Some('b' | 'c' | 'd' | 'o' | 'x' | 'X' | 's')) {
        return Err(FormatSpecError::UnknownCode {
            code: code.unwrap_or('d'),
            kind,
        });
    }
    let upper = matches!(code, Some('E' | 'F' | 'G'));
    let magnitude = f.abs();

    let mut body = if f.is_nan() {
        "nan".to_string()
    } else if f.is_infinite() {
        "inf".to_string()
    } else {
        match code {
            Some('f' | 'F') => fixed(magnitude, spec.precision.unwrap_or(6), spec.alternate),
            Some('e' | 'E') => exponent(magnitude, spec.precision.unwrap_or(6), spec.alternate),
            Some('g' | 'G' | 'n') => general(magnitude, spec.precision.unwrap_or(6), spec.alternate),
            Some('%') => {
                let mut percent =
                    fixed(magnitude * 100.0, spec.precision.unwrap_or(6), spec.alternate);
                percent.push('%');
                percent
            }
            _ => match spec.precision {
                Some(precision) => {
                    let mut text = general(magnitude, precision, spec.alternate);
                    if !text.contains(['.', 'e']) {
                        text.push_str(".0");
                    }
                    text
                }
                None => shortest(magnitude),
            },
        }
    };
    if upper {
        body = body.to_uppercase();
    }

    let mut negative = f.is_sign_negative() && !f.is_nan();
    if negative && spec.coerce_zero && !body.chars().any(|c| c.is_ascii_digit() && c != '0') {
        negative = false;
    }
    let lead = sign_prefix(negative, spec.sign);
    if let Some(separator) = spec.grouping {
        let min_len = zero_fill_len(spec, lead.chars().count());
        body = group_leading_digits(&body, separator, min_len);
    }
    Ok(pad_number(lead, &body, spec))
}

/// Fixed-point notation with `precision` decimals.
fn fixed(magnitude: f64, precision: usize, alternate: bool) -> String {
    let mut text = format!("{magnitude:.precision$}");
    if alternate && precision == 0 {
        text.push('.');
    }
    text
}

/// Scientific notation with `precision` decimals and an exponent of at least
/// two digits, e.g. `1.50e+03`.
fn exponent(magnitude: f64, precision: usize, alternate: bool) -> String {
    let raw = format!("{magnitude:.precision$e}");
    let (mantissa, exp) = split_exponent(&raw);
    let mut mantissa = mantissa.to_string();
    if alternate && precision == 0 {
        mantissa.push('.');
    }
    join_exponent(&mantissa, exp)
}

/// General notation: fixed or scientific depending on the exponent, with
/// insignificant trailing zeros removed.
fn general(magnitude: f64, precision: usize, alternate: bool) -> String {
    let precision = precision.max(1);
    let mantissa_digits = precision - 1;
    let exp = if magnitude == 0.0 {
        0
    } else {
        split_exponent(&format!("{magnitude:.mantissa_digits$e}")).1
    };
    let precision_exp = i64::try_from(precision).unwrap_or(i64::MAX);

    if (-4..precision_exp).contains(&exp) {
        let decimals = usize::try_from(precision_exp - 1 - exp).unwrap_or(0);
        let text = format!("{magnitude:.decimals$}");
        if alternate {
            text
        } else {
            trim_fraction(&text).to_string()
        }
    } else {
        let raw = format!("{magnitude:.mantissa_digits$e}");
        let (mantissa, exp) = split_exponent(&raw);
        let mantissa = if alternate {
            mantissa
        } else {
            trim_fraction(mantissa)
        };
        join_exponent(mantissa, exp)
    }
}

/// The shortest text that round-trips, switching to scientific notation for
/// very large and very small magnitudes. Always shows a fraction or exponent.
fn shortest(magnitude: f64) -> String {
    if magnitude == 0.0 {
        return "0.0".to_string();
    }
    let raw = format!("{magnitude:e}");
    let (mantissa, exp) = split_exponent(&raw);
    if (-4..16).contains(&exp) {
        let text = magnitude.to_string();
        if text.contains('.') {
            text
        } else {
            format!("{text}.0")
        }
    } else {
        join_exponent(mantissa, exp)
    }
}

fn split_exponent(raw: &str) -> (&str, i64) {
    match raw.split_once('e') {
        Some((mantissa, exp)) => (mantissa, exp.parse().unwrap_or(0)),
        None => (raw, 0),
    }
}

fn join_exponent(mantissa: &str, exp: i64) -> String {
    let sign = if exp < 0 { '-' } else { '+' };
    format!("{mantissa}e{sign}{:02}", exp.unsigned_abs())
}

fn trim_fraction(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}

// =============================================================================
// Shared helpers
// =============================================================================

fn sign_prefix(negative: bool, sign: Sign) -> &'static str {
    match (negative, sign) {
        (true, _) => "-",
        (false, Sign::Plus) => "+",
        (false, Sign::Space) => " ",
        (false, Sign::Minus) => "",
    }
}

/// Insert `separator` every `size` digits, counting from the right.
fn group_digits(digits: &str, separator: char, size: usize) -> String {
    let count = digits.chars().count();
    let mut grouped = String::with_capacity(digits.len() + count.div_euclid(size));
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (count - i) % size == 0 {
            grouped.push(separator);
        }
        grouped.push(c);
    }
    grouped
}

/// Group `digits`, first left-padding them with zeros until the grouped text
/// is at least `min_len` characters. The result never starts with a separator.
fn group_zero_padded(digits: &str, separator: char, size: usize, min_len: usize) -> String {
    let grouped_len = |n: usize| n + n.saturating_sub(1).div_euclid(size);
    let mut count = digits.chars().count();
    while grouped_len(count) < min_len {
        count += 1;
    }
    let padded = format!("{}{digits}", "0".repeat(count - digits.chars().count()));
    group_digits(&padded, separator, size)
}

/// Group the integer digits at the start of a float body, zero-padding them
/// so the whole body reaches `min_len` characters.
fn group_leading_digits(body: &str, separator: char, min_len: usize) -> String {
    let end = body
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(body.len());
    let (integer, rest) = body.split_at(end);
    if integer.is_empty() {
        return body.to_string();
    }
    let min_len = min_len.saturating_sub(rest.chars().count());
    format!("{}{rest}", group_zero_padded(integer, separator, 3, min_len))
}

/// How long a grouped number must be for zero fill to reach the field width.
///
/// Only `0` fill after the sign pads with grouped zeros; any other fill is
/// applied around the grouped digits and this returns 0.
fn zero_fill_len(spec: &FormatSpec, lead_len: usize) -> usize {
    let fill = spec.fill.unwrap_or(if spec.zero_pad { '0' } else { ' ' });
    let align = spec.align.unwrap_or(if spec.zero_pad {
        Align::AfterSign
    } else {
        Align::Right
    });
    if fill == '0' && align == Align::AfterSign {
        spec.width.unwrap_or(0).saturating_sub(lead_len)
    } else {
        0
    }
}

fn pad_number(lead: &str, body: &str, spec: &FormatSpec) -> String {
    let fill = spec.fill.unwrap_or(if spec.zero_pad { '0' } else { ' ' });
    let align = spec.align.unwrap_or(if spec.zero_pad {
        Align::AfterSign
    } else {
        Align::Right
    });
    pad(lead, body, spec.width, align, fill)
}

/// Pad `lead` + `body` to `width` characters.
fn pad(lead: &str, body: &str, width: Option<usize>, align: Align, fill: char) -> String {
    let len = lead.chars().count() + body.chars().count();
    let missing = width.unwrap_or(0).saturating_sub(len);
    let filler = |n: usize| fill.to_string().repeat(n);
    match align {
        Align::Left => format!("{lead}{body}{}", filler(missing)),
        Align::Right => format!("{}{lead}{body}", filler(missing)),
        Align::Center => {
            let left = missing.div_euclid(2);
            format!("{}{lead}{body}{}", filler(left), filler(missing - left))
        }
        Align::AfterSign => format!("{lead}{}{body}", filler(missing)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fill_and_alignment() {
        let spec = FormatSpec::parse("0>3").unwrap();
        assert_eq!(spec.fill, Some('0'));
        assert_eq!(spec.align, Some(Align::Right));
        assert_eq!(spec.width, Some(3));
        assert!(!spec.zero_pad);
    }

    #[test]
    fn parses_full_spec() {
        let spec = FormatSpec::parse("*^+#012,.3f").unwrap();
        assert_eq!(spec.fill, Some('*'));
        assert_eq!(spec.align, Some(Align::Center));
        assert_eq!(spec.sign, Sign::Plus);
        assert!(spec.alternate);
        assert!(spec.zero_pad);
        assert_eq!(spec.width, Some(12));
        assert_eq!(spec.grouping, Some(','));
        assert_eq!(spec.precision, Some(3));
        assert_eq!(spec.kind, Some('f'));
    }

    #[test]
    fn rejects_trailing_garbage() {
        assert_eq!(
            FormatSpec::parse("3q"),
            Err(FormatSpecError::Syntax {
                spec: "3q".to_string()
            })
        );
    }

    #[test]
    fn groups_digits_from_the_right() {
        assert_eq!(group_digits("1234567", ',', 3), "1,234,567");
        assert_eq!(group_digits("123", ',', 3), "123");
        assert_eq!(group_digits("11111111", '_', 4), "1111_1111");
    }

    #[test]
    fn zero_padding_is_grouped() {
        assert_eq!(group_zero_padded("1234", ',', 3, 10), "00,001,234");
        assert_eq!(group_zero_padded("1234", ',', 3, 8), "0,001,234");
        assert_eq!(group_zero_padded("1234", ',', 3, 0), "1,234");
        assert_eq!(group_zero_padded("ff", '_', 4, 7), "00_00ff");
    }

    #[test]
    fn rejects_oversized_fields() {
        assert!(FormatSpec::parse(">10000").is_ok());
        assert!(FormatSpec::parse(">10001").is_err());
        assert!(FormatSpec::parse(".10001f").is_err());
    }

    #[test]
    fn general_switches_to_exponent() {
        assert_eq!(general(1234.5, 2, false), "1.2e+03");
        assert_eq!(general(0.00001, 6, false), "1e-05");
        assert_eq!(general(3.0, 6, false), "3");
        assert_eq!(general(3.0, 6, true), "3.00000");
    }

    #[test]
    fn shortest_matches_repr() {
        assert_eq!(shortest(1.5), "1.5");
        assert_eq!(shortest(1.0), "1.0");
        assert_eq!(shortest(1e16), "1e+16");
        assert_eq!(shortest(0.0001), "0.0001");
        assert_eq!(shortest(0.00001), "1e-05");
    }
}
