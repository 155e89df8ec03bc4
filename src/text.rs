//! The textual form of collections: `{a, b}` for sets and `{k:v, ...}` for
//! maps.
//!
//! Writing uses each element's `Debug` form, so strings come out
//! double-quoted and escaped. Reading goes through [`ParseValue`], which is
//! implemented for the primitive types, `String`, and the crate's own
//! collections; implement it for your own types to make collections of them
//! parseable.
//!
//! ```rust
//! use chainlex::HashMap;
//!
//! let scores: HashMap<String, u32> = r#"{"alice":3, bob: 5}"#.parse().unwrap();
//! assert_eq!(scores.get("alice"), Some(&3));
//! assert_eq!(scores.get("bob"), Some(&5));
//! ```
//!
//! Without the `strict-parse` feature malformed input is reported as
//! [`Error::Parse`]. With it, parsing panics with the same message.

use alloc::string::String;
use alloc::string::ToString;
use core::fmt;
use core::fmt::Debug;

use cfg_if::cfg_if;

use crate::error::Error;
use crate::error::Result;

/// Writes `{e1, e2, ...}`.
pub(crate) fn write_set<I>(f: &mut fmt::Formatter<'_>, items: I) -> fmt::Result
where
    I: IntoIterator,
    I::Item: Debug,
{
    f.write_str("{")?;
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item:?}")?;
    }
    f.write_str("}")
}

/// Writes `{k1:v1, k2:v2, ...}`.
pub(crate) fn write_map<I, K, V>(f: &mut fmt::Formatter<'_>, entries: I) -> fmt::Result
where
    I: IntoIterator<Item = (K, V)>,
    K: Debug,
    V: Debug,
{
    f.write_str("{")?;
    for (i, (key, value)) in entries.into_iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{key:?}:{value:?}")?;
    }
    f.write_str("}")
}

cfg_if! {
    if #[cfg(feature = "strict-parse")] {
        fn apply_policy<T>(result: Result<T>) -> Result<T> {
            match result {
                Ok(value) => Ok(value),
                Err(err) => panic!("collection parse failed: {err}"),
            }
        }
    } else {
        #[inline(always)]
        fn apply_policy<T>(result: Result<T>) -> Result<T> {
            result
        }
    }
}

/// Parses a complete value from `input`.
///
/// Leading and trailing whitespace is ignored; anything else left over is an
/// error. This is what the crate's `FromStr` impls call.
///
/// # Examples
///
/// ```rust
/// use chainlex::HashSet;
/// use chainlex::text::parse_str;
///
/// let set: HashSet<i32> = parse_str("{1, 2, 3}").unwrap();
/// assert_eq!(set.len(), 3);
/// ```
pub fn parse_str<T: ParseValue>(input: &str) -> Result<T> {
    let mut scanner = Scanner::new(input);
    let result = T::parse_value(&mut scanner).and_then(|value| {
        scanner.skip_whitespace();
        if scanner.is_at_end() {
            Ok(value)
        } else {
            Err(scanner.error("unexpected trailing input"))
        }
    });
    apply_policy(result)
}

/// A value that can be read from collection text.
pub trait ParseValue: Sized {
    /// Reads one value starting at the scanner's position, skipping any
    /// leading whitespace.
    fn parse_value(scanner: &mut Scanner<'_>) -> Result<Self>;
}

/// A cursor over collection text.
#[derive(Clone, Debug)]
pub struct Scanner<'a> {
    input: &'a str,
    pos: usize,
}

const DELIMITERS: &[char] = &[',', ':', '{', '}', '[', ']'];

impl<'a> Scanner<'a> {
    /// Creates a scanner at the start of `input`.
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Byte offset of the next unread character.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns `true` once all input has been consumed.
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    /// Returns the next character without consuming it.
    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Skips whitespace.
    pub fn skip_whitespace(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    /// Skips whitespace, then consumes `expected` if it is next.
    pub fn eat(&mut self, expected: char) -> bool {
        self.skip_whitespace();
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    /// Skips whitespace, then consumes `expected` or fails.
    pub fn expect(&mut self, expected: char) -> Result<()> {
        if self.eat(expected) {
            Ok(())
        } else {
            let found = match self.peek() {
                Some(c) => alloc::format!("'{c}'"),
                None => "end of input".to_string(),
            };
            Err(self.error(alloc::format!("expected '{expected}', found {found}")))
        }
    }

    /// Builds an [`Error::Parse`] at the current position.
    pub fn error(&self, message: impl Into<String>) -> Error {
        Error::Parse {
            position: self.pos,
            message: message.into(),
        }
    }

    /// Consumes a run of characters matching `pred` and returns it.
    pub fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let rest = self.rest();
        let len = rest.find(|c: char| !pred(c)).unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }

    /// Reads an unquoted token: everything up to whitespace or a delimiter.
    pub fn bare_token(&mut self) -> Result<&'a str> {
        self.skip_whitespace();
        let token = self.take_while(|c| !c.is_whitespace() && !DELIMITERS.contains(&c));
        if token.is_empty() {
            Err(self.error("expected a value"))
        } else {
            Ok(token)
        }
    }

    /// Reads `open item, item, ... close`, calling `item` once per element.
    ///
    /// Empty sequences are allowed; a trailing comma is not.
    pub fn parse_delimited(
        &mut self,
        open: char,
        close: char,
        mut item: impl FnMut(&mut Self) -> Result<()>,
    ) -> Result<()> {
        self.expect(open)?;
        if self.eat(close) {
            return Ok(());
        }
        loop {
            item(self)?;
            if self.eat(close) {
                return Ok(());
            }
            self.expect(',')?;
        }
    }

    fn escape(&mut self) -> Result<char> {
        let at = self.pos;
        let c = match self.bump() {
            Some('n') => '\n',
            Some('t') => '\t',
            Some('r') => '\r',
            Some('0') => '\0',
            Some('\\') => '\\',
            Some('"') => '"',
            Some('\'') => '\'',
            Some('u') => {
                self.expect('{')?;
                let digits = self.take_while(|c| c.is_ascii_hexdigit());
                let code = u32::from_str_radix(digits, 16)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or_else(|| self.error("invalid unicode escape"))?;
                self.expect('}')?;
                code
            }
            Some(other) => {
                return Err(Error::Parse {
                    position: at,
                    message: alloc::format!("unknown escape '\\{other}'"),
                });
            }
            None => return Err(self.error("unterminated escape")),
        };
        Ok(c)
    }

    /// Reads a quoted string whose opening `quote` has been consumed.
    fn quoted(&mut self, quote: char) -> Result<String> {
        let mut out = String::new();
        loop {
            match self.bump() {
                Some(c) if c == quote => return Ok(out),
                Some('\\') => out.push(self.escape()?),
                Some(c) => out.push(c),
                None => return Err(self.error("unterminated string")),
            }
        }
    }
}

macro_rules! number_parse_value {
    ($($t:ty),* $(,)?) => {
        $(
            impl ParseValue for $t {
                fn parse_value(scanner: &mut Scanner<'_>) -> Result<Self> {
                    scanner.skip_whitespace();
                    let start = scanner.position();
                    let token = scanner.bare_token()?;
                    token.parse().map_err(|_| Error::Parse {
                        position: start,
                        message: alloc::format!(
                            "invalid {} literal '{token}'",
                            stringify!($t)
                        ),
                    })
                }
            }
        )*
    };
}

number_parse_value!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

impl ParseValue for bool {
    fn parse_value(scanner: &mut Scanner<'_>) -> Result<Self> {
        scanner.skip_whitespace();
        let start = scanner.position();
        match scanner.bare_token()? {
            "true" => Ok(true),
            "false" => Ok(false),
            token => Err(Error::Parse {
                position: start,
                message: alloc::format!("invalid bool literal '{token}'"),
            }),
        }
    }
}

impl ParseValue for char {
    fn parse_value(scanner: &mut Scanner<'_>) -> Result<Self> {
        if scanner.eat('\'') {
            let c = match scanner.bump() {
                Some('\\') => scanner.escape()?,
                Some(c) => c,
                None => return Err(scanner.error("unterminated char literal")),
            };
            scanner.expect('\'')?;
            return Ok(c);
        }

        let token = scanner.bare_token()?;
        let mut chars = token.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(scanner.error(alloc::format!("expected a single character, found '{token}'"))),
        }
    }
}

impl ParseValue for String {
    fn parse_value(scanner: &mut Scanner<'_>) -> Result<Self> {
        scanner.skip_whitespace();
        match scanner.peek() {
            Some(quote @ ('"' | '\'')) => {
                scanner.bump();
                scanner.quoted(quote)
            }
            _ => scanner.bare_token().map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;

    struct Pair(i32, String);

    impl ParseValue for Pair {
        fn parse_value(scanner: &mut Scanner<'_>) -> Result<Self> {
            let mut parts = Vec::new();
            let mut name = None;
            scanner.parse_delimited('[', ']', |s| {
                if parts.is_empty() {
                    parts.push(i32::parse_value(s)?);
                } else {
                    name = Some(String::parse_value(s)?);
                }
                Ok(())
            })?;
            match (parts.first(), name) {
                (Some(&n), Some(name)) => Ok(Pair(n, name)),
                _ => Err(scanner.error("pair needs two fields")),
            }
        }
    }

    #[test]
    fn parses_primitives() {
        assert_eq!(parse_str::<i32>(" -42 ").unwrap(), -42);
        assert_eq!(parse_str::<u8>("255").unwrap(), 255);
        assert_eq!(parse_str::<f64>("2.5e1").unwrap(), 25.0);
        assert!(parse_str::<bool>("true").unwrap());
        assert_eq!(parse_str::<char>("'x'").unwrap(), 'x');
        assert_eq!(parse_str::<char>("y").unwrap(), 'y');
        assert_eq!(parse_str::<char>(r"'\n'").unwrap(), '\n');
    }

    #[test]
    fn parses_strings() {
        assert_eq!(parse_str::<String>(r#""a \"quoted\" word""#).unwrap(), r#"a "quoted" word"#);
        assert_eq!(parse_str::<String>("'single'").unwrap(), "single");
        assert_eq!(parse_str::<String>("bare").unwrap(), "bare");
        assert_eq!(parse_str::<String>(r#""\u{e9}t\u{e9}""#).unwrap(), "été");
    }

    #[test]
    fn debug_output_parses_back() {
        let original = "tab\tquote\" backslash\\ nul\0 bell\u{7}";
        let written = alloc::format!("{original:?}");
        assert_eq!(parse_str::<String>(&written).unwrap(), original);
    }

    #[test]
    fn custom_parse_value() {
        let pair: Pair = parse_str("[7, seven]").unwrap();
        assert_eq!(pair.0, 7);
        assert_eq!(pair.1, "seven");
    }

    #[cfg(not(feature = "strict-parse"))]
    #[test]
    fn errors_carry_position() {
        match parse_str::<i32>("  12x") {
            Err(Error::Parse { position, .. }) => assert_eq!(position, 2),
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(parse_str::<i32>("1 2"), Err(Error::Parse { position: 2, .. })));
        assert!(matches!(parse_str::<String>(r#""open"#), Err(Error::Parse { .. })));
        assert!(matches!(parse_str::<bool>("yes"), Err(Error::Parse { .. })));
        assert!(matches!(parse_str::<u8>("256"), Err(Error::Parse { .. })));
        assert!(matches!(parse_str::<char>("ab"), Err(Error::Parse { .. })));
    }

    #[cfg(feature = "strict-parse")]
    #[test]
    #[should_panic(expected = "collection parse failed")]
    fn strict_mode_panics() {
        let _ = parse_str::<i32>("nope");
    }
}
