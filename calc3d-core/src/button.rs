/// Symbolic calculator buttons and the names that identify them in a scene
use nom::{
    branch::alt,
    bytes::complete::tag_no_case,
    character::complete::{char, digit1, one_of, satisfy},
    combinator::{all_consuming, map_opt, opt, value},
    sequence::{preceded, tuple},
    IResult,
};
use std::fmt;
use std::str::FromStr;

use crate::engine::{Digit, Operator};
use crate::error::UnknownButton;

const DIGIT_LABELS: [&str; 10] = ["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"];

/// A pressable calculator key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Digit(Digit),
    Decimal,
    Operator(Operator),
    Equals,
    Clear,
    MemoryAdd,
    MemoryClear,
}

impl Button {
    /// Text printed on the key face
    pub fn label(self) -> &'static str {
        match self {
            Button::Digit(d) => DIGIT_LABELS[d.value() as usize],
            Button::Decimal => ".",
            Button::Operator(Operator::Add) => "+",
            Button::Operator(Operator::Subtract) => "-",
            Button::Operator(Operator::Multiply) => "*",
            Button::Operator(Operator::Divide) => "/",
            Button::Equals => "=",
            Button::Clear => "C",
            Button::MemoryAdd => "M+",
            Button::MemoryClear => "MC",
        }
    }

    /// Canonical scene part name, accepted by [`parse_part_name`]
    pub fn part_name(self) -> String {
        let suffix = match self {
            Button::Digit(d) => DIGIT_LABELS[d.value() as usize],
            Button::Decimal => "dot",
            Button::Operator(Operator::Add) => "add",
            Button::Operator(Operator::Subtract) => "sub",
            Button::Operator(Operator::Multiply) => "mul",
            Button::Operator(Operator::Divide) => "div",
            Button::Equals => "eq",
            Button::Clear => "c",
            Button::MemoryAdd => "mplus",
            Button::MemoryClear => "mc",
        };
        format!("btn_{suffix}")
    }

    pub fn is_operator(self) -> bool {
        matches!(self, Button::Operator(_))
    }
}

impl fmt::Display for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Parses key tokens such as `7`, `.`, `+`, `=`, `C`, `M+`, `MC`
impl FromStr for Button {
    type Err = UnknownButton;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        if let Ok(op) = token.parse::<Operator>() {
            return Ok(Button::Operator(op));
        }
        let mut chars = token.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if let Ok(digit) = Digit::try_from(c) {
                return Ok(Button::Digit(digit));
            }
        }
        match token.to_ascii_uppercase().as_str() {
            "." => Ok(Button::Decimal),
            "=" => Ok(Button::Equals),
            "C" => Ok(Button::Clear),
            "M+" => Ok(Button::MemoryAdd),
            "MC" => Ok(Button::MemoryClear),
            _ => Err(UnknownButton(s.to_string())),
        }
    }
}

/// Map a scene part name like `btn_7`, `Button-Plus` or `btn_eq.001` to
/// its button. Names that follow no button convention give `None`.
pub fn parse_part_name(name: &str) -> Option<Button> {
    all_consuming(tuple((part_prefix, part_label, opt(duplicate_suffix))))(name.trim())
        .ok()
        .map(|(_, (_, button, _))| button)
}

fn part_prefix(input: &str) -> IResult<&str, ()> {
    value(
        (),
        tuple((alt((tag_no_case("button"), tag_no_case("btn"))), one_of("_-."))),
    )(input)
}

// Longer spellings come first: all_consuming does not backtrack into alt
fn part_label(input: &str) -> IResult<&str, Button> {
    alt((
        map_opt(satisfy(|c| c.is_ascii_digit()), |c| {
            Digit::try_from(c).ok().map(Button::Digit)
        }),
        value(
            Button::Decimal,
            alt((tag_no_case("decimal"), tag_no_case("point"), tag_no_case("dot"))),
        ),
        value(
            Button::Operator(Operator::Add),
            alt((tag_no_case("plus"), tag_no_case("add"))),
        ),
        value(
            Button::Operator(Operator::Subtract),
            alt((tag_no_case("subtract"), tag_no_case("minus"), tag_no_case("sub"))),
        ),
        value(
            Button::Operator(Operator::Multiply),
            alt((tag_no_case("multiply"), tag_no_case("times"), tag_no_case("mul"))),
        ),
        value(
            Button::Operator(Operator::Divide),
            alt((tag_no_case("divide"), tag_no_case("div"))),
        ),
        value(
            Button::Equals,
            alt((tag_no_case("equals"), tag_no_case("enter"), tag_no_case("eq"))),
        ),
        value(
            Button::MemoryAdd,
            alt((tag_no_case("mplus"), tag_no_case("m+"), tag_no_case("madd"))),
        ),
        value(
            Button::MemoryClear,
            alt((tag_no_case("mclear"), tag_no_case("mc"))),
        ),
        value(Button::Clear, alt((tag_no_case("clear"), tag_no_case("c")))),
    ))(input)
}

/// Exporters append `.001` style suffixes to duplicated names
fn duplicate_suffix(input: &str) -> IResult<&str, &str> {
    preceded(char('.'), digit1)(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digit(value: u8) -> Button {
        Button::Digit(Digit::new(value).unwrap())
    }

    #[test]
    fn test_parse_part_names() {
        assert_eq!(parse_part_name("btn_7"), Some(digit(7)));
        assert_eq!(parse_part_name("Button-Plus"), Some(Button::Operator(Operator::Add)));
        assert_eq!(parse_part_name("BTN.divide"), Some(Button::Operator(Operator::Divide)));
        assert_eq!(parse_part_name("btn_eq.001"), Some(Button::Equals));
        assert_eq!(parse_part_name("button_equals"), Some(Button::Equals));
        assert_eq!(parse_part_name("btn_c"), Some(Button::Clear));
        assert_eq!(parse_part_name("btn_clear"), Some(Button::Clear));
        assert_eq!(parse_part_name("btn_mc"), Some(Button::MemoryClear));
        assert_eq!(parse_part_name("btn_M+"), Some(Button::MemoryAdd));
        assert_eq!(parse_part_name("btn_point"), Some(Button::Decimal));
    }

    #[test]
    fn test_reject_non_button_names() {
        assert_eq!(parse_part_name("body"), None);
        assert_eq!(parse_part_name("display"), None);
        assert_eq!(parse_part_name("btn_"), None);
        assert_eq!(parse_part_name("btn_77"), None);
        assert_eq!(parse_part_name("btn_cx"), None);
        assert_eq!(parse_part_name("btn7"), None);
    }

    #[test]
    fn test_canonical_part_names_parse_back() {
        let buttons = (0..10)
            .map(digit)
            .chain([
                Button::Decimal,
                Button::Operator(Operator::Add),
                Button::Operator(Operator::Subtract),
                Button::Operator(Operator::Multiply),
                Button::Operator(Operator::Divide),
                Button::Equals,
                Button::Clear,
                Button::MemoryAdd,
                Button::MemoryClear,
            ]);
        for button in buttons {
            assert_eq!(parse_part_name(&button.part_name()), Some(button));
        }
    }

    #[test]
    fn test_key_tokens() {
        assert_eq!("5".parse::<Button>(), Ok(digit(5)));
        assert_eq!("*".parse::<Button>(), Ok(Button::Operator(Operator::Multiply)));
        assert_eq!("=".parse::<Button>(), Ok(Button::Equals));
        assert_eq!("m+".parse::<Button>(), Ok(Button::MemoryAdd));
        assert_eq!(" MC ".parse::<Button>(), Ok(Button::MemoryClear));
        assert_eq!(
            "sqrt".parse::<Button>(),
            Err(UnknownButton("sqrt".to_string()))
        );
    }

    #[test]
    fn test_labels() {
        assert_eq!(digit(0).label(), "0");
        assert_eq!(Button::MemoryAdd.to_string(), "M+");
        assert!(Button::Operator(Operator::Subtract).is_operator());
        assert!(!Button::Equals.is_operator());
    }
}
