/// Four-function calculator state machine with one memory register
use std::fmt;
use std::str::FromStr;

/// Text returned by `calculate` when dividing by zero
pub const ERROR_MARKER: &str = "Error";

/// Arithmetic operator held between two operand entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    pub fn apply(self, a: f64, b: f64) -> f64 {
        match self {
            Operator::Add => a + b,
            Operator::Subtract => a - b,
            Operator::Multiply => a * b,
            Operator::Divide => a / b,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '-',
            Operator::Multiply => '*',
            Operator::Divide => '/',
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl FromStr for Operator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" => Ok(Operator::Add),
            "-" => Ok(Operator::Subtract),
            "*" => Ok(Operator::Multiply),
            "/" => Ok(Operator::Divide),
            other => Err(format!("unknown operator '{other}'")),
        }
    }
}

/// A single decimal numeral, 0 through 9
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digit(u8);

impl Digit {
    pub fn new(value: u8) -> Option<Self> {
        (value < 10).then_some(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn as_char(self) -> char {
        (b'0' + self.0) as char
    }
}

impl TryFrom<char> for Digit {
    type Error = char;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        c.to_digit(10).map(|d| Self(d as u8)).ok_or(c)
    }
}

/// Number being typed, kept as text so leading-zero and decimal rules
/// can look at its written form. Parsed only when arithmetic needs it.
#[derive(Debug, Clone, PartialEq)]
struct Entry(String);

impl Entry {
    fn zero() -> Self {
        Self("0".to_string())
    }

    fn from_digit(digit: Digit) -> Self {
        Self(digit.as_char().to_string())
    }

    /// Negative zero prints as "0" and infinities as "Infinity"
    fn from_value(value: f64) -> Self {
        let text = if value == 0.0 {
            "0".to_string()
        } else if value.is_infinite() {
            let sign = if value < 0.0 { "-" } else { "" };
            format!("{sign}Infinity")
        } else {
            value.to_string()
        };
        Self(text)
    }

    fn is_zero(&self) -> bool {
        self.0 == "0"
    }

    fn push_digit(&mut self, digit: Digit) {
        self.0.push(digit.as_char());
    }

    /// Returns false when the entry already holds a decimal point
    fn push_decimal_point(&mut self) -> bool {
        if self.0.contains('.') {
            return false;
        }
        self.0.push('.');
        true
    }

    /// A trailing point is ignored, so "Infinity." still reads as
    /// infinity. Unparseable text yields NaN rather than an error.
    fn value(&self) -> f64 {
        let text = self.0.strip_suffix('.').unwrap_or(&self.0);
        text.parse().unwrap_or(f64::NAN)
    }

    fn as_str(&self) -> &str {
        &self.0
    }
}

/// Calculator state machine driven one button at a time.
///
/// Every operation mutates the state and returns the text the display
/// should show next, except `set_operator` which leaves the display as is.
#[derive(Debug, Clone)]
pub struct CalculatorEngine {
    current: Entry,
    previous: Option<Entry>,
    operator: Option<Operator>,
    awaiting_new_entry: bool,
    memory: f64,
}

impl CalculatorEngine {
    pub fn new() -> Self {
        Self {
            current: Entry::zero(),
            previous: None,
            operator: None,
            awaiting_new_entry: false,
            memory: 0.0,
        }
    }

    /// Current display text
    pub fn display(&self) -> &str {
        self.current.as_str()
    }

    pub fn memory(&self) -> f64 {
        self.memory
    }

    pub fn pending_operator(&self) -> Option<Operator> {
        self.operator
    }

    pub fn is_awaiting_new_entry(&self) -> bool {
        self.awaiting_new_entry
    }

    /// Start a fresh number after an operator or result, otherwise append.
    /// A lone "0" is replaced instead of prefixed. Length is unbounded.
    pub fn input_digit(&mut self, digit: Digit) -> &str {
        if self.awaiting_new_entry {
            self.current = Entry::from_digit(digit);
            self.awaiting_new_entry = false;
        } else if self.current.is_zero() {
            self.current = Entry::from_digit(digit);
        } else {
            self.current.push_digit(digit);
        }
        self.display()
    }

    /// Append a decimal point unless one is already present.
    ///
    /// The awaiting-new-entry flag is neither honored nor cleared, so a
    /// point typed straight after an operator lands on the captured operand
    /// text, and the next digit still replaces the whole entry.
    pub fn input_decimal_point(&mut self) -> &str {
        self.current.push_decimal_point();
        self.display()
    }

    /// Hold `op` for the next `calculate`.
    ///
    /// If an operator is pending and a second operand has been started, the
    /// pending operation is folded first. Repeated operator presses with no
    /// digits in between only swap the pending operator.
    pub fn set_operator(&mut self, op: Operator) {
        if self.operator.is_some() && !self.awaiting_new_entry {
            self.calculate();
        }

        self.previous = Some(self.current.clone());
        self.operator = Some(op);
        self.awaiting_new_entry = true;
    }

    /// Apply the pending operator to the captured and current operands.
    ///
    /// Division by zero resets the working state (memory survives) and
    /// returns [`ERROR_MARKER`] for this call only.
    pub fn calculate(&mut self) -> &str {
        let (Some(op), Some(previous)) = (self.operator, self.previous.as_ref()) else {
            return self.display();
        };

        let a = previous.value();
        let b = self.current.value();

        if op == Operator::Divide && b == 0.0 {
            self.clear();
            return ERROR_MARKER;
        }

        self.current = Entry::from_value(op.apply(a, b));
        self.operator = None;
        self.previous = None;
        self.awaiting_new_entry = true;
        self.display()
    }

    /// Reset the working state. Memory is untouched.
    pub fn clear(&mut self) -> &str {
        self.current = Entry::zero();
        self.previous = None;
        self.operator = None;
        self.awaiting_new_entry = false;
        self.display()
    }

    /// Add the current value into memory and zero the entry.
    ///
    /// Unlike `clear`, the captured operand and pending operator survive.
    pub fn memory_add(&mut self) -> &str {
        self.memory += self.current.value();
        self.current = Entry::zero();
        self.awaiting_new_entry = false;
        self.display()
    }

    /// Zero memory and reset the working state
    pub fn memory_clear(&mut self) -> &str {
        self.memory = 0.0;
        self.clear()
    }
}

impl Default for CalculatorEngine {
    fn default() -> Self {
        Self::new()
    }
}
