use crate::error_handling::*;
use crate::scanning::*;
use std::fmt;
use std::str::FromStr;

pub const ANSWER_KEYWORD: &str = "ans";

const LARGE_MAGNITUDE: f64 = 1e16;
const SMALL_MAGNITUDE: f64 = 1e-6;

/// Shortest round-trip rendering, switching to scientific notation for
/// magnitudes at or above 1e16 or below 1e-6.
pub fn format_number(value: f64) -> String {
    let magnitude = value.abs();
    if value.is_finite() && value != 0.0 && (magnitude >= LARGE_MAGNITUDE || magnitude < SMALL_MAGNITUDE) {
        format!("{:e}", value)
    } else {
        format!("{}", value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    quit,
    help,
    clear,
}

#[derive(Debug, PartialEq, Eq)]
pub struct UnknownCommand;

impl FromStr for Command {
    type Err = UnknownCommand;

    /// Commands are matched against the whole trimmed line, ignoring case.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        use Command::*;
        match s.trim().to_lowercase().as_str() {
            "quit" | "q" => Ok(quit),
            "help" | "h" => Ok(help),
            "clear" | "c" => Ok(clear),
            _ => Err(UnknownCommand),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationRequest<'a> {
    pub left: &'a str,
    pub operator: char,
    pub right: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    empty,
    command(Command),
    calculation(OperationRequest<'a>),
}

/// Splits a line into exactly `operand operator operand`.
pub fn tokenize(line: &str) -> Result<OperationRequest<'_>> {
    let mut fields = line.split_whitespace();
    let (Some(left), Some(operator), Some(right), None) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return Err(CalcError::invalid_format);
    };

    let mut operator_chars = operator.chars();
    match (operator_chars.next(), operator_chars.next()) {
        (Some(operator), None) => Ok(OperationRequest{left, operator, right}),
        _ => Err(CalcError::invalid_format),
    }
}

pub fn classify(line: &str) -> Result<Line<'_>> {
    if line.trim().is_empty() {
        return Ok(Line::empty);
    }
    if let Ok(command) = line.parse() {
        return Ok(Line::command(command));
    }
    tokenize(line).map(Line::calculation)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operand<'a> {
    literal(&'a str, f64),
    answer(f64),
}

impl Operand<'_> {
    pub fn value(&self) -> f64 {
        match self {
            Operand::literal(_, value) | Operand::answer(value) => *value,
        }
    }
}

impl fmt::Display for Operand<'_> {
    /// Literals echo as typed; the keyword echoes as the value it stood for.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Operand::literal(token, _) => write!(f, "{}", token),
            Operand::answer(value) => write!(f, "{}", format_number(*value)),
        }
    }
}

/// The keyword is matched case-sensitively against the raw token.
pub fn resolve(token: &str, previous: Option<f64>) -> Result<Operand<'_>> {
    if token == ANSWER_KEYWORD {
        return previous.map(Operand::answer).ok_or(CalcError::no_previous_result);
    }
    if !is_valid_number(token) {
        return Err(CalcError::invalid_number(token.into()));
    }
    token
        .trim_start()
        .parse()
        .map(|value| Operand::literal(token, value))
        .map_err(|_| CalcError::invalid_number(token.into()))
}

pub fn echo(left: &Operand, operator: char, right: &Operand) -> String {
    format!("{} {} {}", left, operator, right)
}
