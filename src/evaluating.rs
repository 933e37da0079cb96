use crate::error_handling::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    addition,
    subtraction,
    multiplication,
    division,
    remainder,
    exponentiation,
}

impl BinaryOperator {
    pub fn call(&self, left: f64, right: f64) -> Result<f64> {
        use BinaryOperator::*;

        match self {
            addition => Ok(left + right),
            subtraction => Ok(left - right),
            multiplication => Ok(left * right),
            division | remainder if right == 0.0 => Err(CalcError::division_by_zero),
            division => Ok(left / right),
            // f64 `%` truncates, so the sign follows the dividend like C's fmod
            remainder => Ok(left % right),
            exponentiation => Ok(left.powf(right)),
        }
    }
}

impl TryFrom<char> for BinaryOperator {
    type Error = CalcError;

    fn try_from(c: char) -> Result<Self> {
        use BinaryOperator::*;
        match c {
            '+' => Ok(addition),
            '-' => Ok(subtraction),
            '*' | 'x' | 'X' => Ok(multiplication),
            '/' => Ok(division),
            '%' => Ok(remainder),
            '^' => Ok(exponentiation),
            _ => Err(CalcError::invalid_operator),
        }
    }
}

pub fn evaluate(left: f64, operator: char, right: f64) -> Result<f64> {
    BinaryOperator::try_from(operator)?.call(left, right)
}
