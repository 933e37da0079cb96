use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalcError {
    #[error("Invalid input format. Use format: number operator number")]
    invalid_format,

    #[error("'{0}' is not a valid number.")]
    invalid_number(String),

    #[error("No previous result available.")]
    no_previous_result,

    #[error("Division by zero!")]
    division_by_zero,

    #[error("Invalid operator!")]
    invalid_operator,
}

pub type Result<T> = std::result::Result<T, CalcError>;
