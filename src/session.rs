use crate::error_handling::*;
use crate::evaluating::*;
use crate::parsing::*;

use std::io::{BufRead, Write};
use tracing::debug;

const HELP: &str = "\
=== CALCULATOR MENU ===
Operations: +, -, * (or x), /, %, ^ (power)
Commands:
  'c' or 'clear' - Clear calculator
  'h' or 'help'  - Show this menu
  'q' or 'quit'  - Exit calculator
  'ans'          - Use previous result
Examples:
  5 + 3
  ans * 2
  2.5 / 1.25
  2 ^ 8
======================";

const PROMPT: &str = "Enter calculation: ";
const FAREWELL: &str = "Thank you for using the calculator. Goodbye!";

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SessionState {
    last_result: f64,
    has_result: bool,
}

impl SessionState {
    pub fn previous(&self) -> Option<f64> {
        self.has_result.then_some(self.last_result)
    }

    fn remember(&mut self, result: f64) {
        self.last_result = result;
        self.has_result = true;
    }

    fn clear(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Calculation {
    pub expression: String,
    pub result: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    running,
    terminated,
}

pub struct Session<R, W> {
    input: R,
    output: W,
    state: SessionState,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self{input, output, state: SessionState::default()}
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn greet(&mut self) -> std::io::Result<()> {
        writeln!(self.output, "=== Calculator ===")?;
        writeln!(self.output, "Type 'help' for instructions or 'quit' to exit.")?;
        writeln!(self.output, "{}", HELP)
    }

    /// Resolves and evaluates one request, updating the state only on success.
    pub fn calculate(&mut self, request: &OperationRequest) -> Result<Calculation> {
        let previous = self.state.previous();
        let left = resolve(request.left, previous)?;
        let right = resolve(request.right, previous)?;

        let result = evaluate(left.value(), request.operator, right.value())?;
        self.state.remember(result);

        Ok(Calculation{expression: echo(&left, request.operator, &right), result})
    }

    /// Handles a single input line.
    pub fn step(&mut self, line: &str) -> std::io::Result<Flow> {
        let request = match classify(line) {
            Ok(Line::empty) => {
                writeln!(self.output, "Please enter a calculation or command.")?;
                return Ok(Flow::running);
            },
            Ok(Line::command(Command::quit)) => {
                debug!("quit requested");
                writeln!(self.output, "{}", FAREWELL)?;
                return Ok(Flow::terminated);
            },
            Ok(Line::command(Command::help)) => {
                writeln!(self.output, "{}", HELP)?;
                return Ok(Flow::running);
            },
            Ok(Line::command(Command::clear)) => {
                debug!("state cleared");
                self.state.clear();
                writeln!(self.output, "Calculator cleared.")?;
                return Ok(Flow::running);
            },
            Ok(Line::calculation(request)) => request,
            Err(e) => {
                self.report(&e)?;
                return Ok(Flow::running);
            },
        };

        match self.calculate(&request) {
            Ok(calculation) => {
                debug!(expression = %calculation.expression, result = calculation.result, "evaluated");
                let result = format_number(calculation.result);
                writeln!(self.output, "{} = {}", calculation.expression, result)?;
                writeln!(self.output, "Answer: {} (use '{}' to reuse this value)", result, ANSWER_KEYWORD)?;
            },
            Err(e) => self.report(&e)?,
        }
        Ok(Flow::running)
    }

    fn report(&mut self, error: &CalcError) -> std::io::Result<()> {
        debug!(?error, "calculation failed");
        writeln!(self.output, "Error: {}", error)?;
        if *error == CalcError::invalid_format {
            writeln!(self.output, "Example: 5 + 3")?;
        }
        Ok(())
    }

    /// Runs until a quit command or the end of the input stream.
    pub fn run(&mut self) -> std::io::Result<()> {
        let mut buffer = Vec::new();
        loop {
            write!(self.output, "\n{}", PROMPT)?;
            self.output.flush()?;

            buffer.clear();
            if self.input.read_until(b'\n', &mut buffer)? == 0 {
                debug!("end of input");
                writeln!(self.output)?;
                writeln!(self.output, "{}", FAREWELL)?;
                return Ok(());
            }

            // undecodable bytes become U+FFFD and fail later as an invalid number
            let line = String::from_utf8_lossy(&buffer);
            if self.step(&line)? == Flow::terminated {
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn session() -> Session<Cursor<Vec<u8>>, Vec<u8>> {
        Session::new(Cursor::new(Vec::new()), Vec::new())
    }

    fn transcript(lines: &[&str]) -> String {
        let mut session = session();
        for line in lines {
            session.step(line).unwrap();
        }
        String::from_utf8(session.output).unwrap()
    }

    #[test]
    fn fresh_state_has_no_result() {
        assert_eq!(SessionState::default().previous(), None);
    }

    #[test]
    fn scenario_walkthrough() {
        let mut session = session();

        session.step("5 + 3").unwrap();
        assert_eq!(session.state().previous(), Some(8.0));

        session.step("ans * 2").unwrap();
        assert_eq!(session.state().previous(), Some(16.0));

        session.step("10 / 0").unwrap();
        assert_eq!(session.state().previous(), Some(16.0));

        session.step("clear").unwrap();
        assert_eq!(session.state().previous(), None);

        session.step("ans + 1").unwrap();
        assert_eq!(session.state().previous(), None);

        let output = String::from_utf8(session.output).unwrap();
        assert_eq!(
            output,
            "5 + 3 = 8\n\
             Answer: 8 (use 'ans' to reuse this value)\n\
             8 * 2 = 16\n\
             Answer: 16 (use 'ans' to reuse this value)\n\
             Error: Division by zero!\n\
             Calculator cleared.\n\
             Error: No previous result available.\n"
        );
    }

    #[test]
    fn answer_plus_zero_round_trips() {
        let mut session = session();
        session.step("2.5 / 1.25").unwrap();
        let request = tokenize("ans + 0").unwrap();
        assert_eq!(session.calculate(&request).unwrap().result, 2.0);
    }

    #[test]
    fn keyword_before_any_result_fails() {
        let mut session = session();
        let request = tokenize("3 - ans").unwrap();
        assert_eq!(session.calculate(&request), Err(CalcError::no_previous_result));
    }

    #[test]
    fn power_and_bad_operator() {
        assert_eq!(
            transcript(&["2 ^ 8", "7 $ 2"]),
            "2 ^ 8 = 256\n\
             Answer: 256 (use 'ans' to reuse this value)\n\
             Error: Invalid operator!\n"
        );
    }

    #[test]
    fn failures_leave_state_untouched() {
        let mut session = session();
        session.step("4 x 4").unwrap();
        for line in ["4 +", "abc + 1", "1 + 5abc", "1 % 0", "1 ? 1"] {
            session.step(line).unwrap();
            assert_eq!(session.state().previous(), Some(16.0), "{line:?}");
        }
    }

    #[test]
    fn left_operand_is_reported_first() {
        assert_eq!(transcript(&["foo + bar"]), "Error: 'foo' is not a valid number.\n");
    }

    #[test]
    fn format_errors_show_an_example() {
        assert_eq!(
            transcript(&["5 + 3 4"]),
            "Error: Invalid input format. Use format: number operator number\n\
             Example: 5 + 3\n"
        );
    }

    #[test]
    fn empty_line_prompts_again() {
        assert_eq!(transcript(&["  \n"]), "Please enter a calculation or command.\n");
    }

    #[test]
    fn commands_control_the_flow() {
        let mut session = session();
        assert_eq!(session.step("HELP").unwrap(), Flow::running);
        assert_eq!(session.step("Q\n").unwrap(), Flow::terminated);
    }

    #[test]
    fn run_stops_at_quit() {
        let input = Cursor::new("5 + 3\nquit\n1 + 1\n");
        let mut session = Session::new(input, Vec::new());
        session.run().unwrap();
        assert_eq!(session.state().previous(), Some(8.0));

        let output = String::from_utf8(session.output).unwrap();
        assert!(output.ends_with("Goodbye!\n"));
        assert!(!output.contains("1 + 1"));
    }

    #[test]
    fn invalid_utf8_line_does_not_end_the_session() {
        let mut session = Session::new(Cursor::new(b"1 + \xe9\n2 * 2\n".to_vec()), Vec::new());
        session.run().unwrap();
        assert_eq!(session.state().previous(), Some(4.0));

        let output = String::from_utf8(session.output).unwrap();
        assert!(output.contains("Error: '\u{FFFD}' is not a valid number."));
        assert!(output.contains("2 * 2 = 4"));
        assert!(output.ends_with(&format!("{}\n", FAREWELL)));
    }

    #[test]
    fn extreme_results_use_scientific_notation() {
        assert_eq!(
            transcript(&["1e300 * 1", "1e-300 * 1"]),
            "1e300 * 1 = 1e300\n\
             Answer: 1e300 (use 'ans' to reuse this value)\n\
             1e-300 * 1 = 1e-300\n\
             Answer: 1e-300 (use 'ans' to reuse this value)\n"
        );
    }

    #[test]
    fn end_of_input_is_an_implicit_quit() {
        let mut session = Session::new(Cursor::new("ans * 2\n6 / 4"), Vec::new());
        session.run().unwrap();
        assert_eq!(session.state().previous(), Some(1.5));

        let output = String::from_utf8(session.output).unwrap();
        assert!(output.contains("Error: No previous result available."));
        assert!(output.contains("6 / 4 = 1.5"));
        assert!(output.ends_with(&format!("{}\n", FAREWELL)));
    }
}
