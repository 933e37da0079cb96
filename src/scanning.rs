//! Numeric literal recognition.
//!
//! Accepted grammar, ASCII only:
//! `[+-]? ( digits ( '.' digits? )? | '.' digits ) ( [eE] [+-]? digits )?`

fn is_sign(character: char) -> bool {
    matches!(character, '+' | '-')
}

fn is_exponent_marker(character: char) -> bool {
    matches!(character, 'e' | 'E')
}

struct LiteralScanner<'a> {
    string: &'a str,
    index: usize,
}

impl<'a> LiteralScanner<'a> {
    fn new(string: &'a str) -> Self {
        Self{string, index: 0}
    }

    fn view(&self) -> &str {
        &self.string[self.index..]
    }

    fn skip_while<P: Fn(char) -> bool>(&mut self, predicate: P) -> usize {
        let count = self.view().chars().take_while(|c| predicate(*c)).count();
        // every accepted character is ASCII, so chars and bytes line up
        self.index += count;
        count
    }

    fn skip_one<P: Fn(char) -> bool>(&mut self, predicate: P) -> bool {
        if self.view().starts_with(predicate) {
            self.index += 1;
            true
        } else {
            false
        }
    }

    fn digits(&mut self) -> usize {
        self.skip_while(|c| c.is_ascii_digit())
    }

    fn mantissa(&mut self) -> bool {
        let integral = self.digits();
        if self.skip_one(|c| c == '.') {
            let fractional = self.digits();
            integral + fractional > 0
        } else {
            integral > 0
        }
    }

    fn exponent(&mut self) -> bool {
        if !self.skip_one(is_exponent_marker) {
            return true;
        }
        self.skip_one(is_sign);
        self.digits() > 0
    }

    fn is_finished(&self) -> bool {
        self.view().is_empty()
    }
}

/// Returns true only when the whole token is one numeric literal.
pub fn is_valid_number(token: &str) -> bool {
    let mut scanner = LiteralScanner::new(token.trim_start());
    scanner.skip_one(is_sign);
    scanner.mantissa() && scanner.exponent() && scanner.is_finished()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_literals() {
        for token in ["5", "-5.2", "3.14", "1e10", "+7", "0.5", ".5", "5.", "2.5E-3", "1e+2", "007"] {
            assert!(is_valid_number(token), "{token} should be accepted");
        }
    }

    #[test]
    fn rejects_malformed_literals() {
        for token in ["", "5abc", "--5", "+-5", ".", "-", "e5", "1e", "1e+", "1.2.3", "5 ", "ans", "inf", "NaN", "0x10", "1_000", "٣"] {
            assert!(!is_valid_number(token), "{token:?} should be rejected");
        }
    }

    #[test]
    fn tolerates_leading_whitespace_only() {
        assert!(is_valid_number("  42"));
        assert!(!is_valid_number("42  "));
        assert!(!is_valid_number("   "));
    }

    #[test]
    fn accepted_literals_parse_as_floats() {
        for token in ["5", "-5.2", ".5", "5.", "1e10", "+3"] {
            assert!(token.trim_start().parse::<f64>().is_ok(), "{token}");
        }
    }
}
