use thiserror::Error;

/// A linear coordinate expression `c_x*x + c_y*y + c_z*z + constant` with
/// rational coefficients, as written in symmetry-operator triplets
/// (`-x+1/2`) and Wyckoff coordinate templates (`x,2x,1/4`).
///
/// Expressions are parsed once at table-load time and evaluated as plain
/// floating-point afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordExpr {
    pub coeffs: [f64; 3],
    pub constant: f64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExprParseError {
    #[error("empty coordinate expression")]
    Empty,
    #[error("unexpected character '{0}' in coordinate expression")]
    UnexpectedChar(char),
    #[error("division by zero in rational constant")]
    ZeroDenominator,
}

impl CoordExpr {
    pub fn parse(input: &str) -> Result<Self, ExprParseError> {
        let mut coeffs = [0.0; 3];
        let mut constant = 0.0;
        let chars: Vec<char> = input.chars().filter(|c| !c.is_whitespace()).collect();
        if chars.is_empty() {
            return Err(ExprParseError::Empty);
        }
        let mut pos = 0;
        while pos < chars.len() {
            let sign = match chars[pos] {
                '+' => {
                    pos += 1;
                    1.0
                }
                '-' => {
                    pos += 1;
                    -1.0
                }
                _ => 1.0,
            };
            let mut number: Option<f64> = None;
            if pos < chars.len() && chars[pos].is_ascii_digit() {
                let mut numerator = 0u32;
                while pos < chars.len() && chars[pos].is_ascii_digit() {
                    numerator = numerator * 10 + (chars[pos] as u32 - '0' as u32);
                    pos += 1;
                }
                let mut value = f64::from(numerator);
                if pos < chars.len() && chars[pos] == '/' {
                    pos += 1;
                    let mut denominator = 0u32;
                    while pos < chars.len() && chars[pos].is_ascii_digit() {
                        denominator = denominator * 10 + (chars[pos] as u32 - '0' as u32);
                        pos += 1;
                    }
                    if denominator == 0 {
                        return Err(ExprParseError::ZeroDenominator);
                    }
                    value /= f64::from(denominator);
                }
                number = Some(value);
            }
            let axis = match chars.get(pos).copied() {
                Some('x') => Some(0),
                Some('y') => Some(1),
                Some('z') => Some(2),
                _ => None,
            };
            match (number, axis) {
                (n, Some(axis)) => {
                    pos += 1;
                    coeffs[axis] += sign * n.unwrap_or(1.0);
                }
                (Some(n), None) => constant += sign * n,
                (None, None) => {
                    return Err(ExprParseError::UnexpectedChar(
                        chars.get(pos).copied().unwrap_or('?'),
                    ));
                }
            }
        }
        Ok(Self { coeffs, constant })
    }

    pub fn evaluate(&self, x: f64, y: f64, z: f64) -> f64 {
        self.coeffs[0] * x + self.coeffs[1] * y + self.coeffs[2] * z + self.constant
    }

    /// Axis letters (`x`, `y`, `z`) with a nonzero coefficient.
    pub fn variables(&self) -> impl Iterator<Item = char> + '_ {
        ['x', 'y', 'z']
            .into_iter()
            .zip(self.coeffs)
            .filter(|(_, c)| *c != 0.0)
            .map(|(v, _)| v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_variables_and_signs() {
        let e = CoordExpr::parse("-x").unwrap();
        assert_eq!(e.coeffs, [-1.0, 0.0, 0.0]);
        assert_eq!(e.constant, 0.0);
    }

    #[test]
    fn parses_rational_translation() {
        let e = CoordExpr::parse("x+3/4").unwrap();
        assert_eq!(e.coeffs, [1.0, 0.0, 0.0]);
        assert_eq!(e.constant, 0.75);
    }

    #[test]
    fn parses_coefficient_terms() {
        let e = CoordExpr::parse("2x").unwrap();
        assert_eq!(e.coeffs[0], 2.0);
        let e = CoordExpr::parse("1/2x").unwrap();
        assert_eq!(e.coeffs[0], 0.5);
    }

    #[test]
    fn parses_mixed_expressions() {
        let e = CoordExpr::parse("x-y+1/2").unwrap();
        assert_eq!(e.coeffs, [1.0, -1.0, 0.0]);
        assert_eq!(e.constant, 0.5);
        assert_eq!(e.evaluate(0.25, 0.1, 0.0), 0.65);
    }

    #[test]
    fn lists_used_variables() {
        let e = CoordExpr::parse("x-z").unwrap();
        let vars: Vec<char> = e.variables().collect();
        assert_eq!(vars, vec!['x', 'z']);
    }

    #[test]
    fn rejects_garbage() {
        assert!(CoordExpr::parse("x+q").is_err());
        assert!(CoordExpr::parse("").is_err());
        assert_eq!(
            CoordExpr::parse("1/0x"),
            Err(ExprParseError::ZeroDenominator)
        );
    }
}
