//! The closed set of arithmetic and trigonometric operators.
//!
//! Name lookup, arity and the formula per operator live in one
//! exhaustive table, so adding an operator is a compile-checked change
//! in a single place. Trigonometric operators take their input in
//! degrees; `raiz` computes the `valor2`-th root of `valor1`.

use crate::error::EvalError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Suma,
    Resta,
    Multiplicacion,
    Division,
    Potencia,
    Raiz,
    Seno,
    Coseno,
    Tangente,
    Mod,
    Inverso,
}

impl Operator {
    /// Look an operator up by its surface name. `inverso` is accepted
    /// here even though the scanner classifies it as an identifier.
    pub fn from_name(name: &str) -> Option<Operator> {
        match name {
            "suma" => Some(Operator::Suma),
            "resta" => Some(Operator::Resta),
            "multiplicacion" => Some(Operator::Multiplicacion),
            "division" => Some(Operator::Division),
            "potencia" => Some(Operator::Potencia),
            "raiz" => Some(Operator::Raiz),
            "seno" => Some(Operator::Seno),
            "coseno" => Some(Operator::Coseno),
            "tangente" => Some(Operator::Tangente),
            "mod" => Some(Operator::Mod),
            "inverso" => Some(Operator::Inverso),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Operator::Suma => "suma",
            Operator::Resta => "resta",
            Operator::Multiplicacion => "multiplicacion",
            Operator::Division => "division",
            Operator::Potencia => "potencia",
            Operator::Raiz => "raiz",
            Operator::Seno => "seno",
            Operator::Coseno => "coseno",
            Operator::Tangente => "tangente",
            Operator::Mod => "mod",
            Operator::Inverso => "inverso",
        }
    }

    /// Whether the operator reads only `valor1`.
    pub fn is_unary(self) -> bool {
        matches!(
            self,
            Operator::Seno | Operator::Coseno | Operator::Tangente | Operator::Inverso
        )
    }

    /// Apply the operator's formula. Unary operators (`seno`, `coseno`,
    /// `tangente`, `inverso`) read only `v1` and ignore a present `v2`;
    /// binary operators fail when `v2` is absent. Domain checks happen
    /// before the formula, so `division`/`mod` by zero, a negative or
    /// zero-index `raiz` and `inverso` of zero report their specific
    /// error instead of producing a non-finite number.
    pub fn apply(self, v1: f64, v2: Option<f64>) -> Result<f64, EvalError> {
        match self {
            Operator::Suma => Ok(v1 + self.second(v2)?),
            Operator::Resta => Ok(v1 - self.second(v2)?),
            Operator::Multiplicacion => Ok(v1 * self.second(v2)?),
            Operator::Division => {
                let v2 = self.second(v2)?;
                if v2 == 0.0 {
                    return Err(EvalError::DivisionByZero);
                }
                Ok(v1 / v2)
            }
            Operator::Potencia => Ok(v1.powf(self.second(v2)?)),
            Operator::Raiz => {
                let v2 = self.second(v2)?;
                if v1 < 0.0 || v2 <= 0.0 {
                    return Err(EvalError::InvalidRoot);
                }
                Ok(v1.powf(1.0 / v2))
            }
            Operator::Seno => Ok(v1.to_radians().sin()),
            Operator::Coseno => Ok(v1.to_radians().cos()),
            Operator::Tangente => Ok(v1.to_radians().tan()),
            Operator::Mod => {
                let v2 = self.second(v2)?;
                if v2 == 0.0 {
                    return Err(EvalError::ModuloByZero);
                }
                Ok(v1 % v2)
            }
            Operator::Inverso => {
                if v1 == 0.0 {
                    return Err(EvalError::InverseOfZero);
                }
                Ok(1.0 / v1)
            }
        }
    }

    fn second(self, v2: Option<f64>) -> Result<f64, EvalError> {
        v2.ok_or(EvalError::MissingSecondValue {
            operation: self.name().to_owned(),
        })
    }
}
