use std::fmt;
use std::ops::{Add, Mul, Sub};

use crate::{FieldContext, FieldElement, SharingError};

/// A polynomial over GF(p), coefficients in ascending order: index `i`
/// holds the coefficient of `x^i`.
///
/// High-order coefficients may be zero; [`Polynomial::degree`] reports the
/// effective degree and equality ignores vanishing leading terms.
#[derive(Clone, Debug)]
pub struct Polynomial {
    field: FieldContext,
    coefficients: Vec<FieldElement>,
}

impl Polynomial {
    /// Panics if a coefficient belongs to a different field.
    pub fn new(field: &FieldContext, coefficients: Vec<FieldElement>) -> Self {
        for c in &coefficients {
            assert!(field.contains(c), "coefficient {} is not in GF({})", c, field.modulus());
        }
        Self {
            field: field.clone(),
            coefficients,
        }
    }

    pub fn from_u64s(field: &FieldContext, coefficients: &[u64]) -> Self {
        Self {
            field: field.clone(),
            coefficients: coefficients.iter().map(|&c| field.element(c)).collect(),
        }
    }

    pub fn zero(field: &FieldContext) -> Self {
        Self {
            field: field.clone(),
            coefficients: Vec::new(),
        }
    }

    pub fn constant(value: FieldElement) -> Self {
        Self {
            field: value.field().clone(),
            coefficients: vec![value],
        }
    }

    pub fn field(&self) -> &FieldContext {
        &self.field
    }

    pub fn coefficients(&self) -> &[FieldElement] {
        &self.coefficients
    }

    /// Highest index holding a nonzero coefficient; `None` for the zero polynomial.
    pub fn degree(&self) -> Option<usize> {
        self.coefficients.iter().rposition(|c| !c.is_zero())
    }

    pub fn is_zero(&self) -> bool {
        self.degree().is_none()
    }

    pub fn leading_coefficient(&self) -> Option<&FieldElement> {
        self.degree().map(|d| &self.coefficients[d])
    }

    /// Coefficient of `x^i`, zero past the stored length.
    pub fn coefficient(&self, i: usize) -> FieldElement {
        self.coefficients
            .get(i)
            .cloned()
            .unwrap_or_else(|| self.field.zero())
    }

    /// Drops vanishing high-order coefficients.
    pub fn trimmed(&self) -> Self {
        let len = self.degree().map_or(0, |d| d + 1);
        Self {
            field: self.field.clone(),
            coefficients: self.coefficients[..len].to_vec(),
        }
    }

    /// Horner evaluation at `x`.
    pub fn evaluate(&self, x: &FieldElement) -> FieldElement {
        let mut result = self.field.zero();
        for c in self.coefficients.iter().rev() {
            result = &(&result * x) + c;
        }
        result
    }

    pub fn evaluate_many(&self, xs: &[FieldElement]) -> Vec<FieldElement> {
        xs.iter().map(|x| self.evaluate(x)).collect()
    }

    /// Multiplies every coefficient by `factor`.
    pub fn scale(&self, factor: &FieldElement) -> Self {
        Self::new(
            &self.field,
            self.coefficients.iter().map(|c| c * factor).collect(),
        )
    }

    /// Long division: returns `(quotient, remainder)` with
    /// `deg(remainder) < deg(divisor)`.
    pub fn div_rem(&self, divisor: &Polynomial) -> Result<(Polynomial, Polynomial), SharingError> {
        let divisor = divisor.trimmed();
        let divisor_degree = divisor
            .degree()
            .ok_or_else(|| SharingError::DivisionByZero(self.field.modulus().clone()))?;
        let lead_inv = divisor.coefficients[divisor_degree].inv()?;

        let mut remainder = self.trimmed().coefficients;
        if remainder.len() <= divisor_degree {
            return Ok((Polynomial::zero(&self.field), Polynomial::new(&self.field, remainder)));
        }

        let mut quotient = vec![self.field.zero(); remainder.len() - divisor_degree];
        for shift in (0..quotient.len()).rev() {
            let factor = &remainder[shift + divisor_degree] * &lead_inv;
            if factor.is_zero() {
                continue;
            }
            for (i, d) in divisor.coefficients.iter().enumerate() {
                remainder[shift + i] -= &(&factor * d);
            }
            quotient[shift] = factor;
        }
        remainder.truncate(divisor_degree);

        Ok((
            Polynomial::new(&self.field, quotient).trimmed(),
            Polynomial::new(&self.field, remainder).trimmed(),
        ))
    }
}

impl PartialEq for Polynomial {
    fn eq(&self, other: &Self) -> bool {
        self.field == other.field && self.trimmed().coefficients == other.trimmed().coefficients
    }
}

impl Eq for Polynomial {}

impl<'a, 'b> Add<&'b Polynomial> for &'a Polynomial {
    type Output = Polynomial;

    fn add(self, rhs: &'b Polynomial) -> Polynomial {
        let len = self.coefficients.len().max(rhs.coefficients.len());
        let coefficients = (0..len)
            .map(|i| &self.coefficient(i) + &rhs.coefficient(i))
            .collect();
        Polynomial::new(&self.field, coefficients)
    }
}

impl<'a, 'b> Sub<&'b Polynomial> for &'a Polynomial {
    type Output = Polynomial;

    fn sub(self, rhs: &'b Polynomial) -> Polynomial {
        let len = self.coefficients.len().max(rhs.coefficients.len());
        let coefficients = (0..len)
            .map(|i| &self.coefficient(i) - &rhs.coefficient(i))
            .collect();
        Polynomial::new(&self.field, coefficients)
    }
}

impl<'a, 'b> Mul<&'b Polynomial> for &'a Polynomial {
    type Output = Polynomial;

    fn mul(self, rhs: &'b Polynomial) -> Polynomial {
        if self.coefficients.is_empty() || rhs.coefficients.is_empty() {
            return Polynomial::zero(&self.field);
        }
        let mut coefficients =
            vec![self.field.zero(); self.coefficients.len() + rhs.coefficients.len() - 1];
        for (i, a) in self.coefficients.iter().enumerate() {
            for (j, b) in rhs.coefficients.iter().enumerate() {
                coefficients[i + j] += &(a * b);
            }
        }
        Polynomial::new(&self.field, coefficients)
    }
}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (degree, coeff) in self.coefficients.iter().enumerate().rev() {
            if coeff.is_zero() {
                continue;
            }
            if !first {
                write!(f, " + ")?;
            }
            first = false;

            if degree == 0 || !coeff.is_one() {
                write!(f, "{coeff}")?;
            }
            if degree > 0 {
                write!(f, "x")?;
                if degree > 1 {
                    write!(f, "^{degree}")?;
                }
            }
        }

        if first {
            write!(f, "0")?;
        }
        Ok(())
    }
}
