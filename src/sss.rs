use num_bigint::BigUint;
use rand::Rng;
use tracing::debug;

use crate::{FieldContext, FieldElement, Polynomial, SharingError};

/// One point `(x, f(x))` on the sharing polynomial.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Share {
    pub x: FieldElement,
    pub y: FieldElement,
}

impl Share {
    pub fn new(x: FieldElement, y: FieldElement) -> Self {
        Self { x, y }
    }
}

/// The outcome of splitting a secret: the field it lives in, the sharing
/// polynomial and the `n` shares evaluated at `x = 1..=n`.
#[derive(Clone, Debug)]
pub struct Sharing {
    field: FieldContext,
    polynomial: Polynomial,
    shares: Vec<Share>,
    threshold: usize,
}

impl Sharing {
    pub fn create<R: Rng + ?Sized>(
        secret: &BigUint,
        num_shares: usize,
        threshold: usize,
        modulus: &BigUint,
        rng: &mut R,
    ) -> Result<Self, SharingError> {
        if threshold < 2 || threshold > num_shares {
            return Err(SharingError::InvalidParameters(format!(
                "threshold {} must lie in [2, {}]",
                threshold, num_shares
            )));
        }
        let field = FieldContext::new(modulus.clone())?;
        if secret >= field.modulus() {
            return Err(SharingError::InvalidParameters(format!(
                "secret must be below the modulus {}",
                modulus
            )));
        }
        if BigUint::from(num_shares) >= *field.modulus() {
            return Err(SharingError::InvalidParameters(format!(
                "{} shares need {} distinct nonzero points, GF({}) has fewer",
                num_shares, num_shares, modulus
            )));
        }

        let mut coefficients: Vec<FieldElement> =
            (0..threshold).map(|_| field.random_element(&mut *rng)).collect();
        coefficients[0] = field.element(secret.clone());
        let polynomial = Polynomial::new(&field, coefficients);

        let shares = field
            .range(1, num_shares as u64 + 1)
            .into_iter()
            .map(|x| {
                let y = polynomial.evaluate(&x);
                Share::new(x, y)
            })
            .collect::<Vec<_>>();

        debug!(
            modulus = %modulus,
            threshold,
            num_shares,
            degree = ?polynomial.degree(),
            "split secret"
        );

        Ok(Self {
            field,
            polynomial,
            shares,
            threshold,
        })
    }

    pub fn field(&self) -> &FieldContext {
        &self.field
    }

    pub fn polynomial(&self) -> &Polynomial {
        &self.polynomial
    }

    pub fn shares(&self) -> &[Share] {
        &self.shares
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn into_parts(self) -> (FieldContext, Polynomial, Vec<Share>) {
        (self.field, self.polynomial, self.shares)
    }
}

/// Splits `secret` into `n` shares, any `t` of which recover it.
///
/// Randomness comes only from `rng`, so a seeded generator reproduces the
/// same polynomial and shares.
pub fn split<R: Rng + ?Sized>(
    secret: &BigUint,
    n: usize,
    t: usize,
    p: &BigUint,
    rng: &mut R,
) -> Result<Sharing, SharingError> {
    Sharing::create(secret, n, t, p, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use test_case::test_case;

    fn p() -> BigUint {
        BigUint::from(7919u32)
    }

    #[test]
    fn shares_sit_on_polynomial_with_secret_constant() {
        let mut rng = StdRng::seed_from_u64(0);
        let sharing = split(&BigUint::from(1234u32), 8, 3, &p(), &mut rng).unwrap();

        let poly = sharing.polynomial();
        assert_eq!(poly.coefficients().len(), 3);
        assert_eq!(poly.coefficients()[0].to_u64(), Some(1234));
        assert!(poly.degree().map_or(false, |d| d <= 2));

        assert_eq!(sharing.shares().len(), 8);
        for (i, share) in sharing.shares().iter().enumerate() {
            assert_eq!(share.x.to_u64(), Some(i as u64 + 1));
            assert_eq!(poly.evaluate(&share.x), share.y);
        }
    }

    #[test]
    fn same_seed_reproduces_shares() {
        let secret = BigUint::from(42u32);
        let a = split(&secret, 5, 3, &p(), &mut StdRng::seed_from_u64(99)).unwrap();
        let b = split(&secret, 5, 3, &p(), &mut StdRng::seed_from_u64(99)).unwrap();
        assert_eq!(a.shares(), b.shares());
        assert_eq!(a.polynomial(), b.polynomial());
    }

    #[test_case(1, 5; "threshold below two")]
    #[test_case(6, 5; "threshold above share count")]
    fn rejects_bad_threshold(t: usize, n: usize) {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            split(&BigUint::from(1u32), n, t, &p(), &mut rng),
            Err(SharingError::InvalidParameters(_))
        ));
    }

    #[test]
    fn rejects_secret_outside_field() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            split(&p(), 5, 3, &p(), &mut rng),
            Err(SharingError::InvalidParameters(_))
        ));
    }

    #[test]
    fn rejects_more_shares_than_nonzero_points() {
        let mut rng = StdRng::seed_from_u64(0);
        let small = BigUint::from(5u32);
        assert!(matches!(
            split(&BigUint::from(1u32), 5, 2, &small, &mut rng),
            Err(SharingError::InvalidParameters(_))
        ));
        assert!(split(&BigUint::from(1u32), 4, 2, &small, &mut rng).is_ok());
    }

    #[test]
    fn rejects_composite_modulus() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            split(&BigUint::from(1u32), 5, 3, &BigUint::from(7917u32), &mut rng),
            Err(SharingError::InvalidParameters(_))
        ));
    }
}
