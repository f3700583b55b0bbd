//! Prime field arithmetic GF(p).
//!
//! Every [`FieldElement`] carries the [`FieldContext`] it was produced by, so
//! values from different moduli can never be combined silently: doing so is a
//! programming error and panics.

use std::fmt;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};
use std::sync::Arc;

use num_bigint::{BigUint, RandBigInt};
use num_traits::{One, ToPrimitive, Zero};
use rand::Rng;

use crate::SharingError;

/// Miller-Rabin witnesses. Deterministic for every modulus below 3.3 * 10^24.
const WITNESSES: [u32; 13] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41];

/// The field of integers modulo a prime `p`.
///
/// Cloning is cheap: the modulus is shared behind an `Arc`, which also makes
/// contexts `Send + Sync` for independent computations on other threads.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldContext {
    modulus: Arc<BigUint>,
}

/// An element of GF(p), always kept in the canonical range `0 <= value < p`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldElement {
    value: BigUint,
    field: FieldContext,
}

impl FieldContext {
    /// Builds the field GF(`modulus`), rejecting anything that is not prime.
    pub fn new(modulus: impl Into<BigUint>) -> Result<Self, SharingError> {
        let modulus = modulus.into();
        if !is_probable_prime(&modulus) {
            return Err(SharingError::InvalidParameters(format!(
                "modulus {} is not prime",
                modulus
            )));
        }
        Ok(Self {
            modulus: Arc::new(modulus),
        })
    }

    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    /// Maps an integer into the field by reducing it modulo `p`.
    pub fn element(&self, value: impl Into<BigUint>) -> FieldElement {
        self.reduce(value.into())
    }

    pub fn zero(&self) -> FieldElement {
        self.element(0u32)
    }

    pub fn one(&self) -> FieldElement {
        self.element(1u32)
    }

    /// Draws an element uniformly from `[0, p)`.
    pub fn random_element<R: Rng + ?Sized>(&self, rng: &mut R) -> FieldElement {
        FieldElement {
            value: rng.gen_biguint_below(&self.modulus),
            field: self.clone(),
        }
    }

    /// The integers of `[start, end)` mapped into the field, in order.
    pub fn range(&self, start: u64, end: u64) -> Vec<FieldElement> {
        (start..end).map(|i| self.element(i)).collect()
    }

    pub fn contains(&self, element: &FieldElement) -> bool {
        Arc::ptr_eq(&self.modulus, &element.field.modulus) || *self == element.field
    }

    pub fn add(&self, a: &FieldElement, b: &FieldElement) -> FieldElement {
        self.assert_contains(a);
        self.assert_contains(b);
        self.reduce(&a.value + &b.value)
    }

    pub fn sub(&self, a: &FieldElement, b: &FieldElement) -> FieldElement {
        self.assert_contains(a);
        self.assert_contains(b);
        if a.value >= b.value {
            self.reduce(&a.value - &b.value)
        } else {
            self.reduce(&*self.modulus - &b.value + &a.value)
        }
    }

    pub fn mul(&self, a: &FieldElement, b: &FieldElement) -> FieldElement {
        self.assert_contains(a);
        self.assert_contains(b);
        self.reduce(&a.value * &b.value)
    }

    pub fn neg(&self, a: &FieldElement) -> FieldElement {
        self.assert_contains(a);
        if a.value.is_zero() {
            self.zero()
        } else {
            self.reduce(&*self.modulus - &a.value)
        }
    }

    /// Multiplicative inverse via Fermat's little theorem: `a^(p-2)`.
    pub fn inv(&self, a: &FieldElement) -> Result<FieldElement, SharingError> {
        self.assert_contains(a);
        if a.value.is_zero() {
            return Err(SharingError::DivisionByZero((*self.modulus).clone()));
        }
        let exponent = &*self.modulus - 2u32;
        Ok(self.reduce(a.value.modpow(&exponent, &self.modulus)))
    }

    pub fn div(&self, a: &FieldElement, b: &FieldElement) -> Result<FieldElement, SharingError> {
        Ok(self.mul(a, &self.inv(b)?))
    }

    fn reduce(&self, value: BigUint) -> FieldElement {
        FieldElement {
            value: value % &*self.modulus,
            field: self.clone(),
        }
    }

    fn assert_contains(&self, element: &FieldElement) {
        assert!(
            self.contains(element),
            "element of GF({}) used in GF({})",
            element.field.modulus,
            self.modulus
        );
    }
}

impl FieldElement {
    pub fn field(&self) -> &FieldContext {
        &self.field
    }

    /// The canonical integer representative in `[0, p)`.
    pub fn value(&self) -> &BigUint {
        &self.value
    }

    pub fn to_biguint(&self) -> BigUint {
        self.value.clone()
    }

    /// `None` if the representative does not fit in a `u64`.
    pub fn to_u64(&self) -> Option<u64> {
        self.value.to_u64()
    }

    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    pub fn is_one(&self) -> bool {
        self.value.is_one()
    }

    pub fn pow(&self, exponent: u64) -> FieldElement {
        self.field
            .reduce(self.value.modpow(&BigUint::from(exponent), &self.field.modulus))
    }

    pub fn inv(&self) -> Result<FieldElement, SharingError> {
        self.field.inv(self)
    }

    pub fn checked_div(&self, rhs: &FieldElement) -> Result<FieldElement, SharingError> {
        self.field.div(self, rhs)
    }
}

impl fmt::Display for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

macro_rules! forward_binop {
    ($trait:ident, $method:ident, $assign_trait:ident, $assign_method:ident) => {
        impl<'a, 'b> $trait<&'b FieldElement> for &'a FieldElement {
            type Output = FieldElement;

            fn $method(self, rhs: &'b FieldElement) -> FieldElement {
                self.field.$method(self, rhs)
            }
        }

        impl<'b> $trait<&'b FieldElement> for FieldElement {
            type Output = FieldElement;

            fn $method(self, rhs: &'b FieldElement) -> FieldElement {
                (&self).$method(rhs)
            }
        }

        impl $trait for FieldElement {
            type Output = FieldElement;

            fn $method(self, rhs: FieldElement) -> FieldElement {
                (&self).$method(&rhs)
            }
        }

        impl<'b> $assign_trait<&'b FieldElement> for FieldElement {
            fn $assign_method(&mut self, rhs: &'b FieldElement) {
                *self = (&*self).$method(rhs);
            }
        }
    };
}

forward_binop!(Add, add, AddAssign, add_assign);
forward_binop!(Sub, sub, SubAssign, sub_assign);
forward_binop!(Mul, mul, MulAssign, mul_assign);

impl Neg for &FieldElement {
    type Output = FieldElement;

    fn neg(self) -> FieldElement {
        self.field.neg(self)
    }
}

impl Neg for FieldElement {
    type Output = FieldElement;

    fn neg(self) -> FieldElement {
        -&self
    }
}

fn is_probable_prime(n: &BigUint) -> bool {
    let two = BigUint::from(2u32);
    if *n < two {
        return false;
    }
    for &w in WITNESSES.iter() {
        let w = BigUint::from(w);
        if *n == w {
            return true;
        }
        if (n % &w).is_zero() {
            return false;
        }
    }

    let n_minus_one = n - 1u32;
    let s = n_minus_one.trailing_zeros().unwrap_or(0);
    let d = &n_minus_one >> s;

    'witness: for &w in WITNESSES.iter() {
        let mut x = BigUint::from(w).modpow(&d, n);
        if x.is_one() || x == n_minus_one {
            continue;
        }
        for _ in 1..s {
            x = x.modpow(&two, n);
            if x == n_minus_one {
                continue 'witness;
            }
        }
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use test_case::test_case;

    fn gf(p: u64) -> FieldContext {
        FieldContext::new(p).unwrap()
    }

    #[test_case(2; "smallest prime")]
    #[test_case(257; "byte field")]
    #[test_case(7919; "thousandth prime")]
    #[test_case(2_147_483_647; "mersenne 31")]
    #[test_case(18_446_744_073_709_551_557; "largest u64 prime")]
    fn accepts_primes(p: u64) {
        assert!(FieldContext::new(p).is_ok());
    }

    #[test_case(0)]
    #[test_case(1)]
    #[test_case(4)]
    #[test_case(561; "carmichael")]
    #[test_case(7917)]
    #[test_case(3_215_031_751; "strong pseudoprime to bases 2 3 5 7")]
    fn rejects_non_primes(p: u64) {
        assert!(matches!(
            FieldContext::new(p),
            Err(SharingError::InvalidParameters(_))
        ));
    }

    #[test]
    fn accepts_large_prime() {
        // 2^127 - 1
        let p = (BigUint::one() << 127u32) - 1u32;
        let field = FieldContext::new(p.clone()).unwrap();
        assert_eq!(field.modulus(), &p);
    }

    #[test]
    fn arithmetic_wraps_modulo_p() {
        let f = gf(13);
        let a = f.element(9u32);
        let b = f.element(7u32);

        assert_eq!((&a + &b).to_u64(), Some(3));
        assert_eq!((&b - &a).to_u64(), Some(11));
        assert_eq!((&a * &b).to_u64(), Some(11));
        assert_eq!((-&a).to_u64(), Some(4));
        assert_eq!((-f.zero()).to_u64(), Some(0));
        assert_eq!(f.element(30u32).to_u64(), Some(4));
    }

    #[test]
    fn every_nonzero_element_has_an_inverse() {
        let f = gf(101);
        for a in f.range(1, 101) {
            let inv = a.inv().unwrap();
            assert!((&a * &inv).is_one(), "{} * {} != 1", a, inv);
        }
    }

    #[test]
    fn division_by_zero_is_reported() {
        let f = gf(7919);
        let err = f.div(&f.one(), &f.zero()).unwrap_err();
        assert_eq!(err, SharingError::DivisionByZero(BigUint::from(7919u32)));
    }

    #[test]
    fn division_inverts_multiplication() {
        let f = gf(7919);
        let a = f.element(1234u32);
        let b = f.element(4321u32);
        let q = a.checked_div(&b).unwrap();
        assert_eq!(&q * &b, a);
    }

    #[test]
    fn range_reduces_into_field() {
        let f = gf(5);
        let values: Vec<u64> = f.range(3, 8).iter().filter_map(|e| e.to_u64()).collect();
        assert_eq!(values, vec![3, 4, 0, 1, 2]);
        assert!(f.range(4, 4).is_empty());
    }

    #[test]
    fn random_elements_stay_below_modulus() {
        let f = gf(17);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            assert!(f.random_element(&mut rng).value() < f.modulus());
        }
    }

    #[test]
    fn pow_matches_repeated_multiplication() {
        let f = gf(7919);
        let x = f.element(17u32);
        let mut acc = f.one();
        for e in 0..10 {
            assert_eq!(x.pow(e), acc);
            acc *= &x;
        }
    }

    #[test]
    fn contexts_cross_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FieldContext>();
        assert_send_sync::<FieldElement>();

        let f = gf(7919);
        let handles: Vec<_> = (1..4u32)
            .map(|i| {
                let f = f.clone();
                std::thread::spawn(move || f.element(i).inv().map(|v| v.to_biguint()))
            })
            .collect();
        for (i, h) in (1..4u32).zip(handles) {
            let inv = f.element(h.join().unwrap().unwrap());
            assert!((&inv * &f.element(i)).is_one());
        }
    }

    #[test]
    #[should_panic(expected = "used in GF")]
    fn mixing_fields_panics() {
        let a = gf(7).element(3u32);
        let b = gf(11).element(3u32);
        let _ = &a + &b;
    }
}
