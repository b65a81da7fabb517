//! Shared test fixtures.

use core::fmt;

use once_cell::sync::Lazy;

use crate::matrix::Matrix;
use crate::provider::{self, Division, Operators};

/// The prime field Z/7, stored as its canonical residue `0..7`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Gf7(pub i32);

impl fmt::Display for Gf7 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn reduce(v: i32) -> Gf7 {
    Gf7(v.rem_euclid(7))
}

fn operators() -> Operators<Gf7> {
    Operators {
        add: |a, b| reduce(a.0 + b.0),
        sub: |a, b| reduce(a.0 - b.0),
        mul: |a, b| reduce(a.0 * b.0),
        // b^5 is the inverse of b (Fermat).
        div: |a, b| reduce(a.0 * b.0.pow(5)),
        neg: |a| reduce(-a.0),
        mul_add: |a, b, c| reduce(a.0 * b.0 + c.0),
        eq: |a, b| a == b,
        ne: |a, b| a != b,
        is_even: |a| a.0 % 2 == 0,
        partial_cmp: |a, b| a.0.partial_cmp(&b.0),
        abs: |a| a,
        from_i32: reduce,
        zero: Gf7(0),
        one: Gf7(1),
        neg_one: Gf7(6),
        division: Division::Field,
        epsilon: Gf7(0),
        sin: None,
        cos: None,
    }
}

static BOUND: Lazy<bool> = Lazy::new(|| provider::register(operators()).is_ok());

/// Register [`Gf7`] once for the whole test binary.
pub(crate) fn bind_gf7() {
    assert!(*BOUND, "Gf7 binding was refused");
}

/// A matrix over Z/7 from integer rows.
pub(crate) fn gf7_matrix<const R: usize, const C: usize>(rows: [[i32; C]; R]) -> Matrix<Gf7> {
    bind_gf7();
    Matrix::from_array(rows.map(|row| row.map(reduce))).unwrap()
}
