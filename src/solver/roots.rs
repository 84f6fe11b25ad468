//! Exact real roots of rational polynomials.
//!
//! Roots are found by pulling out `x = 0`, then testing every candidate of
//! the rational root theorem and deflating each hit. What remains is solved
//! in closed form when it is linear or quadratic; a quadratic with an
//! irrational discriminant yields surd roots. Higher-degree residues without
//! rational roots are reported as unresolved.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};
use tracing::{debug, warn};

use super::polynomial::Polynomial;
use crate::domain::Solution;

/// Upper bound on rational root candidates tested for one polynomial.
const MAX_CANDIDATES: usize = 1 << 16;

/// Real roots found for a polynomial.
#[derive(Debug, Clone, Default)]
pub struct RootSet {
    /// Distinct roots in ascending order.
    pub roots: Vec<Solution>,
    /// Factor left over without a closed-form solution, if any.
    pub unresolved: Option<Polynomial>,
}

/// Finds the distinct real roots of a non-constant polynomial.
///
/// `search_limit` caps the magnitude of the constant and leading integer
/// coefficients whose divisors are enumerated for the rational root test,
/// and bounds the trial division used to simplify square roots.
pub fn find_roots(poly: &Polynomial, search_limit: u64) -> RootSet {
    let mut roots: Vec<Solution> = Vec::new();
    let mut rest = poly.clone();

    if rest.coefficients().first().is_some_and(|c| c.is_zero()) {
        roots.push(Solution::Rational(BigRational::zero()));
        while rest.coefficients().first().is_some_and(|c| c.is_zero()) {
            rest = rest.shift_down();
        }
    }

    if rest.degree().is_some_and(|d| d >= 3) {
        for candidate in rational_candidates(&rest, search_limit) {
            if rest.degree().is_none_or(|d| d == 0) {
                break;
            }
            let mut hit = false;
            while rest.degree().is_some_and(|d| d >= 1) && rest.evaluate(&candidate).is_zero() {
                rest = rest.deflate(&candidate);
                hit = true;
            }
            if hit {
                debug!("Rational root {} found, {} remaining", candidate, rest);
                roots.push(Solution::Rational(candidate));
            }
        }
    }

    let mut unresolved = None;
    match rest.degree() {
        Some(1) => roots.push(Solution::Rational(linear_root(&rest))),
        Some(2) => roots.extend(quadratic_roots(&rest, search_limit)),
        Some(d) if d >= 3 => {
            warn!("No closed form for residual factor of degree {}: {}", d, rest);
            unresolved = Some(rest);
        }
        _ => {}
    }

    roots.sort_by(|a, b| a.cmp_value(b));
    roots.dedup();
    RootSet { roots, unresolved }
}

fn linear_root(poly: &Polynomial) -> BigRational {
    let c = poly.coefficients();
    -(&c[0] / &c[1])
}

fn quadratic_roots(poly: &Polynomial, search_limit: u64) -> Vec<Solution> {
    let c = poly.coefficients();
    let (a, b, cc) = (&c[2], &c[1], &c[0]);
    let four = BigRational::from_integer(BigInt::from(4));
    let two_a = a * BigRational::from_integer(BigInt::from(2));
    let discriminant = b * b - four * a * cc;

    if discriminant.is_negative() {
        return Vec::new();
    }
    let vertex = -(b / &two_a);
    if discriminant.is_zero() {
        return vec![Solution::Rational(vertex)];
    }

    // sqrt(n/d) = sqrt(n*d)/d
    let radicand_int = discriminant.numer() * discriminant.denom();
    let (outside, radicand) = split_square(&radicand_int, search_limit);
    let half_width = BigRational::new(outside, discriminant.denom().clone()) / &two_a;

    if radicand.is_one() {
        return vec![
            Solution::Rational(&vertex - &half_width),
            Solution::Rational(&vertex + &half_width),
        ];
    }
    let half_width = half_width.abs();
    vec![
        Solution::Surd {
            rational: vertex.clone(),
            coefficient: -half_width.clone(),
            radicand: radicand.clone(),
        },
        Solution::Surd {
            rational: vertex,
            coefficient: half_width,
            radicand,
        },
    ]
}

/// Writes `n = outside^2 * radicand`, pulling out square factors found by
/// trial division up to `sqrt(search_limit)`.
pub fn split_square(n: &BigInt, search_limit: u64) -> (BigInt, BigInt) {
    let mut remaining = n.abs();
    let mut outside = BigInt::one();
    let mut radicand = BigInt::one();
    let bound = (search_limit as f64).sqrt() as u64;

    let mut p: u64 = 2;
    while p <= bound {
        let prime = BigInt::from(p);
        if &prime * &prime > remaining {
            break;
        }
        let mut exponent = 0u32;
        while (&remaining % &prime).is_zero() {
            remaining /= &prime;
            exponent += 1;
        }
        if exponent > 0 {
            outside *= num_traits::pow(prime.clone(), (exponent / 2) as usize);
            if exponent % 2 == 1 {
                radicand *= &prime;
            }
        }
        p += if p == 2 { 1 } else { 2 };
    }
    if let Some(root) = exact_sqrt(&remaining) {
        outside *= root;
    } else {
        radicand *= remaining;
    }
    (outside, radicand)
}

fn exact_sqrt(n: &BigInt) -> Option<BigInt> {
    let root = n.sqrt();
    (&root * &root == *n).then_some(root)
}

/// Candidates `±p/q` with `p | a0` and `q | an` for the primitive integer form.
fn rational_candidates(poly: &Polynomial, search_limit: u64) -> Vec<BigRational> {
    let ints = poly.primitive_integer_coefficients();
    let (Some(constant), Some(leading)) = (ints.first(), ints.last()) else {
        return Vec::new();
    };
    let (Some(constant), Some(leading)) = (constant.abs().to_u64(), leading.abs().to_u64()) else {
        warn!("Coefficients too large for the rational root search");
        return Vec::new();
    };
    if constant > search_limit || leading > search_limit {
        warn!(
            "Rational root search skipped: coefficients {} and {} exceed limit {}",
            constant, leading, search_limit
        );
        return Vec::new();
    }

    let numerators = divisors(constant);
    let denominators = divisors(leading);
    if numerators.len() * denominators.len() * 2 > MAX_CANDIDATES {
        warn!(
            "Rational root search skipped: {} candidates",
            numerators.len() * denominators.len() * 2
        );
        return Vec::new();
    }

    let mut candidates: Vec<BigRational> = numerators
        .iter()
        .flat_map(|&p| {
            denominators.iter().flat_map(move |&q| {
                let r = BigRational::new(BigInt::from(p), BigInt::from(q));
                [r.clone(), -r]
            })
        })
        .collect();
    candidates.sort();
    candidates.dedup();
    candidates
}

fn divisors(n: u64) -> Vec<u64> {
    let mut small = Vec::new();
    let mut large = Vec::new();
    let mut d = 1u64;
    while d * d <= n {
        if n % d == 0 {
            small.push(d);
            if d * d != n {
                large.push(n / d);
            }
        }
        d += 1;
    }
    small.extend(large.into_iter().rev());
    small
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::parser::parse;

    fn poly(text: &str) -> Polynomial {
        Polynomial::from_expr(&parse(text).expect("parsed"), 16).expect("lowered")
    }

    fn int(n: i64) -> Solution {
        Solution::Rational(BigRational::from_integer(BigInt::from(n)))
    }

    const LIMIT: u64 = 1_000_000_000_000;

    #[test]
    fn test_quadratic_with_integer_roots() {
        let set = find_roots(&poly("2*x^2-8"), LIMIT);
        assert_eq!(set.roots, vec![int(-2), int(2)]);
        assert!(set.unresolved.is_none());
    }

    #[test]
    fn test_double_root_reported_once() {
        let set = find_roots(&poly("x^2-6x+9"), LIMIT);
        assert_eq!(set.roots, vec![int(3)]);
    }

    #[test]
    fn test_zero_root_and_cubic() {
        // x^4 - 7x^2 + 6x = x (x - 1)(x - 2)(x + 3)
        let set = find_roots(&poly("x^4-7x^2+6x"), LIMIT);
        assert_eq!(set.roots, vec![int(-3), int(0), int(1), int(2)]);
    }

    #[test]
    fn test_surd_roots() {
        let set = find_roots(&poly("x^2-2"), LIMIT);
        assert_eq!(set.roots.len(), 2);
        assert!((set.roots[0].to_f64() + 2f64.sqrt()).abs() < 1e-12);
        assert!((set.roots[1].to_f64() - 2f64.sqrt()).abs() < 1e-12);
        assert!(matches!(&set.roots[1], Solution::Surd { radicand, .. } if *radicand == BigInt::from(2)));
    }

    #[test]
    fn test_surd_simplifies_square_factor() {
        // roots 1 ± sqrt(12)/2 = 1 ± sqrt(3)
        let set = find_roots(&poly("x^2-2x-2"), LIMIT);
        assert_eq!(
            set.roots[1],
            Solution::Surd {
                rational: BigRational::one(),
                coefficient: BigRational::one(),
                radicand: BigInt::from(3),
            }
        );
    }

    #[test]
    fn test_negative_discriminant_has_no_real_roots() {
        assert!(find_roots(&poly("x^2+1"), LIMIT).roots.is_empty());
    }

    #[test]
    fn test_irreducible_cubic_is_unresolved() {
        let set = find_roots(&poly("x^3-2"), LIMIT);
        assert!(set.roots.is_empty());
        assert_eq!(set.unresolved.and_then(|p| p.degree()), Some(3));
    }

    #[test]
    fn test_rational_root_from_fractional_coefficients() {
        // 6x^3 - 7x^2 + 1 = (x - 1)(2x - 1)(3x + 1)
        let set = find_roots(&poly("6x^3-7x^2+1"), LIMIT);
        let values: Vec<f64> = set.roots.iter().map(Solution::to_f64).collect();
        assert_eq!(set.roots.len(), 3);
        assert!((values[0] + 1.0 / 3.0).abs() < 1e-12);
        assert!((values[1] - 0.5).abs() < 1e-12);
        assert!((values[2] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_split_square() {
        assert_eq!(
            split_square(&BigInt::from(72), LIMIT),
            (BigInt::from(6), BigInt::from(2))
        );
        assert_eq!(
            split_square(&BigInt::from(49), LIMIT),
            (BigInt::from(7), BigInt::from(1))
        );
    }

    #[test]
    fn test_divisors() {
        assert_eq!(divisors(12), vec![1, 2, 3, 4, 6, 12]);
        assert_eq!(divisors(1), vec![1]);
    }
}
