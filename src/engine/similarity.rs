//! Tanimoto similarity between binary fingerprints.

use super::error::Error;
use crate::model::fingerprint::Fingerprint;

/// Computes the Tanimoto (Jaccard) coefficient of two fingerprints.
///
/// With `a` bits set in both, `b` set only in `fp_a` and `c` set only in
/// `fp_b`, the result is `a / (a + b + c)`. Two all-zero fingerprints share
/// no features and score `0.0`.
///
/// # Errors
///
/// Returns [`Error::LengthMismatch`] if the bit lengths differ.
pub fn similarity(fp_a: &Fingerprint, fp_b: &Fingerprint) -> Result<f64, Error> {
    if fp_a.len() != fp_b.len() {
        return Err(Error::length_mismatch(fp_a.len(), fp_b.len()));
    }

    let (both, either) = fp_a
        .words()
        .iter()
        .zip(fp_b.words())
        .fold((0u32, 0u32), |(both, either), (wa, wb)| {
            (both + (wa & wb).count_ones(), either + (wa | wb).count_ones())
        });

    if either == 0 {
        return Ok(0.0);
    }
    Ok(f64::from(both) / f64::from(either))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fp(bits: &str) -> Fingerprint {
        bits.parse().unwrap()
    }

    #[test]
    fn worked_example_one_third() {
        let s = similarity(&fp("1100"), &fp("1010")).unwrap();
        assert!((s - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn identical_nonzero_is_one() {
        let f = fp("0110100111");
        assert_eq!(similarity(&f, &f).unwrap(), 1.0);
    }

    #[test]
    fn symmetric() {
        let a = fp("1011001110001");
        let b = fp("0011101010011");
        assert_eq!(similarity(&a, &b).unwrap(), similarity(&b, &a).unwrap());
    }

    #[test]
    fn disjoint_is_zero() {
        assert_eq!(similarity(&fp("1100"), &fp("0011")).unwrap(), 0.0);
    }

    #[test]
    fn both_zero_is_zero() {
        assert_eq!(similarity(&fp("0000"), &fp("0000")).unwrap(), 0.0);
    }

    #[test]
    fn length_mismatch_fails() {
        let err = similarity(&fp("110"), &fp("1100")).unwrap_err();
        assert!(matches!(err, Error::LengthMismatch { left: 3, right: 4 }));
    }

    #[test]
    fn long_fingerprints_use_all_words() {
        let mut a = Fingerprint::zeros(2048);
        let mut b = Fingerprint::zeros(2048);
        for i in (0..2048).step_by(4) {
            a.set(i);
        }
        for i in (0..2048).step_by(8) {
            b.set(i);
        }
        // b is a subset of a: |a∩b| = 256, |a∪b| = 512
        assert!((similarity(&a, &b).unwrap() - 0.5).abs() < 1e-12);
    }
}
