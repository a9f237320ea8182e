// Copyright (c) Sienna Satterwhite, CesiumDB Contributors
// SPDX-License-Identifier: GPL-3.0-only WITH Classpath-exception-2.0

/// Anything that can be ordered in the list. The only thing the list ever asks
/// of a payload is its position on the real line.
pub trait ExtendedKey {
    fn extended_key(&self) -> f64;
}

macro_rules! impl_extended_key {
    ($($t:ty),*) => {
        $(
            impl ExtendedKey for $t {
                #[inline]
                fn extended_key(&self) -> f64 {
                    *self as f64
                }
            }
        )*
    };
}

impl_extended_key!(f64, f32, i8, i16, i32, i64, u8, u16, u32, u64, isize, usize);

/// Key-value pairs are ordered by their key.
impl<K: ExtendedKey, V> ExtendedKey for (K, V) {
    #[inline]
    fn extended_key(&self) -> f64 {
        self.0.extended_key()
    }
}

impl<T: ExtendedKey + ?Sized> ExtendedKey for &T {
    #[inline]
    fn extended_key(&self) -> f64 {
        (**self).extended_key()
    }
}

impl<T: ExtendedKey + ?Sized> ExtendedKey for Box<T> {
    #[inline]
    fn extended_key(&self) -> f64 {
        (**self).extended_key()
    }
}

/// Epsilon tolerant comparison. Two keys are equal when neither is more than
/// `eps` below the other, so equality is a band of width `2 * eps`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    eps: f64,
}

impl Tolerance {
    pub fn new(eps: f64) -> Self {
        Tolerance { eps }
    }

    pub fn eps(&self) -> f64 {
        self.eps
    }

    #[inline]
    pub fn less(&self, a: f64, b: f64) -> bool {
        a < b - self.eps
    }

    #[inline]
    pub fn equal(&self, a: f64, b: f64) -> bool {
        !self.less(a, b) && !self.less(b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_tolerance() {
        let cmp = Tolerance::new(0.0);
        assert!(cmp.less(1.0, 2.0));
        assert!(!cmp.less(2.0, 2.0));
        assert!(cmp.equal(2.0, 2.0));
        assert!(!cmp.equal(2.0, 2.0 + f64::EPSILON * 2.0));
    }

    #[test]
    fn test_band() {
        let cmp = Tolerance::new(0.5);
        assert!(cmp.equal(1.0, 1.4));
        assert!(cmp.equal(1.4, 1.0));
        assert!(cmp.equal(1.0, 1.5));
        assert!(!cmp.equal(1.0, 1.6));
        assert!(cmp.less(1.0, 1.6));
        assert!(!cmp.less(1.6, 1.0));
    }

    #[test]
    fn test_extended_key_impls() {
        assert_eq!(3u32.extended_key(), 3.0);
        assert_eq!((-7i64).extended_key(), -7.0);
        assert_eq!(2.5f32.extended_key(), 2.5);
        assert_eq!((4.0f64, "four").extended_key(), 4.0);
        assert_eq!((&9u8).extended_key(), 9.0);
        assert_eq!(Box::new(1.25f64).extended_key(), 1.25);
    }
}
