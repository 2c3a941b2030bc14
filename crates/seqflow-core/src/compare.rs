//! Equality and ordering comparers handed to distinct, grouping, join and sort.

use std::cmp::Ordering;
use std::fmt;

/// Which constructor produced an [`EqualityComparer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EqualityKind {
    /// `PartialEq` of the compared type.
    Natural,
    /// Caller-supplied predicate.
    Custom,
}

/// Equality test over `T`.
pub struct EqualityComparer<'a, T: ?Sized> {
    eq: Box<dyn Fn(&T, &T) -> bool + 'a>,
    kind: EqualityKind,
}

impl<'a, T: ?Sized + 'a> EqualityComparer<'a, T> {
    pub fn natural() -> Self
    where
        T: PartialEq,
    {
        Self {
            eq: Box::new(|a: &T, b: &T| a == b),
            kind: EqualityKind::Natural,
        }
    }

    pub fn by(eq: impl Fn(&T, &T) -> bool + 'a) -> Self {
        Self {
            eq: Box::new(eq),
            kind: EqualityKind::Custom,
        }
    }

    /// Compare through a projection, e.g. case-insensitive on a lowered key.
    pub fn by_key<K, F>(key: F) -> Self
    where
        K: PartialEq,
        F: Fn(&T) -> K + 'a,
    {
        Self::by(move |a, b| key(a) == key(b))
    }

    pub fn equals(&self, a: &T, b: &T) -> bool {
        (self.eq)(a, b)
    }

    pub fn kind(&self) -> EqualityKind {
        self.kind
    }
}

impl<'a, T: ?Sized + PartialEq + 'a> Default for EqualityComparer<'a, T> {
    fn default() -> Self {
        Self::natural()
    }
}

impl<T: ?Sized> fmt::Debug for EqualityComparer<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EqualityComparer")
            .field("kind", &self.kind)
            .finish()
    }
}

/// Three-way comparison over `K`.
pub struct Comparer<'a, K: ?Sized> {
    cmp: Box<dyn Fn(&K, &K) -> Ordering + 'a>,
}

impl<'a, K: ?Sized + 'a> Comparer<'a, K> {
    /// `PartialOrd` of the key type; incomparable pairs (NaN) count as equal.
    pub fn natural() -> Self
    where
        K: PartialOrd,
    {
        Self {
            cmp: Box::new(natural_cmp::<K>),
        }
    }

    pub fn by(cmp: impl Fn(&K, &K) -> Ordering + 'a) -> Self {
        Self { cmp: Box::new(cmp) }
    }

    pub fn reversed(self) -> Self {
        let inner = self.cmp;
        Self {
            cmp: Box::new(move |a: &K, b: &K| inner(b, a)),
        }
    }

    pub fn compare(&self, a: &K, b: &K) -> Ordering {
        (self.cmp)(a, b)
    }
}

impl<'a, K: ?Sized + PartialOrd + 'a> Default for Comparer<'a, K> {
    fn default() -> Self {
        Self::natural()
    }
}

impl<K: ?Sized> fmt::Debug for Comparer<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Comparer")
    }
}

pub fn natural_cmp<K: ?Sized + PartialOrd>(a: &K, b: &K) -> Ordering {
    a.partial_cmp(b).unwrap_or(Ordering::Equal)
}
