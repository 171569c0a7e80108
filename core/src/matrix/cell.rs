use std::fmt;

use super::{Allele, AllelePair};

/// A single cell of a genotype matrix.
///
/// This is implemented for [`Allele`] in haploid data, and for [`AllelePair`] in diploid data.
pub trait Cell: Clone + fmt::Debug + fmt::Display {
    /// Returns the alleles of the cell.
    fn alleles(&self) -> &[Allele];

    /// Returns the number of allelic differences between two cells.
    ///
    /// Missing alleles match anything.
    fn distance(&self, other: &Self) -> u32;

    /// Returns the two-locus haplotypes observed in an isolate with `self` at one locus and `other`
    /// at another.
    ///
    /// Missing data is not handled, and should be excluded by the caller.
    fn haplotypes<'a>(&'a self, other: &'a Self) -> Vec<[&'a Allele; 2]>;

    /// Returns `true` if any allele of the cell is missing.
    fn is_missing(&self) -> bool {
        self.alleles().iter().any(Allele::is_missing)
    }

    /// Returns the rank of the cell, i.e. the sum of the ranks of its alleles.
    ///
    /// `None` if an allele has no rank, or if the sum overflows. See [`Allele::rank`].
    fn rank(&self) -> Option<u64> {
        self.alleles()
            .iter()
            .try_fold(0u64, |sum, allele| sum.checked_add(allele.rank()?))
    }

    /// Returns the number of allelic differences between two cells.
    ///
    /// Unlike [`Cell::distance`], missing alleles never match.
    fn strict_distance(&self, other: &Self) -> u32;
}

impl Cell for Allele {
    fn alleles(&self) -> &[Allele] {
        std::slice::from_ref(self)
    }

    fn distance(&self, other: &Self) -> u32 {
        u32::from(!(self.is_missing() || other.is_missing() || self == other))
    }

    fn haplotypes<'a>(&'a self, other: &'a Self) -> Vec<[&'a Allele; 2]> {
        vec![[self, other]]
    }

    fn strict_distance(&self, other: &Self) -> u32 {
        u32::from(self.is_missing() || other.is_missing() || self != other)
    }
}

impl Cell for AllelePair {
    fn alleles(&self) -> &[Allele] {
        self.as_array()
    }

    fn distance(&self, other: &Self) -> u32 {
        let [a, b] = self.as_array();
        let [x, y] = other.as_array();

        let matches = |p: &Allele, q: &Allele| p.distance(q) == 0;

        if (matches(a, x) && matches(b, y)) || (matches(a, y) && matches(b, x)) {
            0
        } else if !(self.is_missing() || other.is_missing())
            && a != x
            && a != y
            && b != x
            && b != y
        {
            2
        } else {
            1
        }
    }

    fn haplotypes<'a>(&'a self, other: &'a Self) -> Vec<[&'a Allele; 2]> {
        if self.is_homozygous() {
            vec![
                [self.first(), other.first()],
                [self.first(), other.second()],
            ]
        } else if other.is_homozygous() {
            vec![
                [self.first(), other.first()],
                [self.second(), other.first()],
            ]
        } else {
            Vec::new()
        }
    }

    fn strict_distance(&self, other: &Self) -> u32 {
        let [a, b] = self.as_array();
        let [x, y] = other.as_array();

        let matches = |p: &Allele, q: &Allele| p.strict_distance(q) == 0;

        if matches(a, x) {
            u32::from(!matches(b, y))
        } else if matches(a, y) {
            u32::from(!matches(b, x))
        } else if matches(b, x) || matches(b, y) {
            1
        } else {
            2
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allele(s: &str) -> Allele {
        s.parse().unwrap()
    }

    fn pair(s: &str) -> AllelePair {
        let (a, b) = s.split_once('/').unwrap();
        AllelePair::new(allele(a), allele(b))
    }

    #[test]
    fn test_haploid_distance() {
        let alleles = ["a", "b", "?", "-"].map(allele);

        for p in alleles.iter() {
            for q in alleles.iter() {
                assert_eq!(p.distance(q), q.distance(p));
                assert_eq!(p.strict_distance(q), q.strict_distance(p));
            }
        }

        assert_eq!(allele("a").distance(&allele("a")), 0);
        assert_eq!(allele("a").distance(&allele("b")), 1);
        assert_eq!(allele("?").distance(&allele("b")), 0);
        assert_eq!(allele("-").distance(&allele("?")), 0);
    }

    #[test]
    fn test_haploid_strict_distance() {
        assert_eq!(allele("a").strict_distance(&allele("a")), 0);
        assert_eq!(allele("a").strict_distance(&allele("b")), 1);
        assert_eq!(allele("?").strict_distance(&allele("b")), 1);
        assert_eq!(allele("?").strict_distance(&allele("?")), 1);
    }

    #[test]
    fn test_diploid_distance() {
        assert_eq!(pair("a/b").distance(&pair("a/b")), 0);
        assert_eq!(pair("a/b").distance(&pair("b/a")), 0);
        assert_eq!(pair("a/b").distance(&pair("a/c")), 1);
        assert_eq!(pair("a/b").distance(&pair("c/d")), 2);
        assert_eq!(pair("a/a").distance(&pair("b/b")), 2);
        assert_eq!(pair("a/?").distance(&pair("b/a")), 0);
        assert_eq!(pair("?/?").distance(&pair("c/d")), 0);
        assert_eq!(pair("a/?").distance(&pair("c/d")), 1);
    }

    #[test]
    fn test_diploid_distance_order_invariant() {
        let pairs = ["a/b", "b/a", "a/a", "c/a", "?/b", "c/d", "-/-"].map(pair);

        for p in pairs.iter() {
            for q in pairs.iter() {
                let [a, b] = p.as_array().clone();
                let [c, d] = q.as_array().clone();
                let p_rev = AllelePair::new(b, a);
                let q_rev = AllelePair::new(d, c);

                assert_eq!(p.distance(q), p_rev.distance(q));
                assert_eq!(p.distance(q), p.distance(&q_rev));
                assert_eq!(p.distance(q), q.distance(p));
                assert_eq!(p.strict_distance(q), p_rev.strict_distance(q));
                assert_eq!(p.strict_distance(q), p.strict_distance(&q_rev));
            }
        }
    }

    #[test]
    fn test_diploid_strict_distance() {
        assert_eq!(pair("a/b").strict_distance(&pair("b/a")), 0);
        assert_eq!(pair("a/?").strict_distance(&pair("a/b")), 1);
        assert_eq!(pair("?/?").strict_distance(&pair("?/?")), 2);
        assert_eq!(pair("a/b").strict_distance(&pair("c/d")), 2);
    }

    #[test]
    fn test_rank() {
        assert_eq!(pair("12/3").rank(), Some(15));
        assert_eq!(pair("12/?").rank(), Some(12));
        assert_eq!(pair("12/x").rank(), None);
        assert_eq!(allele("7").rank(), Some(7));
    }

    #[test]
    fn test_rank_overflow() {
        assert_eq!(allele("18446744073709551615").rank(), Some(u64::MAX));
        assert_eq!(pair("18446744073709551615/1").rank(), None);
        assert_eq!(pair("18446744073709551615/?").rank(), Some(u64::MAX));
    }

    #[test]
    fn test_diploid_haplotypes() {
        let (a, b) = (pair("a/a"), pair("x/y"));
        assert_eq!(
            a.haplotypes(&b),
            vec![[&allele("a"), &allele("x")], [&allele("a"), &allele("y")]]
        );

        let (a, b) = (pair("a/b"), pair("x/x"));
        assert_eq!(
            a.haplotypes(&b),
            vec![[&allele("a"), &allele("x")], [&allele("b"), &allele("x")]]
        );

        assert!(pair("a/b").haplotypes(&pair("x/y")).is_empty());
    }
}
