//! Where cuts fall on a double-stranded sequence.
//!
//! Vertical cuts sever strand backbones and are given as boundaries: a cut at
//! `k` separates base `k - 1` from base `k`. Horizontal cuts separate the two
//! strands from each other over an inclusive band of base positions, which is
//! what leaves single-stranded overhangs after a staggered cut.

use crate::error::DigestError;
use std::slice::Iter;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VerticalCutRange {
    p_cut_left: Option<usize>,
    p_cut_right: Option<usize>,
    c_cut_left: Option<usize>,
    c_cut_right: Option<usize>,
    min: usize,
    max: usize,
}

impl VerticalCutRange {
    /// `*_left`/`*_right` say which end of the range a strand's cut sits at.
    /// Any of them may be absent, but not all four.
    pub fn new(
        p_cut_left: Option<usize>,
        p_cut_right: Option<usize>,
        c_cut_left: Option<usize>,
        c_cut_right: Option<usize>,
    ) -> Result<Self, DigestError> {
        let bounds = [p_cut_left, p_cut_right, c_cut_left, c_cut_right];
        let present = bounds.iter().flatten();
        let (min, max) = match (present.clone().min(), present.max()) {
            (Some(min), Some(max)) => (*min, *max),
            _ => {
                return Err(DigestError::MalformedCutSpecification(
                    "vertical cut range without any cut".to_string(),
                ));
            }
        };
        Ok(Self {
            p_cut_left,
            p_cut_right,
            c_cut_left,
            c_cut_right,
            min,
            max,
        })
    }

    pub fn p_cut_left(&self) -> Option<usize> {
        self.p_cut_left
    }

    pub fn p_cut_right(&self) -> Option<usize> {
        self.p_cut_right
    }

    pub fn c_cut_left(&self) -> Option<usize> {
        self.c_cut_left
    }

    pub fn c_cut_right(&self) -> Option<usize> {
        self.c_cut_right
    }

    pub fn min(&self) -> usize {
        self.min
    }

    pub fn max(&self) -> usize {
        self.max
    }

    pub fn include(&self, i: usize) -> bool {
        (self.min..=self.max).contains(&i)
    }

    pub fn primary_cuts(&self) -> impl Iterator<Item = usize> + '_ {
        self.p_cut_left.into_iter().chain(self.p_cut_right)
    }

    pub fn complement_cuts(&self) -> impl Iterator<Item = usize> + '_ {
        self.c_cut_left.into_iter().chain(self.c_cut_right)
    }

    /// Bases whose strands end up in different fragments: the overhang between
    /// a primary and a complement cut at different boundaries.
    pub fn overhang(&self) -> Option<HorizontalCutRange> {
        let has_primary = self.primary_cuts().next().is_some();
        let has_complement = self.complement_cuts().next().is_some();
        if has_primary && has_complement && self.min < self.max {
            Some(HorizontalCutRange {
                left: self.min,
                right: self.max - 1,
            })
        } else {
            None
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HorizontalCutRange {
    left: usize,
    right: usize,
}

impl HorizontalCutRange {
    pub fn new(left: usize, right: usize) -> Result<Self, DigestError> {
        if left > right {
            return Err(DigestError::MalformedCutSpecification(format!(
                "horizontal cut range {left} > {right}"
            )));
        }
        Ok(Self { left, right })
    }

    pub fn single(position: usize) -> Self {
        Self {
            left: position,
            right: position,
        }
    }

    pub fn min(&self) -> usize {
        self.left
    }

    pub fn max(&self) -> usize {
        self.right
    }

    pub fn include(&self, i: usize) -> bool {
        (self.left..=self.right).contains(&i)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CutRange {
    Vertical(VerticalCutRange),
    Horizontal(HorizontalCutRange),
}

impl CutRange {
    pub fn min(&self) -> usize {
        match self {
            CutRange::Vertical(v) => v.min(),
            CutRange::Horizontal(h) => h.min(),
        }
    }

    pub fn max(&self) -> usize {
        match self {
            CutRange::Vertical(v) => v.max(),
            CutRange::Horizontal(h) => h.max(),
        }
    }

    pub fn include(&self, i: usize) -> bool {
        match self {
            CutRange::Vertical(v) => v.include(i),
            CutRange::Horizontal(h) => h.include(i),
        }
    }

    pub fn as_vertical(&self) -> Option<&VerticalCutRange> {
        match self {
            CutRange::Vertical(v) => Some(v),
            CutRange::Horizontal(_) => None,
        }
    }
}

impl From<VerticalCutRange> for CutRange {
    fn from(v: VerticalCutRange) -> Self {
        CutRange::Vertical(v)
    }
}

impl From<HorizontalCutRange> for CutRange {
    fn from(h: HorizontalCutRange) -> Self {
        CutRange::Horizontal(h)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CutRanges(Vec<CutRange>);

impl CutRanges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push<C: Into<CutRange>>(&mut self, cut_range: C) {
        self.0.push(cut_range.into());
    }

    pub fn min(&self) -> Option<usize> {
        self.0.iter().map(|c| c.min()).min()
    }

    pub fn max(&self) -> Option<usize> {
        self.0.iter().map(|c| c.max()).max()
    }

    pub fn include(&self, i: usize) -> bool {
        self.0.iter().any(|c| c.include(i))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, CutRange> {
        self.0.iter()
    }

    pub fn vertical(&self) -> impl Iterator<Item = &VerticalCutRange> {
        self.0.iter().filter_map(|c| c.as_vertical())
    }
}

impl<'a> IntoIterator for &'a CutRanges {
    type Item = &'a CutRange;
    type IntoIter = Iter<'a, CutRange>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<CutRange> for CutRanges {
    fn from_iter<T: IntoIterator<Item = CutRange>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertical_cut_range() {
        let v = VerticalCutRange::new(Some(1), None, None, Some(5)).unwrap();
        assert_eq!(v.min(), 1);
        assert_eq!(v.max(), 5);
        assert!(v.include(1));
        assert!(v.include(5));
        assert!(!v.include(6));
        assert_eq!(v.primary_cuts().collect::<Vec<_>>(), vec![1]);
        assert_eq!(v.complement_cuts().collect::<Vec<_>>(), vec![5]);
        assert_eq!(v.overhang(), Some(HorizontalCutRange::new(1, 4).unwrap()));

        assert!(matches!(
            VerticalCutRange::new(None, None, None, None),
            Err(DigestError::MalformedCutSpecification(_))
        ));
    }

    #[test]
    fn test_vertical_without_overhang() {
        let blunt = VerticalCutRange::new(Some(3), None, None, Some(3)).unwrap();
        assert_eq!(blunt.overhang(), None);
        let nick = VerticalCutRange::new(Some(3), None, None, None).unwrap();
        assert_eq!(nick.min(), 3);
        assert_eq!(nick.max(), 3);
        assert_eq!(nick.overhang(), None);
        // 3' overhang, complement cut left of the primary cut
        let pst_i = VerticalCutRange::new(None, Some(5), Some(1), None).unwrap();
        assert_eq!(pst_i.overhang(), Some(HorizontalCutRange::new(1, 4).unwrap()));
    }

    #[test]
    fn test_horizontal_cut_range() {
        let h = HorizontalCutRange::new(2, 4).unwrap();
        assert!(h.include(2));
        assert!(!h.include(5));
        assert_eq!(HorizontalCutRange::single(3).min(), 3);
        assert!(HorizontalCutRange::new(4, 2).is_err());
    }

    #[test]
    fn test_cut_ranges() {
        let mut ranges = CutRanges::new();
        assert_eq!(ranges.min(), None);
        assert!(!ranges.include(0));
        ranges.push(VerticalCutRange::new(Some(7), None, None, Some(9)).unwrap());
        ranges.push(HorizontalCutRange::new(2, 3).unwrap());
        assert_eq!(ranges.len(), 2);
        assert_eq!(ranges.min(), Some(2));
        assert_eq!(ranges.max(), Some(9));
        assert!(ranges.include(3));
        assert!(!ranges.include(5));
        assert!(ranges.include(8));
        assert_eq!(ranges.vertical().count(), 1);
    }
}
