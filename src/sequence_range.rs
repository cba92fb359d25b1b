//! A double-stranded span that collects cuts and rebuilds the fragments they leave.

use crate::{
    cut_range::{CutRange, CutRanges, HorizontalCutRange},
    error::DigestError,
};
use serde::{Deserialize, Serialize};
use std::{
    cell::OnceCell,
    collections::{BTreeSet, HashSet, VecDeque},
};

/// The positions of one molecule left after cutting, per strand.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fragment {
    primary_bin: BTreeSet<usize>,
    complement_bin: BTreeSet<usize>,
}

/// A fragment rendered as two aligned strings, with a blank wherever one
/// strand has no base (sticky ends).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DisplayFragment {
    pub primary: String,
    pub complement: String,
}

impl Fragment {
    pub fn new(primary_bin: BTreeSet<usize>, complement_bin: BTreeSet<usize>) -> Self {
        Self {
            primary_bin,
            complement_bin,
        }
    }

    pub fn primary_bin(&self) -> &BTreeSet<usize> {
        &self.primary_bin
    }

    pub fn complement_bin(&self) -> &BTreeSet<usize> {
        &self.complement_bin
    }

    /// Leftmost position on either strand.
    pub fn min(&self) -> Option<usize> {
        match (self.primary_bin.first(), self.complement_bin.first()) {
            (Some(p), Some(c)) => Some(*p.min(c)),
            (p, c) => p.or(c).copied(),
        }
    }

    pub fn for_display(&self, p_str: &[u8], c_str: &[u8]) -> DisplayFragment {
        let both_bins: BTreeSet<usize> = self
            .primary_bin
            .union(&self.complement_bin)
            .copied()
            .collect();
        let render = |bin: &BTreeSet<usize>, s: &[u8]| -> String {
            both_bins
                .iter()
                .map(|i| match (bin.contains(i), s.get(*i)) {
                    (true, Some(base)) => *base as char,
                    _ => ' ',
                })
                .collect()
        };
        DisplayFragment {
            primary: render(&self.primary_bin, p_str),
            complement: render(&self.complement_bin, c_str),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Fragments(Vec<Fragment>);

impl Fragments {
    pub fn iter(&self) -> std::slice::Iter<'_, Fragment> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `primary` and `complement` are the full strands, complement in the
    /// same left-to-right frame as the primary strand.
    pub fn for_display(&self, primary: &[u8], complement: &[u8]) -> Vec<DisplayFragment> {
        self.0
            .iter()
            .map(|f| f.for_display(primary, complement))
            .collect()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Strand {
    Primary,
    Complement,
}

#[derive(Clone, Debug)]
pub struct SequenceRange {
    p_left: usize,
    p_right: usize,
    c_left: usize,
    c_right: usize,
    cut_ranges: CutRanges,
    fragments: OnceCell<Fragments>,
}

impl SequenceRange {
    pub fn new(
        p_left: usize,
        p_right: usize,
        c_left: usize,
        c_right: usize,
    ) -> Result<Self, DigestError> {
        if p_left > p_right || c_left > c_right {
            return Err(DigestError::MalformedCutSpecification(format!(
                "sequence range {p_left}..={p_right} / {c_left}..={c_right} is inverted"
            )));
        }
        Ok(Self {
            p_left,
            p_right,
            c_left,
            c_right,
            cut_ranges: CutRanges::new(),
            fragments: OnceCell::new(),
        })
    }

    /// Both strands spanning `0..len`.
    pub fn for_length(len: usize) -> Result<Self, DigestError> {
        if len == 0 {
            return Err(DigestError::InvalidSequence(
                "sequence is empty".to_string(),
            ));
        }
        Self::new(0, len - 1, 0, len - 1)
    }

    pub fn p_left(&self) -> usize {
        self.p_left
    }

    pub fn p_right(&self) -> usize {
        self.p_right
    }

    pub fn c_left(&self) -> usize {
        self.c_left
    }

    pub fn c_right(&self) -> usize {
        self.c_right
    }

    /// Leftmost position on either strand.
    pub fn left(&self) -> usize {
        self.p_left.min(self.c_left)
    }

    /// Rightmost position on either strand.
    pub fn right(&self) -> usize {
        self.p_right.max(self.c_right)
    }

    pub fn cut_ranges(&self) -> &CutRanges {
        &self.cut_ranges
    }

    pub fn add_cut_range<C: Into<CutRange>>(&mut self, cut_range: C) {
        self.cut_ranges.push(cut_range);
        self.fragments.take();
    }

    pub fn fragments(&self) -> &Fragments {
        self.fragments.get_or_init(|| self.compute_fragments())
    }

    fn in_span(&self, strand: Strand, i: usize) -> bool {
        match strand {
            Strand::Primary => (self.p_left..=self.p_right).contains(&i),
            Strand::Complement => (self.c_left..=self.c_right).contains(&i),
        }
    }

    fn node(&self, strand: Strand, i: usize) -> usize {
        match strand {
            Strand::Primary => i - self.p_left,
            Strand::Complement => self.p_right - self.p_left + 1 + i - self.c_left,
        }
    }

    /// Fragments are the connected components of the ladder formed by both
    /// strands: bases on a strand stay joined unless that strand is cut between
    /// them, paired bases stay joined unless a horizontal band separates them.
    fn compute_fragments(&self) -> Fragments {
        let mut p_cuts = HashSet::new();
        let mut c_cuts = HashSet::new();
        let mut bands: Vec<HorizontalCutRange> = vec![];
        for cut_range in &self.cut_ranges {
            match cut_range {
                CutRange::Vertical(v) => {
                    p_cuts.extend(v.primary_cuts());
                    c_cuts.extend(v.complement_cuts());
                    // A strand cut on an end boundary separates nothing, so
                    // the other strand's cut is a plain nick.
                    if v.min() > self.left() && v.max() <= self.right() {
                        bands.extend(v.overhang());
                    }
                }
                CutRange::Horizontal(h) => bands.push(*h),
            }
        }
        let is_cut = |strand: Strand, boundary: usize| match strand {
            Strand::Primary => p_cuts.contains(&boundary),
            Strand::Complement => c_cuts.contains(&boundary),
        };
        let is_paired = |i: usize| {
            self.in_span(Strand::Primary, i)
                && self.in_span(Strand::Complement, i)
                && !bands.iter().any(|b| b.include(i))
        };

        let node_count = self.node(Strand::Complement, self.c_right) + 1;
        let mut visited = vec![false; node_count];
        let mut ret = vec![];
        for (strand, start) in (self.p_left..=self.p_right)
            .map(|i| (Strand::Primary, i))
            .chain((self.c_left..=self.c_right).map(|i| (Strand::Complement, i)))
        {
            if visited[self.node(strand, start)] {
                continue;
            }
            let mut fragment = Fragment::new(BTreeSet::new(), BTreeSet::new());
            let mut queue = VecDeque::new();
            visited[self.node(strand, start)] = true;
            queue.push_back((strand, start));

            while let Some((strand, i)) = queue.pop_front() {
                match strand {
                    Strand::Primary => fragment.primary_bin.insert(i),
                    Strand::Complement => fragment.complement_bin.insert(i),
                };
                let other = match strand {
                    Strand::Primary => Strand::Complement,
                    Strand::Complement => Strand::Primary,
                };
                let mut neighbors = Vec::with_capacity(3);
                if i > 0 && self.in_span(strand, i - 1) && !is_cut(strand, i) {
                    neighbors.push((strand, i - 1));
                }
                if self.in_span(strand, i + 1) && !is_cut(strand, i + 1) {
                    neighbors.push((strand, i + 1));
                }
                if is_paired(i) {
                    neighbors.push((other, i));
                }
                for (strand, j) in neighbors {
                    let node = self.node(strand, j);
                    if !visited[node] {
                        visited[node] = true;
                        queue.push_back((strand, j));
                    }
                }
            }
            ret.push(fragment);
        }

        ret.sort_by_key(|f| (f.min(), f.primary_bin.first().copied().unwrap_or(usize::MAX)));
        Fragments(ret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cut_range::VerticalCutRange;

    const SEQ: &[u8] = b"GAATTC";
    const COMPLEMENT: &[u8] = b"CTTAAG";

    fn display(sr: &SequenceRange) -> Vec<(String, String)> {
        sr.fragments()
            .for_display(SEQ, COMPLEMENT)
            .into_iter()
            .map(|d| (d.primary, d.complement))
            .collect()
    }

    fn assert_partition(sr: &SequenceRange) {
        let mut primary = vec![];
        let mut complement = vec![];
        for f in sr.fragments().iter() {
            primary.extend(f.primary_bin().iter().copied());
            complement.extend(f.complement_bin().iter().copied());
        }
        primary.sort();
        complement.sort();
        assert_eq!(primary, (sr.p_left()..=sr.p_right()).collect::<Vec<_>>());
        assert_eq!(complement, (sr.c_left()..=sr.c_right()).collect::<Vec<_>>());
    }

    #[test]
    fn test_no_cuts() {
        let sr = SequenceRange::for_length(6).unwrap();
        assert_eq!(sr.fragments().len(), 1);
        assert_eq!(
            display(&sr),
            vec![("GAATTC".to_string(), "CTTAAG".to_string())]
        );
        assert_partition(&sr);
    }

    #[test]
    fn test_sticky_cut() {
        let mut sr = SequenceRange::for_length(6).unwrap();
        sr.add_cut_range(VerticalCutRange::new(Some(1), None, None, Some(5)).unwrap());
        assert_eq!(
            display(&sr),
            vec![
                ("G    ".to_string(), "CTTAA".to_string()),
                ("AATTC".to_string(), "    G".to_string()),
            ]
        );
        assert_partition(&sr);
    }

    #[test]
    fn test_blunt_cut() {
        let mut sr = SequenceRange::for_length(6).unwrap();
        sr.add_cut_range(VerticalCutRange::new(Some(3), None, None, Some(3)).unwrap());
        assert_eq!(
            display(&sr),
            vec![
                ("GAA".to_string(), "CTT".to_string()),
                ("TTC".to_string(), "AAG".to_string()),
            ]
        );
    }

    #[test]
    fn test_nick_does_not_fragment() {
        let mut sr = SequenceRange::for_length(6).unwrap();
        sr.add_cut_range(VerticalCutRange::new(Some(2), None, None, None).unwrap());
        assert_eq!(sr.fragments().len(), 1);
    }

    #[test]
    fn test_cuts_at_the_ends_are_ignored() {
        let mut sr = SequenceRange::for_length(6).unwrap();
        sr.add_cut_range(VerticalCutRange::new(Some(0), None, None, Some(0)).unwrap());
        sr.add_cut_range(VerticalCutRange::new(Some(6), None, None, Some(9)).unwrap());
        assert_eq!(sr.fragments().len(), 1);
        assert_partition(&sr);
    }

    #[test]
    fn test_staggered_cut_reaching_an_end_is_a_nick() {
        let mut sr = SequenceRange::for_length(6).unwrap();
        sr.add_cut_range(VerticalCutRange::new(Some(4), None, None, Some(8)).unwrap());
        assert_eq!(sr.fragments().len(), 1);
        sr.add_cut_range(VerticalCutRange::new(Some(0), None, None, Some(2)).unwrap());
        assert_eq!(sr.fragments().len(), 1);
        sr.add_cut_range(VerticalCutRange::new(None, Some(6), Some(3), None).unwrap());
        assert_eq!(sr.fragments().len(), 1);
        assert_partition(&sr);
    }

    #[test]
    fn test_horizontal_cut_splits_nicked_strands() {
        let mut sr = SequenceRange::for_length(6).unwrap();
        sr.add_cut_range(VerticalCutRange::new(Some(2), None, None, None).unwrap());
        sr.add_cut_range(VerticalCutRange::new(None, None, Some(4), None).unwrap());
        assert_eq!(sr.fragments().len(), 1);
        sr.add_cut_range(HorizontalCutRange::new(2, 3).unwrap());
        assert_eq!(
            display(&sr),
            vec![
                ("GA  ".to_string(), "CTTA".to_string()),
                ("ATTC".to_string(), "  AG".to_string()),
            ]
        );
        assert_partition(&sr);
    }

    #[test]
    fn test_cut_order_is_irrelevant() {
        let cuts: Vec<CutRange> = vec![
            VerticalCutRange::new(Some(1), None, None, Some(3))
                .unwrap()
                .into(),
            VerticalCutRange::new(None, Some(5), Some(4), None)
                .unwrap()
                .into(),
            HorizontalCutRange::single(0).into(),
        ];
        let mut forward = SequenceRange::for_length(6).unwrap();
        let mut backward = SequenceRange::for_length(6).unwrap();
        for c in &cuts {
            forward.add_cut_range(*c);
        }
        for c in cuts.iter().rev() {
            backward.add_cut_range(*c);
        }
        assert_eq!(forward.fragments(), backward.fragments());
        assert_partition(&forward);
    }

    #[test]
    fn test_fragments_recomputed_after_new_cut() {
        let mut sr = SequenceRange::for_length(6).unwrap();
        assert_eq!(sr.fragments().len(), 1);
        sr.add_cut_range(VerticalCutRange::new(Some(3), None, None, Some(3)).unwrap());
        assert_eq!(sr.fragments().len(), 2);
    }

    #[test]
    fn test_invalid_ranges() {
        assert!(SequenceRange::for_length(0).is_err());
        assert!(SequenceRange::new(4, 2, 0, 5).is_err());
    }
}
