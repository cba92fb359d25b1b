use crate::{
    cut_location_pair::CutLocationPair,
    cut_range::{CutRanges, VerticalCutRange},
    error::DigestError,
    restriction_enzyme::RestrictionEnzymeSite,
};

/// One enzyme bound to one matched recognition site, with its cuts in
/// absolute sequence coordinates.
#[derive(Clone, Debug)]
pub struct EnzymeAction {
    id: usize,
    enzyme_name: String,
    primary_left: usize,
    primary_right: usize,
    complement_left: usize,
    complement_right: usize,
    cut_ranges: CutRanges,
}

impl EnzymeAction {
    /// `cut_location_pairs` are relative to `offset`, the start of the site.
    pub fn new(
        id: usize,
        enzyme_name: &str,
        offset: usize,
        site_len: usize,
        cut_location_pairs: &[CutLocationPair],
    ) -> Result<Self, DigestError> {
        let shift = |o: Option<usize>| o.map(|o| (offset + o) as isize);
        let cut_positions = cut_location_pairs
            .iter()
            .map(|pair| CutLocationPair::new(shift(pair.primary()), shift(pair.complement())))
            .collect::<Result<Vec<_>, _>>()?;
        Self::with_cut_positions(id, enzyme_name, offset, site_len, &cut_positions)
    }

    pub fn from_site(id: usize, site: &RestrictionEnzymeSite) -> Result<Self, DigestError> {
        Self::with_cut_positions(
            id,
            &site.enzyme.name,
            site.offset,
            site.enzyme.len(),
            &site.cut_positions()?,
        )
    }

    /// `cut_positions` are absolute cut boundaries in sequence coordinates.
    fn with_cut_positions(
        id: usize,
        enzyme_name: &str,
        offset: usize,
        site_len: usize,
        cut_positions: &[CutLocationPair],
    ) -> Result<Self, DigestError> {
        if site_len == 0 {
            return Err(DigestError::MalformedCutSpecification(format!(
                "{enzyme_name}: empty recognition site"
            )));
        }
        let mut cut_ranges = CutRanges::new();
        for pair in cut_positions {
            let range = match (pair.primary(), pair.complement()) {
                (Some(p), Some(c)) if c >= p => VerticalCutRange::new(Some(p), None, None, Some(c)),
                (Some(p), Some(c)) => VerticalCutRange::new(None, Some(p), Some(c), None),
                (p, None) => VerticalCutRange::new(p, None, None, None),
                (None, c) => VerticalCutRange::new(None, None, c, None),
            }?;
            cut_ranges.push(range);
        }
        Ok(Self {
            id,
            enzyme_name: enzyme_name.to_string(),
            primary_left: offset,
            primary_right: offset + site_len - 1,
            complement_left: offset,
            complement_right: offset + site_len - 1,
            cut_ranges,
        })
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn enzyme_name(&self) -> &str {
        &self.enzyme_name
    }

    pub fn primary_left(&self) -> usize {
        self.primary_left
    }

    pub fn primary_right(&self) -> usize {
        self.primary_right
    }

    pub fn complement_left(&self) -> usize {
        self.complement_left
    }

    pub fn complement_right(&self) -> usize {
        self.complement_right
    }

    pub fn left(&self) -> usize {
        self.primary_left.min(self.complement_left)
    }

    pub fn right(&self) -> usize {
        self.primary_right.max(self.complement_right)
    }

    pub fn cut_ranges(&self) -> &CutRanges {
        &self.cut_ranges
    }

    /// True if `cut` has already severed the recognition site this action
    /// needs intact. A site lying entirely inside the overhang between the
    /// two strand cuts is still intact.
    pub fn is_blocked_by(&self, cut: &VerticalCutRange) -> bool {
        let (left, right) = (self.left(), self.right());
        let clear_of_cut = right < cut.min() || left >= cut.max();
        let inside_overhang = left >= cut.min() && right < cut.max();
        !(clear_of_cut || inside_overhang)
    }

    pub fn conflicts_with(&self, previous: &EnzymeAction) -> bool {
        previous
            .cut_ranges
            .vertical()
            .any(|cut| self.is_blocked_by(cut))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{dna_sequence::DNAsequence, restriction_enzyme::RestrictionEnzyme};

    fn pair(p: isize, c: isize) -> CutLocationPair {
        CutLocationPair::new(Some(p), Some(c)).unwrap()
    }

    #[test]
    fn test_enzyme_action_geometry() {
        let ea = EnzymeAction::new(0, "EcoRI", 10, 6, &[pair(1, 5)]).unwrap();
        assert_eq!(ea.primary_left(), 10);
        assert_eq!(ea.primary_right(), 15);
        assert_eq!(ea.complement_left(), 10);
        assert_eq!(ea.complement_right(), 15);
        let cut = ea.cut_ranges().vertical().next().unwrap();
        assert_eq!(cut.p_cut_left(), Some(11));
        assert_eq!(cut.c_cut_right(), Some(15));
        assert_eq!(cut.p_cut_right(), None);
    }

    #[test]
    fn test_three_prime_overhang_and_nicks() {
        let pst_i = EnzymeAction::new(0, "PstI", 0, 6, &[pair(5, 1)]).unwrap();
        let cut = pst_i.cut_ranges().vertical().next().unwrap();
        assert_eq!(cut.p_cut_right(), Some(5));
        assert_eq!(cut.c_cut_left(), Some(1));

        let nick = CutLocationPair::new(None, Some(3)).unwrap();
        let ea = EnzymeAction::new(0, "Nt", 2, 4, &[nick]).unwrap();
        let cut = ea.cut_ranges().vertical().next().unwrap();
        assert_eq!(cut.complement_cuts().collect::<Vec<_>>(), vec![5]);
        assert_eq!(cut.primary_cuts().count(), 0);
    }

    #[test]
    fn test_from_site() {
        let re = RestrictionEnzyme::from_cut_pattern("BamHI", "G^GATCC").unwrap();
        let seq = DNAsequence::from_sequence("AAGGATCCAA").unwrap();
        let site = &re.get_sites(&seq, false).unwrap()[0];
        let ea = EnzymeAction::from_site(7, site).unwrap();
        assert_eq!(ea.id(), 7);
        assert_eq!(ea.enzyme_name(), "BamHI");
        assert_eq!((ea.left(), ea.right()), (2, 7));
        assert_eq!(ea.cut_ranges().min(), Some(3));
        assert_eq!(ea.cut_ranges().max(), Some(7));
    }

    #[test]
    fn test_conflicts() {
        // Cut boundaries 5 and 9 on both strands' common frame
        let previous = EnzymeAction::new(0, "a", 4, 6, &[pair(1, 5)]).unwrap();
        let at = |left: usize, len: usize| EnzymeAction::new(1, "b", left, len, &[pair(0, 0)]).unwrap();

        // Entirely left of the cut, ending on the base before it
        assert!(!at(0, 5).conflicts_with(&previous));
        // Entirely right of the cut
        assert!(!at(9, 3).conflicts_with(&previous));
        // Within the overhang
        assert!(!at(5, 4).conflicts_with(&previous));
        // Straddling the primary cut
        assert!(at(3, 4).conflicts_with(&previous));
        // Straddling the complement cut
        assert!(at(7, 4).conflicts_with(&previous));
        // Covering the whole cut
        assert!(at(0, 12).conflicts_with(&previous));
    }
}
