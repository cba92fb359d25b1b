use crate::{
    cut_location_pair::CutLocationPair, dna_sequence::DNAsequence, error::DigestError,
    iupac_code::IupacCode,
};
use log::{debug, warn};
use regex::bytes::Regex;
use serde::{Deserialize, Serialize};

const PRIMARY_CUT_SYMBOL: char = '^';
const COMPLEMENT_CUT_SYMBOL: char = '_';

/// A double-stranded restriction enzyme.
///
/// The common single-cut geometry is stored the way catalogs list it: the
/// primary strand is cut `cut` bases into the recognition site and the
/// complement strand `overlap` bases further on (negative for 3' overhangs).
/// Enzymes cutting more than once list every pair in `cut_locations`, which
/// then replaces `cut`/`overlap`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RestrictionEnzyme {
    pub name: String,
    pub sequence: String,
    pub note: Option<String>,
    #[serde(default)]
    pub cut: isize,
    #[serde(default)]
    pub overlap: isize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cut_locations: Vec<CutLocationPair>,
    #[serde(skip_serializing, default)]
    is_palindromic: bool,
}

#[derive(Clone, Debug)]
pub struct RestrictionEnzymeSite {
    /// First base of the recognition site on the primary strand.
    pub offset: usize,
    pub enzyme: RestrictionEnzyme,
    pub forward_strand: bool,
}

impl RestrictionEnzymeSite {
    /// Cut boundaries in sequence coordinates, in primary-strand orientation.
    /// Reverse-strand sites of enzymes cutting outside their recognition
    /// sequence can reach past the sequence start; those cuts land on 0.
    pub fn cut_positions(&self) -> Result<Vec<CutLocationPair>, DigestError> {
        let offset = self.offset as isize;
        let site_len = self.enzyme.len() as isize;
        let absolute = |o: Option<usize>| -> Option<isize> {
            let o = o? as isize;
            let o = if self.forward_strand {
                offset + o
            } else {
                offset + site_len - o
            };
            if o < 0 {
                warn!(
                    "{} at {} cuts before the sequence start",
                    self.enzyme.name, self.offset
                );
            }
            Some(o.max(0))
        };
        self.enzyme
            .cut_location_pairs()?
            .iter()
            .map(|pair| {
                if self.forward_strand {
                    CutLocationPair::new(absolute(pair.primary()), absolute(pair.complement()))
                } else {
                    CutLocationPair::new(absolute(pair.complement()), absolute(pair.primary()))
                }
            })
            .collect()
    }
}

impl RestrictionEnzyme {
    pub fn new(
        name: &str,
        sequence: &str,
        cut_locations: Vec<CutLocationPair>,
    ) -> Result<Self, DigestError> {
        let mut ret = Self {
            name: name.to_string(),
            sequence: sequence.to_string(),
            note: None,
            cut: 0,
            overlap: 0,
            cut_locations,
            is_palindromic: false,
        };
        ret.validate()?;
        Ok(ret)
    }

    /// Parses cut-symbol notation such as `G^AATTC`. `^` marks the cut on the
    /// primary strand, `_` the cut on the complement strand. Without `_` the
    /// site is taken as palindromic and the complement cut mirrors `^`; with
    /// `_` alone only the complement strand is cut.
    pub fn from_cut_pattern(name: &str, pattern: &str) -> Result<Self, DigestError> {
        let mut sequence = String::new();
        let mut primary = None;
        let mut complement = None;
        for c in pattern.chars().filter(|c| !c.is_whitespace()) {
            let slot = match c {
                PRIMARY_CUT_SYMBOL => &mut primary,
                COMPLEMENT_CUT_SYMBOL => &mut complement,
                _ => {
                    sequence.push(c.to_ascii_uppercase());
                    continue;
                }
            };
            if slot.replace(sequence.len() as isize).is_some() {
                return Err(DigestError::MalformedCutSpecification(format!(
                    "duplicate '{c}' in cut pattern '{pattern}'"
                )));
            }
        }
        let primary = match (primary, complement) {
            (Some(primary), _) => primary,
            (None, Some(complement)) => {
                // Complement strand only: a nicking enzyme
                let nick = CutLocationPair::new(None, Some(complement))?;
                return Self::new(name, &sequence, vec![nick]);
            }
            (None, None) => {
                return Err(DigestError::MalformedCutSpecification(format!(
                    "cut pattern '{pattern}' has neither '{PRIMARY_CUT_SYMBOL}' nor '{COMPLEMENT_CUT_SYMBOL}'"
                )));
            }
        };
        let complement = complement.unwrap_or(sequence.len() as isize - primary);

        let mut ret = Self::new(name, &sequence, vec![])?;
        ret.cut = primary;
        ret.overlap = complement - primary;
        ret.validate()?;
        Ok(ret)
    }

    /// Checks the site alphabet and cut geometry, and caches palindromicity.
    pub fn validate(&mut self) -> Result<(), DigestError> {
        self.sequence = self.sequence.to_ascii_uppercase();
        if self.sequence.is_empty() {
            return Err(DigestError::MalformedCutSpecification(format!(
                "{}: empty recognition site",
                self.name
            )));
        }
        if let Some(c) = self
            .sequence
            .bytes()
            .find(|c| !IupacCode::is_valid_letter(*c))
        {
            return Err(DigestError::MalformedCutSpecification(format!(
                "{}: '{}' is not an IUPAC code",
                self.name, c as char
            )));
        }
        self.cut_location_pairs()?;
        self.check_palindromic();
        Ok(())
    }

    pub fn check_palindromic(&mut self) {
        self.is_palindromic = self.sequence.as_bytes() == self.get_sequence_rc().as_slice();
    }

    pub fn is_palindromic(&self) -> bool {
        self.is_palindromic
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Recognition site on the complementary strand, aligned base by base with `sequence`.
    pub fn complement_sequence(&self) -> String {
        String::from_utf8_lossy(&DNAsequence::complement(self.sequence.as_bytes())).to_string()
    }

    fn get_sequence_rc(&self) -> Vec<u8> {
        let mut rc = DNAsequence::complement(self.sequence.as_bytes());
        rc.reverse();
        rc
    }

    pub fn cut_location_pairs(&self) -> Result<Vec<CutLocationPair>, DigestError> {
        if !self.cut_locations.is_empty() {
            return Ok(self.cut_locations.clone());
        }
        let pair = CutLocationPair::new(Some(self.cut), Some(self.cut + self.overlap))
            .map_err(|e| DigestError::MalformedCutSpecification(format!("{}: {e}", self.name)))?;
        Ok(vec![pair])
    }

    fn site_regex(site: &[u8]) -> Result<Regex, DigestError> {
        let pattern: String = site
            .iter()
            .map(|c| IupacCode::from_letter(*c).regex_class())
            .collect();
        Ok(Regex::new(&pattern)?)
    }

    /// Every start offset where `re` matches, overlapping matches included.
    fn find_match_locations(haystack: &[u8], re: &Regex) -> Vec<usize> {
        let mut ret = vec![];
        let mut start = 0;
        while start < haystack.len() {
            match re.find_at(haystack, start) {
                Some(m) => {
                    ret.push(m.start());
                    start = m.start() + 1;
                }
                None => break,
            }
        }
        ret
    }

    /// Finds recognition sites on the primary strand and, when `both_strands`
    /// is set and the site is not palindromic, on the complementary strand.
    /// Sites are sorted by offset; at equal offsets the forward site comes first.
    pub fn get_sites(
        &self,
        seq: &DNAsequence,
        both_strands: bool,
    ) -> Result<Vec<RestrictionEnzymeSite>, DigestError> {
        let forward = Self::site_regex(self.sequence.as_bytes())?;
        let mut ret: Vec<RestrictionEnzymeSite> =
            Self::find_match_locations(seq.forward(), &forward)
                .into_iter()
                .map(|offset| RestrictionEnzymeSite {
                    offset,
                    enzyme: self.to_owned(),
                    forward_strand: true,
                })
                .collect();

        if both_strands && !self.is_palindromic() {
            let reverse = Self::site_regex(&self.get_sequence_rc())?;
            ret.extend(
                Self::find_match_locations(seq.forward(), &reverse)
                    .into_iter()
                    .map(|offset| RestrictionEnzymeSite {
                        offset,
                        enzyme: self.to_owned(),
                        forward_strand: false,
                    }),
            );
            ret.sort_by_key(|site| (site.offset, !site.forward_strand));
        }
        debug!("{}: {} site(s) found", self.name, ret.len());
        Ok(ret)
    }
}
