//! Cut geometry of an enzyme relative to the start of its recognition site.
//!
//! Offsets are cut boundaries: `0` cuts immediately before the first base of
//! the site, `site.len()` immediately after the last one. Offsets may exceed the
//! site length for enzymes that cut outside their recognition sequence.
//! `None` means that strand is not cut by this pair.

use crate::error::DigestError;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Option<isize>>", into = "Vec<Option<isize>>")]
pub struct CutLocationPair {
    primary: Option<usize>,
    complement: Option<usize>,
}

impl CutLocationPair {
    pub fn new(primary: Option<isize>, complement: Option<isize>) -> Result<Self, DigestError> {
        let primary = Self::validate_offset(primary)?;
        let complement = Self::validate_offset(complement)?;
        if primary.is_none() && complement.is_none() {
            return Err(DigestError::MalformedCutSpecification(
                "neither strand has a cut".to_string(),
            ));
        }
        Ok(Self {
            primary,
            complement,
        })
    }

    pub fn from_range(range: RangeInclusive<isize>) -> Result<Self, DigestError> {
        Self::new(Some(*range.start()), Some(*range.end()))
    }

    /// One value cuts only the primary strand, two values cut both.
    pub fn from_slice(values: &[Option<isize>]) -> Result<Self, DigestError> {
        match values {
            [p] => Self::new(*p, None),
            [p, c] => Self::new(*p, *c),
            _ => Err(DigestError::MalformedCutSpecification(format!(
                "expected one or two cut offsets, got {}",
                values.len()
            ))),
        }
    }

    fn validate_offset(offset: Option<isize>) -> Result<Option<usize>, DigestError> {
        match offset {
            Some(o) if o.is_negative() => Err(DigestError::MalformedCutSpecification(format!(
                "negative cut offset {o}; offsets are 0-based"
            ))),
            Some(o) => Ok(Some(o as usize)),
            None => Ok(None),
        }
    }

    pub fn primary(&self) -> Option<usize> {
        self.primary
    }

    pub fn complement(&self) -> Option<usize> {
        self.complement
    }

    /// Both strands cut, at different offsets (sticky ends).
    pub fn is_staggered(&self) -> bool {
        matches!((self.primary, self.complement), (Some(p), Some(c)) if p != c)
    }
}

impl TryFrom<Vec<Option<isize>>> for CutLocationPair {
    type Error = DigestError;

    fn try_from(values: Vec<Option<isize>>) -> Result<Self, Self::Error> {
        Self::from_slice(&values)
    }
}

impl From<CutLocationPair> for Vec<Option<isize>> {
    fn from(pair: CutLocationPair) -> Self {
        vec![
            pair.primary.map(|o| o as isize),
            pair.complement.map(|o| o as isize),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let clp = CutLocationPair::new(Some(3), Some(2)).unwrap();
        assert_eq!(clp.primary(), Some(3));
        assert_eq!(clp.complement(), Some(2));
        assert!(clp.is_staggered());
        assert!(!CutLocationPair::new(Some(3), Some(3)).unwrap().is_staggered());
        assert!(!CutLocationPair::new(None, Some(3)).unwrap().is_staggered());
    }

    #[test]
    fn test_from_range_and_slice() {
        assert_eq!(
            CutLocationPair::from_range(1..=5).unwrap(),
            CutLocationPair::new(Some(1), Some(5)).unwrap()
        );
        let single = CutLocationPair::from_slice(&[Some(4)]).unwrap();
        assert_eq!(single.primary(), Some(4));
        assert_eq!(single.complement(), None);
    }

    #[test]
    fn test_invalid() {
        assert!(matches!(
            CutLocationPair::new(None, None),
            Err(DigestError::MalformedCutSpecification(_))
        ));
        assert!(CutLocationPair::new(Some(-1), Some(2)).is_err());
        assert!(CutLocationPair::new(Some(1), Some(-2)).is_err());
        assert!(CutLocationPair::from_range(-3..=2).is_err());
        assert!(CutLocationPair::from_slice(&[]).is_err());
        assert!(CutLocationPair::from_slice(&[Some(1), Some(2), Some(3)]).is_err());
    }

    #[test]
    fn test_serde() {
        let clp: CutLocationPair = serde_json::from_str("[1, 5]").unwrap();
        assert_eq!(clp, CutLocationPair::new(Some(1), Some(5)).unwrap());
        let clp: CutLocationPair = serde_json::from_str("[null, 2]").unwrap();
        assert_eq!(clp.primary(), None);
        assert!(serde_json::from_str::<CutLocationPair>("[null, null]").is_err());
        assert!(serde_json::from_str::<CutLocationPair>("[-1, 2]").is_err());
    }
}
