use crate::{error::DigestError, iupac_code::IupacCode};
use serde::{Deserialize, Serialize};
use std::fmt;

type DNAstring = Vec<u8>;

/// A validated, uppercased nucleic-acid sequence. Only the primary strand is stored;
/// the complementary strand is derived on demand.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DNAsequence {
    forward: DNAstring,
}

impl DNAsequence {
    pub fn from_sequence(sequence: &str) -> Result<DNAsequence, DigestError> {
        Self::from_u8(sequence.as_bytes())
    }

    fn from_u8(s: &[u8]) -> Result<Self, DigestError> {
        let forward = Self::validate_dna_sequence(s)?;
        if forward.is_empty() {
            return Err(DigestError::InvalidSequence(
                "sequence is empty".to_string(),
            ));
        }
        Ok(Self { forward })
    }

    /// Strips whitespace and uppercases; any letter that is not an IUPAC
    /// nucleic-acid code is rejected.
    pub fn validate_dna_sequence(v: &[u8]) -> Result<DNAstring, DigestError> {
        v.iter()
            .filter(|c| !c.is_ascii_whitespace())
            .enumerate()
            .map(|(pos, c)| {
                if IupacCode::is_valid_letter(*c) {
                    Ok(c.to_ascii_uppercase())
                } else {
                    Err(DigestError::InvalidSequence(format!(
                        "'{}' at position {pos} is not a nucleic acid",
                        *c as char
                    )))
                }
            })
            .collect()
    }

    #[inline(always)]
    pub fn forward(&self) -> &[u8] {
        &self.forward
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// The complementary strand in the same left-to-right frame as the primary
    /// strand: position `i` pairs with primary position `i`.
    pub fn forward_complement(&self) -> DNAstring {
        Self::complement(&self.forward)
    }

    pub fn complement(seq: &[u8]) -> DNAstring {
        seq.iter()
            .map(|c| IupacCode::letter_complement(*c))
            .collect()
    }

}

impl fmt::Display for DNAsequence {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.forward))
    }
}

impl TryFrom<String> for DNAsequence {
    type Error = DigestError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        DNAsequence::from_u8(s.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_sequence_normalizes() {
        let dna = DNAsequence::from_sequence("ga att\nc").unwrap();
        assert_eq!(dna.to_string(), "GAATTC");
        assert_eq!(dna.len(), 6);
    }

    #[test]
    fn test_from_sequence_rejects_bad_input() {
        assert!(matches!(
            DNAsequence::from_sequence(""),
            Err(DigestError::InvalidSequence(_))
        ));
        assert!(matches!(
            DNAsequence::from_sequence("  \n"),
            Err(DigestError::InvalidSequence(_))
        ));
        assert!(matches!(
            DNAsequence::from_sequence("GATXC"),
            Err(DigestError::InvalidSequence(_))
        ));
        assert!(DNAsequence::from_sequence("ACGTNRY").is_ok());
    }

    #[test]
    fn test_complements() {
        let dna = DNAsequence::try_from("GAATTCA".to_string()).unwrap();
        assert_eq!(dna.forward_complement(), b"CTTAAGT".to_vec());
        assert_eq!(DNAsequence::complement(b"RYN"), b"YRN".to_vec());
    }
}
