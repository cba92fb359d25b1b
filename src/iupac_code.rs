const DNA_BITMASK_A: u8 = 1;
const DNA_BITMASK_C: u8 = 2;
const DNA_BITMASK_G: u8 = 4;
const DNA_BITMASK_T: u8 = 8;
const DNA_BITMASK_N: u8 = DNA_BITMASK_A | DNA_BITMASK_C | DNA_BITMASK_G | DNA_BITMASK_T;

/// Letters in bitmask order, indexed by the mask value.
const LETTER_BY_MASK: [u8; 16] = [
    b' ', b'A', b'C', b'M', b'G', b'R', b'S', b'V', b'T', b'W', b'Y', b'H', b'K', b'D', b'B', b'N',
];

/// A bitmasked IUPAC code for DNA bases, eg DNA_BITMASK_A|DNA_BITMASK_C
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct IupacCode(u8);

impl IupacCode {
    #[inline(always)]
    pub fn from_letter(letter: u8) -> Self {
        match letter.to_ascii_uppercase() {
            b'A' => Self(DNA_BITMASK_A),
            b'C' => Self(DNA_BITMASK_C),
            b'G' => Self(DNA_BITMASK_G),
            b'T' | b'U' => Self(DNA_BITMASK_T),
            b'W' => Self(DNA_BITMASK_A | DNA_BITMASK_T),
            b'S' => Self(DNA_BITMASK_C | DNA_BITMASK_G),
            b'M' => Self(DNA_BITMASK_A | DNA_BITMASK_C),
            b'K' => Self(DNA_BITMASK_G | DNA_BITMASK_T),
            b'R' => Self(DNA_BITMASK_A | DNA_BITMASK_G),
            b'Y' => Self(DNA_BITMASK_C | DNA_BITMASK_T),
            b'B' => Self(DNA_BITMASK_C | DNA_BITMASK_G | DNA_BITMASK_T),
            b'D' => Self(DNA_BITMASK_A | DNA_BITMASK_G | DNA_BITMASK_T),
            b'H' => Self(DNA_BITMASK_A | DNA_BITMASK_C | DNA_BITMASK_T),
            b'V' => Self(DNA_BITMASK_A | DNA_BITMASK_C | DNA_BITMASK_G),
            b'N' => Self(DNA_BITMASK_N),
            _ => Self(0),
        }
    }

    #[inline(always)]
    pub fn to_letter(self) -> u8 {
        LETTER_BY_MASK[self.0 as usize]
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Swaps A<->T and C<->G in the mask, so ambiguity codes complement too (R<->Y, B<->V, ...).
    #[inline(always)]
    pub fn complement(self) -> Self {
        let mut ret = 0;
        if self.0 & DNA_BITMASK_A != 0 {
            ret |= DNA_BITMASK_T;
        }
        if self.0 & DNA_BITMASK_T != 0 {
            ret |= DNA_BITMASK_A;
        }
        if self.0 & DNA_BITMASK_C != 0 {
            ret |= DNA_BITMASK_G;
        }
        if self.0 & DNA_BITMASK_G != 0 {
            ret |= DNA_BITMASK_C;
        }
        Self(ret)
    }

    #[inline(always)]
    pub fn is_valid_letter(letter: u8) -> bool {
        !Self::from_letter(letter).is_empty()
    }

    #[inline(always)]
    pub fn to_vec(&self) -> Vec<u8> {
        [
            (DNA_BITMASK_A, b'A'),
            (DNA_BITMASK_C, b'C'),
            (DNA_BITMASK_G, b'G'),
            (DNA_BITMASK_T, b'T'),
        ]
        .iter()
        .filter(|(mask, _)| self.0 & mask != 0)
        .map(|(_, letter)| *letter)
        .collect()
    }

    /// Regex fragment matching any base of this code, eg `[AG]` for R.
    pub fn regex_class(&self) -> String {
        let bases = self.to_vec();
        match bases.len() {
            0 => ".".to_string(),
            1 => (bases[0] as char).to_string(),
            _ => format!("[{}]", String::from_utf8_lossy(&bases)),
        }
    }

    /// Complement of a single letter, keeping ambiguity. Unknown letters become a blank.
    #[inline(always)]
    pub fn letter_complement(letter: u8) -> u8 {
        Self::from_letter(letter).complement().to_letter()
    }
}
