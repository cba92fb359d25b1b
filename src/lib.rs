use enzymes::Enzymes;
use lazy_static::lazy_static;

pub mod analysis;
pub mod config;
pub mod cut_location_pair;
pub mod cut_range;
pub mod dna_sequence;
pub mod enzyme_action;
pub mod enzymes;
pub mod error;
pub mod iupac_code;
pub mod restriction_enzyme;
pub mod sequence_range;

pub use analysis::{
    Analysis, EnzymeSpec, UniqueFragment, UniqueFragments, cut, cut_without_permutations,
};
pub use config::AnalysisConfig;
pub use error::DigestError;

lazy_static! {
    // Restriction enzymes
    pub static ref ENZYMES: Enzymes = Enzymes::default();
}
