use crate::{error::DigestError, restriction_enzyme::RestrictionEnzyme};
use anyhow::{Context, Result};
use log::warn;
use std::{collections::HashMap, fs, path::Path};

const BUILTIN_ENZYMES_JSON: &str = include_str!("../assets/enzymes.json");

/// Read-only catalog of restriction enzymes, keyed by case-sensitive name.
#[derive(Clone, Debug)]
pub struct Enzymes {
    restriction_enzymes: Vec<RestrictionEnzyme>,
    by_name: HashMap<String, usize>,
}

impl Enzymes {
    pub fn new(json_text: &str) -> Result<Self, DigestError> {
        let mut ret = Self {
            restriction_enzymes: vec![],
            by_name: HashMap::new(),
        };
        let res: serde_json::Value = serde_json::from_str(json_text)?;
        let arr = res
            .as_array()
            .ok_or(DigestError::Catalog("Enzymes file is not a JSON array".to_string()))?;
        for row in arr {
            match row.get("type").and_then(|t| t.as_str()) {
                Some("restriction") => {}
                Some(other) => {
                    warn!("Skipping enzyme of type '{other}': {row}");
                    continue;
                }
                None => {
                    return Err(DigestError::Catalog(format!(
                        "Missing enzyme type for {row}"
                    )));
                }
            }
            let mut re: RestrictionEnzyme = serde_json::from_value(row.to_owned())
                .map_err(|e| DigestError::Catalog(format!("Bad restriction enzyme {row}: {e}")))?;
            re.validate()?;
            if ret.by_name.contains_key(&re.name) {
                return Err(DigestError::Catalog(format!(
                    "Duplicate restriction enzyme '{}'",
                    re.name
                )));
            }
            ret.by_name
                .insert(re.name.to_owned(), ret.restriction_enzymes.len());
            ret.restriction_enzymes.push(re);
        }
        Ok(ret)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read enzyme catalog: {}", path.display()))?;
        Self::new(&text)
            .with_context(|| format!("failed to parse enzyme catalog: {}", path.display()))
    }

    pub fn restriction_enzymes(&self) -> &Vec<RestrictionEnzyme> {
        &self.restriction_enzymes
    }

    pub fn get(&self, name: &str) -> Result<&RestrictionEnzyme, DigestError> {
        self.by_name
            .get(name)
            .map(|i| &self.restriction_enzymes[*i])
            .ok_or_else(|| DigestError::UnknownEnzyme(name.to_string()))
    }
}

impl Default for Enzymes {
    fn default() -> Self {
        Enzymes::new(BUILTIN_ENZYMES_JSON).expect("builtin enzyme catalog is valid")
    }
}
