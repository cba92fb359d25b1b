//! Cuts a sequence with one or more restriction enzymes and reports the
//! resulting fragments.
//!
//! When several enzyme actions hit the same sequence, the order in which they
//! act matters: a cut may destroy a recognition site another enzyme still
//! needs. [`Analysis::cut`] considers every ordering and pools the distinct
//! fragments; [`Analysis::cut_without_permutations`] applies every cut at once.

use crate::{
    ENZYMES,
    config::AnalysisConfig,
    dna_sequence::DNAsequence,
    enzyme_action::EnzymeAction,
    enzymes::Enzymes,
    error::DigestError,
    restriction_enzyme::{RestrictionEnzyme, RestrictionEnzymeSite},
    sequence_range::{DisplayFragment, SequenceRange},
};
use itertools::Itertools;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::{
    borrow::Cow,
    collections::{HashSet, VecDeque},
};

/// How an enzyme is named in a request.
#[derive(Clone, Debug)]
pub enum EnzymeSpec {
    /// Catalog name, case-sensitive.
    Name(String),
    /// Cut-symbol notation, eg `G^AATTC`.
    Pattern(String),
    Enzyme(RestrictionEnzyme),
}

impl From<&str> for EnzymeSpec {
    fn from(name: &str) -> Self {
        EnzymeSpec::Name(name.to_string())
    }
}

impl From<String> for EnzymeSpec {
    fn from(name: String) -> Self {
        EnzymeSpec::Name(name)
    }
}

impl From<RestrictionEnzyme> for EnzymeSpec {
    fn from(enzyme: RestrictionEnzyme) -> Self {
        EnzymeSpec::Enzyme(enzyme)
    }
}

/// A distinct fragment. Strings are aligned, with blanks marking positions
/// where one strand has no base.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UniqueFragment {
    pub primary: String,
    pub complement: String,
}

impl UniqueFragment {
    pub fn primary_stripped(&self) -> String {
        self.primary.replace(' ', "")
    }

    pub fn complement_stripped(&self) -> String {
        self.complement.replace(' ', "")
    }
}

impl From<DisplayFragment> for UniqueFragment {
    fn from(df: DisplayFragment) -> Self {
        Self {
            primary: df.primary,
            complement: df.complement,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniqueFragments(Vec<UniqueFragment>);

impl UniqueFragments {
    /// Keeps the first occurrence of each (primary, complement) pair.
    fn from_display_fragments<I: IntoIterator<Item = DisplayFragment>>(fragments: I) -> Self {
        Self(
            fragments
                .into_iter()
                .map(UniqueFragment::from)
                .unique()
                .collect(),
        )
    }

    /// Primary strands, sorted, blanks stripped.
    pub fn primary(&self) -> Vec<String> {
        self.0
            .iter()
            .map(|uf| uf.primary_stripped())
            .sorted()
            .collect()
    }

    /// Complement strands, sorted, blanks stripped.
    pub fn complement(&self) -> Vec<String> {
        self.0
            .iter()
            .map(|uf| uf.complement_stripped())
            .sorted()
            .collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, UniqueFragment> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, primary: &str, complement: &str) -> bool {
        self.0
            .iter()
            .any(|uf| uf.primary == primary && uf.complement == complement)
    }
}

pub struct Analysis {
    config: AnalysisConfig,
    enzymes: Cow<'static, Enzymes>,
}

impl Default for Analysis {
    fn default() -> Self {
        Self {
            config: AnalysisConfig::default(),
            enzymes: Cow::Borrowed(&*ENZYMES),
        }
    }
}

impl Analysis {
    /// Uses the catalog named in `config`, or the builtin one.
    pub fn new(config: AnalysisConfig) -> anyhow::Result<Self> {
        let enzymes = match &config.catalog_path {
            Some(path) => Cow::Owned(Enzymes::from_path(path)?),
            None => Cow::Borrowed(&*ENZYMES),
        };
        Ok(Self { config, enzymes })
    }

    pub fn with_catalog(config: AnalysisConfig, enzymes: Enzymes) -> Self {
        Self {
            config,
            enzymes: Cow::Owned(enzymes),
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn enzymes(&self) -> &Enzymes {
        &self.enzymes
    }

    pub fn resolve(&self, spec: &EnzymeSpec) -> Result<RestrictionEnzyme, DigestError> {
        match spec {
            EnzymeSpec::Name(name) => self.enzymes.get(name).cloned(),
            EnzymeSpec::Pattern(pattern) => RestrictionEnzyme::from_cut_pattern(pattern, pattern),
            EnzymeSpec::Enzyme(enzyme) => {
                let mut enzyme = enzyme.to_owned();
                enzyme.validate()?;
                Ok(enzyme)
            }
        }
    }

    /// All recognition sites of all enzymes, in argument order, then by offset.
    /// Every enzyme is resolved before any matching starts.
    pub fn find_sites(
        &self,
        seq: &DNAsequence,
        enzymes: &[EnzymeSpec],
    ) -> Result<Vec<RestrictionEnzymeSite>, DigestError> {
        let resolved = enzymes
            .iter()
            .map(|spec| self.resolve(spec))
            .collect::<Result<Vec<_>, _>>()?;
        let mut ret = vec![];
        for enzyme in &resolved {
            ret.extend(enzyme.get_sites(seq, self.config.search_both_strands)?);
        }
        Ok(ret)
    }

    /// One action per matched site, with ids in discovery order.
    pub fn create_enzyme_actions(
        &self,
        seq: &DNAsequence,
        enzymes: &[EnzymeSpec],
    ) -> Result<Vec<EnzymeAction>, DigestError> {
        let actions = self
            .find_sites(seq, enzymes)?
            .iter()
            .enumerate()
            .map(|(id, site)| EnzymeAction::from_site(id, site))
            .collect::<Result<Vec<_>, _>>()?;
        for ea in &actions {
            debug!(
                "Enzyme action {}: {} at {}..={}",
                ea.id(),
                ea.enzyme_name(),
                ea.left(),
                ea.right()
            );
            if ea.cut_ranges().max().is_some_and(|max| max > seq.len()) {
                warn!(
                    "{} at {} cuts beyond the end of the sequence",
                    ea.enzyme_name(),
                    ea.left()
                );
            }
        }
        Ok(actions)
    }

    fn apply_actions<'a, I>(seq: &DNAsequence, actions: I) -> Result<SequenceRange, DigestError>
    where
        I: IntoIterator<Item = &'a EnzymeAction>,
    {
        let mut sr = SequenceRange::for_length(seq.len())?;
        for ea in actions {
            for cut_range in ea.cut_ranges() {
                sr.add_cut_range(*cut_range);
            }
        }
        Ok(sr)
    }

    fn unique_fragments_for_display<'a, I>(seq: &DNAsequence, ranges: I) -> UniqueFragments
    where
        I: IntoIterator<Item = &'a SequenceRange>,
    {
        let primary = seq.forward();
        let complement = seq.forward_complement();
        UniqueFragments::from_display_fragments(
            ranges
                .into_iter()
                .flat_map(|sr| sr.fragments().for_display(primary, &complement)),
        )
    }

    fn check_permutation_limit(&self, count: usize) -> Result<(), DigestError> {
        let limit = self.config.max_permutation_actions;
        if count > limit {
            return Err(DigestError::TooManyEnzymeActions { count, limit });
        }
        Ok(())
    }

    /// Applies every matched cut at once, with no conflict resolution.
    pub fn cut_without_permutations(
        &self,
        sequence: &str,
        enzymes: &[EnzymeSpec],
    ) -> Result<UniqueFragments, DigestError> {
        let seq = DNAsequence::from_sequence(sequence)?;
        let actions = self.create_enzyme_actions(&seq, enzymes)?;
        let sr = Self::apply_actions(&seq, &actions)?;
        let ret = Self::unique_fragments_for_display(&seq, [&sr]);
        info!(
            "Cut {} bp with {} enzyme action(s) at once: {} fragment(s)",
            seq.len(),
            actions.len(),
            ret.len()
        );
        Ok(ret)
    }

    /// Applies the actions of one ordering, skipping any whose recognition
    /// site was already severed by an earlier accepted action.
    fn accepted_in_order(actions: &[EnzymeAction], ordering: &[usize]) -> Vec<usize> {
        let mut accepted: Vec<usize> = vec![];
        for id in ordering {
            let ea = &actions[*id];
            if !accepted.iter().any(|prev| ea.conflicts_with(&actions[*prev])) {
                accepted.push(*id);
            }
        }
        accepted
    }

    /// Every ordering of the enzyme actions, each with the sequence range its
    /// accepted cuts produce. There are N! of them, so the action limit applies
    /// to all actions here rather than to the largest conflict group.
    pub fn cut_by_permutations(
        &self,
        sequence: &str,
        enzymes: &[EnzymeSpec],
    ) -> Result<Vec<(Vec<usize>, SequenceRange)>, DigestError> {
        let seq = DNAsequence::from_sequence(sequence)?;
        let actions = self.create_enzyme_actions(&seq, enzymes)?;
        self.check_permutation_limit(actions.len())?;
        (0..actions.len())
            .permutations(actions.len())
            .map(|ordering| {
                let accepted = Self::accepted_in_order(&actions, &ordering);
                let sr = Self::apply_actions(&seq, accepted.iter().map(|id| &actions[*id]))?;
                Ok((ordering, sr))
            })
            .collect()
    }

    /// Splits the actions into groups that can block one another. Actions in
    /// different groups never interact, so every ordering of the whole set
    /// reduces to independent orderings of each group.
    fn conflict_groups(actions: &[EnzymeAction]) -> Vec<Vec<usize>> {
        let interacts = |a: usize, b: usize| {
            actions[a].conflicts_with(&actions[b]) || actions[b].conflicts_with(&actions[a])
        };
        let mut visited = vec![false; actions.len()];
        let mut ret = vec![];
        for start in 0..actions.len() {
            if visited[start] {
                continue;
            }
            visited[start] = true;
            let mut group = vec![];
            let mut queue = VecDeque::from([start]);
            while let Some(id) = queue.pop_front() {
                group.push(id);
                for other in 0..actions.len() {
                    if !visited[other] && interacts(id, other) {
                        visited[other] = true;
                        queue.push_back(other);
                    }
                }
            }
            group.sort_unstable();
            ret.push(group);
        }
        ret
    }

    /// Extends a partial ordering of `group` one action at a time. The outcome
    /// of an ordering only depends on which actions were accepted, so a
    /// (used, accepted) state seen before cannot yield anything new.
    fn extend_ordering(
        actions: &[EnzymeAction],
        group: &[usize],
        used: &mut Vec<bool>,
        accepted: &mut Vec<usize>,
        seen_states: &mut HashSet<(Vec<bool>, Vec<usize>)>,
        accepted_sets: &mut Vec<Vec<usize>>,
    ) {
        let mut key = accepted.clone();
        key.sort_unstable();
        if !seen_states.insert((used.clone(), key.clone())) {
            return;
        }
        if used.iter().all(|u| *u) {
            accepted_sets.push(key);
            return;
        }
        for (pos, id) in group.iter().enumerate() {
            if used[pos] {
                continue;
            }
            used[pos] = true;
            let blocked = accepted
                .iter()
                .any(|prev| actions[*id].conflicts_with(&actions[*prev]));
            if !blocked {
                accepted.push(*id);
            }
            Self::extend_ordering(actions, group, used, accepted, seen_states, accepted_sets);
            if !blocked {
                accepted.pop();
            }
            used[pos] = false;
        }
    }

    fn distinct_accepted_sets(actions: &[EnzymeAction], group: &[usize]) -> Vec<Vec<usize>> {
        if let [id] = group {
            return vec![vec![*id]];
        }
        let mut accepted_sets = vec![];
        Self::extend_ordering(
            actions,
            group,
            &mut vec![false; group.len()],
            &mut vec![],
            &mut HashSet::new(),
            &mut accepted_sets,
        );
        accepted_sets
    }

    /// Every distinct set of accepted actions over all orderings: one choice
    /// per conflict group, combined across groups.
    fn outcomes(&self, actions: &[EnzymeAction]) -> Result<Vec<Vec<usize>>, DigestError> {
        let groups = Self::conflict_groups(actions);
        if let Some(largest) = groups.iter().map(|g| g.len()).max() {
            self.check_permutation_limit(largest)?;
        }
        let per_group: Vec<Vec<Vec<usize>>> = groups
            .iter()
            .map(|group| Self::distinct_accepted_sets(actions, group))
            .collect();

        let count = per_group
            .iter()
            .fold(1usize, |acc, sets| acc.saturating_mul(sets.len()));
        let limit = self.config.max_cut_outcomes;
        if count > limit {
            return Err(DigestError::TooManyCutOutcomes { count, limit });
        }
        debug!(
            "{} conflict group(s), {} distinct outcome(s)",
            groups.len(),
            count
        );

        Ok(per_group
            .iter()
            .multi_cartesian_product()
            .map(|choice| choice.into_iter().flatten().copied().sorted().collect())
            .collect())
    }

    /// Cuts with every possible ordering of the matched enzyme actions and
    /// returns the distinct fragments over all orderings.
    pub fn cut(
        &self,
        sequence: &str,
        enzymes: &[EnzymeSpec],
    ) -> Result<UniqueFragments, DigestError> {
        let seq = DNAsequence::from_sequence(sequence)?;
        let actions = self.create_enzyme_actions(&seq, enzymes)?;

        let ranges = if actions.len() <= 1 {
            vec![Self::apply_actions(&seq, &actions)?]
        } else {
            self.outcomes(&actions)?
                .iter()
                .map(|accepted| {
                    Self::apply_actions(&seq, accepted.iter().map(|id| &actions[*id]))
                })
                .collect::<Result<Vec<_>, _>>()?
        };

        let ret = Self::unique_fragments_for_display(&seq, &ranges);
        info!(
            "Cut {} bp with {} enzyme action(s), {} distinct outcome(s): {} unique fragment(s)",
            seq.len(),
            actions.len(),
            ranges.len(),
            ret.len()
        );
        Ok(ret)
    }
}

/// [`Analysis::cut`] with the default configuration and builtin catalog.
pub fn cut(sequence: &str, enzymes: &[EnzymeSpec]) -> Result<UniqueFragments, DigestError> {
    Analysis::default().cut(sequence, enzymes)
}

/// [`Analysis::cut_without_permutations`] with the default configuration and builtin catalog.
pub fn cut_without_permutations(
    sequence: &str,
    enzymes: &[EnzymeSpec],
) -> Result<UniqueFragments, DigestError> {
    Analysis::default().cut_without_permutations(sequence, enzymes)
}
