//! Station lookup by name, line membership and interchange flags.

use std::collections::{BTreeSet, HashMap};

use strsim::{jaro_winkler, normalized_levenshtein};

use crate::domain::{Line, LineId, Station};

/// Minimum combined similarity for a fuzzy suggestion.
const SUGGEST_THRESHOLD: f64 = 0.65;

/// Lookup tables over a graph's stations, computed once at build time.
///
/// All positions are dense station indices.
#[derive(Debug, Clone, Default)]
pub(crate) struct StationIndex {
    /// Normalized name to station. First station with a name wins.
    by_name: HashMap<String, usize>,

    /// Normalized synonym to station.
    by_synonym: HashMap<String, usize>,

    /// Lowercased name per station, for substring search.
    lower_names: Vec<String>,

    /// Station positions ordered by name, then id.
    alphabetical: Vec<usize>,

    /// Distinct station names, sorted.
    sorted_names: Vec<String>,

    lines_by_station: Vec<Vec<LineId>>,
    interchange: Vec<bool>,
}

/// Normalize a name for exact lookup.
fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

impl StationIndex {
    /// Build the index.
    ///
    /// `memberships[i]` lists the dense line indices serving station `i`;
    /// `synonyms` pairs an alternative name with a station position.
    pub(crate) fn build(
        stations: &[Station],
        lines: &[Line],
        memberships: &[Vec<usize>],
        synonyms: &[(String, usize)],
    ) -> Self {
        let mut by_name = HashMap::with_capacity(stations.len());
        for (pos, station) in stations.iter().enumerate() {
            by_name.entry(normalize(&station.name)).or_insert(pos);
        }

        let mut by_synonym = HashMap::with_capacity(synonyms.len());
        for (alias, pos) in synonyms {
            let key = normalize(alias);
            if !key.is_empty() {
                by_synonym.entry(key).or_insert(*pos);
            }
        }

        let lower_names: Vec<String> = stations.iter().map(|s| s.name.to_lowercase()).collect();

        let mut alphabetical: Vec<usize> = (0..stations.len()).collect();
        alphabetical.sort_by(|&a, &b| {
            stations[a]
                .name
                .cmp(&stations[b].name)
                .then(stations[a].id.cmp(&stations[b].id))
        });

        let sorted_names: Vec<String> = stations
            .iter()
            .map(|s| s.name.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut lines_by_station = Vec::with_capacity(stations.len());
        let mut interchange = Vec::with_capacity(stations.len());
        for pos in 0..stations.len() {
            let serving = memberships.get(pos).map(Vec::as_slice).unwrap_or(&[]);

            let mut ids: Vec<LineId> = serving.iter().map(|&l| lines[l].id).collect();
            ids.sort();
            ids.dedup();

            let keys: BTreeSet<_> = serving.iter().map(|&l| &lines[l].key).collect();
            interchange.push(keys.len() >= 2);
            lines_by_station.push(ids);
        }

        Self {
            by_name,
            by_synonym,
            lower_names,
            alphabetical,
            sorted_names,
            lines_by_station,
            interchange,
        }
    }

    /// Exact case-insensitive match on name, then on synonyms.
    pub(crate) fn find_by_name(&self, name: &str) -> Option<usize> {
        let key = normalize(name);
        if key.is_empty() {
            return None;
        }
        self.by_name
            .get(&key)
            .or_else(|| self.by_synonym.get(&key))
            .copied()
    }

    pub(crate) fn lines_for(&self, pos: usize) -> &[LineId] {
        self.lines_by_station
            .get(pos)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub(crate) fn is_interchange(&self, pos: usize) -> bool {
        self.interchange.get(pos).copied().unwrap_or(false)
    }

    pub(crate) fn station_names(&self) -> &[String] {
        &self.sorted_names
    }

    /// Substring search. Prefix matches come first, each group alphabetical.
    pub(crate) fn search(&self, query: &str, limit: usize) -> Vec<usize> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() || limit == 0 {
            return Vec::new();
        }

        let (mut prefix, mut inner): (Vec<usize>, Vec<usize>) = self
            .alphabetical
            .iter()
            .copied()
            .filter(|&pos| self.lower_names[pos].contains(&needle))
            .partition(|&pos| self.lower_names[pos].starts_with(&needle));

        prefix.append(&mut inner);
        prefix.truncate(limit);
        prefix
    }

    /// Station names similar to `name`, best first.
    ///
    /// Similarity is 70% Jaro-Winkler plus 30% normalized Levenshtein on
    /// lowercased names.
    pub(crate) fn suggest(&self, stations: &[Station], name: &str, limit: usize) -> Vec<String> {
        let input = normalize(name);
        if input.is_empty() || limit == 0 {
            return Vec::new();
        }

        let mut scored: Vec<(f64, &str)> = Vec::new();
        for &pos in &self.alphabetical {
            let candidate = &self.lower_names[pos];
            let score =
                jaro_winkler(&input, candidate) * 0.7 + normalized_levenshtein(&input, candidate) * 0.3;
            if score >= SUGGEST_THRESHOLD {
                scored.push((score, stations[pos].name.as_str()));
            }
        }

        scored.sort_by(|a, b| b.0.total_cmp(&a.0).then(a.1.cmp(b.1)));

        let mut out: Vec<String> = Vec::new();
        for (_, candidate) in scored {
            if out.iter().all(|seen| seen != candidate) {
                out.push(candidate.to_string());
            }
            if out.len() == limit {
                break;
            }
        }
        out
    }
}
