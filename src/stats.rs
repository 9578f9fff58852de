//! Frequency counts, grouping and top-K selection over location datasets.
//!
//! Everything here is a pure function of its input slice. Ties in a top-K
//! ranking keep the order in which values were first seen in the input, so a
//! static dataset always produces the same ranking.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::hash::Hash;

use crate::location::NamedLocation;

/// Count `selector(item)` across `items` and return the `k` most frequent
/// values, most frequent first. Equal counts keep first-seen order.
pub fn top_by_field<'a, T, K, F>(items: &'a [T], selector: F, k: usize) -> Vec<(K, usize)>
where
    F: Fn(&'a T) -> K,
    K: Eq + Hash + Clone,
{
    let mut slots: HashMap<K, usize> = HashMap::new();
    let mut counts: Vec<(K, usize)> = Vec::new();

    for item in items {
        let key = selector(item);
        match slots.get(&key) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                slots.insert(key.clone(), counts.len());
                counts.push((key, 1));
            }
        }
    }

    // sort_by is stable: first-seen order survives among equal counts
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(k);
    counts
}

/// Items bucketed by a key, borrowed from the input.
///
/// Members keep input order. Keys iterate in first-seen order; use
/// [`Groups::sorted_keys`] for alphabetical listings.
#[derive(Debug, Clone)]
pub struct Groups<'a, K, T> {
    order: Vec<K>,
    members: HashMap<K, Vec<&'a T>>,
}

impl<'a, K: Eq + Hash + Clone, T> Groups<'a, K, T> {
    pub fn get<Q>(&self, key: &Q) -> Option<&[&'a T]>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.members.get(key).map(Vec::as_slice)
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.order.iter()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &[&'a T])> {
        self.order.iter().map(move |k| (k, self.members[k].as_slice()))
    }

    pub fn sorted_keys(&self) -> Vec<&K>
    where
        K: Ord,
    {
        let mut keys: Vec<&K> = self.order.iter().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Bucket `items` by `selector`.
pub fn group_by_field<'a, T, K, F>(items: &'a [T], selector: F) -> Groups<'a, K, T>
where
    F: Fn(&'a T) -> K,
    K: Eq + Hash + Clone,
{
    let mut order = Vec::new();
    let mut members: HashMap<K, Vec<&'a T>> = HashMap::new();

    for item in items {
        let key = selector(item);
        match members.get_mut(&key) {
            Some(bucket) => bucket.push(item),
            None => {
                order.push(key.clone());
                members.insert(key, vec![item]);
            }
        }
    }

    Groups { order, members }
}

/// Distinct values of `selector`, ascending.
pub fn unique_values<'a, T, K, F>(items: &'a [T], selector: F) -> BTreeSet<K>
where
    F: Fn(&'a T) -> K,
    K: Ord,
{
    items.iter().map(selector).collect()
}

/// Items whose `selector` value equals `value`, in input order.
pub fn filter_by_field<'a, T, K, F>(items: &'a [T], selector: F, value: &K) -> Vec<&'a T>
where
    F: Fn(&'a T) -> K,
    K: PartialEq,
{
    items.iter().filter(|item| selector(*item) == *value).collect()
}

/// Drop records whose (name, county, coordinate) identity was already seen.
pub fn distinct_locations(items: &[NamedLocation]) -> Vec<&NamedLocation> {
    let mut seen = HashSet::new();
    items.iter().filter(|loc| seen.insert(loc.identity())).collect()
}

/// Named field of a [`NamedLocation`], for callers that pick a field at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationField {
    Name,
    Region,
    County,
}

impl LocationField {
    /// Field value; a missing county reads as "unknown".
    pub fn select<'a>(&self, loc: &'a NamedLocation) -> &'a str {
        match self {
            Self::Name => &loc.name,
            Self::Region => &loc.region,
            Self::County => loc.county.as_deref().unwrap_or("unknown"),
        }
    }
}

impl std::str::FromStr for LocationField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "region" | "state" => Ok(Self::Region),
            "county" => Ok(Self::County),
            _ => Err(format!("Unknown field '{}'. Use 'name', 'region' or 'county'.", s)),
        }
    }
}

/// Summary shown on a listing page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateStats {
    pub top_names: Vec<(String, usize)>,
    pub top_regions: Vec<(String, usize)>,
    /// Region → records in input order. Keys are sorted for stable output.
    pub by_region: BTreeMap<String, Vec<NamedLocation>>,
}

impl AggregateStats {
    /// Compute once per dataset load; callers keep the result.
    pub fn compute(locations: &[NamedLocation], k: usize) -> Self {
        let owned = |(value, count): (&str, usize)| (value.to_string(), count);

        let top_names = top_by_field(locations, |l| l.name.as_str(), k)
            .into_iter()
            .map(owned)
            .collect();
        let top_regions = top_by_field(locations, |l| l.region.as_str(), k)
            .into_iter()
            .map(owned)
            .collect();
        let by_region = group_by_field(locations, |l| l.region.as_str())
            .iter()
            .map(|(region, members)| {
                (region.to_string(), members.iter().map(|&l| l.clone()).collect())
            })
            .collect();

        Self { top_names, top_regions, by_region }
    }

    /// Regions for a selection list, ascending.
    pub fn regions(&self) -> Vec<&str> {
        self.by_region.keys().map(String::as_str).collect()
    }

    pub fn total(&self) -> usize {
        self.by_region.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Coordinate;

    fn loc(name: &str, region: &str, lat: f64, lon: f64) -> NamedLocation {
        NamedLocation::new(name, region, Coordinate::new(lat, lon).unwrap(), None).unwrap()
    }

    fn rock_sample() -> Vec<NamedLocation> {
        vec![
            loc("Rockville", "Maryland", 39.084, -77.1528),
            loc("Rock Hill", "South Carolina", 34.9249, -81.0251),
            loc("Rockville", "Indiana", 39.7628, -87.2292),
            loc("Little Rock", "Arkansas", 34.7465, -92.2896),
            loc("Rockport", "Texas", 28.0206, -97.0544),
            loc("Rockport", "Maine", 44.1859, -69.0762),
            loc("Rockville", "Connecticut", 41.8668, -72.4495),
            loc("Rock Springs", "Wyoming", 41.5875, -109.2029),
            loc("Rockford", "Illinois", 42.2711, -89.094),
            loc("Rock Island", "Illinois", 41.5095, -90.5787),
        ]
    }

    #[test]
    fn test_top_by_field_example() {
        let items = vec![
            loc("Rockville", "MD", 39.08, -77.15),
            loc("Rockville", "IN", 39.76, -87.22),
            loc("Rock Hill", "SC", 34.92, -81.02),
        ];
        let top = top_by_field(&items, |l| l.name.as_str(), 2);
        assert_eq!(top, vec![("Rockville", 2), ("Rock Hill", 1)]);
    }

    #[test]
    fn test_top_by_field_ties_keep_first_seen() {
        let data = rock_sample();
        let top = top_by_field(&data, |l| l.name.as_str(), 4);
        assert_eq!(
            top,
            vec![("Rockville", 3), ("Rockport", 2), ("Rock Hill", 1), ("Little Rock", 1)]
        );

        let regions = top_by_field(&data, |l| l.region.as_str(), 2);
        assert_eq!(regions, vec![("Illinois", 2), ("Maryland", 1)]);
    }

    #[test]
    fn test_top_by_field_k_larger_than_distinct() {
        let data = rock_sample();
        assert_eq!(top_by_field(&data, |l| l.region.as_str(), 100).len(), 9);
        assert!(top_by_field(&data, |l| l.region.as_str(), 0).is_empty());
    }

    #[test]
    fn test_group_by_field_preserves_order() {
        let data = rock_sample();
        let groups = group_by_field(&data, |l| l.region.as_str());

        let illinois = groups.get("Illinois").unwrap();
        assert_eq!(illinois.len(), 2);
        assert_eq!(illinois[0].name, "Rockford");
        assert_eq!(illinois[1].name, "Rock Island");

        let first_keys: Vec<&&str> = groups.keys().take(3).collect();
        assert_eq!(first_keys, vec![&"Maryland", &"South Carolina", &"Indiana"]);
        assert_eq!(groups.sorted_keys()[0], &"Arkansas");
        assert_eq!(groups.len(), 9);
    }

    #[test]
    fn test_unique_values_sorted_and_deduplicated() {
        let data = rock_sample();
        let names = unique_values(&data, |l| l.name.as_str());
        let names: Vec<&str> = names.into_iter().collect();
        assert_eq!(
            names,
            vec!["Little Rock", "Rock Hill", "Rock Island", "Rock Springs", "Rockford", "Rockport", "Rockville"]
        );
    }

    #[test]
    fn test_empty_collection() {
        let empty: Vec<NamedLocation> = Vec::new();
        assert!(top_by_field(&empty, |l| l.name.as_str(), 4).is_empty());
        assert!(group_by_field(&empty, |l| l.region.as_str()).is_empty());
        assert!(unique_values(&empty, |l| l.region.as_str()).is_empty());
        assert!(distinct_locations(&empty).is_empty());

        let stats = AggregateStats::compute(&empty, 4);
        assert!(stats.top_names.is_empty());
        assert!(stats.top_regions.is_empty());
        assert!(stats.by_region.is_empty());
    }

    #[test]
    fn test_filter_by_field() {
        let data = rock_sample();
        let maine = filter_by_field(&data, |l| l.region.as_str(), &"Maine");
        assert_eq!(maine.len(), 1);
        assert_eq!(maine[0].name, "Rockport");
        assert!(filter_by_field(&data, |l| l.region.as_str(), &"Alaska").is_empty());
    }

    #[test]
    fn test_distinct_locations() {
        let mut data = rock_sample();
        data.push(loc("Rockville", "MD", 39.084, -77.1528));
        data.push(loc("Rockville", "Maryland", 39.085, -77.1528));
        let distinct = distinct_locations(&data);
        assert_eq!(distinct.len(), 11);
        assert_eq!(distinct[0].region, "Maryland");
    }

    #[test]
    fn test_input_not_mutated() {
        let data = rock_sample();
        let before = data.clone();
        let _ = AggregateStats::compute(&data, 4);
        assert_eq!(data, before);
    }

    #[test]
    fn test_aggregate_stats() {
        let data = rock_sample();
        let stats = AggregateStats::compute(&data, 4);
        assert_eq!(stats.top_names[0], ("Rockville".to_string(), 3));
        assert_eq!(stats.top_regions[0], ("Illinois".to_string(), 2));
        assert_eq!(stats.regions().first(), Some(&"Arkansas"));
        assert_eq!(stats.total(), data.len());
        assert_eq!(stats.by_region["Illinois"][1].name, "Rock Island");
    }

    #[test]
    fn test_location_field() {
        let data = rock_sample();
        assert_eq!(LocationField::Region.select(&data[0]), "Maryland");
        assert_eq!(LocationField::County.select(&data[0]), "unknown");
        assert_eq!("state".parse::<LocationField>(), Ok(LocationField::Region));

        let by_field = top_by_field(&data, |l| LocationField::Name.select(l), 1);
        assert_eq!(by_field, vec![("Rockville", 3)]);
    }
}
