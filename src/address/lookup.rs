use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use super::selection::{AddressLevel, AddressSelection};

/// Static province → district → municipality → ward tables.
///
/// Loaded once and never mutated. Missing keys read as an empty option list,
/// so an empty lookup disables every level below the province.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeographicLookup {
    #[serde(rename = "allProvinces", default)]
    pub all_provinces: Vec<String>,
    #[serde(rename = "provinceDistrictsMap", default)]
    pub province_districts: HashMap<String, Vec<String>>,
    #[serde(rename = "districtMunicipalitiesMap", default)]
    pub district_municipalities: HashMap<String, Vec<String>>,
    #[serde(rename = "municipalitiesWardsMap", default)]
    pub municipality_wards: HashMap<String, Vec<String>>,
}

/// A child name listed under a parent that has no table of its own
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsistencyIssue {
    pub level: AddressLevel,
    pub parent: String,
    pub name: String,
}

impl GeographicLookup {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.all_provinces.is_empty()
    }

    pub fn provinces(&self) -> &[String] {
        &self.all_provinces
    }

    pub fn districts(&self, province: &str) -> &[String] {
        Self::children(&self.province_districts, province)
    }

    pub fn municipalities(&self, district: &str) -> &[String] {
        Self::children(&self.district_municipalities, district)
    }

    pub fn wards(&self, municipality: &str) -> &[String] {
        Self::children(&self.municipality_wards, municipality)
    }

    fn children<'a>(map: &'a HashMap<String, Vec<String>>, parent: &str) -> &'a [String] {
        if parent.is_empty() {
            return &[];
        }
        map.get(parent).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Options offered at `level` given the parent value held in `selection`
    pub fn options_for(&self, level: AddressLevel, selection: &AddressSelection) -> &[String] {
        match level {
            AddressLevel::Province => self.provinces(),
            AddressLevel::District => self.districts(&selection.province),
            AddressLevel::Municipality => self.municipalities(&selection.district),
            AddressLevel::Ward => self.wards(&selection.municipality),
        }
    }

    /// Membership check against the options freshly computed from `selection`
    pub fn contains(&self, level: AddressLevel, selection: &AddressSelection, value: &str) -> bool {
        self.options_for(level, selection).iter().any(|option| option == value)
    }

    /// Names listed as children that have no entry in the next table down.
    /// Lookups for those names still yield empty option lists.
    pub fn consistency_issues(&self) -> Vec<ConsistencyIssue> {
        let mut issues = Vec::new();
        let mut seen_districts = HashSet::new();
        let mut seen_municipalities = HashSet::new();

        for province in &self.all_provinces {
            if !self.province_districts.contains_key(province) {
                issues.push(ConsistencyIssue {
                    level: AddressLevel::Province,
                    parent: String::new(),
                    name: province.clone(),
                });
            }
        }

        for province in &self.all_provinces {
            for district in self.districts(province) {
                if !seen_districts.insert(district.as_str()) {
                    continue;
                }
                if !self.district_municipalities.contains_key(district) {
                    issues.push(ConsistencyIssue {
                        level: AddressLevel::District,
                        parent: province.clone(),
                        name: district.clone(),
                    });
                    continue;
                }
                for municipality in self.municipalities(district) {
                    if !seen_municipalities.insert(municipality.as_str()) {
                        continue;
                    }
                    if !self.municipality_wards.contains_key(municipality) {
                        issues.push(ConsistencyIssue {
                            level: AddressLevel::Municipality,
                            parent: district.clone(),
                            name: municipality.clone(),
                        });
                    }
                }
            }
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_lookup;
    use serde_json::json;

    #[test]
    fn missing_keys_yield_empty_options() {
        let lookup = sample_lookup();
        assert!(lookup.districts("Atlantis").is_empty());
        assert!(lookup.municipalities("").is_empty());
        assert!(lookup.wards("Nowhere").is_empty());
    }

    #[test]
    fn empty_lookup_offers_nothing() {
        let lookup = GeographicLookup::empty();
        let selection = AddressSelection::default();
        assert!(lookup.is_empty());
        for level in AddressLevel::ALL {
            assert!(lookup.options_for(level, &selection).is_empty());
        }
    }

    #[test]
    fn options_follow_parent_value() {
        let lookup = sample_lookup();
        let selection = AddressSelection {
            province: "Bagmati".into(),
            district: "Kathmandu".into(),
            ..Default::default()
        };
        assert_eq!(
            lookup.options_for(AddressLevel::District, &selection),
            ["Kathmandu", "Lalitpur"]
        );
        assert_eq!(lookup.options_for(AddressLevel::Municipality, &selection), ["KMC", "Kirtipur"]);
        assert!(lookup.options_for(AddressLevel::Ward, &selection).is_empty());
    }

    #[test]
    fn deserializes_resource_field_names() {
        let lookup: GeographicLookup = serde_json::from_value(json!({
            "allProvinces": ["Bagmati", "Gandaki"],
            "provinceDistrictsMap": { "Bagmati": ["Kathmandu", "Lalitpur"] }
        }))
        .unwrap();
        assert_eq!(lookup.provinces(), ["Bagmati", "Gandaki"]);
        assert_eq!(lookup.districts("Bagmati"), ["Kathmandu", "Lalitpur"]);
        assert!(lookup.districts("Gandaki").is_empty());
        assert!(lookup.municipality_wards.is_empty());
    }

    #[test]
    fn reports_dangling_children() {
        let lookup: GeographicLookup = serde_json::from_value(json!({
            "allProvinces": ["Bagmati", "Gandaki"],
            "provinceDistrictsMap": { "Bagmati": ["Kathmandu", "Lalitpur"] },
            "districtMunicipalitiesMap": { "Kathmandu": ["KMC"] },
            "municipalitiesWardsMap": {}
        }))
        .unwrap();

        let issues = lookup.consistency_issues();
        let names: Vec<_> = issues.iter().map(|i| (i.level, i.name.as_str())).collect();
        assert_eq!(
            names,
            vec![
                (AddressLevel::Province, "Gandaki"),
                (AddressLevel::Municipality, "KMC"),
                (AddressLevel::District, "Lalitpur"),
            ]
        );
    }

    #[test]
    fn sample_lookup_is_consistent() {
        assert!(sample_lookup().consistency_issues().is_empty());
    }
}
