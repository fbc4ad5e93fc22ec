use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::lookup::GeographicLookup;

/// One level of the province → district → municipality → ward chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressLevel {
    Province,
    District,
    Municipality,
    Ward,
}

impl AddressLevel {
    /// All levels in render order
    pub const ALL: [AddressLevel; 4] = [
        AddressLevel::Province,
        AddressLevel::District,
        AddressLevel::Municipality,
        AddressLevel::Ward,
    ];

    pub fn parent(self) -> Option<AddressLevel> {
        match self {
            AddressLevel::Province => None,
            AddressLevel::District => Some(AddressLevel::Province),
            AddressLevel::Municipality => Some(AddressLevel::District),
            AddressLevel::Ward => Some(AddressLevel::Municipality),
        }
    }

    /// Every level strictly below this one, nearest first
    pub fn deeper(self) -> impl Iterator<Item = AddressLevel> {
        Self::ALL.into_iter().skip(self.index() + 1)
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AddressLevel::Province => "province",
            AddressLevel::District => "district",
            AddressLevel::Municipality => "municipality",
            AddressLevel::Ward => "ward",
        }
    }
}

impl fmt::Display for AddressLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown address level: {0}")]
pub struct UnknownLevel(pub String);

impl FromStr for AddressLevel {
    type Err = UnknownLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "province" => Ok(AddressLevel::Province),
            "district" => Ok(AddressLevel::District),
            "municipality" => Ok(AddressLevel::Municipality),
            "ward" => Ok(AddressLevel::Ward),
            _ => Err(UnknownLevel(s.to_string())),
        }
    }
}

/// Address fields owned by the host form. `city` and `tole` are free text and
/// take no part in the cascade.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AddressSelection {
    pub province: String,
    pub district: String,
    pub municipality: String,
    pub ward: String,
    pub city: String,
    pub tole: String,
}

impl AddressSelection {
    pub fn get(&self, level: AddressLevel) -> &str {
        match level {
            AddressLevel::Province => &self.province,
            AddressLevel::District => &self.district,
            AddressLevel::Municipality => &self.municipality,
            AddressLevel::Ward => &self.ward,
        }
    }

    pub fn set(&mut self, level: AddressLevel, value: impl Into<String>) {
        let value = value.into();
        match level {
            AddressLevel::Province => self.province = value,
            AddressLevel::District => self.district = value,
            AddressLevel::Municipality => self.municipality = value,
            AddressLevel::Ward => self.ward = value,
        }
    }

    /// Value of the level this one depends on; `None` for the top level
    pub fn parent_value(&self, level: AddressLevel) -> Option<&str> {
        level.parent().map(|parent| self.get(parent))
    }

    /// True when every non-empty level is a member of the options its parent yields
    pub fn is_consistent(&self, lookup: &GeographicLookup) -> bool {
        self.first_invalid_level(lookup).is_none()
    }

    /// Shallowest non-empty level whose value is not offered under its parent
    pub fn first_invalid_level(&self, lookup: &GeographicLookup) -> Option<AddressLevel> {
        AddressLevel::ALL
            .into_iter()
            .filter(|level| *level != AddressLevel::Province)
            .find(|level| {
                let value = self.get(*level);
                !value.is_empty() && !lookup.contains(*level, self, value)
            })
    }
}

/// Partial update proposed to the host form; `None` fields are left alone
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub municipality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ward: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tole: Option<String>,
}

impl AddressPatch {
    pub fn is_empty(&self) -> bool {
        self.province.is_none()
            && self.district.is_none()
            && self.municipality.is_none()
            && self.ward.is_none()
            && self.city.is_none()
            && self.tole.is_none()
    }

    pub fn get(&self, level: AddressLevel) -> Option<&str> {
        match level {
            AddressLevel::Province => self.province.as_deref(),
            AddressLevel::District => self.district.as_deref(),
            AddressLevel::Municipality => self.municipality.as_deref(),
            AddressLevel::Ward => self.ward.as_deref(),
        }
    }

    pub fn set(&mut self, level: AddressLevel, value: impl Into<String>) {
        let value = Some(value.into());
        match level {
            AddressLevel::Province => self.province = value,
            AddressLevel::District => self.district = value,
            AddressLevel::Municipality => self.municipality = value,
            AddressLevel::Ward => self.ward = value,
        }
    }

    /// Fields that differ between two selections
    pub fn diff(before: &AddressSelection, after: &AddressSelection) -> Self {
        fn changed(a: &str, b: &str) -> Option<String> {
            (a != b).then(|| b.to_string())
        }

        Self {
            province: changed(&before.province, &after.province),
            district: changed(&before.district, &after.district),
            municipality: changed(&before.municipality, &after.municipality),
            ward: changed(&before.ward, &after.ward),
            city: changed(&before.city, &after.city),
            tole: changed(&before.tole, &after.tole),
        }
    }

    /// Host-side merge of the patch into its own selection state
    pub fn merge_into(&self, selection: &mut AddressSelection) {
        let fields = [
            (&self.province, &mut selection.province),
            (&self.district, &mut selection.district),
            (&self.municipality, &mut selection.municipality),
            (&self.ward, &mut selection.ward),
            (&self.city, &mut selection.city),
            (&self.tole, &mut selection.tole),
        ];
        for (patch, target) in fields {
            if let Some(value) = patch {
                target.clone_from(value);
            }
        }
    }
}
