use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Cities where the district picker is mandatory, keyed by country id
const DISTRICT_REQUIRED: &[(&str, &str)] = &[("by", "Минск"), ("ru", "Москва")];

/// User-selected search location, cached on the device
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// Country id, e.g. "by"
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub country_name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub district: Option<String>,
}

impl Location {
    pub fn new(
        country: impl Into<String>,
        country_name: impl Into<String>,
        city: impl Into<String>,
        district: Option<String>,
    ) -> Self {
        Self {
            country: country.into(),
            country_name: country_name.into(),
            city: city.into(),
            district: district.filter(|d| !d.is_empty()),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.country.is_empty() && !self.city.is_empty()
    }

    /// "City (District), Country" or "City, Country"; `None` until complete.
    pub fn formatted(&self) -> Option<String> {
        if !self.is_complete() {
            return None;
        }

        Some(match self.district.as_deref() {
            Some(district) if !district.is_empty() => {
                format!("{} ({}), {}", self.city, district, self.country_name)
            }
            _ => format!("{}, {}", self.city, self.country_name),
        })
    }

    pub fn requires_district(&self) -> bool {
        DISTRICT_REQUIRED
            .iter()
            .any(|(country, city)| *country == self.country && *city == self.city)
    }

    pub fn validate(&self) -> Result<()> {
        if self.country.is_empty() || self.city.is_empty() {
            return Err(Error::InvalidLocation(
                "country and city must be selected".to_string(),
            ));
        }

        let has_district = self.district.as_deref().is_some_and(|d| !d.is_empty());
        if self.requires_district() && !has_district {
            return Err(Error::InvalidLocation(format!(
                "a district must be selected for {}",
                self.city
            )));
        }

        Ok(())
    }
}
