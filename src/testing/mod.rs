use crate::address::GeographicLookup;

/// Lookup built from the same documents the integration tests serve
pub fn sample_lookup() -> GeographicLookup {
    fn parse<T: serde::de::DeserializeOwned>(raw: &str) -> T {
        serde_json::from_str(raw).expect("fixture document is valid JSON")
    }

    GeographicLookup {
        all_provinces: parse(include_str!("../../tests/fixtures/lookup/allProvinces.json")),
        province_districts: parse(include_str!("../../tests/fixtures/lookup/provinceDistrictsMap.json")),
        district_municipalities: parse(include_str!(
            "../../tests/fixtures/lookup/districtMunicipalitiesMap.json"
        )),
        municipality_wards: parse(include_str!("../../tests/fixtures/lookup/municipalitiesWardsMap.json")),
    }
}
