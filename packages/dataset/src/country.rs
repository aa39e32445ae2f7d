//! ISO 3166-1 alpha-3 country code mapping.
//!
//! The CPI dataset keys rows by alpha-3 codes while the population and
//! NHA datasets carry display names. This table normalizes the codes to
//! the same display names so per-country maps join across datasets.
//! Codes outside the table fall back to the code itself.

/// Looks up the display name for an ISO 3166-1 alpha-3 code.
///
/// Case-sensitive; source data is upper-case. Returns `None` for codes
/// outside the table.
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn country_name(alpha3: &str) -> Option<&'static str> {
    let name = match alpha3 {
        "ABW" => "Aruba",
        "AFG" => "Afghanistan",
        "AGO" => "Angola",
        "ALB" => "Albania",
        "ARE" => "United Arab Emirates",
        "ARG" => "Argentina",
        "ARM" => "Armenia",
        "AUS" => "Australia",
        "AUT" => "Austria",
        "AZE" => "Azerbaijan",
        "BEL" => "Belgium",
        "BGD" => "Bangladesh",
        "BGR" => "Bulgaria",
        "BIH" => "Bosnia and Herzegovina",
        "BLR" => "Belarus",
        "BOL" => "Bolivia",
        "BRA" => "Brazil",
        "BRB" => "Barbados",
        "CAN" => "Canada",
        "CHE" => "Switzerland",
        "CHL" => "Chile",
        "CHN" => "China",
        "CIV" => "Côte d'Ivoire",
        "CMR" => "Cameroon",
        "COL" => "Colombia",
        "CRI" => "Costa Rica",
        "CYP" => "Cyprus",
        "CZE" => "Czechia",
        "DEU" => "Germany",
        "DNK" => "Denmark",
        "DOM" => "Dominican Republic",
        "DZA" => "Algeria",
        "ECU" => "Ecuador",
        "EGY" => "Egypt",
        "ESP" => "Spain",
        "EST" => "Estonia",
        "ETH" => "Ethiopia",
        "FIN" => "Finland",
        "FRA" => "France",
        "GBR" => "United Kingdom",
        "GEO" => "Georgia",
        "GHA" => "Ghana",
        "GRC" => "Greece",
        "GTM" => "Guatemala",
        "HKG" => "Hong Kong",
        "HND" => "Honduras",
        "HRV" => "Croatia",
        "HUN" => "Hungary",
        "IDN" => "Indonesia",
        "IND" => "India",
        "IRL" => "Ireland",
        "IRN" => "Iran",
        "IRQ" => "Iraq",
        "ISL" => "Iceland",
        "ISR" => "Israel",
        "ITA" => "Italy",
        "JAM" => "Jamaica",
        "JOR" => "Jordan",
        "JPN" => "Japan",
        "KAZ" => "Kazakhstan",
        "KEN" => "Kenya",
        "KGZ" => "Kyrgyzstan",
        "KHM" => "Cambodia",
        "KOR" => "South Korea",
        "KWT" => "Kuwait",
        "LAO" => "Laos",
        "LBN" => "Lebanon",
        "LKA" => "Sri Lanka",
        "LTU" => "Lithuania",
        "LUX" => "Luxembourg",
        "LVA" => "Latvia",
        "MAR" => "Morocco",
        "MDA" => "Moldova",
        "MDG" => "Madagascar",
        "MEX" => "Mexico",
        "MKD" => "North Macedonia",
        "MLT" => "Malta",
        "MMR" => "Myanmar",
        "MNE" => "Montenegro",
        "MNG" => "Mongolia",
        "MOZ" => "Mozambique",
        "MUS" => "Mauritius",
        "MYS" => "Malaysia",
        "NGA" => "Nigeria",
        "NIC" => "Nicaragua",
        "NLD" => "Netherlands",
        "NOR" => "Norway",
        "NPL" => "Nepal",
        "NZL" => "New Zealand",
        "PAK" => "Pakistan",
        "PAN" => "Panama",
        "PER" => "Peru",
        "PHL" => "Philippines",
        "POL" => "Poland",
        "PRT" => "Portugal",
        "PRY" => "Paraguay",
        "QAT" => "Qatar",
        "ROU" => "Romania",
        "RUS" => "Russia",
        "RWA" => "Rwanda",
        "SAU" => "Saudi Arabia",
        "SEN" => "Senegal",
        "SGP" => "Singapore",
        "SLV" => "El Salvador",
        "SRB" => "Serbia",
        "SVK" => "Slovakia",
        "SVN" => "Slovenia",
        "SWE" => "Sweden",
        "THA" => "Thailand",
        "TJK" => "Tajikistan",
        "TUN" => "Tunisia",
        "TUR" => "Türkiye",
        "TZA" => "Tanzania",
        "UGA" => "Uganda",
        "UKR" => "Ukraine",
        "URY" => "Uruguay",
        "USA" => "United States",
        "UZB" => "Uzbekistan",
        "VEN" => "Venezuela",
        "VNM" => "Vietnam",
        "ZAF" => "South Africa",
        "ZMB" => "Zambia",
        "ZWE" => "Zimbabwe",
        _ => return None,
    };
    Some(name)
}

/// Display name for an alpha-3 code, falling back to the code itself for
/// codes outside the table.
#[must_use]
pub fn display_name(alpha3: &str) -> String {
    country_name(alpha3).map_or_else(|| alpha3.to_string(), ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_known_codes() {
        assert_eq!(country_name("PRT"), Some("Portugal"));
        assert_eq!(country_name("USA"), Some("United States"));
        assert_eq!(country_name("ABW"), Some("Aruba"));
    }

    #[test]
    fn unknown_code_falls_back_to_itself() {
        assert_eq!(country_name("XXX"), None);
        assert_eq!(display_name("XXX"), "XXX");
    }

    #[test]
    fn lookup_is_case_sensitive() {
        assert_eq!(country_name("prt"), None);
    }
}
