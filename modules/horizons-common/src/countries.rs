//! Static country-code lookup used to label location options.

use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Country {
    pub code: &'static str,
    pub name: &'static str,
    pub region: &'static str,
}

/// ISO 3166-1 alpha-2 code, display name, region.
const COUNTRIES: &[(&str, &str, &str)] = &[
    ("AD", "Andorra", "Europe"),
    ("AE", "United Arab Emirates", "Asia"),
    ("AF", "Afghanistan", "Asia"),
    ("AG", "Antigua and Barbuda", "North America"),
    ("AL", "Albania", "Europe"),
    ("AM", "Armenia", "Asia"),
    ("AO", "Angola", "Africa"),
    ("AR", "Argentina", "South America"),
    ("AT", "Austria", "Europe"),
    ("AU", "Australia", "Oceania"),
    ("AZ", "Azerbaijan", "Asia"),
    ("BA", "Bosnia and Herzegovina", "Europe"),
    ("BB", "Barbados", "North America"),
    ("BD", "Bangladesh", "Asia"),
    ("BE", "Belgium", "Europe"),
    ("BF", "Burkina Faso", "Africa"),
    ("BG", "Bulgaria", "Europe"),
    ("BH", "Bahrain", "Asia"),
    ("BI", "Burundi", "Africa"),
    ("BJ", "Benin", "Africa"),
    ("BN", "Brunei", "Asia"),
    ("BO", "Bolivia", "South America"),
    ("BR", "Brazil", "South America"),
    ("BS", "Bahamas", "North America"),
    ("BT", "Bhutan", "Asia"),
    ("BW", "Botswana", "Africa"),
    ("BY", "Belarus", "Europe"),
    ("BZ", "Belize", "North America"),
    ("CA", "Canada", "North America"),
    ("CD", "Democratic Republic of the Congo", "Africa"),
    ("CF", "Central African Republic", "Africa"),
    ("CG", "Republic of the Congo", "Africa"),
    ("CH", "Switzerland", "Europe"),
    ("CI", "Côte d'Ivoire", "Africa"),
    ("CL", "Chile", "South America"),
    ("CM", "Cameroon", "Africa"),
    ("CN", "China", "Asia"),
    ("CO", "Colombia", "South America"),
    ("CR", "Costa Rica", "North America"),
    ("CU", "Cuba", "North America"),
    ("CV", "Cabo Verde", "Africa"),
    ("CY", "Cyprus", "Europe"),
    ("CZ", "Czechia", "Europe"),
    ("DE", "Germany", "Europe"),
    ("DJ", "Djibouti", "Africa"),
    ("DK", "Denmark", "Europe"),
    ("DM", "Dominica", "North America"),
    ("DO", "Dominican Republic", "North America"),
    ("DZ", "Algeria", "Africa"),
    ("EC", "Ecuador", "South America"),
    ("EE", "Estonia", "Europe"),
    ("EG", "Egypt", "Africa"),
    ("ER", "Eritrea", "Africa"),
    ("ES", "Spain", "Europe"),
    ("ET", "Ethiopia", "Africa"),
    ("FI", "Finland", "Europe"),
    ("FJ", "Fiji", "Oceania"),
    ("FM", "Micronesia", "Oceania"),
    ("FR", "France", "Europe"),
    ("GA", "Gabon", "Africa"),
    ("GB", "United Kingdom", "Europe"),
    ("GD", "Grenada", "North America"),
    ("GE", "Georgia", "Asia"),
    ("GH", "Ghana", "Africa"),
    ("GM", "Gambia", "Africa"),
    ("GN", "Guinea", "Africa"),
    ("GQ", "Equatorial Guinea", "Africa"),
    ("GR", "Greece", "Europe"),
    ("GT", "Guatemala", "North America"),
    ("GW", "Guinea-Bissau", "Africa"),
    ("GY", "Guyana", "South America"),
    ("HK", "Hong Kong", "Asia"),
    ("HN", "Honduras", "North America"),
    ("HR", "Croatia", "Europe"),
    ("HT", "Haiti", "North America"),
    ("HU", "Hungary", "Europe"),
    ("ID", "Indonesia", "Asia"),
    ("IE", "Ireland", "Europe"),
    ("IL", "Israel", "Asia"),
    ("IN", "India", "Asia"),
    ("IQ", "Iraq", "Asia"),
    ("IR", "Iran", "Asia"),
    ("IS", "Iceland", "Europe"),
    ("IT", "Italy", "Europe"),
    ("JM", "Jamaica", "North America"),
    ("JO", "Jordan", "Asia"),
    ("JP", "Japan", "Asia"),
    ("KE", "Kenya", "Africa"),
    ("KG", "Kyrgyzstan", "Asia"),
    ("KH", "Cambodia", "Asia"),
    ("KI", "Kiribati", "Oceania"),
    ("KM", "Comoros", "Africa"),
    ("KN", "Saint Kitts and Nevis", "North America"),
    ("KP", "North Korea", "Asia"),
    ("KR", "South Korea", "Asia"),
    ("KW", "Kuwait", "Asia"),
    ("KZ", "Kazakhstan", "Asia"),
    ("LA", "Laos", "Asia"),
    ("LB", "Lebanon", "Asia"),
    ("LC", "Saint Lucia", "North America"),
    ("LI", "Liechtenstein", "Europe"),
    ("LK", "Sri Lanka", "Asia"),
    ("LR", "Liberia", "Africa"),
    ("LS", "Lesotho", "Africa"),
    ("LT", "Lithuania", "Europe"),
    ("LU", "Luxembourg", "Europe"),
    ("LV", "Latvia", "Europe"),
    ("LY", "Libya", "Africa"),
    ("MA", "Morocco", "Africa"),
    ("MC", "Monaco", "Europe"),
    ("MD", "Moldova", "Europe"),
    ("ME", "Montenegro", "Europe"),
    ("MG", "Madagascar", "Africa"),
    ("MH", "Marshall Islands", "Oceania"),
    ("MK", "North Macedonia", "Europe"),
    ("ML", "Mali", "Africa"),
    ("MM", "Myanmar", "Asia"),
    ("MN", "Mongolia", "Asia"),
    ("MR", "Mauritania", "Africa"),
    ("MT", "Malta", "Europe"),
    ("MU", "Mauritius", "Africa"),
    ("MV", "Maldives", "Asia"),
    ("MW", "Malawi", "Africa"),
    ("MX", "Mexico", "North America"),
    ("MY", "Malaysia", "Asia"),
    ("MZ", "Mozambique", "Africa"),
    ("NA", "Namibia", "Africa"),
    ("NE", "Niger", "Africa"),
    ("NG", "Nigeria", "Africa"),
    ("NI", "Nicaragua", "North America"),
    ("NL", "Netherlands", "Europe"),
    ("NO", "Norway", "Europe"),
    ("NP", "Nepal", "Asia"),
    ("NR", "Nauru", "Oceania"),
    ("NZ", "New Zealand", "Oceania"),
    ("OM", "Oman", "Asia"),
    ("PA", "Panama", "North America"),
    ("PE", "Peru", "South America"),
    ("PG", "Papua New Guinea", "Oceania"),
    ("PH", "Philippines", "Asia"),
    ("PK", "Pakistan", "Asia"),
    ("PL", "Poland", "Europe"),
    ("PR", "Puerto Rico", "North America"),
    ("PS", "Palestine", "Asia"),
    ("PT", "Portugal", "Europe"),
    ("PW", "Palau", "Oceania"),
    ("PY", "Paraguay", "South America"),
    ("QA", "Qatar", "Asia"),
    ("RO", "Romania", "Europe"),
    ("RS", "Serbia", "Europe"),
    ("RU", "Russia", "Europe"),
    ("RW", "Rwanda", "Africa"),
    ("SA", "Saudi Arabia", "Asia"),
    ("SB", "Solomon Islands", "Oceania"),
    ("SC", "Seychelles", "Africa"),
    ("SD", "Sudan", "Africa"),
    ("SE", "Sweden", "Europe"),
    ("SG", "Singapore", "Asia"),
    ("SI", "Slovenia", "Europe"),
    ("SK", "Slovakia", "Europe"),
    ("SL", "Sierra Leone", "Africa"),
    ("SM", "San Marino", "Europe"),
    ("SN", "Senegal", "Africa"),
    ("SO", "Somalia", "Africa"),
    ("SR", "Suriname", "South America"),
    ("SS", "South Sudan", "Africa"),
    ("ST", "São Tomé and Príncipe", "Africa"),
    ("SV", "El Salvador", "North America"),
    ("SY", "Syria", "Asia"),
    ("SZ", "Eswatini", "Africa"),
    ("TD", "Chad", "Africa"),
    ("TG", "Togo", "Africa"),
    ("TH", "Thailand", "Asia"),
    ("TJ", "Tajikistan", "Asia"),
    ("TL", "Timor-Leste", "Asia"),
    ("TM", "Turkmenistan", "Asia"),
    ("TN", "Tunisia", "Africa"),
    ("TO", "Tonga", "Oceania"),
    ("TR", "Turkey", "Asia"),
    ("TT", "Trinidad and Tobago", "North America"),
    ("TV", "Tuvalu", "Oceania"),
    ("TW", "Taiwan", "Asia"),
    ("TZ", "Tanzania", "Africa"),
    ("UA", "Ukraine", "Europe"),
    ("UG", "Uganda", "Africa"),
    ("US", "United States", "North America"),
    ("UY", "Uruguay", "South America"),
    ("UZ", "Uzbekistan", "Asia"),
    ("VA", "Vatican City", "Europe"),
    ("VC", "Saint Vincent and the Grenadines", "North America"),
    ("VE", "Venezuela", "South America"),
    ("VN", "Vietnam", "Asia"),
    ("VU", "Vanuatu", "Oceania"),
    ("WS", "Samoa", "Oceania"),
    ("XK", "Kosovo", "Europe"),
    ("YE", "Yemen", "Asia"),
    ("ZA", "South Africa", "Africa"),
    ("ZM", "Zambia", "Africa"),
    ("ZW", "Zimbabwe", "Africa"),
];

/// Lookup from country code to display name and region.
#[derive(Debug, Clone)]
pub struct CountryTable {
    by_code: HashMap<&'static str, Country>,
}

impl CountryTable {
    pub fn lookup(&self, code: &str) -> Option<&Country> {
        self.by_code.get(code)
    }

    /// Display label for a country code. The US is shown as "USA";
    /// unknown codes are shown as-is.
    pub fn label(&self, code: &str) -> String {
        if code == "US" {
            return "USA".to_string();
        }
        self.lookup(code)
            .map(|c| c.name.to_string())
            .unwrap_or_else(|| code.to_string())
    }
}

impl Default for CountryTable {
    fn default() -> Self {
        let by_code = COUNTRIES
            .iter()
            .map(|&(code, name, region)| (code, Country { code, name, region }))
            .collect();
        Self { by_code }
    }
}
