//! Built-in API profiles.

use apifetch_types::{ApiProfile, FieldFormat, FieldSpec, ResponseEnvelope};
use indexmap::IndexMap;

pub const JSONPLACEHOLDER: &str = "jsonplaceholder";
pub const RANDOMUSER: &str = "randomuser";
pub const COINGECKO: &str = "coingecko";

/// All built-in profiles in registration order.
pub fn builtin_profiles() -> Vec<ApiProfile> {
    vec![jsonplaceholder(), randomuser(), coingecko()]
}

/// Plain-array user list.
pub fn jsonplaceholder() -> ApiProfile {
    ApiProfile {
        name: JSONPLACEHOLDER.to_string(),
        title: "JSONPlaceholder Users API".to_string(),
        base_url: "https://jsonplaceholder.typicode.com/users".to_string(),
        query: IndexMap::new(),
        envelope: ResponseEnvelope::RootArray,
        record_label: "User".to_string(),
        fields: vec![
            FieldSpec::required("Name", "name"),
            FieldSpec::required("Username", "username"),
            FieldSpec::required("Email", "email"),
            FieldSpec::optional("City", "address.city"),
        ],
    }
}

/// Random users wrapped in `{"results": [...], "info": {...}}`.
pub fn randomuser() -> ApiProfile {
    ApiProfile {
        name: RANDOMUSER.to_string(),
        title: "Random User Generator API".to_string(),
        base_url: "https://randomuser.me/api/".to_string(),
        query: query(&[("results", "10")]),
        envelope: ResponseEnvelope::Nested("results".to_string()),
        record_label: "User".to_string(),
        fields: vec![
            FieldSpec::joined("Name", &["name.first", "name.last"]),
            FieldSpec::required("Email", "email"),
            FieldSpec::optional("City", "location.city"),
            FieldSpec::optional("Country", "location.country"),
        ],
    }
}

/// Market data for the top coins by market cap.
pub fn coingecko() -> ApiProfile {
    ApiProfile {
        name: COINGECKO.to_string(),
        title: "CoinGecko Cryptocurrency API".to_string(),
        base_url: "https://api.coingecko.com/api/v3/coins/markets".to_string(),
        query: query(&[
            ("vs_currency", "usd"),
            ("order", "market_cap_desc"),
            ("per_page", "10"),
            ("page", "1"),
        ]),
        envelope: ResponseEnvelope::RootArray,
        record_label: "Crypto".to_string(),
        fields: vec![
            FieldSpec::required("Name", "name"),
            FieldSpec::required("Symbol", "symbol").with_format(FieldFormat::Uppercase),
            FieldSpec::required("Current Price", "current_price").with_format(FieldFormat::Currency { decimals: 2 }),
            FieldSpec::optional("Market Cap", "market_cap").with_format(FieldFormat::Currency { decimals: 0 }),
        ],
    }
}

fn query(pairs: &[(&str, &str)]) -> IndexMap<String, String> {
    pairs.iter().map(|(key, value)| (key.to_string(), value.to_string())).collect()
}
