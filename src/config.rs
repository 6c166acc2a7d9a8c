use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeskConfig {
    pub api_base_url: String,
    /// Without a token the route viewer renders text instead of a map.
    pub mapbox_access_token: Option<String>,
    pub map: MapSettings,
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            mapbox_access_token: None,
            map: MapSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapSettings {
    pub center_lng: f64,
    pub center_lat: f64,
    pub zoom: f64,
    pub fit_padding: u32,
    pub line_width: f64,
    pub line_opacity: f64,
    pub style: String,
}

impl Default for MapSettings {
    fn default() -> Self {
        // London
        Self {
            center_lng: -0.1278,
            center_lat: 51.5074,
            zoom: 10.0,
            fit_padding: 50,
            line_width: 3.0,
            line_opacity: 0.8,
            style: "mapbox://styles/mapbox/streets-v11".to_string(),
        }
    }
}

impl DeskConfig {
    /// Values baked in at compile time (the crate's `build.rs` forwards `.env`).
    pub fn from_env() -> Self {
        Self::from_lookup(compiled_var)
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = MapSettings::default();

        let map = MapSettings {
            center_lng: parse_or(var("MAP_CENTER_LNG"), "MAP_CENTER_LNG", defaults.center_lng),
            center_lat: parse_or(var("MAP_CENTER_LAT"), "MAP_CENTER_LAT", defaults.center_lat),
            zoom: parse_or(var("MAP_ZOOM"), "MAP_ZOOM", defaults.zoom),
            fit_padding: parse_or(var("MAP_FIT_PADDING"), "MAP_FIT_PADDING", defaults.fit_padding),
            line_width: parse_or(var("MAP_LINE_WIDTH"), "MAP_LINE_WIDTH", defaults.line_width),
            line_opacity: parse_or(
                var("MAP_LINE_OPACITY"),
                "MAP_LINE_OPACITY",
                defaults.line_opacity,
            ),
            style: var("MAP_STYLE").unwrap_or(defaults.style),
        };

        Self {
            api_base_url: var("API_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            mapbox_access_token: var("MAPBOX_ACCESS_TOKEN"),
            map,
        }
    }

    pub fn has_map(&self) -> bool {
        self.mapbox_access_token.is_some()
    }
}

fn parse_or<T: std::str::FromStr + Copy>(raw: Option<String>, key: &str, default: T) -> T {
    match raw {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            log::warn!("Ignoring invalid {}={:?}", key, raw);
            default
        }),
        None => default,
    }
}

fn compiled_var(key: &str) -> Option<String> {
    let value = match key {
        "API_BASE_URL" => option_env!("API_BASE_URL"),
        "MAPBOX_ACCESS_TOKEN" => option_env!("MAPBOX_ACCESS_TOKEN"),
        "MAP_CENTER_LNG" => option_env!("MAP_CENTER_LNG"),
        "MAP_CENTER_LAT" => option_env!("MAP_CENTER_LAT"),
        "MAP_ZOOM" => option_env!("MAP_ZOOM"),
        "MAP_FIT_PADDING" => option_env!("MAP_FIT_PADDING"),
        "MAP_LINE_WIDTH" => option_env!("MAP_LINE_WIDTH"),
        "MAP_LINE_OPACITY" => option_env!("MAP_LINE_OPACITY"),
        "MAP_STYLE" => option_env!("MAP_STYLE"),
        _ => None,
    };
    value.map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = DeskConfig::from_lookup(|_| None);
        assert_eq!(config, DeskConfig::default());
        assert_eq!(config.api_base_url, "http://localhost:5000");
        assert!(!config.has_map());
        assert_eq!(config.map.fit_padding, 50);
    }

    #[test]
    fn test_blank_token_counts_as_absent() {
        let config = DeskConfig::from_lookup(lookup(&[("MAPBOX_ACCESS_TOKEN", "   ")]));
        assert!(config.mapbox_access_token.is_none());

        let config = DeskConfig::from_lookup(lookup(&[("MAPBOX_ACCESS_TOKEN", "pk.abc")]));
        assert_eq!(config.mapbox_access_token.as_deref(), Some("pk.abc"));
    }

    #[test]
    fn test_overrides_and_invalid_values() {
        let config = DeskConfig::from_lookup(lookup(&[
            ("API_BASE_URL", "https://desk.example.com/"),
            ("MAP_ZOOM", "12.5"),
            ("MAP_FIT_PADDING", "not-a-number"),
            ("MAP_STYLE", "mapbox://styles/mapbox/dark-v10"),
        ]));
        assert_eq!(config.api_base_url, "https://desk.example.com");
        assert_eq!(config.map.zoom, 12.5);
        assert_eq!(config.map.fit_padding, 50);
        assert_eq!(config.map.style, "mapbox://styles/mapbox/dark-v10");
    }
}
