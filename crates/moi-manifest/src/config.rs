/// Nesting limit applied to every resolution unless configured otherwise.
pub const DEFAULT_MAX_DEPTH: usize = 64;

pub const ENV_MAX_DEPTH: &str = "MOI_RESOLVE_MAX_DEPTH";
pub const ENV_SCHEMA_CACHE: &str = "MOI_SCHEMA_CACHE";

/// Knobs for type resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Maximum descriptor nesting (arrays, maps and class hops) before
    /// resolution fails with `DepthExceeded`.
    pub max_depth: usize,
    /// Share resolved schemas through a [`crate::SchemaCache`].
    pub cache: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            cache: true,
        }
    }
}

impl ResolverConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable source. Malformed values
    /// keep the default and are logged.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(raw) = lookup(ENV_MAX_DEPTH) {
            match raw.trim().parse::<usize>() {
                Ok(depth) if depth > 0 => config.max_depth = depth,
                _ => tracing::warn!(value = %raw, "ignoring malformed {ENV_MAX_DEPTH}"),
            }
        }
        if let Some(raw) = lookup(ENV_SCHEMA_CACHE) {
            match parse_flag(&raw) {
                Some(flag) => config.cache = flag,
                None => tracing::warn!(value = %raw, "ignoring malformed {ENV_SCHEMA_CACHE}"),
            }
        }
        config
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_without_variables() {
        assert_eq!(ResolverConfig::from_lookup(lookup(&[])), ResolverConfig::default());
    }

    #[test]
    fn reads_depth_and_cache_flag() {
        let config = ResolverConfig::from_lookup(lookup(&[
            (ENV_MAX_DEPTH, "8"),
            (ENV_SCHEMA_CACHE, "off"),
        ]));
        assert_eq!(config.max_depth, 8);
        assert!(!config.cache);
    }

    #[test]
    fn malformed_values_fall_back() {
        let config = ResolverConfig::from_lookup(lookup(&[
            (ENV_MAX_DEPTH, "0"),
            (ENV_SCHEMA_CACHE, "maybe"),
        ]));
        assert_eq!(config, ResolverConfig::default());
    }
}
