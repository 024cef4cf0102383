use std::num::NonZeroUsize;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_CACHE_SIZE: usize = 500;
pub const DEFAULT_MEMOIZE_MODULE: &str = "lru-memoize";

const DEFAULT_CACHE_CAPACITY: NonZeroUsize = match NonZeroUsize::new(DEFAULT_CACHE_SIZE) {
    Some(size) => size,
    None => panic!("default cache size must be positive"),
};

/// How the memoize function is brought into scope at the top of the module.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum ImportStyle {
    /// `const _memoize = require("lru-memoize");`
    #[default]
    Require,
    /// `import _memoize from "lru-memoize";`
    ///
    /// Scripts cannot contain import declarations, so they fall back to `require`.
    EsModule,
}

/// A JSON serializable proxy for the BindMemoizerConfig struct
///
/// This struct is used to deserialize the transform options from a config
/// file or from the host pipeline's plugin options.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BindMemoizerJSONConfig {
    /// Maximum number of bound functions each binder keeps alive.
    /// Least recently used entries are evicted past this size.
    #[serde(default = "default_cache_size")]
    pub cache_size: usize,
    /// Module specifier the memoize function is loaded from.
    ///
    /// The module's default export must be a function of the shape
    /// `memoize(capacity)(fn)`.
    #[serde(default = "default_memoize_module")]
    pub memoize_module: String,
    /// Whether to load the memoize module with `require` or an `import` declaration
    #[serde(default)]
    pub import_style: ImportStyle,
    /// If true, a variable referenced several times inside one closure is only
    /// passed to the hoisted function once.
    ///
    /// Off by default, which passes one argument per reference.
    #[serde(default)]
    pub dedupe_captures: bool,
}

fn default_cache_size() -> usize {
    DEFAULT_CACHE_SIZE
}

fn default_memoize_module() -> String {
    DEFAULT_MEMOIZE_MODULE.to_string()
}

impl Default for BindMemoizerJSONConfig {
    fn default() -> Self {
        Self {
            cache_size: DEFAULT_CACHE_SIZE,
            memoize_module: DEFAULT_MEMOIZE_MODULE.to_string(),
            import_style: ImportStyle::default(),
            dedupe_captures: false,
        }
    }
}

/// Validated options for one invocation of the transform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindMemoizerConfig {
    pub cache_size: NonZeroUsize,
    pub memoize_module: String,
    pub import_style: ImportStyle,
    pub dedupe_captures: bool,
}

impl Default for BindMemoizerConfig {
    fn default() -> Self {
        Self {
            cache_size: DEFAULT_CACHE_CAPACITY,
            memoize_module: DEFAULT_MEMOIZE_MODULE.to_string(),
            import_style: ImportStyle::default(),
            dedupe_captures: false,
        }
    }
}

impl TryFrom<BindMemoizerJSONConfig> for BindMemoizerConfig {
    type Error = ConfigError;
    fn try_from(value: BindMemoizerJSONConfig) -> Result<Self, Self::Error> {
        let cache_size = NonZeroUsize::new(value.cache_size)
            .ok_or(ConfigError::InvalidCacheSize(value.cache_size))?;
        if value.memoize_module.trim().is_empty() {
            return Err(ConfigError::EmptyMemoizeModule);
        }

        Ok(BindMemoizerConfig {
            cache_size,
            memoize_module: value.memoize_module,
            import_style: value.import_style,
            dedupe_captures: value.dedupe_captures,
        })
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::{BindMemoizerConfig, BindMemoizerJSONConfig, ImportStyle};
    use crate::error::ConfigError;

    #[test]
    fn test_empty_json_uses_defaults() {
        let json: BindMemoizerJSONConfig = serde_json::from_str("{}").unwrap();
        let config: BindMemoizerConfig = json.try_into().unwrap();
        assert_eq!(config, BindMemoizerConfig::default());
        assert_eq!(config.cache_size.get(), 500);
        assert_eq!(config.memoize_module, "lru-memoize");
        assert_eq!(config.import_style, ImportStyle::Require);
    }

    #[test]
    fn test_camel_case_fields() {
        let json: BindMemoizerJSONConfig = serde_json::from_str(
            r#"{
                "cacheSize": 20,
                "memoizeModule": "./memo",
                "importStyle": "esModule",
                "dedupeCaptures": true
            }"#,
        )
        .unwrap();
        let config = BindMemoizerConfig::try_from(json).unwrap();
        assert_eq!(config.cache_size.get(), 20);
        assert_eq!(config.memoize_module, "./memo");
        assert_eq!(config.import_style, ImportStyle::EsModule);
        assert!(config.dedupe_captures);
    }

    #[test]
    fn test_zero_cache_size_is_rejected() {
        let result = BindMemoizerConfig::try_from(BindMemoizerJSONConfig {
            cache_size: 0,
            ..Default::default()
        });
        assert_eq!(result.unwrap_err(), ConfigError::InvalidCacheSize(0));
    }

    #[test]
    fn test_blank_module_is_rejected() {
        let result = BindMemoizerConfig::try_from(BindMemoizerJSONConfig {
            memoize_module: "  ".to_string(),
            ..Default::default()
        });
        assert_eq!(
            result.unwrap_err().to_string(),
            "memoizeModule must not be empty"
        );
    }

    #[test]
    fn test_schema_lists_every_option() {
        let schema = schemars::schema_for!(BindMemoizerJSONConfig);
        let schema_json = serde_json::to_value(&schema).unwrap();
        let properties = schema_json["properties"].as_object().unwrap();
        let mut names: Vec<&str> = properties.keys().map(|k| k.as_str()).collect();
        names.sort();
        assert_eq!(
            names,
            vec!["cacheSize", "dedupeCaptures", "importStyle", "memoizeModule"]
        );
    }
}
