#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("cacheSize must be a positive integer, got {0}")]
    InvalidCacheSize(usize),
    #[error("memoizeModule must not be empty")]
    EmptyMemoizeModule,
}
