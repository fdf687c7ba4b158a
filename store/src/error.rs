//! Error types for the store binding.

/// Errors raised while defining or registering stores.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store already registered: {0}")]
    DuplicateStore(String),

    #[error("engine error: {0}")]
    Engine(#[from] roster_engine::Error),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = StoreError::DuplicateStore("todos".into());
        assert_eq!(err.to_string(), "store already registered: todos");

        let err: StoreError = roster_engine::Error::InvalidConfig("bad".into()).into();
        assert_eq!(err.to_string(), "engine error: invalid config: bad");
    }
}
