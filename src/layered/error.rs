pub type MapResult<T, K> = Result<T, MapError<K>>;

#[derive(thiserror::Error, Debug, Clone, Eq, PartialEq)]
pub enum MapError<K> {
    #[error("key not found: {0:?}")]
    KeyNotFound(K),

    #[error("reset called without an open layer!")]
    NoOpenLayer,

    #[error("update expected at most 1 source, got {got}")]
    TooManySources { got: usize },
}
