//! Construction parameters shared by the collections in this crate.

use serde_derive::{Deserialize, Serialize};

/// Default number of objects per arena chunk.
pub const DEFAULT_ARENA_CHUNK_SIZE: usize = 1024;

/// Default number of buckets of a freshly constructed `HashMap`.
pub const DEFAULT_HASH_MAP_CAPACITY: usize = 8;

/// Tunables for `RedBlackTree` and `HashMap`.
///
/// Missing fields fall back to their defaults when deserializing.
///
/// # Examples
///
/// ```
/// use redblack_collections::config::Config;
/// use redblack_collections::red_black_tree::RedBlackTree;
///
/// let config = Config {
///     arena_chunk_size: 64,
///     ..Config::default()
/// };
/// let mut tree = RedBlackTree::with_config(&config);
/// tree.insert(1);
/// assert_eq!(tree.len(), 1);
/// ```
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct Config {
    pub arena_chunk_size: usize,
    pub hash_map_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            arena_chunk_size: DEFAULT_ARENA_CHUNK_SIZE,
            hash_map_capacity: DEFAULT_HASH_MAP_CAPACITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Config;
    use serde_test::{assert_de_tokens, assert_tokens, Token};

    #[test]
    fn test_tokens() {
        let config = Config {
            arena_chunk_size: 32,
            hash_map_capacity: 16,
        };
        assert_tokens(
            &config,
            &[
                Token::Struct {
                    name: "Config",
                    len: 2,
                },
                Token::Str("arena_chunk_size"),
                Token::U64(32),
                Token::Str("hash_map_capacity"),
                Token::U64(16),
                Token::StructEnd,
            ],
        );
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        assert_de_tokens(
            &Config::default(),
            &[
                Token::Struct {
                    name: "Config",
                    len: 0,
                },
                Token::StructEnd,
            ],
        );
    }
}
