mod fastembed;
mod provider;

pub use self::fastembed::{FastEmbedConfig, FastEmbedProvider};
#[cfg(test)]
pub use provider::MockEmbeddingProvider;
pub use provider::{EmbeddingProvider, l2_normalize};
