//! Reply preview under a status: fetch, shape, and quick-reply.

pub mod fetcher;
pub mod state;
pub mod tree;

pub use fetcher::ReplyFetcher;
pub use state::{Composer, Effect, Msg, Panel, RepliesState, Subject};
pub use tree::{ReplyNode, build_reply_tree};
