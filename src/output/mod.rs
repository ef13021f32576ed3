//! Output routing: text vs JSON vs quiet, and paging.

mod context;
mod pager;

pub use context::{OutputContext, OutputMode};
pub use pager::{OutputSink, Pager};
