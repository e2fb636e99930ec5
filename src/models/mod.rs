mod source;
mod timeline;

pub use source::{BarSeries, DataSource, SourceMeta};
pub use timeline::{ABSENT, MergedTimeline, merge};
