mod output;

pub use output::{Output, format_bytes, tier_label};
