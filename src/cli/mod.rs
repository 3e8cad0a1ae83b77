pub mod commands;
pub mod ui;
pub mod util;

pub use util::{CommandContext, SelectionArgs};
