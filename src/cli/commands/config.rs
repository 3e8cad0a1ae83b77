//! Config Command
//!
//! Usage:
//!   crewgen config show [-f json]
//!   crewgen config path
//!   crewgen config init [--force]

use crate::cli::ui::Output;
use crate::cli::util::CommandContext;
use crate::config::ConfigLoader;
use crate::types::Result;

/// Show the merged effective configuration
pub fn show(format: &str) -> Result<()> {
    let ctx = CommandContext::load()?;
    println!("{}", ConfigLoader::render(&ctx.config, format == "json")?);
    Ok(())
}

/// Show configuration paths
pub fn path() -> Result<()> {
    let ctx = CommandContext::load()?;
    ConfigLoader::show_path(&ctx.config);
    Ok(())
}

/// Initialize project configuration
pub fn init(force: bool) -> Result<()> {
    let root = std::env::current_dir()?;
    let config_path = ConfigLoader::init_project(&root.join(ConfigLoader::project_dir()), force)?;
    Output::new().success(&format!(
        "Project configuration: {}",
        config_path.display()
    ));
    Ok(())
}
