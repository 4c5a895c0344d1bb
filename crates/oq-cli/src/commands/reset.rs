use std::path::Path;

use colored::Colorize;

use oq_persistence::delete_all_saves;

pub fn run(store: &Path, oath: Option<&str>, all: bool) -> Result<(), String> {
    if all {
        let store = super::open_store(store)?;
        let removed =
            delete_all_saves(store.as_ref()).map_err(|e| format!("failed to reset: {e}"))?;
        println!("  {} {removed} saves", "Deleted".red().bold());
        return Ok(());
    }

    let oath = oath.ok_or("either --oath or --all is required")?;
    let gateway = super::gateway(store, oath)?;
    if !gateway.has_save() {
        println!("  No save for {oath}.");
        return Ok(());
    }
    gateway
        .delete()
        .map_err(|e| format!("failed to reset: {e}"))?;
    println!("  {} save for {oath}", "Deleted".red().bold());
    Ok(())
}
