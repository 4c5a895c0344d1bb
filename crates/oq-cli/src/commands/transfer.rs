use std::fs;
use std::path::Path;

use colored::Colorize;

pub fn export(store: &Path, oath: &str, output: Option<&Path>) -> Result<(), String> {
    let gateway = super::gateway(store, oath)?;
    let payload = gateway
        .export_data()
        .map_err(|e| format!("failed to read save: {e}"))?
        .ok_or_else(|| format!("no save for oath {oath}"))?;

    let value: serde_json::Value =
        serde_json::from_str(&payload).map_err(|e| format!("save is not valid JSON: {e}"))?;
    let pretty =
        serde_json::to_string_pretty(&value).map_err(|e| format!("failed to format save: {e}"))?;

    match output {
        Some(path) => {
            fs::write(path, &pretty)
                .map_err(|e| format!("failed to write {}: {e}", path.display()))?;
            eprintln!(
                "  {} {}",
                "Exported".green().bold(),
                path.display().to_string().dimmed()
            );
        }
        None => println!("{pretty}"),
    }
    Ok(())
}

pub fn import(store: &Path, oath: &str, file: &Path) -> Result<(), String> {
    let payload = fs::read_to_string(file)
        .map_err(|e| format!("failed to read {}: {e}", file.display()))?;
    let gateway = super::gateway(store, oath)?;
    let progress = gateway
        .import_data(&payload)
        .map_err(|e| format!("rejected import: {e}"))?;

    println!(
        "  {} save for {oath}  {}",
        "Imported".green().bold(),
        format!("(level {}, {} xp)", progress.hero_level, progress.experience).dimmed()
    );
    Ok(())
}
