use std::path::Path;

use comfy_table::{ContentArrangement, Table};

use oq_persistence::{all_save_keys, save_summary};

pub fn run(store: &Path) -> Result<(), String> {
    let store = super::open_store(store)?;
    let keys = all_save_keys(store.as_ref()).map_err(|e| format!("failed to list saves: {e}"))?;

    let summaries: Vec<_> = keys
        .iter()
        .filter_map(|key| save_summary(store.as_ref(), key))
        .collect();
    if summaries.is_empty() {
        println!("  No saves found.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Oath", "Game", "Level", "Last saved"]);
    for summary in &summaries {
        table.add_row(vec![
            summary.oath_id.clone(),
            summary.kind.to_string(),
            summary
                .hero_level
                .map_or_else(|| "outdated".to_string(), |l| l.to_string()),
            summary
                .last_saved
                .map_or_else(|| "--".to_string(), |t| t.format("%Y-%m-%d %H:%M").to_string()),
        ]);
    }

    println!("{table}");
    println!();
    println!("  {} saves", summaries.len());
    Ok(())
}
