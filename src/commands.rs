use std::io::{self, Write};

use anyhow::Result;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use crate::models::TaskStatus;
use crate::repository::TaskRepository;
use crate::storage::FileStore;

/// Lists tasks from the local database in a formatted table.
///
/// Shows every task unless a status filter is given.
pub fn cmd_list(status: Option<String>, store: FileStore) -> Result<()> {
    let filter = status.as_deref().map(str::parse::<TaskStatus>).transpose()?;
    let repo = TaskRepository::new(store);
    let tasks = repo.list(filter, usize::MAX)?;
    if tasks.is_empty() {
        println!("No tasks found.");
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").add_attribute(Attribute::Bold),
            Cell::new("Title").add_attribute(Attribute::Bold),
            Cell::new("Status").add_attribute(Attribute::Bold),
            Cell::new("Due").add_attribute(Attribute::Bold),
            Cell::new("Created").add_attribute(Attribute::Bold),
            Cell::new("Updated").add_attribute(Attribute::Bold),
        ]);

    for t in tasks {
        let status_color = match t.status {
            TaskStatus::Pending => Color::Yellow,
            TaskStatus::InProgress => Color::Cyan,
            TaskStatus::Completed => Color::Green,
        };
        table.add_row(vec![
            Cell::new(t.id),
            Cell::new(&t.title),
            Cell::new(t.status).fg(status_color),
            Cell::new(t.due_date.map(|d| d.to_string()).unwrap_or_default()),
            Cell::new(t.created_at.format("%Y-%m-%d %H:%M")),
            Cell::new(
                t.updated_at
                    .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_default(),
            ),
        ]);
    }

    println!("{table}");
    Ok(())
}

/// Deletes the tasks database.
///
/// Prompts for confirmation unless `force` is set.
pub fn cmd_reset(force: bool, store: FileStore) -> Result<()> {
    if !force {
        print!("Are you sure you want to delete all tasks? This cannot be undone. [y/N] ");
        io::stdout().flush()?;
        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        if input.trim().to_lowercase() != "y" {
            println!("Aborted.");
            return Ok(());
        }
    }

    store.delete_database()?;
    println!("Database reset successfully.");
    Ok(())
}
