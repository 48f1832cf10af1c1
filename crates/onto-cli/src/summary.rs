use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use onto_curation::Page;
use onto_map::config::DEFAULT_PERFECT_MATCH_SCORE;
use onto_model::{EntityType, MappingEntity, Status, Suggestion};

use crate::types::{EditResult, SuggestResult};

pub fn print_suggest_summary(result: &SuggestResult) {
    println!("Document: {}", result.document.display());
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Id"),
        header_cell("Type"),
        header_cell("Status"),
        header_cell("Values"),
        header_cell("Best suggestion"),
        header_cell("Score"),
        header_cell("Count"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 5, CellAlignment::Right);
    align_column(&mut table, 6, CellAlignment::Right);

    let mut total = 0usize;
    for row in &result.rows {
        total += row.count;
        let (best, score) = match &row.best {
            Some(suggestion) => (
                Cell::new(&suggestion.term_label),
                score_cell(suggestion.score),
            ),
            None => (dim_cell("-"), dim_cell("-")),
        };
        table.add_row(vec![
            Cell::new(row.id),
            Cell::new(&row.entity_type),
            status_cell(row.status),
            Cell::new(&row.values),
            best,
            score,
            Cell::new(row.count),
        ]);
    }
    table.add_row(vec![
        dim_cell("-"),
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(format!("{} mappings", result.refreshed)).add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
        Cell::new(total).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
    if !result.written {
        println!("Dry run: document not written.");
    }
}

pub fn print_edit_summary(result: &EditResult) {
    let entity = &result.entity;
    if !result.outcome.changed() {
        println!("Mapping {} unchanged ({}).", entity.id, entity.status);
        return;
    }
    println!(
        "Mapping {}: {} -> {}",
        entity.id, result.outcome.from, result.outcome.to
    );
    match (&entity.mapped_term_label, &entity.mapped_term_url) {
        (Some(label), Some(url)) => println!("Term: {label} <{url}>"),
        (None, Some(url)) => println!("Term: <{url}>"),
        _ => println!("Term: none"),
    }
    if !result.written {
        println!("Dry run: document not written.");
    }
}

pub fn print_search_results(page: &Page<MappingEntity>) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Id"),
        header_cell("Type"),
        header_cell("Status"),
        header_cell("Values"),
        header_cell("Mapped term"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for entity in &page.items {
        let values = entity
            .values
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join("\n");
        let term = entity
            .mapped_term_label
            .as_deref()
            .or(entity.mapped_term_url.as_deref())
            .map_or_else(|| dim_cell("-"), Cell::new);
        table.add_row(vec![
            Cell::new(entity.id),
            Cell::new(&entity.entity_type),
            status_cell(entity.status),
            Cell::new(values),
            term,
        ]);
    }
    println!("{table}");
    println!(
        "Page {} of {} ({} matching mappings)",
        page.page + 1,
        page.total_pages().max(1),
        page.total
    );
}

pub fn print_lookup_results(input: &str, suggestions: &[Suggestion]) {
    if suggestions.is_empty() {
        println!("No ontology terms found for \"{input}\".");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Term"),
        header_cell("URL"),
        header_cell("Score"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    for (rank, suggestion) in suggestions.iter().enumerate() {
        table.add_row(vec![
            Cell::new(rank + 1),
            Cell::new(&suggestion.term_label),
            Cell::new(&suggestion.term_url),
            score_cell(suggestion.score),
        ]);
    }
    println!("{table}");
}

pub fn print_entity_types(types: &[EntityType]) {
    let mut table = Table::new();
    table.set_header(vec!["Entity type", "Key", "Used in similarity"]);
    apply_table_style(&mut table);
    for entity_type in types {
        for (index, key) in entity_type.mapping_keys.iter().enumerate() {
            let name = if index == 0 {
                entity_type.name.as_str()
            } else {
                ""
            };
            let flag = if key.use_in_similarity { "yes" } else { "no" };
            table.add_row(vec![name, key.key.as_str(), flag]);
        }
    }
    println!("{table}");
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn status_cell(status: Status) -> Cell {
    let color = match status {
        Status::Mapped => Color::Green,
        Status::Revise => Color::Yellow,
        Status::Request => Color::Magenta,
        Status::Unmapped => Color::DarkGrey,
    };
    Cell::new(status).fg(color)
}

fn score_cell(score: f64) -> Cell {
    let cell = Cell::new(format!("{score:.3}"));
    if score >= DEFAULT_PERFECT_MATCH_SCORE {
        cell.fg(Color::Green)
    } else {
        cell
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
