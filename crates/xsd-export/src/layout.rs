//! Grid layout of layer tables
//!
//! With [`Orientation::Rows`] the first row holds the element names after an
//! empty corner cell, followed by one row each for documentation,
//! optionality and enumerations, every row led by its label. With
//! [`Orientation::Columns`] the grid is transposed into one row per element
//! below a header row of labels.

use crate::config::{ExportConfig, Orientation};
use std::collections::HashSet;
use xsd_layers::LayerTable;

/// Lay out a table as rows of cells
pub fn to_grid(table: &LayerTable, config: &ExportConfig) -> Vec<Vec<String>> {
    match config.orientation {
        Orientation::Rows => rows_grid(table, config),
        Orientation::Columns => columns_grid(table, config),
    }
}

fn rows_grid(table: &LayerTable, config: &ExportConfig) -> Vec<Vec<String>> {
    let labels = &config.labels;
    let mut header = vec![String::new()];
    let mut documentation = vec![labels.documentation.clone()];
    let mut optionality = vec![labels.optionality.clone()];
    let mut restrictions = vec![labels.restrictions.clone()];

    for (column, record) in table.iter() {
        header.push(column.to_string());
        documentation.push(config.render(record.documentation.as_deref()).to_string());
        optionality.push(record.optionality.to_string());
        restrictions.push(config.render(record.restrictions.as_deref()).to_string());
    }

    vec![header, documentation, optionality, restrictions]
}

fn columns_grid(table: &LayerTable, config: &ExportConfig) -> Vec<Vec<String>> {
    let labels = &config.labels;
    let header = vec![
        labels.element.clone(),
        labels.documentation.clone(),
        labels.optionality.clone(),
        labels.restrictions.clone(),
    ];

    std::iter::once(header)
        .chain(table.iter().map(|(column, record)| {
            vec![
                column.to_string(),
                config.render(record.documentation.as_deref()).to_string(),
                record.optionality.to_string(),
                config.render(record.restrictions.as_deref()).to_string(),
            ]
        }))
        .collect()
}

/// Make names unique, case-insensitively, by appending ` (2)`, ` (3)`, ...
///
/// Suffixed names are shortened so the result never exceeds `max_len`
/// characters.
pub(crate) fn unique_names<'a>(names: impl IntoIterator<Item = &'a str>, max_len: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut unique = Vec::new();

    for name in names {
        let base: String = name.chars().take(max_len).collect();
        let mut candidate = base.clone();
        let mut counter = 2;
        while !seen.insert(candidate.to_lowercase()) {
            let suffix = format!(" ({counter})");
            let keep = max_len.saturating_sub(suffix.chars().count());
            candidate = base.chars().take(keep).collect::<String>() + &suffix;
            counter += 1;
        }
        unique.push(candidate);
    }

    unique
}
