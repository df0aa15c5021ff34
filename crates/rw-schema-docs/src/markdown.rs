//! Markdown rendering of schema tables.
//!
//! A table renders as a heading, an optional comment paragraph, a column
//! table and the optional indexes, constraints and SQL sections, separated by
//! blank lines. Multi-table output joins table blocks with a blank line.

use std::collections::BTreeMap;

use rw_schema::{Column, ColumnDefault, Index};

use crate::context::PluginContext;
use crate::ddl::create_table_sql;
use crate::error::RenderError;
use crate::filter::{SortBy, resolve_tables};
use crate::options::{Field, TableGenerationOptions};

/// Render documentation for one table.
///
/// An unknown table renders as an HTML comment rather than an error.
///
/// # Errors
///
/// Returns [`RenderError::Schema`] if the schema source fails to provide the
/// table's metadata.
pub fn render_table(
    context: &PluginContext,
    table_name: &str,
    options: &TableGenerationOptions,
) -> Result<String, RenderError> {
    let schema = context.schema();
    if !schema.has_table(table_name) {
        tracing::warn!(table = table_name, "Table not found in metadata");
        return Ok(format!("<!-- Table '{table_name}' not found -->"));
    }

    tracing::debug!(table = table_name, "Generating documentation for table");
    let columns = schema.columns(table_name)?;

    let mut blocks = vec![format!(
        "{} Table: `{table_name}`",
        options.heading_level.hashes()
    )];

    if let Some(comment) = schema.comment(table_name) {
        let comment = comment.trim();
        if !comment.is_empty() {
            blocks.push(comment.to_owned());
        }
    }

    blocks.push(column_table(&columns, options));

    if options.show_indexes {
        blocks.push(indexes_section(table_name, &schema.indexes(table_name)?));
    }

    let constraints = if options.show_constraints || options.show_sql {
        schema.constraints(table_name)?
    } else {
        Vec::new()
    };

    if options.show_constraints {
        let documented: Vec<String> = constraints
            .iter()
            .filter(|c| c.is_documented())
            .map(|c| format!("- `{}` ({})", c.name.as_deref().unwrap_or_default(), c.kind))
            .collect();
        blocks.push(bullet_section("Constraints", &documented));
    }

    if options.show_sql {
        let namespace = schema.namespace(table_name);
        let sql = create_table_sql(
            table_name,
            namespace.as_deref(),
            &columns,
            &constraints,
            options.sql_dialect,
        );
        blocks.push(format!("**SQL:**\n\n```sql\n{sql}\n```"));
    }

    Ok(blocks.join("\n\n"))
}

/// Render documentation for every table that passes the filters.
///
/// Failures are contained per table: a table that cannot be rendered is
/// replaced by an HTML comment and the remaining tables still render.
#[must_use]
pub fn render_tables(
    context: &PluginContext,
    include: Option<&[String]>,
    exclude: Option<&[String]>,
    options: &TableGenerationOptions,
    sort_by: SortBy,
) -> String {
    let schema = context.schema();
    let selected = resolve_tables(
        &schema.table_names(),
        include,
        exclude,
        &context.config().filter,
        sort_by,
    );

    if selected.is_empty() {
        tracing::info!("No tables left after filtering");
        return "<!-- No tables to document -->".to_owned();
    }

    if !context.config().display.group_by_schema {
        return selected
            .iter()
            .map(|name| render_contained(context, name, options))
            .collect::<Vec<_>>()
            .join("\n\n");
    }

    let mut groups: BTreeMap<Option<String>, Vec<&str>> = BTreeMap::new();
    for name in &selected {
        groups
            .entry(schema.namespace(name))
            .or_default()
            .push(name);
    }

    let mut blocks = Vec::with_capacity(selected.len() + groups.len());
    for (namespace, tables) in groups {
        if let Some(namespace) = namespace {
            blocks.push(format!(
                "{} Schema: `{namespace}`",
                options.schema_heading_level.hashes()
            ));
        }
        blocks.extend(
            tables
                .into_iter()
                .map(|name| render_contained(context, name, options)),
        );
    }
    blocks.join("\n\n")
}

fn render_contained(context: &PluginContext, name: &str, options: &TableGenerationOptions) -> String {
    render_table(context, name, options).unwrap_or_else(|e| {
        tracing::error!(table = name, error = %e, "Failed to generate table documentation");
        format!("<!-- Error generating documentation for table '{name}': {e} -->")
    })
}

fn column_table(columns: &[Column], options: &TableGenerationOptions) -> String {
    let fields = &options.fields;
    let mut lines = Vec::with_capacity(columns.len() + 2);
    lines.push(table_row(fields.iter().map(|f| f.name().to_owned())));
    lines.push(table_row(
        fields.iter().map(|_| options.text_align.separator().to_owned()),
    ));
    for column in columns {
        lines.push(table_row(
            fields.iter().map(|field| cell(column, *field, options)),
        ));
    }
    lines.join("\n")
}

fn table_row(cells: impl Iterator<Item = String>) -> String {
    let mut row = String::from("|");
    for cell in cells {
        row.push_str(&cell);
        row.push('|');
    }
    row
}

fn cell(column: &Column, field: Field, options: &TableGenerationOptions) -> String {
    let text = match field {
        Field::Column => format!("`{}`", column.name),
        Field::Type => column.data_type.clone(),
        Field::Nullable => options.flag(column.nullable).to_owned(),
        Field::PrimaryKey => options.flag(column.primary_key).to_owned(),
        Field::Unique => options.flag(column.unique).to_owned(),
        Field::Default => match &column.default {
            None => String::new(),
            Some(ColumnDefault::Generator { generator }) => generator.clone(),
            Some(ColumnDefault::Expression { expression }) => expression.clone(),
            Some(ColumnDefault::Value(value)) => value.to_string(),
        },
        Field::ForeignKey => {
            if column.foreign_keys.is_empty() {
                String::new()
            } else {
                let targets = column
                    .foreign_keys
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("*{}*", targets.replace('.', "&period;"))
            }
        }
    };
    text.replace('|', "\\|")
}

fn indexes_section(table_name: &str, indexes: &[Index]) -> String {
    let items: Vec<String> = indexes
        .iter()
        .map(|index| {
            let name = index
                .name
                .clone()
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| format!("ix_{table_name}_{}", index.columns.join("_")));
            let columns = index
                .columns
                .iter()
                .map(|c| format!("`{c}`"))
                .collect::<Vec<_>>()
                .join(", ");
            format!("- `{name}`: {columns}")
        })
        .collect();
    bullet_section("Indexes", &items)
}

fn bullet_section(title: &str, items: &[String]) -> String {
    if items.is_empty() {
        format!("**{title}:** None")
    } else {
        format!("**{title}:**\n\n{}", items.join("\n"))
    }
}
