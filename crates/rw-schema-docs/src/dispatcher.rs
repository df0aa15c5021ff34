//! Directive dispatch: expands every tag in a markdown document.

use crate::context::PluginContext;
use crate::error::RenderError;
use crate::filter::SortBy;
use crate::markdown::{render_table, render_tables};
use crate::params::{TagParams, parse_table_list};
use crate::tag::scan;

/// Replace every directive in `markdown` with generated documentation.
///
/// Returns `None` when the document has no directives, meaning the host
/// should keep the page as is. A directive that fails to render is replaced
/// by an HTML comment; the rest of the document is still processed.
#[must_use]
pub fn process_markdown(context: &PluginContext, markdown: &str) -> Option<String> {
    let matches = scan(markdown);
    if matches.is_empty() {
        return None;
    }

    tracing::info!(count = matches.len(), "Processing sqlalchemy tags");

    // Reverse order keeps earlier spans valid while later ones are replaced.
    let mut result = markdown.to_owned();
    for tag in matches.iter().rev() {
        let replacement = render_directive(context, tag.params()).unwrap_or_else(|e| {
            tracing::error!(error = %e, "Failed to process sqlalchemy tag");
            format!("<!-- Error processing sqlalchemy tag: {e} -->")
        });
        result.replace_range(tag.span.clone(), &replacement);
    }

    Some(result)
}

/// Render a single directive from its raw parameter text.
///
/// With a `table` parameter one table is rendered; otherwise every table
/// passing the include/exclude filters is, sorted by name unless `sort_by`
/// says otherwise.
///
/// # Errors
///
/// Returns an error if single-table rendering fails. Multi-table rendering
/// contains errors per table and never fails.
pub fn render_directive(context: &PluginContext, raw: Option<&str>) -> Result<String, RenderError> {
    let params = TagParams::parse(raw);
    let options = context.base_options().merge_with_tag_params(&params);

    if let Some(table) = params.get("table") {
        return render_table(context, &table.to_string(), &options);
    }

    let include = parse_table_list(params.first_str(&["include_tables", "include"]));
    let exclude = parse_table_list(params.first_str(&["exclude_tables", "exclude"]));
    let sort_by = params.get_str("sort_by").map_or(SortBy::Name, SortBy::parse);

    Ok(render_tables(
        context,
        include.as_deref(),
        exclude.as_deref(),
        &options,
        sort_by,
    ))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;
    use rw_config::PluginConfig;
    use rw_schema::{
        Column, Constraint, Index, MetadataSchema, SchemaError, SchemaSource, Table,
    };

    use super::*;

    fn context() -> PluginContext {
        let schema = MetadataSchema::new(vec![
            Table::new("users").with_column(Column::new("id", "INTEGER").primary_key()),
            Table::new("posts").with_column(Column::new("id", "INTEGER").primary_key()),
            Table::new("logs").with_column(Column::new("id", "INTEGER")),
        ]);
        PluginContext::new(Arc::new(schema), PluginConfig::default())
    }

    fn headings(text: &str) -> Vec<&str> {
        text.lines().filter(|l| l.starts_with("## ")).collect()
    }

    #[test]
    fn test_no_tags_returns_none() {
        assert_eq!(process_markdown(&context(), "# Title\n\nNo tags."), None);
    }

    #[test]
    fn test_single_table_replaced_in_place() {
        let result =
            process_markdown(&context(), r#"Before {% sqlalchemy table="users" %} after"#).unwrap();
        assert!(result.starts_with("Before ## Table: `users`"), "{result}");
        assert!(result.ends_with(" after"), "{result}");
        assert!(!result.contains("{%"));
    }

    #[test]
    fn test_multiple_tags_keep_document_order() {
        let text = "A\n\n{% sqlalchemy table=\"posts\" %}\n\nB\n\n{% sqlalchemy table=\"users\" %}\n\nC";
        let result = process_markdown(&context(), text).unwrap();
        let a = result.find('A').unwrap();
        let posts = result.find("Table: `posts`").unwrap();
        let b = result.find("\nB\n").unwrap();
        let users = result.find("Table: `users`").unwrap();
        let c = result.rfind('C').unwrap();
        assert!(a < posts && posts < b && b < users && users < c, "{result}");
    }

    #[test]
    fn test_all_tables_sorted_by_name_by_default() {
        let result = process_markdown(&context(), "{% sqlalchemy %}").unwrap();
        assert_eq!(
            headings(&result),
            vec!["## Table: `logs`", "## Table: `posts`", "## Table: `users`"]
        );
    }

    #[test]
    fn test_declared_order_and_exclude_alias() {
        let result = process_markdown(
            &context(),
            r#"{% sqlalchemy exclude="logs" sort_by="none" %}"#,
        )
        .unwrap();
        assert_eq!(
            headings(&result),
            vec!["## Table: `users`", "## Table: `posts`"]
        );
    }

    #[test]
    fn test_long_alias_takes_precedence() {
        let result = process_markdown(
            &context(),
            r#"{% sqlalchemy include_tables="posts" include="users" %}"#,
        )
        .unwrap();
        assert_eq!(headings(&result), vec!["## Table: `posts`"]);
    }

    #[test]
    fn test_missing_table_comment() {
        let result =
            process_markdown(&context(), r#"{% sqlalchemy table="nonexistent" %}"#).unwrap();
        assert_eq!(result, "<!-- Table 'nonexistent' not found -->");
    }

    #[test]
    fn test_directive_options_apply_per_tag() {
        let text = r#"{% sqlalchemy table="users" heading_level="3" %} {% sqlalchemy table="posts" %}"#;
        let result = process_markdown(&context(), text).unwrap();
        assert!(result.starts_with("### Table: `users`"), "{result}");
        assert!(result.contains("## Table: `posts`"), "{result}");
    }

    struct FailingSource;

    impl SchemaSource for FailingSource {
        fn table_names(&self) -> Vec<String> {
            vec!["users".to_owned()]
        }

        fn columns(&self, _table: &str) -> Result<Vec<Column>, SchemaError> {
            Err(SchemaError::Backend("connection lost".to_owned()))
        }

        fn indexes(&self, _table: &str) -> Result<Vec<Index>, SchemaError> {
            Ok(Vec::new())
        }

        fn constraints(&self, _table: &str) -> Result<Vec<Constraint>, SchemaError> {
            Ok(Vec::new())
        }

        fn namespace(&self, _table: &str) -> Option<String> {
            None
        }
    }

    #[test]
    fn test_directive_error_becomes_comment() {
        let context = PluginContext::new(Arc::new(FailingSource), PluginConfig::default());
        let result = process_markdown(
            &context,
            r#"x {% sqlalchemy table="users" %} y {% sqlalchemy table="other" %}"#,
        )
        .unwrap();
        assert_eq!(
            result,
            "x <!-- Error processing sqlalchemy tag: connection lost --> y <!-- Table 'other' not found -->"
        );
    }
}
