//! Doc-comment annotation of generated TOML.

use std::any::type_name;

use documented::{Documented, DocumentedFields};
use toml_edit::{Decor, Item, RawString, Table};
use tracing::warn;

/// Renders `docs` as `#` comment lines and appends them to the decor prefix.
pub fn append_docs_as_toml_comments(decor: &mut Decor, docs: &str) {
    let comments: String = docs
        .lines()
        .map(|l| {
            if l.is_empty() {
                "#\n".into()
            } else {
                format!("# {l}\n")
            }
        })
        .collect();

    let prefix = match decor.prefix().and_then(RawString::as_str) {
        Some(old) if !old.is_empty() => format!("{old}{comments}"),
        _ => comments,
    };
    decor.set_prefix(prefix);
}

/// Puts the field docs of `T` above each key of `table`, separated by blank
/// lines. Non-root tables also get the type's own docs.
pub fn annotate_toml_table<T>(table: &mut Table, is_root: bool)
where
    T: Documented + DocumentedFields,
{
    if !is_root {
        append_docs_as_toml_comments(table.decor_mut(), T::DOCS);
    }

    for (idx, (mut key, item)) in table.iter_mut().enumerate() {
        let name = key.get().to_string();
        let Ok(docs) = T::get_field_docs(&name) else {
            warn!(
                "Field '{}' has no documentation in '{}'",
                name,
                type_name::<T>()
            );
            continue;
        };

        let docs = if idx == 0 {
            docs.to_string()
        } else {
            format!("\n{docs}")
        };

        match item {
            Item::Table(sub_table) => append_docs_as_toml_comments(sub_table.decor_mut(), &docs),
            _ => append_docs_as_toml_comments(key.leaf_decor_mut(), &docs),
        }
    }
}
