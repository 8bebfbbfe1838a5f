use console::style;
use smartsearch::model::{FilterWithId, TargetRef};
use smartsearch::registry::{FieldType, KindSpec};
use std::fmt::Write;

pub fn kinds<'a>(specs: impl Iterator<Item = &'a KindSpec>) -> String {
    let mut out = String::new();
    for spec in specs {
        let fields: Vec<String> = spec
            .fields
            .iter()
            .map(|field| {
                let marker = if field.required { "" } else { "?" };
                format!("{}{}: {}", field.name, marker, field_type(field.ty))
            })
            .collect();
        let fields = if fields.is_empty() {
            style("(no config)").dim().to_string()
        } else {
            fields.join(", ")
        };
        let _ = writeln!(out, "{:<24} {}", style(spec.kind.as_str()).bold(), fields);
    }
    out
}

fn field_type(ty: FieldType) -> String {
    match ty {
        FieldType::Integer => "integer".to_string(),
        FieldType::IntegerList => "integer list".to_string(),
        FieldType::Boolean => "boolean".to_string(),
        FieldType::Date => "date".to_string(),
        FieldType::Choice(options) => options.join("|"),
    }
}

pub fn filters(target: &TargetRef, entries: &[FilterWithId]) -> serde_json::Result<String> {
    if entries.is_empty() {
        return Ok(format!("No filters for {target}\n"));
    }
    let mut out = String::new();
    let _ = writeln!(out, "Filters for {target}:");
    for (index, entry) in entries.iter().enumerate() {
        let _ = writeln!(out, "{}", filter_line(index + 1, entry)?);
    }
    Ok(out)
}

pub fn filter_line(position: usize, entry: &FilterWithId) -> serde_json::Result<String> {
    let config = serde_json::to_string(entry.config())?;
    Ok(format!(
        "{:>3}. {} {} {}",
        position,
        style(entry.kind().as_str()).bold(),
        style(entry.op().as_str()).cyan(),
        config
    ))
}

pub fn success(message: impl AsRef<str>) -> String {
    format!("{}\n", style(message.as_ref()).green())
}
