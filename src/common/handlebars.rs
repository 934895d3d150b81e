use handlebars::{handlebars_helper, Handlebars};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use std::fs::File;
use std::io::Write;
use std::path::Path;

pub fn create_path_if_not_exists(path: &str) -> anyhow::Result<()> {
    let path = Path::new(path)
        .parent()
        .ok_or_else(|| anyhow::anyhow!("Invalid path: no parent directory for '{}'", path))?;
    if !path.as_os_str().is_empty() && !path.exists() {
        info!("Creating path: {:?}", path);
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

pub fn write_string_to_file(filename: &str, content: &str) -> anyhow::Result<()> {
    create_path_if_not_exists(filename)?;
    let path = Path::new(filename);
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

/// Escapes `<`, `>` and `&` in serialized JSON as unicode escapes. The result
/// is still valid JSON and cannot open a comment or close the script block it
/// is embedded in.
fn escape_for_script(json: &str) -> String {
    let mut escaped = String::with_capacity(json.len());
    for c in json.chars() {
        match c {
            '<' => escaped.push_str("\\u003c"),
            '>' => escaped.push_str("\\u003e"),
            '&' => escaped.push_str("\\u0026"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// JSON for embedding inside a `<script>` block.
pub fn script_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    Ok(escape_for_script(&serde_json::to_string(value)?))
}

pub fn get_handlebars() -> Handlebars<'static> {
    let mut handlebars = Handlebars::new();

    handlebars_helper!(exists: |v: Value| {
        match v {
            serde_json::Value::Null => false,
            serde_json::Value::String(s) => {
                let trimmed = s.trim();
                !trimmed.is_empty() && trimmed != "null"
            }
            _ => true,
        }
    });
    handlebars.register_helper("exists", Box::new(exists));

    // Quoted, escaped JavaScript string literal
    handlebars_helper!(js_string: |s: String| {
        serde_json::to_string(&s)
            .map(|json| escape_for_script(&json))
            .unwrap_or_else(|_| "\"\"".to_string())
    });
    handlebars.register_helper("js_string", Box::new(js_string));

    handlebars
}
