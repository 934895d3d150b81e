//! Helpers shared by the exporters and the CLI.

pub mod handlebars;

pub use handlebars::{get_handlebars, script_json, write_string_to_file};
