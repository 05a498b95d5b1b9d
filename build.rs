// build.rs

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::Path;

const FALLBACK_LANG: &str = "en";

fn main() {
    // --- 1. Pick the message catalog language ---
    // `lang_*` feature flags win over the ASSISTANT_LANG env var.
    let mut active_langs: Vec<String> = env::vars()
        .filter_map(|(key, _)| {
            key.strip_prefix("CARGO_FEATURE_LANG_")
                .map(str::to_lowercase)
        })
        .collect();
    active_langs.sort();

    let lang = match active_langs.first() {
        Some(first) => {
            if active_langs.len() > 1 {
                println!(
                    "cargo:warning=Multiple language features enabled ({:?}). Using '{}'.",
                    active_langs, first
                );
            }
            first.clone()
        }
        None => env::var("ASSISTANT_LANG").unwrap_or_else(|_| FALLBACK_LANG.to_string()),
    };

    println!("cargo:rustc-env=ASSISTANT_LANG_EFFECTIVE={}", lang);
    println!("cargo:rerun-if-env-changed=ASSISTANT_LANG");
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=locales/");

    // --- 2. Load the English catalog, then overlay the selected language ---
    let mut messages = load_catalog(FALLBACK_LANG)
        .unwrap_or_else(|e| panic!("Fallback catalog locales/en.toml is unusable: {}", e));

    if lang != FALLBACK_LANG {
        match load_catalog(&lang) {
            Ok(specific) => messages.extend(specific),
            Err(e) => println!(
                "cargo:warning=Catalog for '{}' not loaded ({}). Falling back to 'en'.",
                lang, e
            ),
        }
    }

    // --- 3. Generate the `t!` macro ---
    let mut macro_code = String::from("#[macro_export]\nmacro_rules! t {\n");
    for (key, value) in &messages {
        let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
        macro_code.push_str(&format!("    (\"{}\") => {{ \"{}\" }};\n", key, escaped));
    }
    macro_code.push_str(
        "    ($key:expr) => {{ compile_error!(concat!(\"Missing translation key: \", $key)) }};\n",
    );
    macro_code.push('}');

    let out_dir = env::var("OUT_DIR").unwrap_or_else(|_| panic!("OUT_DIR is not set"));
    let dest_path = Path::new(&out_dir).join("translations.rs");
    fs::write(&dest_path, macro_code)
        .unwrap_or_else(|e| panic!("Failed to write {}: {}", dest_path.display(), e));
}

/// Reads `locales/<lang>.toml` and flattens its nested tables into dotted keys,
/// so `[store.error] not_found = "..."` becomes `store.error.not_found`.
fn load_catalog(lang: &str) -> Result<BTreeMap<String, String>, String> {
    let path = format!("locales/{}.toml", lang);
    let content = fs::read_to_string(&path).map_err(|e| e.to_string())?;
    let table: toml::Table = toml::from_str(&content).map_err(|e| e.to_string())?;

    let mut flat = BTreeMap::new();
    flatten("", &table, &mut flat)?;
    Ok(flat)
}

fn flatten(
    prefix: &str,
    table: &toml::Table,
    out: &mut BTreeMap<String, String>,
) -> Result<(), String> {
    for (key, value) in table {
        let full_key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        match value {
            toml::Value::String(text) => {
                out.insert(full_key, text.clone());
            }
            toml::Value::Table(nested) => flatten(&full_key, nested, out)?,
            other => {
                return Err(format!(
                    "key '{}' must be a string or table, found {}",
                    full_key,
                    other.type_str()
                ));
            }
        }
    }
    Ok(())
}
