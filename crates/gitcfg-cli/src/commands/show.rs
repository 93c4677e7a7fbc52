//! Reading the merged configuration

use colored::Colorize;
use gitcfg_core::{Config, GitConfigOverrides};
use gitcfg_store::StoreProvider;
use serde_json::{Map, Value};

use crate::error::Result;

/// Print the merged configuration as git-config text, or as a flat JSON
/// object keyed by `section[.subsection].key`.
pub fn run_get<P: StoreProvider>(overrides: &GitConfigOverrides<P>, json: bool) -> Result<()> {
    let config = overrides.get_config();

    if json {
        println!("{}", serde_json::to_string_pretty(&to_json(&config))?);
        return Ok(());
    }

    if config.is_empty() {
        println!("{}", "(no configuration)".dimmed());
    } else {
        print!("{config}");
    }
    Ok(())
}

/// Flatten `config` into `{"section[.subsection].key": [values...]}`.
pub fn to_json(config: &Config) -> Value {
    let mut map = Map::new();
    for section in config.sections() {
        let blocks = std::iter::once(None).chain(config.subsections(section).into_iter().map(Some));
        for subsection in blocks {
            for key in config.names(section, subsection) {
                let dotted = match subsection {
                    Some(sub) => format!("{section}.{sub}.{key}"),
                    None => format!("{section}.{key}"),
                };
                let values = config
                    .get_string_list(section, subsection, key)
                    .iter()
                    .cloned()
                    .map(Value::String)
                    .collect();
                map.insert(dotted, Value::Array(values));
            }
        }
    }
    Value::Object(map)
}
