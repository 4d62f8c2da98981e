use anyhow::Result;

use crate::{http, output};

pub fn run(server: &str, json: bool) -> Result<()> {
    let value = http::get(server, "/api/characters")?;
    if json {
        return output::print_json(&value);
    }

    let rows: Vec<Vec<String>> = value
        .as_array()
        .map(|characters| {
            characters
                .iter()
                .map(|c| {
                    vec![
                        c["name"].as_str().unwrap_or("?").to_string(),
                        c["level"].to_string(),
                        format!("{}/{}", c["hp"], c["max_hp"]),
                        format!("({}, {})", c["x"], c["y"]),
                        c["gold"].to_string(),
                    ]
                })
                .collect()
        })
        .unwrap_or_default();
    output::print_table(&["NAME", "LEVEL", "HP", "POS", "GOLD"], rows);
    Ok(())
}
