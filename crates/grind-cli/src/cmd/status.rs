use anyhow::Result;

use crate::{http, output};

pub fn run(server: &str, name: &str, json: bool) -> Result<()> {
    let character = http::get(server, &format!("/api/characters/{name}"))?;
    // 404 here just means no active routine.
    let routine = http::get(server, &format!("/api/routines/{name}")).ok();

    if json {
        return output::print_json(&serde_json::json!({
            "character": character,
            "routine": routine,
        }));
    }

    println!(
        "{}  level {}  hp {}/{}  at ({}, {})  gold {}",
        character["name"].as_str().unwrap_or(name),
        character["level"],
        character["hp"],
        character["max_hp"],
        character["x"],
        character["y"],
        character["gold"],
    );
    if let Some(expiration) = character["cooldown_expiration"].as_str() {
        println!("cooldown until {expiration}");
    }
    match routine {
        Some(record) => println!(
            "routine: {} (since {})",
            record["routine"].as_str().unwrap_or("?"),
            record["started_at"].as_str().unwrap_or("?"),
        ),
        None => println!("routine: none"),
    }
    Ok(())
}
