use anyhow::Result;

use crate::{http, output};

pub fn run(server: &str, name: &str, x: i32, y: i32, json: bool) -> Result<()> {
    let state = http::post(
        server,
        &format!("/api/characters/{name}/move"),
        Some(serde_json::json!({"x": x, "y": y})),
    )?;
    if json {
        return output::print_json(&state);
    }
    println!("{name} moving to ({x}, {y})");
    if let Some(expiration) = state["cooldown_expiration"].as_str() {
        println!("cooldown until {expiration}");
    }
    Ok(())
}
