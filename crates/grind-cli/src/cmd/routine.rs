use anyhow::Result;

use crate::{http, output};

/// Start a routine of `kind` with a single `{field: value}` parameter and
/// an optional run time in minutes.
pub fn start(
    server: &str,
    name: &str,
    kind: &str,
    field: &str,
    value: &str,
    minutes: Option<u64>,
    json: bool,
) -> Result<()> {
    let mut body = serde_json::json!({"type": kind, field: value});
    if let Some(minutes) = minutes {
        body["duration"] = serde_json::json!(minutes * 60);
    }

    let record = http::put(server, &format!("/api/routines/{name}"), body)?;
    if json {
        return output::print_json(&record);
    }
    match minutes {
        Some(minutes) => println!("started {kind} routine ({value}) for {name}, {minutes}m limit"),
        None => println!("started {kind} routine ({value}) for {name}"),
    }
    Ok(())
}

pub fn cancel(server: &str, name: &str, json: bool) -> Result<()> {
    let result = http::delete(server, &format!("/api/routines/{name}"))?;
    if json {
        return output::print_json(&result);
    }
    if result["cancelled"] == true {
        println!("cancelled active routine for {name}");
    } else {
        println!("no active routine for {name}");
    }
    Ok(())
}
