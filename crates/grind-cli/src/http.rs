//! Thin ureq helpers for talking to a running grind server.

use anyhow::{bail, Context, Result};

pub fn get(server: &str, path: &str) -> Result<serde_json::Value> {
    read(ureq::get(&format!("{server}{path}")).call())
}

pub fn post(server: &str, path: &str, body: Option<serde_json::Value>) -> Result<serde_json::Value> {
    let request = ureq::post(&format!("{server}{path}"));
    read(match body {
        Some(body) => request.send_json(body),
        None => request.call(),
    })
}

pub fn put(server: &str, path: &str, body: serde_json::Value) -> Result<serde_json::Value> {
    read(ureq::put(&format!("{server}{path}")).send_json(body))
}

pub fn delete(server: &str, path: &str) -> Result<serde_json::Value> {
    read(ureq::delete(&format!("{server}{path}")).call())
}

fn read(result: std::result::Result<ureq::Response, ureq::Error>) -> Result<serde_json::Value> {
    match result {
        Ok(response) => response.into_json().context("invalid JSON from server"),
        Err(ureq::Error::Status(code, response)) => {
            let body: serde_json::Value = response.into_json().unwrap_or(serde_json::Value::Null);
            let message = body
                .get("error")
                .and_then(|e| e.as_str())
                .unwrap_or("request failed")
                .to_string();
            bail!("server returned {code}: {message}")
        }
        Err(e) => {
            Err(e).context("could not reach the grind server (is `grind serve` running?)")
        }
    }
}
