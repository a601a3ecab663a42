pub mod factories;
pub mod requests;
pub mod seed;
pub mod validate;

use serde::Serialize;

/// Exit codes shared by the commands
pub mod exit {
    pub const OK: u8 = 0;
    pub const INVALID: u8 = 1;
    pub const FORBIDDEN: u8 = 2;
}

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// `key=value` where the value is JSON, or a bare string when it does not
/// parse as JSON
pub(crate) fn parse_assignment(text: &str) -> anyhow::Result<(String, serde_json::Value)> {
    let (key, raw) = text
        .split_once('=')
        .ok_or_else(|| anyhow::anyhow!("expected key=value, got '{}'", text))?;
    let key = key.trim();
    if key.is_empty() {
        anyhow::bail!("missing key in '{}'", text);
    }
    let value = serde_json::from_str(raw).unwrap_or_else(|_| serde_json::Value::String(raw.to_string()));
    Ok((key.to_string(), value))
}
