use serde_json::Value;

use crate::cli::utils::{error_message, ApiClient};
use crate::cli::OutputFormat;

pub async fn health(client: &ApiClient, output_format: OutputFormat) -> anyhow::Result<()> {
    let (status, body) = client.get("/health").await?;

    if output_format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        let data = body.get("data").unwrap_or(&Value::Null);
        let state = data.get("status").and_then(Value::as_str).unwrap_or("unknown");
        let connection = data.get("connection").and_then(Value::as_str).unwrap_or("unknown");
        println!("Status: {}", state);
        println!("Database connection: {}", connection);
    }

    if !status.is_success() {
        anyhow::bail!(error_message(status, &body));
    }
    Ok(())
}
