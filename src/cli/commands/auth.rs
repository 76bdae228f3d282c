use serde_json::{json, Value};

use crate::cli::utils::{ensure_success, output_success, ApiClient};
use crate::cli::OutputFormat;

pub async fn register(
    client: &ApiClient,
    email: &str,
    password: &str,
    name: &str,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let payload = json!({ "email": email, "password": password, "name": name });
    let (status, body) = client.post("/api/auth/register", &payload).await?;
    ensure_success(status, &body)?;

    let user = body.pointer("/data/user").cloned().unwrap_or(Value::Null);
    output_success(
        output_format,
        &format!("Registered {}", email),
        Some(json!({ "user": user })),
    )
}

pub async fn login(
    client: &ApiClient,
    email: &str,
    password: &str,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let payload = json!({ "email": email, "password": password });
    let (status, body) = client.post("/api/auth/login", &payload).await?;
    ensure_success(status, &body)?;

    let data = body.get("data").cloned().unwrap_or(Value::Null);
    match output_format {
        OutputFormat::Json => output_success(output_format, &format!("Logged in as {}", email), Some(data)),
        OutputFormat::Text => {
            println!("✓ Logged in as {}", email);
            if let Some(token) = data.get("token").and_then(Value::as_str) {
                println!("export VIDSHARE_TOKEN={}", token);
            }
            Ok(())
        }
    }
}

pub async fn session(client: &ApiClient, output_format: OutputFormat) -> anyhow::Result<()> {
    if client.token().is_none() {
        anyhow::bail!("no session token; pass --token or set VIDSHARE_TOKEN");
    }

    let (status, body) = client.get("/api/auth/session").await?;
    ensure_success(status, &body)?;

    let session = body.get("data").cloned().unwrap_or(Value::Null);
    if output_format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&json!({ "session": session }))?);
        return Ok(());
    }

    match session.get("email").and_then(Value::as_str) {
        Some(email) => println!("Signed in as {}", email),
        None => println!("Token is not valid or has expired"),
    }
    Ok(())
}
