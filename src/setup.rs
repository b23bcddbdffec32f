//! First-run interactive configuration.
//!
//! Walks the operator through credentials, team and machine selection, and
//! notification settings, then writes the config file. Kept out of the
//! pipeline: `run` never prompts.

use anyhow::{Context, Result};
use std::io::{Write, stdin, stdout};
use std::path::Path;

use crate::api::{DEFAULT_BASE_URL, ImportApi, SleepHqClient};
use crate::config::{AppConfig, NtfyConfig};

fn prompt(label: &str) -> Result<String> {
    print!("{label} > ");
    stdout().flush()?;
    let mut input = String::new();
    stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

pub async fn run(config_path: &Path) -> Result<()> {
    if config_path.exists() {
        println!(
            "{} already exists; delete it first if you want to reconfigure.",
            config_path.display()
        );
        return Ok(());
    }

    println!("Let's set up the SleepHQ uploader.");
    let client_id = prompt("Please enter your SleepHQ Client ID")?;
    let client_secret = prompt("Please enter your SleepHQ Client Secret")?;
    let data_dir = prompt("Please enter the path to the config.pcfg and therapy.pdat files")?;

    // Credentials are validated against the API before anything is written
    let client = SleepHqClient::new(DEFAULT_BASE_URL);
    let token = client
        .authenticate(&client_id, &client_secret)
        .await
        .context("could not authenticate with the entered credentials")?;
    println!("Authorization successful.");

    let teams = client.list_teams(&token).await?;
    for team in &teams {
        println!("Found: id {}, Name: {}", team.id, team.name);
    }
    let team_id = prompt("Please enter the team ID to use")?;

    let machines = client.list_machines(&team_id, &token).await?;
    for machine in &machines {
        println!(
            "Found: {}, {}, Serial Number: {}",
            machine.brand, machine.model, machine.serial_number
        );
    }
    let device_serial =
        prompt("Please enter the device serial number (or \"any\" for the first machine)")?;

    let ntfy_enabled = prompt("Enable ntfy push notifications? (yes/no)")?;
    let ntfy = if ntfy_enabled.eq_ignore_ascii_case("yes") {
        let topic = prompt("Enter your ntfy topic name")?;
        let token = prompt("Enter your ntfy access token (leave empty for a public topic)")?;
        NtfyConfig {
            enabled: true,
            topic,
            token: if token.is_empty() { None } else { Some(token) },
        }
    } else {
        NtfyConfig::default()
    };

    let config = AppConfig {
        client_id,
        client_secret,
        team_id,
        device_serial,
        data_dir: data_dir.into(),
        api_base: DEFAULT_BASE_URL.to_string(),
        verbose: false,
        json_logs: false,
        ntfy,
        archive: None,
    };
    config.write(config_path)?;
    println!(
        "{} has been created. Run `sleephq-uploader run` to upload.",
        config_path.display()
    );
    Ok(())
}
