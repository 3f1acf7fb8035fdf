/*
[INPUT]:  Subcommand, validated configuration and user input
[OUTPUT]: Connector operations with console output
[POS]:    CLI layer - command handlers
[UPDATE]: When adding commands or changing their output
*/

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use console::style;
use dialoguer::{Input, theme::ColorfulTheme};
use serde::Serialize;
use tokio::sync::broadcast::Receiver;
use tracing::info;
use wallet_connector::{ConnectorEvent, EmbeddedWalletConnector, LoginRequest};

use super::{Command, LoginMethod};
use wallet_connector_cli::{CliConfig, build_connector};

#[derive(Debug, Serialize)]
struct StatusReport {
    client_id: String,
    active_chain: u64,
    email: Option<String>,
    connected: bool,
    address: Option<String>,
    checked_at: DateTime<Utc>,
}

pub async fn run(command: Command, mut config: CliConfig, config_path: &Path) -> Result<()> {
    if let Command::Chains = command {
        print_chains(&config);
        return Ok(());
    }

    let connector = build_connector(&config)?;
    let mut events = connector.subscribe();

    let result = match command {
        Command::Status { json } => status(&connector, json).await,
        Command::Login { method } => login(&connector, method).await,
        Command::SwitchChain { chain_id } => {
            switch_chain(&connector, &mut config, config_path, chain_id).await
        }
        Command::Logout => logout(&connector).await,
        Command::Chains | Command::Init { .. } => Ok(()),
    };

    drain_events(&mut events);
    result
}

async fn status(connector: &EmbeddedWalletConnector, json: bool) -> Result<()> {
    let address = connector.get_address().await.ok();
    let report = StatusReport {
        client_id: connector.client_id().to_string(),
        active_chain: connector.active_chain().id,
        email: connector.get_email(),
        connected: address.is_some(),
        address,
        checked_at: Utc::now(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", style("Wallet connector status").bold().cyan());
    println!("  client:    {}", report.client_id);
    println!("  chain:     {}", report.active_chain);
    println!(
        "  email:     {}",
        report.email.as_deref().unwrap_or("(none)")
    );
    match &report.address {
        Some(address) => println!("  connected: {} {}", style("yes").green(), address),
        None => println!("  connected: {}", style("no").yellow()),
    }
    Ok(())
}

async fn login(connector: &EmbeddedWalletConnector, method: LoginMethod) -> Result<()> {
    // a restored session would short-circuit connect after any backend call
    if let Ok(address) = connector.get_address().await {
        println!("{}", style("Already connected").bold().green());
        println!("  address: {}", style(&address).cyan());
        return Ok(());
    }

    let request = match method {
        LoginMethod::Otp { email, code } => {
            connector
                .send_email_otp(&email)
                .await
                .context("failed to send one-time code")?;
            let code = match code {
                Some(code) => code,
                None => Input::<String>::with_theme(&ColorfulTheme::default())
                    .with_prompt(format!("Code sent to {email}"))
                    .interact_text()?,
            };
            LoginRequest::otp(code)
        }
        LoginMethod::Oauth {
            provider,
            redirect_url,
        } => LoginRequest::social(provider, redirect_url),
        LoginMethod::Jwt { token, password } => LoginRequest::jwt(token, password),
    };

    let address = connector
        .connect(request, None)
        .await
        .context("login failed")?;

    println!("{}", style("Connected").bold().green());
    println!("  address: {}", style(&address).cyan());
    if let Some(email) = connector.get_email() {
        println!("  email:   {email}");
    }
    Ok(())
}

async fn switch_chain(
    connector: &EmbeddedWalletConnector,
    config: &mut CliConfig,
    config_path: &Path,
    chain_id: u64,
) -> Result<()> {
    connector
        .switch_chain(chain_id)
        .await
        .with_context(|| format!("failed to switch to chain {chain_id}"))?;

    config.active_chain = chain_id;
    config.save(config_path)?;
    info!(chain_id, config = %config_path.display(), "active chain saved");

    let chain = connector.active_chain();
    println!(
        "Switched to {} ({})",
        style(&chain.name).cyan(),
        chain.id
    );
    Ok(())
}

async fn logout(connector: &EmbeddedWalletConnector) -> Result<()> {
    connector.disconnect().await.context("logout incomplete")?;
    println!("{}", style("Logged out").bold());
    Ok(())
}

fn print_chains(config: &CliConfig) {
    for chain in &config.chains {
        let marker = if chain.id == config.active_chain { "*" } else { " " };
        println!(
            "{marker} {:>8}  {:<16} {}",
            chain.id,
            chain.name,
            chain.rpc_url().unwrap_or("-")
        );
    }
}

fn drain_events(events: &mut Receiver<ConnectorEvent>) {
    while let Ok(event) = events.try_recv() {
        info!(event = event.name(), ?event, "connector event");
    }
}
