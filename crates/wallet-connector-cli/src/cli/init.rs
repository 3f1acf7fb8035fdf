/*
[INPUT]:  Interactive user input via CLI
[OUTPUT]: Generated YAML configuration file
[POS]:    CLI initialization layer
[UPDATE]: When CliConfig schema changes
*/

use std::path::Path;

use anyhow::{Result, bail};
use console::style;
use dialoguer::{Confirm, Input, Select, theme::ColorfulTheme};
use wallet_connector::Chain;

use wallet_connector_cli::CliConfig;
use wallet_connector_cli::config::SignerConfig;

const KNOWN_CHAINS: [(u64, &str); 5] = [
    (1, "ethereum"),
    (137, "polygon"),
    (8453, "base"),
    (42161, "arbitrum"),
    (11155111, "sepolia"),
];

pub fn run_init(output: &Path) -> Result<()> {
    println!("{}", style("Welcome to Wallet Connector Init").bold().cyan());
    println!(
        "{}",
        style("This will guide you through creating a connector configuration.").dim()
    );

    let theme = ColorfulTheme::default();

    if output.exists()
        && !Confirm::with_theme(&theme)
            .with_prompt(format!("{} exists. Overwrite?", output.display()))
            .default(false)
            .interact()?
    {
        println!("{}", style("Aborted.").yellow());
        return Ok(());
    }

    let client_id: String = Input::with_theme(&theme)
        .with_prompt("Client ID")
        .interact_text()?;

    let auth_base_url: String = Input::with_theme(&theme)
        .with_prompt("Auth API base URL")
        .default("https://embedded-wallet.example.com".to_string())
        .interact_text()?;

    println!("\n{}", style("--- Chains ---").bold());
    let mut chains = Vec::new();
    loop {
        let labels: Vec<String> = KNOWN_CHAINS
            .iter()
            .map(|(id, name)| format!("{name} ({id})"))
            .chain(std::iter::once("custom".to_string()))
            .collect();
        let selection = Select::with_theme(&theme)
            .with_prompt("Add chain")
            .items(&labels)
            .default(0)
            .interact()?;

        let (id, name) = match KNOWN_CHAINS.get(selection) {
            Some((id, name)) => (*id, name.to_string()),
            None => {
                let id: u64 = Input::with_theme(&theme)
                    .with_prompt("Chain ID")
                    .interact_text()?;
                let name: String = Input::with_theme(&theme)
                    .with_prompt("Chain name")
                    .interact_text()?;
                (id, name)
            }
        };

        if chains.iter().any(|chain: &Chain| chain.id == id) {
            println!("{}", style(format!("Chain {id} already added")).yellow());
        } else {
            let rpc: String = Input::with_theme(&theme)
                .with_prompt(format!("RPC URL for {name}"))
                .allow_empty(true)
                .interact_text()?;
            let mut chain = Chain::new(id, name);
            if !rpc.trim().is_empty() {
                chain = chain.with_rpc(rpc.trim());
            }
            chains.push(chain);
        }

        if !Confirm::with_theme(&theme)
            .with_prompt("Add another chain?")
            .default(false)
            .interact()?
        {
            break;
        }
    }

    let names: Vec<String> = chains
        .iter()
        .map(|chain| format!("{} ({})", chain.name, chain.id))
        .collect();
    let active = Select::with_theme(&theme)
        .with_prompt("Active chain")
        .items(&names)
        .default(0)
        .interact()?;

    println!("\n{}", style("--- Signer ---").bold());
    let private_key_env: String = Input::with_theme(&theme)
        .with_prompt("Environment variable holding the private key")
        .default(SignerConfig::default().private_key_env)
        .interact_text()?;

    let Some(active_chain) = chains.get(active).map(|chain| chain.id) else {
        bail!("no chains configured");
    };

    let config = CliConfig {
        client_id,
        auth_base_url,
        active_chain,
        chains,
        signer: SignerConfig { private_key_env },
        credentials_path: None,
    };
    config.validate()?;
    config.save(output)?;

    println!("\n{}", style("SUCCESS!").bold().green());
    println!(
        "Configuration written to: {}",
        style(output.display()).cyan()
    );

    Ok(())
}
