/*
[INPUT]:  Parsed subcommands
[OUTPUT]: Command definitions shared by the entry point and handlers
[POS]:    CLI layer - command surface
[UPDATE]: When adding or renaming subcommands
*/

pub mod commands;
pub mod init;

use std::path::PathBuf;

use clap::Subcommand;
use wallet_connector::OauthProvider;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Interactively write a configuration file
    Init {
        /// Output path (defaults to the config path)
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Show session and connection state
    Status {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// List configured chains
    Chains,
    /// Authenticate and connect
    Login {
        #[command(subcommand)]
        method: LoginMethod,
    },
    /// Rebind the signer to another configured chain
    SwitchChain { chain_id: u64 },
    /// Disconnect and forget the stored session
    Logout,
}

#[derive(Subcommand, Debug)]
pub enum LoginMethod {
    /// Email one-time code: sends the code, then verifies it
    Otp {
        #[arg(long)]
        email: String,
        /// Code to verify instead of prompting
        #[arg(long)]
        code: Option<String>,
    },
    /// Social OAuth
    Oauth {
        #[arg(long, default_value = "google")]
        provider: OauthProvider,
        #[arg(long)]
        redirect_url: Option<String>,
    },
    /// Externally issued JWT
    Jwt {
        #[arg(long)]
        token: String,
        #[arg(long)]
        password: Option<String>,
    },
}
