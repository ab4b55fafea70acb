//! Command-line front end for the Directus bridge.
//!
//! Each subcommand runs one operation and prints its outcome as JSON.

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

use directus_bridge::config::{self, BridgeConfig};
use directus_bridge::directus::{
    AccountInput, Credentials, DirectusClient, MemorySessionStore, NoSession, RecordId,
    SessionStore, UserRecordInput,
};
use directus_bridge::observability::logging;

#[derive(Parser)]
#[command(name = "directus-bridge")]
#[command(about = "Talk to the Directus backend from the command line", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Backend base URL (overrides config and DIRECTUS_URL).
    #[arg(short, long)]
    url: Option<String>,

    /// Access token for authorized requests.
    #[arg(short, long, env = "DIRECTUS_TOKEN", hide_env_values = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and print the session tokens
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "DIRECTUS_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Exchange a refresh token for new tokens
    Refresh {
        #[arg(long)]
        refresh_token: String,
    },
    /// Invalidate a refresh token
    Logout {
        #[arg(long)]
        refresh_token: String,
    },
    /// Check whether the token is still accepted
    Check {
        #[arg(long)]
        refresh_token: Option<String>,
    },
    /// Show the account behind the token
    Whoami,
    /// Vehicle operations
    #[command(subcommand)]
    Vehicles(VehicleCommands),
    /// User operations
    #[command(subcommand)]
    Users(UserCommands),
    /// Print the driving-restriction digit groups
    PlateRules {
        /// Also report the group of this plate.
        #[arg(long)]
        plate: Option<String>,
    },
}

#[derive(Subcommand)]
enum VehicleCommands {
    List,
    Get {
        id: String,
    },
    Create {
        #[arg(long)]
        plate: String,
        #[arg(long = "type")]
        kind: String,
        /// Owner id. Defaults to the account behind the token, if any.
        #[arg(long)]
        owner: Option<String>,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    List,
    Get {
        id: String,
    },
    CreateProfile {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long, env = "DIRECTUS_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        role: Option<String>,
    },
    CreateAccount {
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, env = "DIRECTUS_PASSWORD", hide_env_values = true, default_value = "")]
        password: String,
        #[arg(long)]
        first_name: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => BridgeConfig::default(),
    };
    config = config::apply_env(config)?;
    if let Some(url) = &cli.url {
        config.backend.base_url = url.clone();
    }

    logging::init(&config.observability);

    let session: Arc<dyn SessionStore> = match &cli.token {
        Some(token) => Arc::new(MemorySessionStore::with_token(token.clone())),
        None => Arc::new(NoSession),
    };
    let client = DirectusClient::new(config, session.clone())?;

    match cli.command {
        Commands::Login { email, password } => {
            print_json(&client.authenticate(&Credentials::new(email, password)).await)?;
        }
        Commands::Refresh { refresh_token } => {
            print_json(&client.refresh_token(&refresh_token).await)?;
        }
        Commands::Logout { refresh_token } => {
            print_json(&client.logout(&refresh_token).await)?;
        }
        Commands::Check { refresh_token } => {
            print_json(&client.check_authenticated(refresh_token.as_deref()).await)?;
        }
        Commands::Whoami => {
            print_json(&client.current_user().await)?;
        }
        Commands::Vehicles(VehicleCommands::List) => {
            print_json(&client.list_vehicles().await)?;
        }
        Commands::Vehicles(VehicleCommands::Get { id }) => {
            print_json(&client.get_vehicle(&id).await)?;
        }
        Commands::Vehicles(VehicleCommands::Create { plate, kind, owner }) => {
            let owner = match owner {
                Some(id) => Some(RecordId::from(id)),
                None => acting_user(&client, session.as_ref()).await,
            };
            print_json(&client.create_vehicle(&plate, &kind, owner.as_ref()).await)?;
        }
        Commands::Users(UserCommands::List) => {
            print_json(&client.list_users().await)?;
        }
        Commands::Users(UserCommands::Get { id }) => {
            print_json(&client.get_user(&id).await)?;
        }
        Commands::Users(UserCommands::CreateProfile {
            name,
            email,
            phone,
            password,
            city,
            role,
        }) => {
            let input = UserRecordInput {
                name,
                email,
                phone,
                password,
                city: city.map(RecordId::from),
                role,
            };
            print_json(&client.create_user_record(&input).await)?;
        }
        Commands::Users(UserCommands::CreateAccount {
            email,
            password,
            first_name,
        }) => {
            let input = AccountInput {
                email,
                password,
                first_name,
            };
            print_json(&client.create_account(&input).await)?;
        }
        Commands::PlateRules { plate } => {
            let rules = client.plate_rules();
            match plate {
                Some(plate) => print_json(&serde_json::json!({
                    "rules": rules,
                    "plate": plate,
                    "group": rules.group_for(&plate),
                }))?,
                None => print_json(&rules)?,
            }
        }
    }

    Ok(())
}

/// Resolve who is creating a record: the session's user if it carries an
/// id, otherwise whoever the token belongs to. Best effort.
async fn acting_user(client: &DirectusClient, session: &dyn SessionStore) -> Option<RecordId> {
    if let Some(id) = session.snapshot().and_then(|s| s.user).and_then(|u| u.id) {
        return Some(id);
    }
    session.access_token()?;
    client.current_user().await.into_result().ok().and_then(|u| u.id)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
