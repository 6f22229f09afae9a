//! # Clients Subcommand
//!
//! Client CRUD against the backend. Registration numbers are validated
//! locally before anything is sent.

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use complai_api_client::ComplaiClient;
use complai_core::{ClientId, ClientPatch, ClientStatus, ClientType, NewClient};

use crate::output::{client_line, report, Format};

/// Arguments for the `complai clients` subcommand.
#[derive(Args, Debug)]
pub struct ClientsArgs {
    #[command(subcommand)]
    pub command: ClientsCommand,
}

/// Client subcommands.
#[derive(Subcommand, Debug)]
pub enum ClientsCommand {
    /// List clients.
    List,

    /// Show one client.
    Get {
        /// Client id.
        id: String,
    },

    /// Create a client.
    Create {
        #[arg(long)]
        name: String,
        /// Constitution: "Pvt Ltd", "LLP", "OPC", "Partnership", "Proprietorship".
        #[arg(long = "type")]
        client_type: ClientType,
        #[command(flatten)]
        registrations: Registrations,
    },

    /// Update fields of a client. Omitted fields are left unchanged.
    Update {
        /// Client id.
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long = "type")]
        client_type: Option<ClientType>,
        /// "active" or "inactive".
        #[arg(long)]
        status: Option<ClientStatus>,
        #[command(flatten)]
        registrations: Registrations,
    },

    /// Delete a client.
    Delete {
        /// Client id.
        id: String,
    },
}

/// Statutory registration numbers.
#[derive(Args, Debug, Default)]
pub struct Registrations {
    #[arg(long)]
    pub pan: Option<String>,
    #[arg(long)]
    pub cin: Option<String>,
    /// GSTIN.
    #[arg(long)]
    pub gst: Option<String>,
    #[arg(long)]
    pub tan: Option<String>,
}

/// Execute the clients subcommand.
pub async fn run_clients(args: ClientsArgs, api: &ComplaiClient, format: Format) -> Result<u8> {
    let clients = api.clients();
    match args.command {
        ClientsCommand::List => report(format, clients.list().await, |list| {
            for client in list {
                println!("{}", client_line(client));
            }
            println!("{} client(s)", list.len());
        }),

        ClientsCommand::Get { id } => {
            let id = ClientId::new(id);
            match clients.get(&id).await? {
                Some(reply) => report(format, Ok(reply), |c| {
                    println!("{}", serde_json::to_string_pretty(c).unwrap_or_default());
                }),
                None => bail!("client {id} not found"),
            }
        }

        ClientsCommand::Create {
            name,
            client_type,
            registrations,
        } => {
            let new = new_client(name, client_type, registrations)?;
            report(format, clients.create(&new).await, |c| {
                println!("created client {} ({})", c.id, c.name);
            })
        }

        ClientsCommand::Update {
            id,
            name,
            client_type,
            status,
            registrations,
        } => {
            let patch = client_patch(name, client_type, status, registrations)?;
            if patch.is_empty() {
                bail!("nothing to update; pass at least one field");
            }
            report(
                format,
                clients.update(&ClientId::new(id), &patch).await,
                |c| println!("updated client {}", client_line(c)),
            )
        }

        ClientsCommand::Delete { id } => {
            let id = ClientId::new(id);
            report(format, clients.delete(&id).await, |_| {
                println!("deleted client {id}");
            })
        }
    }
}

fn new_client(name: String, client_type: ClientType, reg: Registrations) -> Result<NewClient> {
    let mut new = NewClient::new(name, client_type);
    new.pan = reg.pan;
    new.cin = reg.cin;
    new.gst = reg.gst;
    new.tan = reg.tan;
    new.validate().context("invalid client")?;
    Ok(new)
}

fn client_patch(
    name: Option<String>,
    client_type: Option<ClientType>,
    status: Option<ClientStatus>,
    reg: Registrations,
) -> Result<ClientPatch> {
    let mut patch = ClientPatch {
        name,
        client_type,
        pan: reg.pan,
        cin: reg.cin,
        gst: reg.gst,
        tan: reg.tan,
        status,
        logo: None,
    };
    patch.validate().context("invalid client update")?;
    Ok(patch)
}
