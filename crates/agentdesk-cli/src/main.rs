//! `agentdesk` — command-line front end for the AgentDesk backend.
//!
//! Every gateway operation is reachable as a subcommand; `chat` opens an
//! interactive conversation driven by the same session controller as the
//! desktop view.

mod chat;

use std::io::{self, Write};

use agentdesk_models::{
    creation_stamp, parse_record_data, AgentCompleteRequest, RecordData, SessionId, UserId,
    UserStateCreate, UserStateUpdate, WorldKey, WorldStateCreate, WorldStateUpdate,
};
use agentdesk_sdk::session::{DEFAULT_SESSION_ID, DEFAULT_USER_ID};
use agentdesk_sdk::{AgentDeskClient, ApiBase, ChatSession};
use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(name = "agentdesk")]
#[command(about = "Chat with the agent and manage user / world state records")]
#[command(author, version, long_about = None)]
pub struct Cli {
    /// Backend URL; bypasses the AGENTDESK_* environment resolution.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Interactive chat with the agent
    Chat(SessionArgs),
    #[command(flatten)]
    Request(RequestCommand),
}

/// Commands that issue requests and print the result, without a prompt.
#[derive(Subcommand, Debug)]
pub enum RequestCommand {
    /// User-state records
    #[command(subcommand)]
    Users(UserCommand),
    /// World-state records
    #[command(subcommand)]
    World(WorldCommand),
    /// One-shot completion of a prompt
    Complete {
        #[command(flatten)]
        session: SessionArgs,
        /// Prompt text
        prompt: String,
    },
    /// Agent health check
    Health,
}

#[derive(Args, Debug)]
pub struct SessionArgs {
    /// Conversation identifier
    #[arg(long, default_value = DEFAULT_SESSION_ID)]
    pub session_id: SessionId,

    /// User identifier (omitted from requests when blank)
    #[arg(long, default_value = DEFAULT_USER_ID)]
    pub user_id: UserId,
}

#[derive(Subcommand, Debug)]
pub enum UserCommand {
    /// List every user-state record
    List,
    /// Show one record
    Get { user_id: UserId },
    /// Create a record (payload defaults to `{"created_at": <now>}`)
    Create {
        user_id: UserId,
        /// JSON object payload
        #[arg(long)]
        data: Option<String>,
    },
    /// Replace a record's payload
    Update {
        user_id: UserId,
        /// JSON object payload
        #[arg(long)]
        data: Option<String>,
    },
    /// Delete a record
    Delete { user_id: UserId },
}

#[derive(Subcommand, Debug)]
pub enum WorldCommand {
    /// List every world-state record
    List,
    /// Show one record
    Get { key: WorldKey },
    /// Create a record (payload defaults to `{"created_at": <now>}`)
    Create {
        key: WorldKey,
        /// JSON object payload
        #[arg(long)]
        data: Option<String>,
    },
    /// Rename a record and/or replace its payload
    Update {
        key: WorldKey,
        /// New key
        #[arg(long)]
        rename: Option<WorldKey>,
        /// JSON object payload
        #[arg(long)]
        data: Option<String>,
    },
    /// Delete a record
    Delete { key: WorldKey },
}

fn data_or_stamp(raw: Option<&str>) -> anyhow::Result<RecordData> {
    match raw {
        Some(raw) => Ok(parse_record_data(raw)?),
        None => Ok(creation_stamp(chrono::Utc::now())),
    }
}

fn optional_data(raw: Option<&str>) -> anyhow::Result<Option<RecordData>> {
    raw.map(parse_record_data).transpose().map_err(Into::into)
}

fn print_json<T: Serialize>(out: &mut impl Write, value: &T) -> anyhow::Result<()> {
    writeln!(out, "{}", serde_json::to_string_pretty(value)?)?;
    Ok(())
}

/// Run a request command, writing results to `out`.
async fn execute(
    command: RequestCommand,
    client: &AgentDeskClient,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match command {
        RequestCommand::Users(cmd) => match cmd {
            UserCommand::List => print_json(out, &client.list_users().await?),
            UserCommand::Get { user_id } => print_json(out, &client.get_user(&user_id).await?),
            UserCommand::Create { user_id, data } => {
                let body = UserStateCreate {
                    user_id,
                    data: data_or_stamp(data.as_deref())?,
                };
                print_json(out, &client.create_user(&body).await?)
            }
            UserCommand::Update { user_id, data } => {
                let body = UserStateUpdate {
                    data: optional_data(data.as_deref())?,
                };
                print_json(out, &client.update_user(&user_id, &body).await?)
            }
            UserCommand::Delete { user_id } => {
                client.delete_user(&user_id).await?;
                writeln!(out, "deleted user state {user_id}")?;
                Ok(())
            }
        },
        RequestCommand::World(cmd) => match cmd {
            WorldCommand::List => print_json(out, &client.list_world().await?),
            WorldCommand::Get { key } => print_json(out, &client.get_world(&key).await?),
            WorldCommand::Create { key, data } => {
                let body = WorldStateCreate {
                    key,
                    data: data_or_stamp(data.as_deref())?,
                };
                print_json(out, &client.create_world(&body).await?)
            }
            WorldCommand::Update { key, rename, data } => {
                let body = WorldStateUpdate {
                    key: rename,
                    data: optional_data(data.as_deref())?,
                };
                print_json(out, &client.update_world(&key, &body).await?)
            }
            WorldCommand::Delete { key } => {
                client.delete_world(&key).await?;
                writeln!(out, "deleted world state {key}")?;
                Ok(())
            }
        },
        RequestCommand::Complete { session, prompt } => {
            let reply = client
                .complete(&AgentCompleteRequest {
                    session_id: session.session_id,
                    prompt,
                    user_id: (!session.user_id.is_blank()).then_some(session.user_id),
                })
                .await?;
            writeln!(out, "{}", reply.response)?;
            Ok(())
        }
        RequestCommand::Health => print_json(out, &client.health().await?),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so command output stays pipeable.
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let client = match cli.base_url.as_deref() {
        Some(url) => AgentDeskClient::new(ApiBase::direct(url)),
        None => AgentDeskClient::from_env(),
    };
    tracing::debug!(base = %client.base(), "client ready");

    let mut stdout = io::stdout();
    match cli.command {
        Commands::Chat(args) => {
            let session = ChatSession::new(args.session_id, args.user_id);
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            chat::run(&client, session, stdin, &mut stdout, chat::CHAT_ERROR_TEXT).await
        }
        Commands::Request(command) => execute(command, &client, &mut stdout)
            .await
            .context("request failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    async fn client() -> AgentDeskClient {
        let addr = mock_backend::spawn_ephemeral().await.expect("bind");
        AgentDeskClient::new(ApiBase::direct(&format!("http://{addr}")))
    }

    async fn run(client: &AgentDeskClient, args: &[&str]) -> anyhow::Result<String> {
        let cli = Cli::try_parse_from(std::iter::once("agentdesk").chain(args.iter().copied()))?;
        let Commands::Request(command) = cli.command else {
            anyhow::bail!("not a request command");
        };
        let mut out = Vec::new();
        execute(command, client, &mut out).await?;
        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn parses_global_base_url() {
        let cli = Cli::try_parse_from(["agentdesk", "health", "--base-url", "http://x"]).unwrap();
        assert_eq!(cli.base_url.as_deref(), Some("http://x"));
        assert!(matches!(
            cli.command,
            Commands::Request(RequestCommand::Health)
        ));
    }

    #[test]
    fn session_args_default_identifiers() {
        let cli = Cli::try_parse_from(["agentdesk", "chat"]).unwrap();
        let Commands::Chat(args) = cli.command else {
            panic!("expected chat");
        };
        assert_eq!(args.session_id.as_str(), DEFAULT_SESSION_ID);
        assert_eq!(args.user_id.as_str(), DEFAULT_USER_ID);
    }

    #[tokio::test]
    async fn users_create_defaults_to_stamp() {
        let client = client().await;
        let out = run(&client, &["users", "create", "u1"]).await.unwrap();
        let record: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(record["user_id"], "u1");
        assert!(record["data"]["created_at"].is_string());

        let out = run(&client, &["users", "list"]).await.unwrap();
        let list: Vec<Value> = serde_json::from_str(&out).unwrap();
        assert_eq!(list.len(), 1);
    }

    #[tokio::test]
    async fn world_update_renames() {
        let client = client().await;
        run(&client, &["world", "create", "k1", "--data", r#"{"weather":"sun"}"#])
            .await
            .unwrap();
        let out = run(&client, &["world", "update", "k1", "--rename", "k2"])
            .await
            .unwrap();
        let record: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(record["key"], "k2");
        assert_eq!(record["data"]["weather"], "sun");

        let out = run(&client, &["world", "delete", "k2"]).await.unwrap();
        assert_eq!(out.trim(), "deleted world state k2");
    }

    #[tokio::test]
    async fn invalid_data_is_rejected_before_any_request() {
        let client = client().await;
        let err = run(&client, &["users", "create", "u1", "--data", "[1]"])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("must be a JSON object"));
        let out = run(&client, &["users", "list"]).await.unwrap();
        assert_eq!(out.trim(), "[]");
    }

    #[tokio::test]
    async fn complete_prints_response() {
        let client = client().await;
        let out = run(&client, &["complete", "--user-id", "u9", "say hi"])
            .await
            .unwrap();
        assert_eq!(out.trim(), "Agent completed for u9: say hi");
    }

    #[tokio::test]
    async fn missing_record_surfaces_status() {
        let client = client().await;
        let err = run(&client, &["users", "get", "ghost"]).await.unwrap_err();
        assert!(err.to_string().contains("404"));
    }
}
