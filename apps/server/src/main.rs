use std::io::Write;

use anyhow::Context;
use clap::{Parser, Subcommand};
use hellospring_config::load as load_config;
use hellospring_database::{Member, MemberRepository};
use hellospring_runtime::{telemetry, BackendServices};
use tracing::info;

#[derive(Parser)]
#[command(name = "hellospring-backend")]
#[command(about = "Inspect and seed the member table (lists members by default)")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Store a new member and print its generated id
    Save { name: String },
    /// Look a member up by id
    FindById { id: i64 },
    /// Look a member up by name
    FindByName { name: String },
    /// Print every stored member (default)
    List,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    telemetry::init_tracing().context("failed to initialise tracing")?;

    let config = load_config().context("failed to load configuration")?;

    let services = BackendServices::initialise(&config)
        .await
        .context("failed to initialise backend services")?;

    let mut stdout = std::io::stdout().lock();
    let result = run(
        cli.command.unwrap_or(Commands::List),
        &services.members,
        &mut stdout,
    )
    .await;

    services.shutdown().await;
    result
}

async fn run(
    command: Commands,
    members: &dyn MemberRepository,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match command {
        Commands::Save { name } => save(members, name, out).await,
        Commands::FindById { id } => find_by_id(members, id, out).await,
        Commands::FindByName { name } => find_by_name(members, &name, out).await,
        Commands::List => list(members, out).await,
    }
}

async fn save(
    members: &dyn MemberRepository,
    name: String,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let member = members
        .save(Member::new(name))
        .await
        .context("failed to save member")?;

    info!(member_id = ?member.id, "member stored");
    write_members(out, &[member])
}

async fn find_by_id(
    members: &dyn MemberRepository,
    id: i64,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let member = members
        .find_by_id(id)
        .await
        .with_context(|| format!("failed to look up member {id}"))?;

    write_lookup(out, member, &format!("id {id}"))
}

async fn find_by_name(
    members: &dyn MemberRepository,
    name: &str,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let member = members
        .find_by_name(name)
        .await
        .with_context(|| format!("failed to look up member named {name}"))?;

    write_lookup(out, member, &format!("name {name:?}"))
}

async fn list(members: &dyn MemberRepository, out: &mut impl Write) -> anyhow::Result<()> {
    let members = members
        .find_all()
        .await
        .context("failed to fetch members")?;

    writeln!(out, "=== MEMBERS ===")?;
    if members.is_empty() {
        writeln!(out, "No members found in database")?;
    } else {
        writeln!(out, "Found {} members:", members.len())?;
        write_members(out, &members)?;
    }
    Ok(())
}

fn write_lookup(out: &mut impl Write, member: Option<Member>, criterion: &str) -> anyhow::Result<()> {
    match member {
        Some(member) => write_members(out, &[member]),
        None => {
            writeln!(out, "No member found with {criterion}")?;
            Ok(())
        }
    }
}

fn write_members(out: &mut impl Write, members: &[Member]) -> anyhow::Result<()> {
    writeln!(out, "{:<8} {:<40}", "ID", "Name")?;
    writeln!(out, "{}", "-".repeat(48))?;

    for member in members {
        writeln!(
            out,
            "{:<8} {:<40}",
            member
                .id
                .map_or_else(|| "NULL".to_string(), |id| id.to_string()),
            member.name
        )?;
    }
    Ok(())
}
