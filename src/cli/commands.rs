//! Command dispatch

use anyhow::bail;
use serde_json::{json, Value};
use tracing::{info, warn};

use super::{Cli, Command, SearchArgs};
use crate::config::{AppConfig, SearchConfig, StorageBackend};
use crate::domain::{AccountIdentity, RoleRepository, UserId, UserSearchQuery};
use crate::infrastructure::logging;
use crate::infrastructure::role::PostgresRoleRepository;
use crate::infrastructure::storage::{connect_pool, run_account_migrations, PostgresMigrator};
use crate::{create_services, default_role, AppServices};

/// Load configuration, initialize logging and run the requested command
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    logging::init_logging(&config.logging);

    let output = match cli.command {
        Command::Migrate { seed_default_role } => migrate(&config, seed_default_role).await?,
        command => {
            warn_if_not_persisted(&command, config.storage.backend);
            let services = create_services(&config).await?;
            execute(command, &services, &config.search).await?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Memory storage lives only as long as this process
fn warn_if_not_persisted(command: &Command, backend: StorageBackend) -> bool {
    let lost = backend == StorageBackend::Memory && command.is_mutating();

    if lost {
        warn!("Memory storage backend: this change is discarded when the command exits");
    }

    lost
}

async fn migrate(config: &AppConfig, seed_default_role: bool) -> anyhow::Result<Value> {
    if config.storage.backend != StorageBackend::Postgres {
        bail!("Migrations require the postgres storage backend");
    }

    let pool = connect_pool(&config.storage).await?;
    let applied = run_account_migrations(&pool).await?;
    let version = PostgresMigrator::new(pool.clone()).current_version().await?;

    let seeded = if seed_default_role {
        let role = PostgresRoleRepository::new(pool).save(default_role(config)?).await?;
        info!(role_id = %role.id(), "Default role seeded");
        Some(role)
    } else {
        None
    };

    Ok(json!({
        "applied": applied,
        "current_version": version,
        "seeded_role": seeded,
    }))
}

/// Run an account command against already wired services
pub async fn execute(
    command: Command,
    services: &AppServices,
    search: &SearchConfig,
) -> anyhow::Result<Value> {
    let output = match command {
        Command::Migrate { .. } => bail!("migrate is not an account command"),
        Command::Register { account, password } => {
            let user = match password {
                Some(password) => {
                    services
                        .registration
                        .register_with_password(account.into(), &password)
                        .await?
                }
                None => {
                    services
                        .registration
                        .register_with_default_password(account.into())
                        .await?
                }
            };
            serde_json::to_value(user)?
        }
        Command::AdminCreate { account } => {
            serde_json::to_value(services.registration.create_profile_admin(account.into()).await?)?
        }
        Command::Show { id, email } => {
            let identity = match (id, email) {
                (Some(id), _) => AccountIdentity::Id(UserId::parse(&id)?),
                (None, Some(email)) => AccountIdentity::Email(email),
                (None, None) => bail!("either --id or --email is required"),
            };
            serde_json::to_value(services.profiles.get_own_profile(&identity).await?)?
        }
        Command::List => serde_json::to_value(services.profiles.list_all().await?)?,
        Command::Update { id, account } => {
            let id = UserId::parse(&id)?;
            serde_json::to_value(services.profiles.update_own_profile(&id, account.into()).await?)?
        }
        Command::Delete { id, admin } => {
            let id = UserId::parse(&id)?;
            if admin {
                services.profiles.delete_by_id(&id).await?;
            } else {
                services.profiles.delete_own_profile(&id).await?;
            }
            json!({ "deleted": id })
        }
        Command::Search(args) => {
            let query = search_query(args, search);
            serde_json::to_value(services.search.search(&query).await?)?
        }
        Command::Verify { email, password } => {
            let user = services.profiles.verify_credentials(&email, &password).await?;
            json!({ "valid": user.is_some(), "user": user })
        }
    };

    Ok(output)
}

fn search_query(args: SearchArgs, config: &SearchConfig) -> UserSearchQuery {
    let mut query = UserSearchQuery::new()
        .with_page(args.page)
        .with_page_size(args.size.unwrap_or(config.default_page_size));

    if let Some(min_age) = args.min_age {
        query = query.with_min_age(min_age);
    }
    if let Some(max_age) = args.max_age {
        query = query.with_max_age(max_age);
    }
    if let Some(prefix) = args.first_name {
        query = query.with_first_name_prefix(prefix);
    }
    if let Some(prefix) = args.last_name {
        query = query.with_last_name_prefix(prefix);
    }

    query
}
