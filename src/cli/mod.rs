//! CLI module for the account registry
//!
//! Every subcommand prints its result as JSON on stdout; logs go to stderr.

pub mod commands;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::domain::ProfileDetails;
use crate::infrastructure::user::AccountDetails;

/// Account Registry - user accounts, profiles and admin search
#[derive(Parser)]
#[command(name = "account-registry")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Apply pending PostgreSQL migrations
    Migrate {
        /// Also insert the configured default role
        #[arg(long)]
        seed_default_role: bool,
    },

    /// Register a new account
    Register {
        #[command(flatten)]
        account: AccountArgs,

        /// Password for the account; the development default is used when omitted
        #[arg(long)]
        password: Option<String>,
    },

    /// Create an account on behalf of someone else
    AdminCreate {
        #[command(flatten)]
        account: AccountArgs,
    },

    /// Show one account
    Show {
        #[arg(long, conflicts_with = "email", required_unless_present = "email")]
        id: Option<String>,

        #[arg(long)]
        email: Option<String>,
    },

    /// List every account
    List,

    /// Replace the names, email and profile of an account
    Update {
        #[arg(long)]
        id: String,

        #[command(flatten)]
        account: AccountArgs,
    },

    /// Delete an account
    Delete {
        #[arg(long)]
        id: String,

        /// Delete as an administrator rather than as the owner
        #[arg(long)]
        admin: bool,
    },

    /// Search accounts by age range and name prefixes
    Search(SearchArgs),

    /// Check an email and password pair
    Verify {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,
    },
}

impl Command {
    /// Whether the command writes accounts
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            Self::Register { .. } | Self::AdminCreate { .. } | Self::Update { .. } | Self::Delete { .. }
        )
    }
}

/// Account fields shared by the create and update commands
#[derive(Args, Debug, Clone)]
pub struct AccountArgs {
    #[arg(long)]
    pub first_name: String,

    #[arg(long)]
    pub last_name: String,

    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub address: String,

    /// Birth date as YYYY-MM-DD
    #[arg(long)]
    pub birth_date: NaiveDate,

    #[arg(long)]
    pub profile_image_url: String,
}

impl From<AccountArgs> for AccountDetails {
    fn from(args: AccountArgs) -> Self {
        Self {
            first_name: args.first_name,
            last_name: args.last_name,
            email: args.email,
            profile: ProfileDetails {
                address: args.address,
                birth_date: args.birth_date,
                profile_image_url: args.profile_image_url,
            },
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct SearchArgs {
    #[arg(long)]
    pub min_age: Option<i32>,

    #[arg(long)]
    pub max_age: Option<i32>,

    #[arg(long)]
    pub first_name: Option<String>,

    #[arg(long)]
    pub last_name: Option<String>,

    #[arg(long, default_value_t = 0)]
    pub page: usize,

    /// Defaults to `search.default_page_size`
    #[arg(long)]
    pub size: Option<usize>,
}
