pub mod commands;

use crate::catalog::{RecordId, Role, Segment, SegmentScope};
use crate::filters::{RoleOrder, SegmentOrder};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "phone-compare")]
#[command(author, version, about = "Compare smartphone specs side by side", long_about = None)]
pub struct Cli {
    /// Backend base URL (overrides $PHONE_COMPARE_API_URL and config.json)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Data directory (defaults to $PHONE_COMPARE_HOME or ~/.phone-compare)
    #[arg(long, global = true)]
    pub home: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List products in the catalog
    Products {
        /// Segment to browse (all, budget, midrange, flagship)
        #[arg(short, long)]
        segment: Option<SegmentScope>,

        /// Filter by product name
        #[arg(short, long)]
        query: Option<String>,
    },

    /// Show one product's details
    Show {
        /// Product id
        id: RecordId,

        /// Write the product image to this file
        #[arg(long)]
        save_image: Option<PathBuf>,
    },

    /// List the comparable spec fields
    Fields,

    /// Select or deselect products for comparison (at most two are kept)
    Pick {
        /// Product ids to toggle, in order
        #[arg(required = true)]
        ids: Vec<RecordId>,
    },

    /// Compare the selected products
    Compare {
        /// Only show fields that differ
        #[arg(long)]
        diff_only: bool,

        /// Clear the selection
        #[arg(long)]
        clear: bool,

        /// Switch the browsing segment (clears the selection when it changes)
        #[arg(short, long)]
        segment: Option<SegmentScope>,
    },

    /// Sign in
    Login {
        username: String,

        /// Password (read from stdin when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Sign out
    Logout,

    /// Create an account
    Register {
        username: String,

        /// Password (read from stdin when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Show the signed-in user
    Whoami,

    /// Edit your own profile
    Profile {
        /// New username
        #[arg(long)]
        username: Option<String>,

        /// New password
        #[arg(long)]
        password: Option<String>,

        /// Image file to use as avatar
        #[arg(long, conflicts_with = "remove_avatar")]
        avatar: Option<PathBuf>,

        /// Remove the avatar
        #[arg(long)]
        remove_avatar: bool,
    },

    /// Show or change saved settings
    Config {
        /// Save a default backend URL
        #[arg(long)]
        set_api_url: Option<String>,

        /// Save the default browsing segment
        #[arg(long)]
        set_segment: Option<SegmentScope>,

        /// Forget all saved settings
        #[arg(long, conflicts_with_all = ["set_api_url", "set_segment"])]
        reset: bool,
    },

    /// Catalog and user management (admins only)
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },
}

#[derive(Subcommand)]
pub enum AdminCommands {
    /// List products, searching by name or segment
    Products {
        query: Option<String>,

        /// Segment order
        #[arg(long, value_enum, default_value = "asc")]
        sort: SegmentOrder,
    },

    /// Add a product
    AddProduct {
        name: String,

        #[arg(short, long)]
        segment: Segment,

        /// Spec value as key=value (repeatable)
        #[arg(long = "spec")]
        specs: Vec<String>,

        /// Product image file
        #[arg(long)]
        image: Option<PathBuf>,
    },

    /// Edit a product
    EditProduct {
        id: RecordId,

        #[arg(long)]
        name: Option<String>,

        #[arg(short, long)]
        segment: Option<Segment>,

        /// Spec value as key=value (repeatable)
        #[arg(long = "spec")]
        specs: Vec<String>,

        /// Spec key to remove (repeatable)
        #[arg(long = "unset")]
        unset: Vec<String>,

        /// Product image file
        #[arg(long, conflicts_with = "remove_image")]
        image: Option<PathBuf>,

        /// Remove the product image
        #[arg(long)]
        remove_image: bool,
    },

    /// Delete a product
    DeleteProduct {
        id: RecordId,

        /// Confirm the deletion
        #[arg(short, long)]
        yes: bool,
    },

    /// List users, searching by username
    Users {
        query: Option<String>,

        /// Role order
        #[arg(long, value_enum, default_value = "admin-first")]
        sort: RoleOrder,
    },

    /// Add a user
    AddUser {
        username: String,

        #[arg(short, long)]
        password: String,

        #[arg(short, long, default_value = "user")]
        role: Role,

        /// Image file to use as avatar
        #[arg(long)]
        avatar: Option<PathBuf>,
    },

    /// Edit a user
    EditUser {
        id: RecordId,

        #[arg(long)]
        username: Option<String>,

        /// New password (unchanged when omitted)
        #[arg(long)]
        password: Option<String>,

        #[arg(short, long)]
        role: Option<Role>,

        /// Image file to use as avatar
        #[arg(long, conflicts_with = "remove_avatar")]
        avatar: Option<PathBuf>,

        /// Remove the avatar
        #[arg(long)]
        remove_avatar: bool,
    },

    /// Delete a user
    DeleteUser {
        id: RecordId,

        /// Confirm the deletion
        #[arg(short, long)]
        yes: bool,
    },
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<(), String> {
    let ctx = commands::Context::new(cli.home.clone(), cli.api_url.as_deref(), cli.format)?;

    match cli.command {
        None => commands::compare::run(&ctx, false, false, None),
        Some(Commands::Products { segment, query }) => {
            commands::products::run(&ctx, segment, query.as_deref())
        }
        Some(Commands::Show { id, save_image }) => {
            commands::show::run(&ctx, &id, save_image.as_deref())
        }
        Some(Commands::Fields) => commands::fields::run(&ctx),
        Some(Commands::Pick { ids }) => commands::pick::run(&ctx, ids),
        Some(Commands::Compare {
            diff_only,
            clear,
            segment,
        }) => commands::compare::run(&ctx, diff_only, clear, segment),
        Some(Commands::Login { username, password }) => {
            commands::account::login(&ctx, &username, password)
        }
        Some(Commands::Logout) => commands::account::logout(&ctx),
        Some(Commands::Register { username, password }) => {
            commands::account::register(&ctx, &username, password)
        }
        Some(Commands::Whoami) => commands::account::whoami(&ctx),
        Some(Commands::Profile {
            username,
            password,
            avatar,
            remove_avatar,
        }) => commands::account::profile(&ctx, username, password, avatar, remove_avatar),
        Some(Commands::Config {
            set_api_url,
            set_segment,
            reset,
        }) => commands::config::run(&ctx, set_api_url, set_segment, reset),
        Some(Commands::Admin { command }) => commands::admin::run(&ctx, command),
    }
}
