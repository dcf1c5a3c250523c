use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "exportdesk")]
#[command(about = "Operator console for the export business admin API")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Override the API base URL (falls back to EXPORTDESK_API_URL)
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in to the admin console
    Login {
        /// Administrator email
        email: String,
        /// Administrator password
        password: String,
    },
    /// Sign out and clear the stored session
    Logout,
    /// Show the current session state
    Status,
    /// Set a new password for the signed-in administrator (first login)
    SetPassword {
        /// New password
        password: String,
        /// Confirmation of the new password
        confirm_password: String,
    },
    /// Create the first administrator account (one-time)
    Setup {
        /// Admin email
        email: String,
        /// Admin mobile number
        #[arg(long)]
        mobile: String,
        /// Password for the new account
        #[arg(long)]
        password: String,
        /// Confirmation of the password
        #[arg(long)]
        confirm_password: String,
    },
    /// Recover a forgotten password via emailed OTP (interactive)
    Recover,
    /// Manage the product catalog
    Products {
        #[command(subcommand)]
        command: ProductCommands,
    },
    /// Read and delete inbound contact messages
    Messages {
        #[command(subcommand)]
        command: MessageCommands,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum ProductCommands {
    /// List the catalog
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a product
    Add {
        /// Product title
        title: String,
        /// Product description
        #[arg(long)]
        description: String,
        /// Path to a product image
        #[arg(long, value_name = "PATH")]
        image: Option<PathBuf>,
    },
    /// Update an existing product
    Update {
        /// Product id
        id: String,
        /// Product title
        #[arg(long)]
        title: String,
        /// Product description
        #[arg(long)]
        description: String,
        /// Path to a replacement image (current image kept when omitted)
        #[arg(long, value_name = "PATH")]
        image: Option<PathBuf>,
    },
    /// Delete a product
    Delete {
        /// Product id
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum MessageCommands {
    /// List inbound messages
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a message
    Delete {
        /// Message id
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}
