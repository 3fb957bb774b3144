//! scopegate - database boundary access control
//!
//! Validates settings, evaluates network admission, and resolves
//! authorization contexts from the command line.

use clap::{Parser, Subcommand};
use scopegate::{
    AppError,
    access_control::{
        AccessLevel, CredentialKind, Selection, VerifiedCredential, claims_from_json, resolve,
    },
    admission::Admission,
    config::{LogFormat, load_settings},
    gatekeeper::Gatekeeper,
};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Database boundary access control
#[derive(Parser, Debug)]
#[command(name = "scopegate")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, env = "SCOPEGATE_CONFIG", global = true)]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error); overrides logging.level
    #[arg(long, env = "SCOPEGATE_LOG_LEVEL", global = true)]
    log_level: Option<String>,

    /// Emit JSON logs; overrides logging.format
    #[arg(long, env = "SCOPEGATE_LOG_JSON", global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load and validate the configuration
    Validate,

    /// Check whether addresses may attempt authentication
    Admit {
        /// Remote addresses, bare or with a port
        #[arg(required = true)]
        addresses: Vec<String>,
    },

    /// Resolve an authorization context for a verified credential
    Resolve {
        /// Credential level label (KV, NS, DB, SC, NO)
        #[arg(long)]
        kind: AccessLevel,

        /// Requested namespace
        #[arg(long)]
        ns: Option<String>,

        /// Requested database
        #[arg(long)]
        db: Option<String>,

        /// Namespace the credential was issued for
        #[arg(long)]
        grant_ns: Option<String>,

        /// Database the credential was issued for
        #[arg(long)]
        grant_db: Option<String>,

        /// Credential claims as a JSON object
        #[arg(long)]
        claims: Option<String>,

        /// Remote address to run through the admission gate first
        #[arg(long)]
        remote: Option<String>,
    },
}

fn init_logging(level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

fn main() -> anyhow::Result<ExitCode> {
    // .env must be in place before clap reads env-backed arguments
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Load settings before logging so the configured level/format apply;
    // a load failure is reported once logging is up
    let loaded = load_settings(args.config.as_deref());
    let logging = loaded
        .as_ref()
        .map(|s| s.logging.clone())
        .unwrap_or_default();

    let level = args.log_level.as_deref().unwrap_or(logging.level.as_str());
    let format = if args.log_json {
        LogFormat::Json
    } else {
        logging.format
    };
    init_logging(level, format);

    let settings = loaded.inspect_err(|e| error!(error = %e, "Failed to load configuration"))?;

    let gatekeeper = Gatekeeper::from_settings(&settings)
        .inspect_err(|e| error!(error = %e, "Failed to compile settings"))?;

    match args.command {
        Command::Validate => {
            let allow_list = gatekeeper.gate().allow_list();
            info!(ranges = allow_list.len(), "Configuration is valid");
            println!("master user: {}", gatekeeper.master().user());
            if allow_list.is_empty() {
                println!("allow-list: empty (all addresses admitted)");
            } else {
                println!("allow-list:");
                for block in allow_list.iter() {
                    println!("  {}", block);
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Admit { addresses } => {
            let mut denied = false;
            for address in &addresses {
                let decision = gatekeeper.gate().decide(address);
                denied |= decision == Admission::Deny;
                println!("{}\t{}", address, decision.as_str());
            }
            Ok(if denied {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            })
        }
        Command::Resolve {
            kind,
            ns,
            db,
            grant_ns,
            grant_db,
            claims,
            remote,
        } => {
            let mut credential = VerifiedCredential::new(CredentialKind::from_level(kind))
                .with_grant(grant_ns.as_deref(), grant_db.as_deref());
            if let Some(raw) = claims {
                let value: serde_json::Value = serde_json::from_str(&raw)?;
                credential = credential.with_claims(claims_from_json(value)?);
            }

            let request = Selection::new(ns.as_deref(), db.as_deref());
            let context = match remote {
                Some(remote) => gatekeeper.authorize(&remote, &credential, &request),
                None => resolve(&credential, &request).map_err(AppError::from),
            }
            .inspect_err(|e| error!(error = %e, "Authorization failed"))?;

            println!("{}", serde_json::to_string_pretty(&context)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}
