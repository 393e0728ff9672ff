#![forbid(unsafe_code)]

mod actions;
mod helpers;

use clap::{error::ErrorKind, ArgAction, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Generator, Shell};
use std::path::PathBuf;
use std::process::ExitCode as ProcessExitCode;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use velada_core::{resolve_velada_data_dir, ExitCode, MachineError, ENV_VELADA_LOG_LEVEL};
use velada_flows::{AuthError, EventError, RegistrationError};
use velada_model::PasswordScheme;
use velada_store::{
    AccountRepository, EventRepository, LocalStorageStore, SessionStore, SqliteStore, StoreError,
    StoreErrorCode, LOCAL_STORE_FILE, SQLITE_STORE_FILE,
};

const VELADA_HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{about-with-newline}
Usage: {usage}

Options:
{options}

Commands:
{subcommands}
{after-help}";

#[derive(Parser)]
#[command(name = "velada")]
#[command(version)]
#[command(about = "Velada event-registration operations CLI")]
#[command(help_template = VELADA_HELP_TEMPLATE)]
#[command(
    after_help = "Environment:\n  VELADA_LOG_LEVEL   Log verbosity override\n  VELADA_DATA_DIR    Data directory override"
)]
struct Cli {
    #[arg(long, global = true, default_value_t = false)]
    json: bool,
    #[arg(long, global = true, default_value_t = false)]
    quiet: bool,
    #[arg(long, global = true, action = ArgAction::Count)]
    verbose: u8,
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    #[arg(long, global = true, value_enum, default_value_t = BackendCli::Local)]
    backend: BackendCli,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    Completion {
        #[arg(value_enum)]
        shell: Shell,
    },
    Register {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        password_repeat: String,
        #[arg(long)]
        national_id: String,
        #[arg(long)]
        phone: String,
        #[arg(long, value_enum, default_value_t = PasswordSchemeCli::Argon2id)]
        password_scheme: PasswordSchemeCli,
    },
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    Logout,
    Whoami,
    Nav,
    ResetRequest {
        #[arg(long)]
        email: String,
    },
    Event {
        #[command(subcommand)]
        command: EventCommand,
    },
}

#[derive(Subcommand)]
enum EventCommand {
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        date: String,
        #[arg(long)]
        description: String,
        #[arg(long, default_value = "")]
        image: String,
    },
    List,
    Show {
        #[arg(long)]
        id: String,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BackendCli {
    Local,
    Sqlite,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PasswordSchemeCli {
    Argon2id,
    PlaintextLegacy,
}

impl PasswordSchemeCli {
    fn into_scheme(self) -> PasswordScheme {
        match self {
            Self::Argon2id => PasswordScheme::Argon2id,
            Self::PlaintextLegacy => PasswordScheme::PlaintextLegacy,
        }
    }
}

struct RegisterCliArgs {
    first_name: String,
    last_name: String,
    email: String,
    password: String,
    password_repeat: String,
    national_id: String,
    phone: String,
    password_scheme: PasswordSchemeCli,
}

struct EventCliArgs {
    title: String,
    date: String,
    description: String,
    image: String,
}

pub fn main_entry() -> ProcessExitCode {
    let wants_json = std::env::args().any(|arg| arg == "--json");
    match run() {
        Ok(()) => ProcessExitCode::from(ExitCode::Success as u8),
        Err(err) => {
            emit_error(&err, wants_json);
            ProcessExitCode::from(err.exit_code as u8)
        }
    }
}

fn run() -> Result<(), CliError> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                print!("{err}");
                return Ok(());
            }
            _ => {
                return Err(CliError {
                    exit_code: ExitCode::Usage,
                    machine: MachineError::new("usage_error", "invalid command line arguments")
                        .with_detail("error", &err.to_string()),
                });
            }
        },
    };
    let output_mode = OutputMode { json: cli.json };
    let log_flags = LogFlags {
        quiet: cli.quiet,
        verbose: cli.verbose,
    };

    let command = cli.command.ok_or_else(|| CliError {
        exit_code: ExitCode::Usage,
        machine: MachineError::new("usage_error", "missing command; see --help"),
    })?;
    init_tracing(log_flags);

    let ctx = StoreContext {
        backend: cli.backend,
        data_dir: cli.data_dir.unwrap_or_else(resolve_velada_data_dir),
    };

    match command {
        Commands::Completion { shell } => {
            print_completion(shell);
            Ok(())
        }
        Commands::Register {
            first_name,
            last_name,
            email,
            password,
            password_repeat,
            national_id,
            phone,
            password_scheme,
        } => actions::run_register(
            &ctx,
            RegisterCliArgs {
                first_name,
                last_name,
                email,
                password,
                password_repeat,
                national_id,
                phone,
                password_scheme,
            },
            output_mode,
        ),
        Commands::Login { email, password } => {
            actions::run_login(&ctx, &email, &password, output_mode)
        }
        Commands::Logout => actions::run_logout(&ctx, output_mode),
        Commands::Whoami => actions::run_whoami(&ctx, output_mode),
        Commands::Nav => actions::run_nav(&ctx, output_mode),
        Commands::ResetRequest { email } => {
            actions::run_reset_request(&ctx, &email, output_mode)
        }
        Commands::Event { command } => match command {
            EventCommand::Create {
                title,
                date,
                description,
                image,
            } => actions::run_event_create(
                &ctx,
                EventCliArgs {
                    title,
                    date,
                    description,
                    image,
                },
                output_mode,
            ),
            EventCommand::List => actions::run_event_list(&ctx, output_mode),
            EventCommand::Show { id } => actions::run_event_show(&ctx, &id, output_mode),
        },
    }
}

#[derive(Clone, Copy)]
struct LogFlags {
    quiet: bool,
    verbose: u8,
}

#[derive(Clone, Copy)]
struct OutputMode {
    json: bool,
}

fn init_tracing(log_flags: LogFlags) {
    let default_level = if log_flags.quiet {
        "error"
    } else {
        match log_flags.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };
    let filter = match std::env::var(ENV_VELADA_LOG_LEVEL) {
        Ok(level) if !level.trim().is_empty() => EnvFilter::new(level),
        _ => EnvFilter::new(default_level),
    };
    // Logs go to stderr; stdout carries only command payloads.
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn print_completion<G: Generator>(generator: G) {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    generate(generator, &mut command, name, &mut std::io::stdout());
}

struct StoreContext {
    backend: BackendCli,
    data_dir: PathBuf,
}

enum StoreHandle {
    Local(LocalStorageStore),
    Sqlite(SqliteStore),
}

impl StoreContext {
    fn open(&self) -> Result<StoreHandle, CliError> {
        let handle = match self.backend {
            BackendCli::Local => {
                let path = self.data_dir.join(LOCAL_STORE_FILE);
                debug!(path = %path.display(), "opening local store");
                StoreHandle::Local(LocalStorageStore::open(path).map_err(CliError::from_store)?)
            }
            BackendCli::Sqlite => {
                let path = self.data_dir.join(SQLITE_STORE_FILE);
                debug!(path = %path.display(), "opening sqlite store");
                StoreHandle::Sqlite(SqliteStore::open(path).map_err(CliError::from_store)?)
            }
        };
        Ok(handle)
    }
}

impl StoreHandle {
    fn accounts(&self) -> &dyn AccountRepository {
        match self {
            Self::Local(store) => store,
            Self::Sqlite(store) => store,
        }
    }

    fn events(&self) -> &dyn EventRepository {
        match self {
            Self::Local(store) => store,
            Self::Sqlite(store) => store,
        }
    }

    fn sessions(&self) -> &dyn SessionStore {
        match self {
            Self::Local(store) => store,
            Self::Sqlite(store) => store,
        }
    }
}

#[derive(Debug)]
struct CliError {
    exit_code: ExitCode,
    machine: MachineError,
}

impl CliError {
    fn unauthorized(code: &str, message: &str) -> Self {
        Self {
            exit_code: ExitCode::Unauthorized,
            machine: MachineError::new(code, message),
        }
    }

    fn not_found(code: &str, message: &str) -> Self {
        Self {
            exit_code: ExitCode::NotFound,
            machine: MachineError::new(code, message),
        }
    }

    fn internal(message: String) -> Self {
        Self {
            exit_code: ExitCode::Internal,
            machine: MachineError::new("internal_error", &message),
        }
    }

    fn from_store(err: StoreError) -> Self {
        let exit_code = match err.code {
            StoreErrorCode::Conflict => ExitCode::Conflict,
            _ => ExitCode::Internal,
        };
        Self {
            exit_code,
            machine: MachineError::new("store_error", &err.message)
                .with_detail("store_code", err.code.as_str()),
        }
    }

    fn from_registration(err: RegistrationError) -> Self {
        match err {
            RegistrationError::Validation { field_errors } => {
                let mut machine =
                    MachineError::new("validation_failed", "one or more fields are invalid");
                for (field, cause) in &field_errors {
                    machine = machine.with_detail(field.as_str(), &cause.to_string());
                }
                Self {
                    exit_code: ExitCode::Validation,
                    machine,
                }
            }
            RegistrationError::DuplicateEmail => Self {
                exit_code: ExitCode::Conflict,
                machine: MachineError::new(
                    "duplicate_email",
                    "an account with this email already exists",
                ),
            },
            RegistrationError::DuplicateNationalId => Self {
                exit_code: ExitCode::Conflict,
                machine: MachineError::new(
                    "duplicate_national_id",
                    "an account with this national id already exists",
                ),
            },
            RegistrationError::Store(err) => Self::from_store(err),
        }
    }

    fn from_auth(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => Self::unauthorized(
                "invalid_credentials",
                "email or password is incorrect",
            ),
            AuthError::Store(err) => Self::from_store(err),
        }
    }

    fn from_event(err: EventError) -> Self {
        match err {
            EventError::NotLoggedIn => Self::unauthorized(
                "not_logged_in",
                "creating an event requires being logged in",
            ),
            EventError::Validation { field_errors } => {
                let mut machine =
                    MachineError::new("validation_failed", "one or more fields are invalid");
                for (field, cause) in &field_errors {
                    machine = machine.with_detail(field.as_str(), &cause.to_string());
                }
                Self {
                    exit_code: ExitCode::Validation,
                    machine,
                }
            }
            EventError::UnknownEvent => {
                Self::not_found("not_found", "no event with this id exists")
            }
            EventError::Store(err) => Self::from_store(err),
        }
    }
}

fn emit_error(error: &CliError, machine_json: bool) {
    if machine_json {
        match serde_json::to_string(&error.machine) {
            Ok(payload) => eprintln!("{payload}"),
            Err(_) => eprintln!(
                "{{\"code\":\"internal_error\",\"message\":\"failed to encode structured error\",\"details\":{{}}}}"
            ),
        }
    } else {
        eprintln!("{}", error.machine.message);
    }
}
