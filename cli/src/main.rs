use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand, ValueEnum};
use ezgrada::{
    ApiClient, ApiError, ClientConfig, CreateUserFlow, CreateUserForm, FormErrors, LoginFlow, LoginForm, Navigator,
    NewUserRole, RequestOptions, Route, Submission,
};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{0}")]
    Api(#[from] ApiError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("unknown route `{0}`")]
    UnknownRoute(String),
    #[error("form rejected")]
    FormRejected,
    #[error("a submission is already in flight")]
    Busy,
}

#[derive(Parser, Debug)]
#[command(name = "ezgrada", about = "eZgrada API client")]
struct Cli {
    #[arg(long, env = "EZGRADA_API_URL")]
    api_url: Option<String>,

    #[arg(long, env = "EZGRADA_SESSION_FILE")]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and store the issued session.
    Login(LoginArgs),
    /// Forget the stored session.
    Logout,
    /// Show the stored session.
    Whoami,
    /// Resolve where visiting a page would land.
    Open { path: String },
    User(UserCommand),
    Api(ApiCommand),
}

#[derive(Args, Debug)]
struct LoginArgs {
    #[arg(long)]
    email: Option<String>,

    #[arg(long, env = "EZGRADA_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Google sign-in ID token instead of email/password.
    #[arg(long, conflicts_with = "email")]
    google_credential: Option<String>,
}

#[derive(Args, Debug)]
struct UserCommand {
    #[command(subcommand)]
    command: UserSubcommand,
}

#[derive(Subcommand, Debug)]
enum UserSubcommand {
    Create(CreateUserArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum RoleArg {
    Predstavnik,
    Suvlasnik,
}

impl From<RoleArg> for NewUserRole {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Predstavnik => Self::Predstavnik,
            RoleArg::Suvlasnik => Self::Suvlasnik,
        }
    }
}

#[derive(Args, Debug)]
struct CreateUserArgs {
    #[arg(long, default_value = "")]
    username: String,
    #[arg(long, default_value = "")]
    email: String,
    #[arg(long, default_value = "", hide_default_value = true)]
    password: String,
    #[arg(long, default_value = "", hide_default_value = true)]
    repeat_password: String,
    #[arg(long, value_enum, default_value_t = RoleArg::Suvlasnik)]
    role: RoleArg,
}

#[derive(Args, Debug)]
struct ApiCommand {
    #[command(subcommand)]
    command: ApiSubcommand,
}

#[derive(Subcommand, Debug)]
enum ApiSubcommand {
    Get {
        path: String,
    },
    Post {
        path: String,
        #[arg(long, default_value = "{}")]
        data: String,
    },
    Patch {
        path: String,
        #[arg(long, default_value = "{}")]
        data: String,
    },
    Delete {
        path: String,
        #[arg(long, default_value = "{}")]
        data: String,
    },
}

/// Prints the page a flow navigates to.
struct PrintNavigator;

impl Navigator for PrintNavigator {
    fn navigate(&self, route: Route) {
        println!("-> {route}");
    }
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = ClientConfig::from_env();
    if let Some(api_url) = &cli.api_url {
        config = config.with_api_url(api_url);
    }
    if let Some(session_file) = cli.session_file {
        config = config.with_session_file(session_file);
    }
    tracing::debug!(api_url = %config.api_url, session_file = %config.session_file.display(), "client configured");
    let client = Arc::new(ApiClient::from_config(config)?);

    match cli.command {
        Command::Login(args) => run_login(client, args).await,
        Command::Logout => {
            client.logout()?;
            println!("logged out");
            Ok(())
        }
        Command::Whoami => run_whoami(&client),
        Command::Open { path } => run_open(&client, &path),
        Command::User(user) => match user.command {
            UserSubcommand::Create(args) => run_create_user(client, args).await,
        },
        Command::Api(api) => run_api(&client, api).await,
    }
}

async fn run_login(client: Arc<ApiClient>, args: LoginArgs) -> Result<(), CliError> {
    let flow = LoginFlow::new(client, Arc::new(PrintNavigator));
    let submission = match args.google_credential {
        Some(credential) => flow.submit_oauth(&credential).await,
        None => {
            let form = LoginForm::new(args.email.unwrap_or_default(), args.password.unwrap_or_default());
            flow.submit(&form).await
        }
    };
    finish(submission).map(|_| ())
}

fn run_whoami(client: &ApiClient) -> Result<(), CliError> {
    let Some(session) = client.session() else {
        return Err(ApiError::Unauthenticated.into());
    };
    println!("uid:  {}", session.uid);
    println!("role: {}", session.role);
    println!("home: {}", Route::for_role(session.role));
    Ok(())
}

fn run_open(client: &ApiClient, path: &str) -> Result<(), CliError> {
    let requested = Route::from_path(path).ok_or_else(|| CliError::UnknownRoute(path.to_owned()))?;
    let shown = ezgrada::navigation::guard(requested, client.session().as_ref());
    println!("-> {shown}");
    Ok(())
}

async fn run_create_user(client: Arc<ApiClient>, args: CreateUserArgs) -> Result<(), CliError> {
    let form = CreateUserForm {
        username: args.username,
        email: args.email,
        password: args.password,
        repeated_password: args.repeat_password,
        role: args.role.into(),
    };
    let flow = CreateUserFlow::new(client, Arc::new(PrintNavigator));
    let created = finish(flow.submit(&form).await)?;
    print_json(&created)
}

async fn run_api(client: &ApiClient, api: ApiCommand) -> Result<(), CliError> {
    let json: Value = match api.command {
        ApiSubcommand::Get { path } => client.fetcher().fetch(&path, RequestOptions::get()).await?,
        ApiSubcommand::Post { path, data } => client.create(&path, &parse_data(&data)?).await?,
        ApiSubcommand::Patch { path, data } => client.update(&path, &parse_data(&data)?).await?,
        ApiSubcommand::Delete { path, data } => client.remove(&path, &parse_data(&data)?).await?,
    };
    print_json(&json)
}

fn finish<T, F>(submission: Submission<T, F>) -> Result<T, CliError>
where
    F: Ord + Copy + std::fmt::Debug,
{
    match submission {
        Submission::Done(value) => Ok(value),
        Submission::Invalid(errors) => {
            eprint!("{}", render_errors(&errors));
            Err(CliError::FormRejected)
        }
        Submission::Busy => Err(CliError::Busy),
    }
}

fn render_errors<F: Ord + Copy + std::fmt::Debug>(errors: &FormErrors<F>) -> String {
    errors
        .iter()
        .map(|(field, message)| format!("{}: {message}\n", field_label(field)))
        .collect()
}

fn field_label<F: std::fmt::Debug>(field: F) -> String {
    let raw = format!("{field:?}");
    let mut label = String::with_capacity(raw.len() + 2);
    for (i, ch) in raw.chars().enumerate() {
        if ch.is_ascii_uppercase() && i > 0 {
            label.push('_');
        }
        label.push(ch.to_ascii_lowercase());
    }
    label
}

fn parse_data(data: &str) -> Result<Value, CliError> {
    Ok(serde_json::from_str::<Value>(data)?)
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
