use clap::{Args as ClapArgs, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "evaldash",
    version,
    about = "Terminal dashboard for the evaluation task service"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Base URL of the task service. Overrides the config file and
    /// EVALDASH_SERVER_URL.
    #[arg(long, global = true)]
    pub server: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Interactive dashboard (the default when no subcommand is given)
    Dash,
    /// Print the task list
    List,
    /// Create a task from flags
    Create(CreateArgs),
    /// Start a task (asks for confirmation unless --yes)
    Start(ConfirmedArgs),
    /// Delete a task (asks for confirmation unless --yes)
    Delete(ConfirmedArgs),
    /// Print the scored result of a task
    Result(TaskRef),
    /// Print system statistics
    Stats,
    /// Probe service health
    Health,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct TaskRef {
    /// Task id.
    pub id: i64,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct CreateArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long, default_value = "")]
    pub description: String,

    /// Agent API endpoint the task will evaluate against.
    #[arg(long, default_value = "")]
    pub endpoint: String,

    #[arg(long, default_value = "")]
    pub api_key: String,

    #[arg(long, default_value = "json")]
    pub dataset_type: String,

    /// Dataset path; an empty value falls back to the service default.
    #[arg(long, default_value = "")]
    pub dataset_path: String,

    /// Indicator id to evaluate. Can be given multiple times.
    #[arg(long = "indicator", action = clap::ArgAction::Append)]
    pub indicators: Vec<i64>,

    /// Indicator weight as `id=weight`. Can be given multiple times.
    #[arg(long = "weight", action = clap::ArgAction::Append)]
    pub weights: Vec<String>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ConfirmedArgs {
    /// Task id.
    pub id: i64,

    /// Skip the confirmation prompt.
    #[arg(long)]
    pub yes: bool,
}
