use anyhow::Result;
use clap::{Parser, Subcommand};

use fic_expenses::cli::{
    handle_configs_command, handle_create_command, handle_list_command, handle_pay_command,
    handle_show_command, ConfigsArgs, CreateArgs, ListArgs, PayArgs, ShowArgs,
};
use fic_expenses::logging;
use fic_expenses::session::Session;

#[derive(Parser)]
#[command(
    name = "fic-expenses",
    version,
    about = "Manage Fatture in Cloud expenses from the terminal",
    long_about = "fic-expenses lists, creates and pays received expense documents \
                  in Fatture in Cloud. Installment schedules and recurring \
                  expenses are computed locally before anything is sent."
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the interactive TUI
    #[command(alias = "ui")]
    Tui,

    /// List expenses
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show one expense with its payment schedule
    Show(ShowArgs),

    /// Mark installments paid
    Pay(PayArgs),

    /// Create an expense, optionally with installments and recurrences
    #[command(alias = "new")]
    Create(CreateArgs),

    /// Show or change credentials and the default payment account
    #[command(alias = "config")]
    Configs(ConfigsArgs),
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut session = Session::load()?;

    let command = cli.command.unwrap_or(Commands::Tui);

    if matches!(command, Commands::Tui) {
        // The TUI owns stdout, so logs go to a file
        logging::init_file(&session.paths().log_file(), cli.verbose)?;
    } else {
        logging::init_cli(cli.verbose);
    }

    match command {
        Commands::Tui => fic_expenses::tui::run_tui(&mut session)?,
        Commands::List(args) => handle_list_command(&mut session, args)?,
        Commands::Show(args) => handle_show_command(&mut session, args)?,
        Commands::Pay(args) => handle_pay_command(&mut session, args)?,
        Commands::Create(args) => handle_create_command(&mut session, args)?,
        Commands::Configs(args) => handle_configs_command(&mut session, args)?,
    }

    Ok(())
}
