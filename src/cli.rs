//! Non-interactive command-line driver over [`BudgetManager`].
//!
//! Every command prints the refreshed ledger view (or a category detail) as pretty JSON.

use std::{
    env,
    io::{self, Write},
    path::PathBuf,
};

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use crate::{config::ConfigManager, core::BudgetManager, errors::CliError};

const USAGE: &str = "Usage: budget_ledger_cli [--cache <file.json>] <command>\n\
    Commands:\n  \
    show\n  \
    detail <category>\n  \
    income <amount>\n  \
    add-category <name> <budget>\n  \
    delete-category <name>\n  \
    add-expense <category> <label> <amount>\n  \
    delete-expense <category> <index|id>\n  \
    close-period [YYYY-MM-DD]\n  \
    help";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpenseRef {
    Index(usize),
    Id(Uuid),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Show,
    Detail(String),
    Income(String),
    AddCategory { name: String, budget: String },
    DeleteCategory(String),
    AddExpense { category: String, label: String, amount: String },
    DeleteExpense { category: String, target: ExpenseRef },
    ClosePeriod(Option<NaiveDate>),
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub cache: Option<PathBuf>,
    pub command: Command,
}

/// Parses process arguments and runs the command against stdout.
pub fn run_cli() -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_with_args(env::args().skip(1), &mut out)
}

pub fn run_with_args<I, W>(args: I, out: &mut W) -> Result<(), CliError>
where
    I: IntoIterator<Item = String>,
    W: Write,
{
    let invocation = parse_args(args)?;
    if invocation.command == Command::Help {
        writeln!(out, "{USAGE}")?;
        return Ok(());
    }
    let config_manager = ConfigManager::new()?;
    let mut config = config_manager.load_effective()?;
    if let Some(cache) = invocation.cache {
        config.cache_path = Some(cache);
    }
    let manager = BudgetManager::from_config(&config, config_manager.base_dir())?;
    execute(&manager, invocation.command, out)
}

pub fn parse_args<I>(args: I) -> Result<Invocation, CliError>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let mut cache = None;
    let name = loop {
        match args.next() {
            Some(flag) if flag == "--cache" => {
                let path = args
                    .next()
                    .ok_or_else(|| CliError::Input("--cache requires a file path".into()))?;
                cache = Some(PathBuf::from(path));
            }
            Some(name) => break name,
            None => return Err(CliError::Input(format!("missing command\n{USAGE}"))),
        }
    };
    let command = match name.as_str() {
        "show" => Command::Show,
        "detail" => Command::Detail(required(&mut args, &name, "category")?),
        "income" => Command::Income(required(&mut args, &name, "amount")?),
        "add-category" => Command::AddCategory {
            name: required(&mut args, &name, "name")?,
            budget: required(&mut args, &name, "budget")?,
        },
        "delete-category" => Command::DeleteCategory(required(&mut args, &name, "name")?),
        "add-expense" => Command::AddExpense {
            category: required(&mut args, &name, "category")?,
            label: required(&mut args, &name, "label")?,
            amount: required(&mut args, &name, "amount")?,
        },
        "delete-expense" => {
            let category = required(&mut args, &name, "category")?;
            let target = parse_expense_ref(&required(&mut args, &name, "index|id")?)?;
            Command::DeleteExpense { category, target }
        }
        "close-period" => {
            let date = args
                .next()
                .map(|raw| {
                    NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
                        .map_err(|_| CliError::Input(format!("invalid date `{raw}`")))
                })
                .transpose()?;
            Command::ClosePeriod(date)
        }
        "help" | "--help" | "-h" => Command::Help,
        other => {
            return Err(CliError::Input(format!(
                "unknown command `{other}`\n{USAGE}"
            )))
        }
    };
    Ok(Invocation { cache, command })
}

fn required<I>(args: &mut I, command: &str, what: &str) -> Result<String, CliError>
where
    I: Iterator<Item = String>,
{
    args.next()
        .ok_or_else(|| CliError::Input(format!("`{command}` expects <{what}>\n{USAGE}")))
}

fn parse_expense_ref(raw: &str) -> Result<ExpenseRef, CliError> {
    if let Ok(index) = raw.parse::<usize>() {
        return Ok(ExpenseRef::Index(index));
    }
    Uuid::parse_str(raw)
        .map(ExpenseRef::Id)
        .map_err(|_| CliError::Input(format!("`{raw}` is neither an index nor an expense id")))
}

fn execute<W: Write>(manager: &BudgetManager, command: Command, out: &mut W) -> Result<(), CliError> {
    match command {
        Command::Show => print_json(out, &manager.ledger_view()),
        Command::Detail(name) => print_json(out, &manager.category_detail(&name)?),
        Command::Income(raw) => print_json(out, &manager.set_income(&raw)?),
        Command::AddCategory { name, budget } => {
            print_json(out, &manager.add_category(&name, &budget)?)
        }
        Command::DeleteCategory(name) => print_json(out, &manager.delete_category(&name)?),
        Command::AddExpense {
            category,
            label,
            amount,
        } => print_json(out, &manager.add_expense(&category, &label, &amount)?),
        Command::DeleteExpense { category, target } => {
            let view = match target {
                ExpenseRef::Index(index) => manager.delete_expense(&category, index)?,
                ExpenseRef::Id(id) => manager.delete_expense_by_id(&category, id)?,
            };
            print_json(out, &view)
        }
        Command::ClosePeriod(Some(date)) => print_json(out, &manager.close_period_on(date)?),
        Command::ClosePeriod(None) => print_json(out, &manager.close_period()?),
        Command::Help => {
            writeln!(out, "{USAGE}")?;
            Ok(())
        }
    }
}

fn print_json<W: Write, T: Serialize>(out: &mut W, value: &T) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(value).map_err(crate::errors::BudgetError::from)?;
    writeln!(out, "{json}")?;
    Ok(())
}
