use std::process;

fn main() {
    budget_ledger::init();
    if let Err(err) = budget_ledger::cli::run_cli() {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}
