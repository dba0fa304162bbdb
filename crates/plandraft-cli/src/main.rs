mod logging;
mod serve_cmd;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use plandraft_core::{Flags, ImplicitPlan, TypedPlan, plan_json_schema};
use plandraft_generate::{DraftOutcome, GeneratePlanRequest, PlanOutcome, draft_plan, generate_plan};
use plandraft_validate::{
    ValidationReport, messages, validate_implicit, validate_plan, validate_typed,
};
use thiserror::Error;

#[derive(Debug, Error)]
enum CliError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid address: {0}")]
    Addr(#[from] std::net::AddrParseError),
    #[error("logging error: {0}")]
    Logging(String),
}

#[derive(Parser, Debug)]
#[command(name = "plandraft", version, about = "Business plan graph generator and validator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a plan from a business-context request file.
    GeneratePlan(GenerateArgs),
    /// Validate a plan graph file.
    ValidatePlan(ValidateArgs),
    /// Emit the plan JSON Schema.
    Schema(SchemaArgs),
    /// Serve the HTTP API.
    Serve(ServeArgs),
}

/// Which link representation a plan graph uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    Typed,
    Implicit,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Path to the JSON request file.
    #[arg(long, value_name = "PATH")]
    input: PathBuf,
    /// Link representation of the generated plan.
    #[arg(long, value_enum, default_value = "typed")]
    mode: Mode,
    /// Write the result here instead of stdout.
    #[arg(long, value_name = "PATH")]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ValidateArgs {
    /// Path to the plan JSON file.
    #[arg(long, value_name = "PATH")]
    plan: PathBuf,
    /// Link representation of the plan.
    #[arg(long, value_enum, default_value = "typed")]
    mode: Mode,
    /// Also validate the document against the plan JSON Schema (typed only).
    #[arg(long, default_value_t = false)]
    schema_check: bool,
    /// Permit the initiatives section.
    #[arg(long, default_value_t = false)]
    include_initiatives: bool,
    /// Permit the capabilities section.
    #[arg(long, default_value_t = false)]
    include_capabilities: bool,
    /// Permit the outputs section.
    #[arg(long, default_value_t = false)]
    include_outputs: bool,
}

impl ValidateArgs {
    fn flags(&self) -> Flags {
        Flags {
            include_initiatives: self.include_initiatives,
            include_capabilities: self.include_capabilities,
            include_outputs: self.include_outputs,
        }
    }
}

#[derive(Args, Debug)]
struct SchemaArgs {
    /// Write the schema here instead of stdout.
    #[arg(long, value_name = "PATH")]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ServeArgs {
    /// Address to bind.
    #[arg(long, default_value = "127.0.0.1:8080")]
    addr: String,
}

#[tokio::main]
async fn main() -> Result<ExitCode, CliError> {
    let cli = Cli::parse();
    logging::init_logging().map_err(CliError::Logging)?;

    match cli.command {
        Command::GeneratePlan(args) => run_generate(args),
        Command::ValidatePlan(args) => run_validate(args),
        Command::Schema(args) => run_schema(args),
        Command::Serve(args) => serve_cmd::run_serve(&args.addr).await.map(|()| ExitCode::SUCCESS),
    }
}

fn load_json(path: &Path) -> Result<serde_json::Value, CliError> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

fn emit(value: &impl serde::Serialize, out: Option<&Path>) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    match out {
        Some(path) => std::fs::write(path, rendered + "\n")?,
        None => println!("{rendered}"),
    }
    Ok(())
}

fn run_generate(args: GenerateArgs) -> Result<ExitCode, CliError> {
    let payload = load_json(&args.input)?;
    let request: GeneratePlanRequest = serde_json::from_value(payload)?;

    match args.mode {
        Mode::Typed => match generate_plan(&request) {
            PlanOutcome::Plan(plan) => {
                tracing::info!(objectives = plan.objectives.len(), "plan generated");
                emit(&plan, args.out.as_deref())?;
                Ok(ExitCode::SUCCESS)
            }
            PlanOutcome::Questions(questions) => {
                emit(&questions, args.out.as_deref())?;
                Ok(ExitCode::SUCCESS)
            }
            PlanOutcome::Rejected(rejection) => {
                eprintln!("generated plan failed validation");
                print_report(&ValidationReport::from_errors(rejection.errors));
                Ok(ExitCode::FAILURE)
            }
        },
        Mode::Implicit => match draft_plan(&request) {
            DraftOutcome::Plan(plan) => {
                let violations = validate_implicit(&plan, &request.flags);
                if !violations.is_empty() {
                    eprintln!("generated plan failed validation");
                    for message in messages(&violations) {
                        eprintln!("error: {message}");
                    }
                    return Ok(ExitCode::FAILURE);
                }
                emit(&plan, args.out.as_deref())?;
                Ok(ExitCode::SUCCESS)
            }
            DraftOutcome::Questions(questions) => {
                emit(&questions, args.out.as_deref())?;
                Ok(ExitCode::SUCCESS)
            }
        },
    }
}

fn run_validate(args: ValidateArgs) -> Result<ExitCode, CliError> {
    let document = load_json(&args.plan)?;
    let flags = args.flags();

    match args.mode {
        Mode::Typed => {
            if args.schema_check {
                let schema = serde_json::to_value(plan_json_schema())?;
                match validate_plan(&document, &schema, &flags) {
                    Ok(_) => {
                        println!("plan validated successfully");
                        Ok(ExitCode::SUCCESS)
                    }
                    Err(report) => {
                        eprintln!("plan validation failed");
                        print_report(&report);
                        Ok(ExitCode::FAILURE)
                    }
                }
            } else {
                // Plain deserialization, no shape pre-check: empty
                // collections surface as batched validator errors.
                let plan: TypedPlan = serde_json::from_value(document)?;
                let report = validate_typed(&plan, &flags);
                if report.is_ok() {
                    println!("plan validated successfully");
                    Ok(ExitCode::SUCCESS)
                } else {
                    eprintln!("plan validation failed");
                    print_report(&report);
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Mode::Implicit => {
            let plan: ImplicitPlan = serde_json::from_value(document)?;
            let violations = validate_implicit(&plan, &flags);
            if violations.is_empty() {
                println!("plan validated successfully");
                Ok(ExitCode::SUCCESS)
            } else {
                eprintln!("plan validation failed");
                for message in messages(&violations) {
                    eprintln!("error: {message}");
                }
                Ok(ExitCode::FAILURE)
            }
        }
    }
}

fn run_schema(args: SchemaArgs) -> Result<ExitCode, CliError> {
    emit(&plan_json_schema(), args.out.as_deref())?;
    Ok(ExitCode::SUCCESS)
}

fn print_report(report: &ValidationReport) {
    for issue in &report.errors {
        eprintln!("error {} {}: {}", issue.code, issue.path, issue.message);
        if let Some(hint) = &issue.hint {
            eprintln!("  hint: {hint}");
        }
    }
}
