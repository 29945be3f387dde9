use clap::{Parser, ValueEnum};
use miette::*;
use std::io::{self, BufRead};

pub mod eval;
pub mod history;
pub mod ops;

pub use eval::{evaluate, EvalError};
pub use history::{CalculationRecord, HistoryLog, Subscription};

/// Sandboxed command-line calculator.
/// Evaluates untrusted arithmetic expressions without an interpreter.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct App {
    /// The expression to evaluate.
    /// If left blank, stdin is read line by line as a calculator session.
    #[arg(allow_hyphen_values = true)]
    pub expr: Option<String>,

    /// The output format to write to stdout.
    #[arg(short, long, default_value_t, value_enum)]
    pub out: Output,

    /// Print the calculation history after evaluating.
    #[arg(long)]
    pub history: bool,
}

#[derive(Debug, Copy, Clone, ValueEnum, Default)]
pub enum Output {
    /// Plain `expression = result` lines.
    #[default]
    Plain,

    /// One JSON record per calculation.
    Json,
}

impl App {
    pub fn run(self) -> Result<()> {
        let App { expr, out, history } = self;

        let log = HistoryLog::new();

        match expr {
            Some(expr) => eval_line(&expr, out, &log)?,
            None => {
                eprintln!("Reading expressions from stdin");
                for line in io::stdin().lock().lines() {
                    let line = line
                        .into_diagnostic()
                        .wrap_err("failed to read expression from stdin")?;

                    if line.trim().is_empty() {
                        continue;
                    }

                    // a bad expression ends the line, not the session
                    if let Err(err) = eval_line(&line, out, &log) {
                        eprintln!("{err:?}");
                    }
                }
            }
        }

        if history {
            println!("{}", log.render());
        }

        Ok(())
    }
}

fn eval_line(expr: &str, out: Output, log: &HistoryLog) -> Result<()> {
    let expr = expr.trim();

    let result = evaluate(expr).wrap_err_with(|| format!("failed to evaluate '{expr}'"))?;

    let record = CalculationRecord::Evaluated {
        expr: expr.to_string(),
        result,
    };

    match out {
        Output::Plain => println!("{expr} = {result}"),
        Output::Json => println!(
            "{}",
            serde_json::to_string(&record)
                .into_diagnostic()
                .wrap_err("failed to serialise calculation record")?
        ),
    }

    log.append(record);

    Ok(())
}
