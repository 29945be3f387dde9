//! Structured arithmetic operations.
//!
//! Thin wrappers over the native operators that record every completed
//! calculation into a [`HistoryLog`]. Failed operations record nothing.

use crate::eval::EvalError;
use crate::history::{BasicOperator, CalculationRecord, HistoryLog};

pub fn add(a: f64, b: f64, log: &HistoryLog) -> f64 {
    let result = a + b;
    log.append(CalculationRecord::BasicOp {
        op: BasicOperator::Add,
        a,
        b,
        result,
    });
    result
}

pub fn subtract(a: f64, b: f64, log: &HistoryLog) -> f64 {
    let result = a - b;
    log.append(CalculationRecord::BasicOp {
        op: BasicOperator::Subtract,
        a,
        b,
        result,
    });
    result
}

pub fn multiply(a: f64, b: f64, log: &HistoryLog) -> f64 {
    let result = a * b;
    log.append(CalculationRecord::BasicOp {
        op: BasicOperator::Multiply,
        a,
        b,
        result,
    });
    result
}

pub fn divide(a: f64, b: f64, log: &HistoryLog) -> Result<f64, EvalError> {
    if b == 0.0 {
        return Err(EvalError::Domain {
            reason: "division by zero".into(),
        });
    }

    let result = a / b;
    log.append(CalculationRecord::BasicOp {
        op: BasicOperator::Divide,
        a,
        b,
        result,
    });
    Ok(result)
}

pub fn power(base: f64, exponent: f64, log: &HistoryLog) -> f64 {
    let result = base.powf(exponent);
    log.append(CalculationRecord::Power {
        base,
        exponent,
        result,
    });
    result
}

pub fn sqrt(value: f64, log: &HistoryLog) -> Result<f64, EvalError> {
    if value < 0.0 {
        return Err(EvalError::Domain {
            reason: "square root of a negative number".into(),
        });
    }

    let result = value.sqrt();
    log.append(CalculationRecord::SquareRoot { value, result });
    Ok(result)
}
