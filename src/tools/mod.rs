//! Tools module - ready-made tools for agents.
//!
//! - Calculator: restricted arithmetic evaluation

pub mod calculator;

pub use calculator::{evaluate, CalculatorTool, EvalError};

use crate::tool::ToolRegistry;

/// A registry holding only the calculator.
pub fn calculator_toolkit() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(CalculatorTool);
    registry
}
