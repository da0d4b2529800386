//! Gate parameters.
//!
//! Angles are expressed in **half-turns**: a value of `1.0` is a rotation by
//! π radians. Expressions may contain named symbols that must be bound before
//! a circuit can be converted for execution.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::f64::consts::PI;
use std::fmt;

/// A concrete or symbolic angle expression, in half-turns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParameterExpression {
    /// A constant numeric value.
    Constant(f64),
    /// A named free symbol.
    Symbol(String),
    /// Negation.
    Neg(Box<ParameterExpression>),
    /// Addition.
    Add(Box<ParameterExpression>, Box<ParameterExpression>),
    /// Subtraction.
    Sub(Box<ParameterExpression>, Box<ParameterExpression>),
    /// Multiplication.
    Mul(Box<ParameterExpression>, Box<ParameterExpression>),
    /// Division.
    Div(Box<ParameterExpression>, Box<ParameterExpression>),
}

impl ParameterExpression {
    /// Create a constant parameter.
    pub fn constant(value: f64) -> Self {
        ParameterExpression::Constant(value)
    }

    /// Create a symbolic parameter.
    pub fn symbol(name: impl Into<String>) -> Self {
        ParameterExpression::Symbol(name.into())
    }

    /// Check if this expression contains any symbols.
    pub fn is_symbolic(&self) -> bool {
        match self {
            ParameterExpression::Symbol(_) => true,
            ParameterExpression::Constant(_) => false,
            ParameterExpression::Neg(e) => e.is_symbolic(),
            ParameterExpression::Add(a, b)
            | ParameterExpression::Sub(a, b)
            | ParameterExpression::Mul(a, b)
            | ParameterExpression::Div(a, b) => a.is_symbolic() || b.is_symbolic(),
        }
    }

    /// Evaluate to a value in half-turns.
    ///
    /// Returns `None` if the expression is symbolic or divides by zero.
    pub fn half_turns(&self) -> Option<f64> {
        match self {
            ParameterExpression::Constant(v) => Some(*v),
            ParameterExpression::Symbol(_) => None,
            ParameterExpression::Neg(e) => e.half_turns().map(|v| -v),
            ParameterExpression::Add(a, b) => Some(a.half_turns()? + b.half_turns()?),
            ParameterExpression::Sub(a, b) => Some(a.half_turns()? - b.half_turns()?),
            ParameterExpression::Mul(a, b) => Some(a.half_turns()? * b.half_turns()?),
            ParameterExpression::Div(a, b) => {
                let divisor = b.half_turns()?;
                if divisor == 0.0 {
                    return None;
                }
                Some(a.half_turns()? / divisor)
            }
        }
    }

    /// Evaluate to a value in radians.
    pub fn radians(&self) -> Option<f64> {
        self.half_turns().map(|v| v * PI)
    }

    /// Names of all free symbols, sorted.
    pub fn symbols(&self) -> BTreeSet<String> {
        let mut set = BTreeSet::new();
        self.collect_symbols(&mut set);
        set
    }

    fn collect_symbols(&self, set: &mut BTreeSet<String>) {
        match self {
            ParameterExpression::Constant(_) => {}
            ParameterExpression::Symbol(name) => {
                set.insert(name.clone());
            }
            ParameterExpression::Neg(e) => e.collect_symbols(set),
            ParameterExpression::Add(a, b)
            | ParameterExpression::Sub(a, b)
            | ParameterExpression::Mul(a, b)
            | ParameterExpression::Div(a, b) => {
                a.collect_symbols(set);
                b.collect_symbols(set);
            }
        }
    }

    /// Substitute every symbol found in `bindings`, leaving the rest free.
    pub fn bind(&self, bindings: &FxHashMap<String, f64>) -> Self {
        let rebuild = |a: &Self, b: &Self| (Box::new(a.bind(bindings)), Box::new(b.bind(bindings)));
        match self {
            ParameterExpression::Symbol(n) => match bindings.get(n) {
                Some(v) => ParameterExpression::Constant(*v),
                None => self.clone(),
            },
            ParameterExpression::Constant(_) => self.clone(),
            ParameterExpression::Neg(e) => ParameterExpression::Neg(Box::new(e.bind(bindings))),
            ParameterExpression::Add(a, b) => {
                let (a, b) = rebuild(a, b);
                ParameterExpression::Add(a, b)
            }
            ParameterExpression::Sub(a, b) => {
                let (a, b) = rebuild(a, b);
                ParameterExpression::Sub(a, b)
            }
            ParameterExpression::Mul(a, b) => {
                let (a, b) = rebuild(a, b);
                ParameterExpression::Mul(a, b)
            }
            ParameterExpression::Div(a, b) => {
                let (a, b) = rebuild(a, b);
                ParameterExpression::Div(a, b)
            }
        }
    }
}

impl fmt::Display for ParameterExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterExpression::Constant(v) => write!(f, "{v}"),
            ParameterExpression::Symbol(name) => write!(f, "{name}"),
            ParameterExpression::Neg(e) => write!(f, "-({e})"),
            ParameterExpression::Add(a, b) => write!(f, "({a} + {b})"),
            ParameterExpression::Sub(a, b) => write!(f, "({a} - {b})"),
            ParameterExpression::Mul(a, b) => write!(f, "({a} * {b})"),
            ParameterExpression::Div(a, b) => write!(f, "({a} / {b})"),
        }
    }
}

impl From<f64> for ParameterExpression {
    fn from(value: f64) -> Self {
        ParameterExpression::Constant(value)
    }
}

impl From<i32> for ParameterExpression {
    fn from(value: i32) -> Self {
        ParameterExpression::Constant(f64::from(value))
    }
}

impl std::ops::Add for ParameterExpression {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        ParameterExpression::Add(Box::new(self), Box::new(rhs))
    }
}

impl std::ops::Sub for ParameterExpression {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        ParameterExpression::Sub(Box::new(self), Box::new(rhs))
    }
}

impl std::ops::Mul for ParameterExpression {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        ParameterExpression::Mul(Box::new(self), Box::new(rhs))
    }
}

impl std::ops::Div for ParameterExpression {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        ParameterExpression::Div(Box::new(self), Box::new(rhs))
    }
}

impl std::ops::Neg for ParameterExpression {
    type Output = Self;

    fn neg(self) -> Self::Output {
        ParameterExpression::Neg(Box::new(self))
    }
}
