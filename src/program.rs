// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::environment::Environment;
use crate::errors::{CompileError, CompileErrorKind, RuntimeError};
use crate::value::Value;

use core::fmt;

/// Most brackets a query may open inside one another. Parsing recurses
/// through every precedence level for each one.
pub const MAX_NESTING: usize = 32;

/// Most operators and accessors a query may contain. Each can add a level to
/// the syntax tree, which evaluation walks recursively.
pub const MAX_OPERATORS: usize = 256;

/// A compiled query.
///
/// Depends only on the query text, so one program can be evaluated against
/// any number of objects, from any number of threads.
pub struct Program {
    query: String,
    program: cel_interpreter::Program,
}

impl fmt::Debug for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Program")
            .field("query", &self.query)
            .finish_non_exhaustive()
    }
}

impl Program {
    pub fn compile(query: &str) -> Result<Program, CompileError> {
        if query.trim().is_empty() {
            return Err(CompileError::new(CompileErrorKind::Empty, "nothing to evaluate"));
        }

        let (depth, operators) = nesting(query);
        if depth > MAX_NESTING {
            return Err(CompileError::new(
                CompileErrorKind::TooDeep,
                format!("brackets nest {depth} deep, at most {MAX_NESTING} allowed"),
            ));
        }
        if operators > MAX_OPERATORS {
            return Err(CompileError::new(
                CompileErrorKind::TooDeep,
                format!("{operators} operators, at most {MAX_OPERATORS} allowed"),
            ));
        }

        let program = cel_interpreter::Program::compile(query)
            .map_err(|e| CompileError::new(CompileErrorKind::Syntax, e.to_string()))?;
        Ok(Program {
            query: query.to_string(),
            program,
        })
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Evaluate with `object` bound to `o`.
    pub fn eval(&self, object: &Value) -> Result<Value, RuntimeError> {
        self.eval_in(&Environment::new(object))
    }

    pub fn eval_in(&self, env: &Environment) -> Result<Value, RuntimeError> {
        let value = self.program.execute(env.context())?;
        Value::from_cel(&value)
    }
}

/// Deepest bracket nesting and number of operators in `query`, together an
/// upper bound on the depth of its syntax tree. Operators include accessors
/// and `in`. Contents of string literals are skipped.
fn nesting(query: &str) -> (usize, usize) {
    let chars: Vec<char> = query.chars().collect();
    let (mut operators, mut depth, mut max_depth) = (0usize, 0usize, 0usize);
    let mut i = 0;
    while i < chars.len() {
        let ch = chars[i];
        match ch {
            '\'' | '"' => {
                let raw = i > 0 && matches!(chars[i - 1], 'r' | 'R');
                i += 1;
                while i < chars.len() && chars[i] != ch {
                    if chars[i] == '\\' && !raw {
                        i += 1;
                    }
                    i += 1;
                }
            }
            '(' | '[' | '{' => {
                depth += 1;
                max_depth = max_depth.max(depth);
            }
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            '.' | '!' | '-' | '+' | '*' | '/' | '%' | '<' | '>' | '=' | '&' | '|' | '?' => {
                operators += 1
            }
            c if c.is_alphabetic() || c == '_' => {
                let start = i;
                while chars
                    .get(i + 1)
                    .is_some_and(|c| c.is_alphanumeric() || *c == '_')
                {
                    i += 1;
                }
                if chars[start..=i] == ['i', 'n'] {
                    operators += 1;
                }
            }
            _ => (),
        }
        i += 1;
    }
    (max_depth, operators)
}
