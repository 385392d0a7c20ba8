//! Built-in functions available to every format string.
//!
//! | Name | Arity | Result |
//! |---|---|---|
//! | `trim` | 1 | argument without surrounding whitespace |
//! | `must` | any | concatenated arguments; fails if one is empty |
//! | `exit` | 0 | aborts the run |
//! | `eq`, `neq` | 3 | third argument if the first two are (not) equal |
//! | `gt`, `lt`, `gte`, `lte` | 3 | third argument if the integer comparison holds |
//! | `set`, `fset` | 2 | empty; defines a variable |

use crate::interpreter::error::{EvalError, EvalResult, Interrupt};
use crate::interpreter::functions::{Arity, Callable, FunctionRegistry};
use crate::interpreter::scope::Scope;
use crate::parser::Field;
use crate::types::Control;

/// Register all built-in functions into `registry`.
pub fn register_defaults(registry: &mut FunctionRegistry) {
    registry.register("trim", Trim);
    registry.register("must", Must);
    registry.register("exit", Exit);
    for comparison in Comparison::ALL {
        registry.register(comparison.name(), comparison);
    }
    registry.register("set", SetVariable { force: false });
    registry.register("fset", SetVariable { force: true });
}

/// `trim(value)`
struct Trim;

impl Callable for Trim {
    fn arity(&self) -> Arity {
        Arity::Exact(1)
    }

    fn call(&self, args: &[Field], scope: &mut Scope) -> EvalResult {
        Ok(args[0].eval(scope)?.trim().to_string())
    }
}

/// `must(a|b|...)`
struct Must;

impl Callable for Must {
    fn arity(&self) -> Arity {
        Arity::Variadic
    }

    fn call(&self, args: &[Field], scope: &mut Scope) -> EvalResult {
        let mut output = String::new();
        for (index, arg) in args.iter().enumerate() {
            let text = match arg.eval(scope) {
                Ok(text) => text,
                Err(Interrupt::Error(source)) => {
                    return Err(EvalError::RequiredFieldMissing {
                        index,
                        source: Some(Box::new(source)),
                    }
                    .into());
                }
                Err(control) => return Err(control),
            };
            if text.is_empty() {
                return Err(EvalError::RequiredFieldMissing {
                    index,
                    source: None,
                }
                .into());
            }
            output.push_str(&text);
        }
        Ok(output)
    }
}

/// `exit()`
struct Exit;

impl Callable for Exit {
    fn arity(&self) -> Arity {
        Arity::Exact(0)
    }

    fn call(&self, _args: &[Field], _scope: &mut Scope) -> EvalResult {
        Err(Control::Exit.into())
    }
}

/// Conditional comparisons: `op(left|right|then)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Comparison {
    Equal,
    NotEqual,
    Greater,
    Less,
    GreaterOrEqual,
    LessOrEqual,
}

impl Comparison {
    const ALL: [Comparison; 6] = [
        Comparison::Equal,
        Comparison::NotEqual,
        Comparison::Greater,
        Comparison::Less,
        Comparison::GreaterOrEqual,
        Comparison::LessOrEqual,
    ];

    fn name(self) -> &'static str {
        match self {
            Comparison::Equal => "eq",
            Comparison::NotEqual => "neq",
            Comparison::Greater => "gt",
            Comparison::Less => "lt",
            Comparison::GreaterOrEqual => "gte",
            Comparison::LessOrEqual => "lte",
        }
    }

    fn holds(self, left: &str, right: &str) -> Result<bool, EvalError> {
        let passed = match self {
            Comparison::Equal => left == right,
            Comparison::NotEqual => left != right,
            Comparison::Greater => self.integer(left)? > self.integer(right)?,
            Comparison::Less => self.integer(left)? < self.integer(right)?,
            Comparison::GreaterOrEqual => self.integer(left)? >= self.integer(right)?,
            Comparison::LessOrEqual => self.integer(left)? <= self.integer(right)?,
        };
        Ok(passed)
    }

    fn integer(self, value: &str) -> Result<i64, EvalError> {
        value
            .trim()
            .parse()
            .map_err(|_| EvalError::NotAnInteger {
                function: self.name().to_string(),
                value: value.to_string(),
            })
    }
}

impl Callable for Comparison {
    fn arity(&self) -> Arity {
        Arity::Exact(3)
    }

    fn call(&self, args: &[Field], scope: &mut Scope) -> EvalResult {
        let left = args[0].eval(scope)?;
        let right = args[1].eval(scope)?;
        if self.holds(&left, &right)? {
            args[2].eval(scope)
        } else {
            Ok(String::new())
        }
    }
}

/// `set(name|value)` and `fset(name|value)`
struct SetVariable {
    /// Overwrite existing variables instead of failing.
    force: bool,
}

impl Callable for SetVariable {
    fn arity(&self) -> Arity {
        Arity::Exact(2)
    }

    fn call(&self, args: &[Field], scope: &mut Scope) -> EvalResult {
        let name = args[0].eval(scope)?;
        if !self.force && scope.contains(&name) {
            return Err(EvalError::VariableAlreadyDefined { name }.into());
        }
        let value = args[1].eval(scope)?;
        scope.set(name, value);
        Ok(String::new())
    }
}
