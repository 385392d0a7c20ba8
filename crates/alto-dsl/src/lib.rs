pub mod format;
pub mod interpreter;
pub mod parser;
pub mod types;

pub use format::Format;
pub use interpreter::{
    Arity, Callable, EvalError, EvalResult, FunctionRegistry, Interrupt, Scope,
    compute_suggestions,
};
pub use parser::{ParseError, SyntaxErrorKind};
pub use types::{Control, Outcome};

/// Creates a `HashMap<String, String>` of variables from key-value pairs.
///
/// Keys and values are converted with `ToString`, so numbers can be passed
/// directly.
///
/// # Example
///
/// ```
/// use alto_dsl::variables;
///
/// let vars = variables! { "artist" => "Low", "tracktotal" => 12 };
/// assert_eq!(vars.len(), 2);
/// assert_eq!(vars["tracktotal"], "12");
/// ```
#[macro_export]
macro_rules! variables {
    {} => {
        ::std::collections::HashMap::<String, String>::new()
    };
    { $($key:expr => $value:expr),+ $(,)? } => {
        {
            let mut map = ::std::collections::HashMap::<String, String>::new();
            $(
                map.insert($key.to_string(), $value.to_string());
            )+
            map
        }
    };
}
