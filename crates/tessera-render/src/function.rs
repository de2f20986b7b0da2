//! Extension functions.
//!
//! A placeholder of the form `{{$name@param}}` (or `{{$name}}`) calls the
//! function registered as `name` instead of looking up a value. The function
//! writes its own output and may read and change the context.

use crate::value::Context;
use std::collections::HashMap;
use std::fmt;

/// A registered function: `(output, param, context)`. `param` is the text
/// after `@`, or empty.
pub type Function = Box<dyn Fn(&mut dyn fmt::Write, &str, &mut Context) -> fmt::Result>;

/// Name to function lookup.
#[derive(Default)]
pub struct Functions {
    map: HashMap<String, Function>,
}

impl Functions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `function` under `name`, replacing any earlier one.
    pub fn register<F>(&mut self, name: impl Into<String>, function: F) -> &mut Self
    where
        F: Fn(&mut dyn fmt::Write, &str, &mut Context) -> fmt::Result + 'static,
    {
        self.map.insert(name.into(), Box::new(function));
        self
    }

    pub fn get(&self, name: &str) -> Option<&Function> {
        self.map.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl fmt::Debug for Functions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.map.keys().collect();
        names.sort();
        f.debug_struct("Functions").field("names", &names).finish()
    }
}

/// Split a placeholder key into a function name and param if it is a call.
pub fn parse_call(key: &str) -> Option<(&str, &str)> {
    let call = key.strip_prefix('$')?;
    Some(call.split_once('@').unwrap_or((call, "")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_call() {
        assert_eq!(parse_call("$upper@abc"), Some(("upper", "abc")));
        assert_eq!(parse_call("$now"), Some(("now", "")));
        assert_eq!(parse_call("$fmt@a@b"), Some(("fmt", "a@b")));
        assert_eq!(parse_call("name"), None);
    }

    #[test]
    fn test_register_and_call() {
        let mut functions = Functions::new();
        functions.register("greet", |out, param, _| write!(out, "hi {param}"));
        assert!(functions.contains("greet"));

        let mut out = String::new();
        let mut ctx = Context::new();
        let greet = functions.get("greet").unwrap();
        greet(&mut out, "Ada", &mut ctx).unwrap();
        assert_eq!(out, "hi Ada");
    }

    #[test]
    fn test_function_mutates_context() {
        let mut functions = Functions::new();
        functions.register("bump", |_, _, ctx| {
            let next = match ctx.get("n") {
                Some(crate::Value::Int(n)) => n + 1,
                _ => 1,
            };
            ctx.set("n", next);
            Ok(())
        });

        let mut ctx = Context::new();
        let bump = functions.get("bump").unwrap();
        bump(&mut String::new(), "", &mut ctx).unwrap();
        bump(&mut String::new(), "", &mut ctx).unwrap();
        assert_eq!(ctx.get("n"), Some(&crate::Value::Int(2)));
    }

    #[test]
    fn test_debug_lists_names() {
        let mut functions = Functions::new();
        functions
            .register("b", |_, _, _| Ok(()))
            .register("a", |_, _, _| Ok(()));
        assert_eq!(format!("{functions:?}"), r#"Functions { names: ["a", "b"] }"#);
    }
}
