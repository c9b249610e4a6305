//! Extension function registration (§4.5).

use std::collections::HashMap;
use std::rc::Rc;

use condeval_lex::ExtensionNameSet;

use crate::context::EvaluationContext;
use crate::error::{ConvertError, ExtensionRegistrationError};
use crate::value::Value;

/// An embedder-supplied function body. Receives already-evaluated
/// arguments and the same context built-ins see.
pub trait ExtensionFunction {
    fn evaluate(&self, args: &[Value], context: &EvaluationContext, depth: usize) -> Result<Value, ConvertError>;
}

impl<F> ExtensionFunction for F
where
    F: Fn(&[Value], &EvaluationContext, usize) -> Result<Value, ConvertError>,
{
    fn evaluate(&self, args: &[Value], context: &EvaluationContext, depth: usize) -> Result<Value, ConvertError> {
        self(args, context, depth)
    }
}

struct ExtensionDef {
    name: String,
    min_parameters: usize,
    max_parameters: Option<usize>,
    factory: Box<dyn Fn() -> Rc<dyn ExtensionFunction>>,
}

/// Registry of extension functions, keyed case-insensitively on name.
///
/// Implements [`ExtensionNameSet`] so it can be handed to the lexer
/// directly, without `condeval-lex` knowing anything about the registration
/// contract.
#[derive(Default)]
pub struct ExtensionRegistry {
    by_lower_name: HashMap<String, ExtensionDef>,
}

impl ExtensionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an extension. Fails if an extension with the same name
    /// (case-insensitively) is already registered.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        min_parameters: usize,
        max_parameters: Option<usize>,
        factory: impl Fn() -> Rc<dyn ExtensionFunction> + 'static,
    ) -> Result<(), ExtensionRegistrationError> {
        let name = name.into();
        let key = name.to_ascii_lowercase();
        if self.by_lower_name.contains_key(&key) {
            return Err(ExtensionRegistrationError::DuplicateName(name));
        }
        self.by_lower_name.insert(
            key,
            ExtensionDef {
                name,
                min_parameters,
                max_parameters,
                factory: Box::new(factory),
            },
        );
        Ok(())
    }

    pub(crate) fn lookup(&self, name: &str) -> Option<(&str, usize, Option<usize>, Rc<dyn ExtensionFunction>)> {
        self.by_lower_name
            .get(&name.to_ascii_lowercase())
            .map(|def| (def.name.as_str(), def.min_parameters, def.max_parameters, (def.factory)()))
    }
}

impl ExtensionNameSet for ExtensionRegistry {
    fn contains(&self, name: &str) -> bool {
        self.by_lower_name.contains_key(&name.to_ascii_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut registry = ExtensionRegistry::new();
        registry
            .register("testData", 0, Some(0), || Rc::new(|_: &[Value], _: &EvaluationContext, _: usize| Ok(Value::Null)))
            .unwrap();
        let err = registry
            .register("TESTDATA", 0, Some(0), || Rc::new(|_: &[Value], _: &EvaluationContext, _: usize| Ok(Value::Null)))
            .unwrap_err();
        assert_eq!(err, ExtensionRegistrationError::DuplicateName("TESTDATA".to_string()));
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let mut registry = ExtensionRegistry::new();
        registry
            .register("testData", 0, Some(0), || Rc::new(|_: &[Value], _: &EvaluationContext, _: usize| Ok(Value::Null)))
            .unwrap();
        assert!(registry.lookup("TESTDATA").is_some());
        assert!(ExtensionNameSet::contains(&registry, "testdata"));
    }
}
