//! Delegate signatures for generated hook members
//!
//! The callback list for a method is: the declaring type (instance methods only), then the declared
//! parameter types, then the return type. Subscribe-style hooks receive the original method as their
//! first argument so they can forward to it; Transform-style hooks always take the IL manipulator.

use hookgen_core::{GeneratorConfig, HookKind, MethodSymbol, TypeSymbol};
use serde::Serialize;

const ACTION: &str = "global::System.Action";
const FUNC: &str = "global::System.Func";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CallbackShape {
  /// Static, no parameters, no return value
  Zero,
  NoResult,
  WithResult,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackSignature {
  pub shape: CallbackShape,
  pub types: Vec<String>,
}

impl CallbackSignature {
  pub fn for_method(declaring_type: &TypeSymbol, method: &MethodSymbol) -> Self {
    let mut types = Vec::with_capacity(method.parameters.len() + 2);
    if !method.is_static {
      types.push(format!("global::{}", declaring_type.qualified_name()));
    }
    types.extend(method.parameters.iter().cloned());
    if let Some(return_type) = &method.return_type {
      types.push(return_type.clone());
    }

    let shape = if types.is_empty() {
      CallbackShape::Zero
    } else if method.return_type.is_some() {
      CallbackShape::WithResult
    } else {
      CallbackShape::NoResult
    };

    Self { shape, types }
  }

  /// Delegate type for invoking the original method
  pub fn original_delegate(&self) -> String {
    match self.shape {
      CallbackShape::Zero => ACTION.to_string(),
      CallbackShape::NoResult => format!("{}<{}>", ACTION, self.types.join(", ")),
      CallbackShape::WithResult => format!("{}<{}>", FUNC, self.types.join(", ")),
    }
  }

  /// Delegate type for a compose-and-forward hook: original delegate first, then the list
  pub fn hook_delegate(&self) -> String {
    let original = self.original_delegate();
    match self.shape {
      CallbackShape::Zero => format!("{}<{}>", ACTION, original),
      CallbackShape::NoResult => format!("{}<{}, {}>", ACTION, original, self.types.join(", ")),
      CallbackShape::WithResult => format!("{}<{}, {}>", FUNC, original, self.types.join(", ")),
    }
  }
}

/// Callback type of the generated event for this hook kind
pub fn callback_type(kind: HookKind, signature: &CallbackSignature, config: &GeneratorConfig) -> String {
  match kind {
    HookKind::Subscribe => signature.hook_delegate(),
    HookKind::Transform => config.manipulator_path(),
  }
}
