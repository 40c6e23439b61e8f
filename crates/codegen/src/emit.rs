//! C# text emission for generation groups

use hookgen_core::{GeneratedUnit, GeneratorConfig, HookKind, MethodSymbol, TypeSymbol};

use crate::group::GenerationGroup;
use crate::signature::{CallbackSignature, callback_type};

const BINDING_FLAGS: &str = "global::System.Reflection.BindingFlags";

/// Every method regardless of visibility or static-ness
const LOOKUP_FLAGS: [&str; 4] = ["Public", "NonPublic", "Static", "Instance"];

/// Line-oriented writer that tracks indentation and open blocks
struct SourceWriter {
  out: String,
  indent: String,
  depth: usize,
}

impl SourceWriter {
  fn new(indent: usize) -> Self {
    Self {
      out: String::new(),
      indent: " ".repeat(indent),
      depth: 0,
    }
  }

  fn line(&mut self, text: &str) {
    if !text.is_empty() {
      for _ in 0..self.depth {
        self.out.push_str(&self.indent);
      }
      self.out.push_str(text);
    }
    self.out.push('\n');
  }

  fn blank(&mut self) {
    self.line("");
  }

  fn open(&mut self, header: &str) {
    self.line(header);
    self.line("{");
    self.depth += 1;
  }

  fn close(&mut self) {
    self.depth = self.depth.saturating_sub(1);
    self.line("}");
  }

  fn finish(self) -> String {
    debug_assert_eq!(self.depth, 0, "unbalanced blocks");
    self.out
  }
}

fn lookup_mask() -> String {
  LOOKUP_FLAGS
    .iter()
    .map(|flag| format!("{}.{}", BINDING_FLAGS, flag))
    .collect::<Vec<_>>()
    .join(" | ")
}

/// Endpoint manager operations behind the add / remove accessors
fn accessors(kind: HookKind) -> (&'static str, &'static str) {
  match kind {
    HookKind::Subscribe => ("Add", "Remove"),
    HookKind::Transform => ("Modify", "Unmodify"),
  }
}

fn generated_namespace(kind: HookKind, declaring_type: &TypeSymbol) -> String {
  match &declaring_type.namespace {
    Some(namespace) => format!("{}.{}", kind.prefix(), namespace),
    None => kind.prefix().to_string(),
  }
}

fn write_event(
  writer: &mut SourceWriter,
  kind: HookKind,
  declaring_type: &TypeSymbol,
  method: &MethodSymbol,
  config: &GeneratorConfig,
) {
  let signature = CallbackSignature::for_method(declaring_type, method);
  let callback = callback_type(kind, &signature, config);
  let manager = config.endpoint_manager_path();
  let target = format!(
    "typeof(global::{}).GetMethod(\"{}\", {})",
    declaring_type.qualified_name(),
    method.name,
    lookup_mask()
  );
  let (add, remove) = accessors(kind);

  writer.open(&format!("public static event {} {}", callback, method.name));
  writer.line(&format!("add => {}.{}({}, value);", manager, add, target));
  writer.line(&format!("remove => {}.{}({}, value);", manager, remove, target));
  writer.close();
}

/// Render one group as a generated unit
pub fn emit_unit(group: &GenerationGroup<'_>, config: &GeneratorConfig) -> GeneratedUnit {
  let mut writer = SourceWriter::new(config.indent);

  if config.header {
    writer.line("// <auto-generated />");
    writer.line("// Generated by hookgen. Do not edit.");
    writer.line("#nullable disable");
    writer.blank();
  }

  // Callback types keep any names the declaring file imported but the table could not qualify
  let usings = &group.declaring_type.usings;
  for using in usings {
    writer.line(&format!("using {};", using));
  }
  if !usings.is_empty() {
    writer.blank();
  }

  writer.open(&format!(
    "namespace {}",
    generated_namespace(group.kind, group.declaring_type)
  ));

  let chain: Vec<&str> = group.declaring_type.nesting_chain().collect();
  for level in &chain {
    writer.open(&format!("public static partial class {}", level));
  }

  for (i, method) in group.methods.iter().enumerate() {
    if i > 0 {
      writer.blank();
    }
    write_event(&mut writer, group.kind, group.declaring_type, method, config);
  }

  for _ in &chain {
    writer.close();
  }
  writer.close();

  GeneratedUnit {
    name: group.unit_name(),
    text: writer.finish(),
  }
}
