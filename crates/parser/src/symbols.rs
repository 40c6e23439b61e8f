//! Type declarations collected from C# source
//!
//! Builds [`TypeSymbol`]s for classes, structs, interfaces, records and enums, including nested types,
//! with their methods, fields and properties in declaration order.

use hookgen_core::{Member, MethodSymbol, TypeSymbol, TypeTable};
use tree_sitter::{Node, Tree};

/// Declarations that introduce a type
const TYPE_KINDS: &[&str] = &[
  "class_declaration",
  "struct_declaration",
  "interface_declaration",
  "record_declaration",
  "record_struct_declaration",
  "enum_declaration",
];

/// Parameter modifiers that cannot appear in a generic argument list
const PARAMETER_MODIFIERS: &[&str] = &["this", "ref", "out", "in", "params", "scoped", "readonly"];

/// Collect every type declared in a parsed file
pub fn collect_types(tree: &Tree, source: &str) -> Vec<TypeSymbol> {
  let mut collector = Collector {
    source: source.as_bytes(),
    types: Vec::new(),
  };
  collector.visit_declarations(tree.root_node(), None, &[], &[]);
  collector.types
}

struct Collector<'s> {
  source: &'s [u8],
  types: Vec<TypeSymbol>,
}

impl Collector<'_> {
  fn text(&self, node: Node) -> String {
    node.utf8_text(self.source).map(normalize_type_text).unwrap_or_default()
  }

  fn field_text(&self, node: Node, field: &str) -> Option<String> {
    node.child_by_field_name(field).map(|n| self.text(n)).filter(|t| !t.is_empty())
  }

  /// Visit a compilation unit, namespace body or type body.
  ///
  /// `usings` are the directives already in scope; directives in this scope are added as they appear.
  fn visit_declarations(&mut self, scope: Node, namespace: Option<&str>, containing: &[String], usings: &[String]) {
    // A file-scoped namespace applies to every declaration that follows it
    let mut current_namespace = namespace.map(str::to_string);
    let mut usings = usings.to_vec();

    let mut cursor = scope.walk();
    let children: Vec<Node> = scope.named_children(&mut cursor).collect();
    for child in children {
      match child.kind() {
        "using_directive" => {
          if let Some(using) = self.using_target(child)
            && !usings.contains(&using)
          {
            usings.push(using);
          }
        }
        "namespace_declaration" => {
          let Some(name) = self.field_text(child, "name") else {
            continue;
          };
          let nested = join_namespace(current_namespace.as_deref(), &name);
          if let Some(body) = body_of(child) {
            self.visit_declarations(body, Some(&nested), &[], &usings);
          }
        }
        "file_scoped_namespace_declaration" => {
          if let Some(name) = self.field_text(child, "name") {
            let nested = join_namespace(namespace, &name);
            // some grammar versions nest the following declarations under this node
            self.visit_declarations(child, Some(&nested), &[], &usings);
            current_namespace = Some(nested);
          }
        }
        "declaration_list" => self.visit_declarations(child, current_namespace.as_deref(), containing, &usings),
        kind if TYPE_KINDS.contains(&kind) => {
          self.visit_type(child, current_namespace.as_deref(), containing, &usings)
        }
        _ => {}
      }
    }
  }

  /// `System.IO` for `using System.IO;`, `static System.Math` and `Io = System.IO` likewise.
  /// `global using` directives are project-wide and already apply to generated files.
  fn using_target(&self, node: Node) -> Option<String> {
    let text = self.text(node);
    let rest = text.strip_prefix("using ")?;
    let target = rest.trim_end_matches(';').trim();
    (!target.is_empty()).then(|| target.to_string())
  }

  /// Names from a `<T, U>` parameter list on a type or method
  fn type_parameters(&self, node: Node) -> Vec<String> {
    let Some(list) = node
      .child_by_field_name("type_parameters")
      .or_else(|| first_named_child_of_kind(node, "type_parameter_list"))
    else {
      return Vec::new();
    };
    let mut cursor = list.walk();
    list
      .named_children(&mut cursor)
      .filter(|p| p.kind() == "type_parameter")
      .map(|p| self.field_text(p, "name").unwrap_or_else(|| self.text(p)))
      .filter(|name| !name.is_empty())
      .collect()
  }

  fn visit_type(&mut self, node: Node, namespace: Option<&str>, containing: &[String], usings: &[String]) {
    let Some(name) = node.child_by_field_name("name").map(|n| self.text(n)) else {
      return;
    };

    let mut symbol = TypeSymbol::new(name.clone())
      .in_namespace(namespace.unwrap_or_default())
      .nested_in(containing.iter().cloned())
      .with_type_parameters(self.type_parameters(node))
      .with_usings(usings.iter().cloned());

    let mut nested_types = Vec::new();
    if let Some(body) = body_of(node) {
      let mut cursor = body.walk();
      for member in body.named_children(&mut cursor) {
        match member.kind() {
          "method_declaration" => {
            if let Some(method) = self.method(member) {
              symbol.members.push(Member::Method(method));
            }
          }
          "field_declaration" | "event_field_declaration" => {
            for name in self.declarator_names(member) {
              symbol.members.push(Member::Field { name });
            }
          }
          "property_declaration" | "event_declaration" | "indexer_declaration" => {
            if let Some(name) = self.field_text(member, "name") {
              symbol.members.push(Member::Property { name });
            }
          }
          kind if TYPE_KINDS.contains(&kind) => {
            if let Some(name) = self.field_text(member, "name") {
              symbol.members.push(Member::NestedType { name });
            }
            nested_types.push(member);
          }
          _ => {}
        }
      }
    }

    self.types.push(symbol);

    let mut chain = containing.to_vec();
    chain.push(name);
    for nested in nested_types {
      self.visit_type(nested, namespace, &chain, usings);
    }
  }

  fn method(&self, node: Node) -> Option<MethodSymbol> {
    let name = self.field_text(node, "name")?;
    let return_type = self
      .field_text(node, "returns")
      .or_else(|| self.field_text(node, "type"))
      .unwrap_or_else(|| "void".to_string());

    let parameters = node
      .child_by_field_name("parameters")
      .map(|list| self.parameter_types(list))
      .unwrap_or_default();

    Some(
      MethodSymbol::new(name)
        .with_static(has_static_modifier(node, self.source))
        .with_parameters(parameters)
        .with_return_type(return_type)
        .with_type_parameters(self.type_parameters(node)),
    )
  }

  fn parameter_types(&self, list: Node) -> Vec<String> {
    let mut cursor = list.walk();
    list
      .named_children(&mut cursor)
      .filter(|p| p.kind() == "parameter")
      .filter_map(|p| self.field_text(p, "type"))
      .map(|t| strip_parameter_modifiers(&t))
      .collect()
  }

  /// Names declared by `int a, b;` style declarations
  fn declarator_names(&self, node: Node) -> Vec<String> {
    let mut names = Vec::new();
    let mut stack = vec![node];
    while let Some(current) = stack.pop() {
      if current.kind() == "variable_declarator" {
        let name = current
          .child_by_field_name("name")
          .or_else(|| first_named_child_of_kind(current, "identifier"));
        if let Some(name) = name {
          names.push(self.text(name));
        }
        continue;
      }
      let mut cursor = current.walk();
      let children: Vec<Node> = current.named_children(&mut cursor).collect();
      stack.extend(children.into_iter().rev());
    }
    names
  }
}

fn body_of(node: Node) -> Option<Node> {
  node
    .child_by_field_name("body")
    .or_else(|| first_named_child_of_kind(node, "declaration_list"))
}

fn first_named_child_of_kind<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
  let mut cursor = node.walk();
  node.named_children(&mut cursor).find(|c| c.kind() == kind)
}

fn has_static_modifier(node: Node, source: &[u8]) -> bool {
  let mut cursor = node.walk();
  node.children(&mut cursor).any(|c| match c.kind() {
    "modifier" => c.utf8_text(source).is_ok_and(|t| t.trim() == "static"),
    kind => kind == "static",
  })
}

fn join_namespace(outer: Option<&str>, name: &str) -> String {
  match outer {
    Some(outer) if !outer.is_empty() => format!("{}.{}", outer, name),
    _ => name.to_string(),
  }
}

/// Collapse internal whitespace so multi-line type text compares equal
fn normalize_type_text(text: &str) -> String {
  text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn strip_parameter_modifiers(text: &str) -> String {
  let mut rest = text.trim();
  while let Some((first, tail)) = rest.split_once(' ') {
    if !PARAMETER_MODIFIERS.contains(&first) {
      break;
    }
    rest = tail.trim_start();
  }
  rest.to_string()
}

// ============================================================================
// Type reference qualification
// ============================================================================

/// Rewrite parameter and return types that name a type in `table` to `global::`-qualified form.
///
/// Names are looked up the way C# resolves them from inside the declaring type: innermost enclosing
/// scope first. Generic arguments, tuple elements and array element types are qualified the same way.
/// Types that are not in the table (primitives, external types) are left unchanged.
pub fn qualify_type_references(table: &TypeTable) -> TypeTable {
  table
    .iter()
    .map(|symbol| {
      let scopes = enclosing_scopes(symbol);
      let mut qualified = symbol.clone();
      for member in &mut qualified.members {
        if let Member::Method(method) = member {
          for parameter in &mut method.parameters {
            *parameter = qualify(parameter, &scopes, table);
          }
          if let Some(return_type) = &mut method.return_type {
            *return_type = qualify(return_type, &scopes, table);
          }
        }
      }
      qualified
    })
    .collect()
}

/// `A.B.Outer.T`, `A.B.Outer`, `A.B`, `A`, then the global scope
fn enclosing_scopes(symbol: &TypeSymbol) -> Vec<String> {
  let qualified = symbol.qualified_name();
  let mut scopes = vec![qualified.clone()];
  let mut current = qualified.as_str();
  while let Some((outer, _)) = current.rsplit_once('.') {
    scopes.push(outer.to_string());
    current = outer;
  }
  scopes.push(String::new());
  scopes
}

fn qualify(text: &str, scopes: &[String], table: &TypeTable) -> String {
  let mut qualifier = Qualifier {
    chars: text.chars().collect(),
    pos: 0,
    scopes,
    table,
  };
  match qualifier.parse_type() {
    Some(qualified) if qualifier.at_end() => qualified,
    // Anything we cannot read is passed through as written
    _ => text.to_string(),
  }
}

/// Recursive reader over C# type text.
///
/// Handles dotted and `alias::` names with generic arguments, tuples, and `[]`/`[,]`, `?` and `*`
/// suffixes. Every named type along the way is looked up, so arguments and tuple elements are
/// qualified too.
struct Qualifier<'a> {
  chars: Vec<char>,
  pos: usize,
  scopes: &'a [String],
  table: &'a TypeTable,
}

/// One `Name<Args>` step of a dotted type name, arguments already qualified
struct Segment {
  name: String,
  arguments: Option<Vec<String>>,
}

impl Segment {
  fn render(&self) -> String {
    match &self.arguments {
      Some(arguments) => format!("{}<{}>", self.name, arguments.join(", ")),
      None => self.name.clone(),
    }
  }
}

impl Qualifier<'_> {
  fn peek(&self) -> Option<char> {
    self.chars.get(self.pos).copied()
  }

  fn skip_spaces(&mut self) {
    while self.peek().is_some_and(char::is_whitespace) {
      self.pos += 1;
    }
  }

  fn at_end(&mut self) -> bool {
    self.skip_spaces();
    self.pos == self.chars.len()
  }

  fn eat(&mut self, expected: char) -> bool {
    self.skip_spaces();
    if self.peek() == Some(expected) {
      self.pos += 1;
      true
    } else {
      false
    }
  }

  fn eat_double_colon(&mut self) -> bool {
    self.skip_spaces();
    if self.chars.get(self.pos..self.pos + 2) == Some(&[':', ':'][..]) {
      self.pos += 2;
      true
    } else {
      false
    }
  }

  fn starts_identifier(&mut self) -> bool {
    self.skip_spaces();
    self.peek().is_some_and(|c| c.is_alphabetic() || c == '_' || c == '@')
  }

  fn identifier(&mut self) -> Option<String> {
    if !self.starts_identifier() {
      return None;
    }
    let start = self.pos;
    self.pos += 1;
    while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
      self.pos += 1;
    }
    Some(self.chars[start..self.pos].iter().collect())
  }

  fn parse_type(&mut self) -> Option<String> {
    self.skip_spaces();
    let mut text = if self.peek() == Some('(') {
      self.parse_tuple()?
    } else {
      self.parse_named()?
    };

    loop {
      self.skip_spaces();
      match self.peek() {
        Some(c @ ('?' | '*')) => {
          self.pos += 1;
          text.push(c);
        }
        Some('[') => {
          self.pos += 1;
          text.push('[');
          loop {
            match self.peek_after_spaces()? {
              ',' => text.push(','),
              ']' => {
                text.push(']');
                break;
              }
              _ => return None,
            }
          }
        }
        _ => return Some(text),
      }
    }
  }

  /// Consume and return the next non-space character
  fn peek_after_spaces(&mut self) -> Option<char> {
    self.skip_spaces();
    let c = self.peek()?;
    self.pos += 1;
    Some(c)
  }

  fn parse_tuple(&mut self) -> Option<String> {
    self.pos += 1;
    let mut elements = Vec::new();
    loop {
      let mut element = self.parse_type()?;
      if self.starts_identifier() {
        let name = self.identifier()?;
        element = format!("{} {}", element, name);
      }
      elements.push(element);

      if self.eat(',') {
        continue;
      }
      if self.eat(')') {
        return Some(format!("({})", elements.join(", ")));
      }
      return None;
    }
  }

  fn parse_named(&mut self) -> Option<String> {
    let first = self.identifier()?;
    let (alias, mut pending) = if self.eat_double_colon() {
      (Some(first), None)
    } else {
      (None, Some(first))
    };

    let mut segments = Vec::new();
    loop {
      let name = match pending.take() {
        Some(name) => name,
        None => self.identifier()?,
      };
      let arguments = if self.eat('<') { Some(self.parse_arguments()?) } else { None };
      segments.push(Segment { name, arguments });
      if !self.eat('.') {
        break;
      }
    }

    if alias.is_none()
      && let Some(found) = self.lookup(&segments)
    {
      let arguments = segments.last().and_then(|s| s.arguments.as_ref());
      return Some(match arguments {
        Some(arguments) => format!("global::{}<{}>", found, arguments.join(", ")),
        None => format!("global::{}", found),
      });
    }

    let path = segments.iter().map(Segment::render).collect::<Vec<_>>().join(".");
    Some(match alias {
      Some(alias) => format!("{}::{}", alias, path),
      None => path,
    })
  }

  fn parse_arguments(&mut self) -> Option<Vec<String>> {
    let mut arguments = Vec::new();
    loop {
      arguments.push(self.parse_type()?);
      if self.eat(',') {
        continue;
      }
      if self.eat('>') {
        return Some(arguments);
      }
      return None;
    }
  }

  /// Qualified name of the table type a dotted name refers to, innermost scope first.
  ///
  /// Only the last segment may carry arguments, and their count must match the type's parameters.
  fn lookup(&self, segments: &[Segment]) -> Option<String> {
    let (last, outer) = segments.split_last()?;
    if outer.iter().any(|s| s.arguments.is_some()) {
      return None;
    }
    let arity = last.arguments.as_ref().map_or(0, Vec::len);
    let path = segments.iter().map(|s| s.name.as_str()).collect::<Vec<_>>().join(".");

    self
      .scopes
      .iter()
      .map(|scope| join_namespace(Some(scope), &path))
      .find(|candidate| {
        self
          .table
          .get(candidate)
          .is_some_and(|symbol| symbol.type_parameters.len() == arity)
      })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::CSharpParser;
  use pretty_assertions::assert_eq;

  fn types(source: &str) -> Vec<TypeSymbol> {
    CSharpParser::new().collect_types(source).unwrap()
  }

  fn find<'a>(types: &'a [TypeSymbol], qualified: &str) -> &'a TypeSymbol {
    types
      .iter()
      .find(|t| t.qualified_name() == qualified)
      .unwrap_or_else(|| panic!("{} not found in {:?}", qualified, types))
  }

  #[test]
  fn test_collects_namespaced_class_methods() {
    let types = types(
      r#"
namespace Game.World
{
    public class Player
    {
        private int health;
        public float Speed { get; set; }

        public bool Hurt(int amount) { return true; }
        public static void Reset() { }
        private string Describe(ref int depth, object[] args) => "";
    }
}
"#,
    );
    let player = find(&types, "Game.World.Player");
    assert_eq!(player.namespace.as_deref(), Some("Game.World"));

    let hurt = player.method_named("Hurt").unwrap();
    assert!(!hurt.is_static);
    assert_eq!(hurt.parameters, vec!["int"]);
    assert_eq!(hurt.return_type.as_deref(), Some("bool"));

    let reset = player.method_named("Reset").unwrap();
    assert!(reset.is_static);
    assert!(reset.parameters.is_empty());
    assert_eq!(reset.return_type, None);

    let describe = player.method_named("Describe").unwrap();
    assert_eq!(describe.parameters, vec!["int", "object[]"]);

    assert!(player.members.iter().any(|m| matches!(m, Member::Field { name } if name == "health")));
    assert!(player.members.iter().any(|m| matches!(m, Member::Property { name } if name == "Speed")));
  }

  #[test]
  fn test_nested_types_record_containing_chain() {
    let types = types(
      r#"
namespace Game
{
    class Outer
    {
        class Middle
        {
            struct Inner
            {
                void Tick() { }
            }
        }
    }
}
"#,
    );
    let inner = find(&types, "Game.Outer.Middle.Inner");
    assert_eq!(inner.containing_types, vec!["Outer", "Middle"]);
    assert!(inner.method_named("Tick").is_some());

    let outer = find(&types, "Game.Outer");
    assert!(
      outer
        .members
        .iter()
        .any(|m| matches!(m, Member::NestedType { name } if name == "Middle"))
    );
  }

  #[test]
  fn test_nested_namespaces_and_global_types() {
    let types = types(
      r#"
class Global { void Run() { } }

namespace A
{
    namespace B
    {
        class Deep { }
    }
}
"#,
    );
    assert!(find(&types, "Global").namespace.is_none());
    assert_eq!(find(&types, "A.B.Deep").namespace.as_deref(), Some("A.B"));
  }

  #[test]
  fn test_file_scoped_namespace() {
    let types = types(
      r#"
namespace Game.Items;

public class Sword
{
    public int Damage() => 3;
}
"#,
    );
    let sword = find(&types, "Game.Items.Sword");
    assert_eq!(sword.method_named("Damage").unwrap().return_type.as_deref(), Some("int"));
  }

  #[test]
  fn test_constructors_are_not_methods() {
    let types = types("class Box { public Box(int size) { } public void Open() { } }");
    let ty = find(&types, "Box");
    assert_eq!(ty.methods().count(), 1);
  }

  #[test]
  fn test_strip_parameter_modifiers() {
    assert_eq!(strip_parameter_modifiers("ref int"), "int");
    assert_eq!(strip_parameter_modifiers("this string"), "string");
    assert_eq!(strip_parameter_modifiers("scoped ref Span<int>"), "Span<int>");
    assert_eq!(strip_parameter_modifiers("Dictionary<string, int>"), "Dictionary<string, int>");
  }

  #[test]
  fn test_qualify_type_references() {
    let table: TypeTable = types(
      r#"
namespace Game
{
    class Item { }
    class Box<T> { }
    class Player
    {
        class Item { }
        Item Pick(Game.Item other, Item[] bag, int count, List<Item> list) => null;
        static Enemy Spawn(Enemy? template) => null;
        void Store(Dictionary<string, List<Enemy[]>> loot, Box<Item> box, (Item first, int) pair, Item[,][] grid) { }
        void Keep(global::Game.Item kept, Box plain, Item<int> wrongArity) { }
    }
    class Enemy { }
}
"#,
    )
    .into_iter()
    .collect();

    let qualified = qualify_type_references(&table);
    let player = qualified.get("Game.Player").unwrap();

    let pick = player.method_named("Pick").unwrap();
    assert_eq!(
      pick.parameters,
      vec![
        "global::Game.Item",
        "global::Game.Player.Item[]",
        "int",
        "List<global::Game.Player.Item>"
      ]
    );
    assert_eq!(pick.return_type.as_deref(), Some("global::Game.Player.Item"));

    let spawn = player.method_named("Spawn").unwrap();
    assert_eq!(spawn.parameters, vec!["global::Game.Enemy?"]);
    assert_eq!(spawn.return_type.as_deref(), Some("global::Game.Enemy"));

    let store = player.method_named("Store").unwrap();
    assert_eq!(
      store.parameters,
      vec![
        "Dictionary<string, List<global::Game.Enemy[]>>",
        "global::Game.Box<global::Game.Player.Item>",
        "(global::Game.Player.Item first, int)",
        "global::Game.Player.Item[,][]"
      ]
    );

    // Already global, or no type with a matching parameter count
    let keep = player.method_named("Keep").unwrap();
    assert_eq!(keep.parameters, vec!["global::Game.Item", "Box", "Item<int>"]);
  }

  #[test]
  fn test_records_usings_per_scope() {
    let types = types(
      r#"
global using System.Linq;
using System;
using static System.Math;

namespace Game
{
    using Items = Game.Data.Items;
    using System;

    class Player { class Bag { } }
}

class Loose { }
"#,
    );
    assert_eq!(
      find(&types, "Game.Player").usings,
      vec!["System", "static System.Math", "Items = Game.Data.Items"]
    );
    assert_eq!(find(&types, "Game.Player.Bag").usings, find(&types, "Game.Player").usings);
    assert_eq!(find(&types, "Loose").usings, vec!["System", "static System.Math"]);
  }

  #[test]
  fn test_records_type_parameters() {
    let types = types(
      r#"
namespace Game
{
    class Pool<TItem, TKey> where TItem : class
    {
        public TItem Take<TOut>(TKey key) => default;
        public void Clear() { }
    }
    interface IStore<T> { }
    struct Plain { }
}
"#,
    );
    let pool = find(&types, "Game.Pool");
    assert_eq!(pool.type_parameters, vec!["TItem", "TKey"]);
    assert!(pool.is_generic());
    assert_eq!(pool.method_named("Take").unwrap().type_parameters, vec!["TOut"]);
    assert!(!pool.method_named("Clear").unwrap().is_generic());

    assert_eq!(find(&types, "Game.IStore").type_parameters, vec!["T"]);
    assert!(!find(&types, "Game.Plain").is_generic());
  }
}
