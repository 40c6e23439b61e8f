//! C# tree-sitter queries

/// Candidate hook registrations.
///
/// The grammar folds every assignment operator into `assignment_expression`, so the operator
/// (`+=` / `-=`) and the shape of the left operand are checked by the scanner.
pub const HOOK_ASSIGNMENTS_QUERY: &str = r#"
; On.Game.Player.Update += Hook;
; IL.Game.Player.Update -= Patch;
(assignment_expression) @assignment
"#;
