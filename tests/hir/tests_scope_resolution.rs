//! Last-wins resolution of bare and qualified names.

use rstest::rstest;
use unitscope::base::UnitName;
use unitscope::hir::{DeclKind, Declaration, ScopeDiagnosis, ScopeOutcome, VariableRole};
use unitscope::ide::AnalysisHost;

use crate::helpers::source_fixtures::*;

fn main_using(uses: &str) -> String {
    format!(
        "unit Main;\n\ninterface\n\nuses {uses};\n\nvar\n  V: TShared;\n\nimplementation\n\nend.\n"
    )
}

#[rstest]
#[case("UnitA, UnitB", "UnitB")]
#[case("UnitB, UnitA", "UnitA")]
#[case("UnitA", "UnitA")]
fn test_last_listed_unit_wins(#[case] uses: &str, #[case] expected: &str) {
    let mut host = AnalysisHost::new();
    type_unit(&mut host, "UnitA", &[], &["TShared"]);
    type_unit(&mut host, "UnitB", &[], &["TShared"]);
    let text = main_using(uses);
    let main = host.set_file_text("Main.pas", &text);

    let result = host
        .analysis()
        .resolve("TShared", main, offset(&text, "TShared"), DeclKind::Type);

    assert_eq!(result.outcome(), ScopeOutcome::Resolved);
    assert_eq!(result.resolved().map(|d| d.unit.as_str()), Some(expected));
    assert!(result.diagnosis.is_none());
}

#[test]
fn test_candidates_sorted_by_priority() {
    let mut host = AnalysisHost::new();
    type_unit(&mut host, "UnitA", &[], &["TShared"]);
    type_unit(&mut host, "UnitB", &[], &["TShared"]);
    type_unit(&mut host, "UnitC", &[], &["TShared"]);
    let text = main_using("UnitC, UnitA, UnitB");
    let main = host.set_file_text("Main.pas", &text);

    let result = host
        .analysis()
        .resolve("TShared", main, offset(&text, "TShared"), DeclKind::Type);
    let order: Vec<&str> = result.in_scope.iter().map(|c| c.decl.unit.as_str()).collect();
    assert_eq!(order, vec!["UnitB", "UnitA", "UnitC"]);
    assert_eq!(result.in_scope[0].priority.value(), 2);
}

#[test]
fn test_same_file_declaration_wins() {
    let mut host = AnalysisHost::new();
    type_unit(&mut host, "UnitA", &[], &["TMyType"]);
    let text = "unit Main;\n\ninterface\n\nuses UnitA;\n\ntype\n  TMyType = class\n  end;\n\nvar\n  V: TMyType;\n\nimplementation\n\nend.\n";
    let main = add_unit(
        &mut host,
        "Main.pas",
        text,
        vec![Declaration::type_decl("TMyType", at(text, "TMyType"))],
    );

    let result = host
        .analysis()
        .resolve("TMyType", main, offset(text, "V: TMyType"), DeclKind::Type);

    let winner = result.resolved().expect("resolved");
    assert_eq!(winner.file, main);
    assert_eq!(winner.unit, UnitName::new("Main"));
    assert_eq!(result.in_scope.len(), 1);
}

#[test]
fn test_interface_cannot_see_implementation_uses() {
    let mut host = AnalysisHost::new();
    type_unit(&mut host, "UnitImpl", &[], &["THelper"]);
    let text = "unit Main;\n\ninterface\n\nvar\n  Early: THelper;\n\nimplementation\n\nuses UnitImpl;\n\nvar\n  Late: THelper;\n\nend.\n";
    let main = host.set_file_text("Main.pas", text);
    let analysis = host.analysis();

    let early = analysis.resolve("THelper", main, offset(text, "Early"), DeclKind::Type);
    assert_eq!(early.outcome(), ScopeOutcome::NotInScope);
    assert_eq!(
        early.diagnosis,
        Some(ScopeDiagnosis::ImplementationOnly {
            name: "THelper".into(),
            unit: UnitName::new("UnitImpl"),
        })
    );

    let late = analysis.resolve("THelper", main, offset(text, "Late"), DeclKind::Type);
    assert_eq!(late.outcome(), ScopeOutcome::Resolved);
}

#[test]
fn test_unit_not_in_uses() {
    let mut host = AnalysisHost::new();
    type_unit(&mut host, "UnitC", &[], &["TOnlyC"]);
    let text = main_using("UnitA");
    let main = host.set_file_text("Main.pas", &text);

    let result = host
        .analysis()
        .resolve("TOnlyC", main, offset(&text, "TShared"), DeclKind::Type);

    assert_eq!(result.outcome(), ScopeOutcome::NotInScope);
    let message = result.diagnosis_message().expect("diagnosis");
    assert!(message.contains("'TOnlyC'"), "{message}");
    assert!(message.contains("UnitC"), "{message}");
}

#[test]
fn test_ambiguous_out_of_scope() {
    let mut host = AnalysisHost::new();
    type_unit(&mut host, "UnitX", &[], &["TDup"]);
    type_unit(&mut host, "UnitY", &[], &["TDup"]);
    let text = main_using("UnitA");
    let main = host.set_file_text("Main.pas", &text);

    let result = host
        .analysis()
        .resolve("TDup", main, offset(&text, "TShared"), DeclKind::Type);

    assert_eq!(result.outcome(), ScopeOutcome::AmbiguousOutOfScope);
    let units: Vec<&str> = result
        .diagnosis
        .as_ref()
        .map(|d| d.units().iter().map(UnitName::as_str).collect())
        .unwrap_or_default();
    assert_eq!(units.len(), 2);
    assert!(units.contains(&"UnitX") && units.contains(&"UnitY"));
}

#[rstest]
#[case("Integer", DeclKind::Type)]
#[case("writeln", DeclKind::Routine)]
#[case("nil", DeclKind::Variable)]
fn test_builtins_short_circuit(#[case] name: &str, #[case] kind: DeclKind) {
    let mut host = AnalysisHost::new();
    let text = main_using("UnitA");
    let main = host.set_file_text("Main.pas", &text);

    let result = host.analysis().resolve(name, main, offset(&text, "V:"), kind);
    assert_eq!(result.outcome(), ScopeOutcome::Builtin);
    assert!(result.diagnosis.is_none());
}

#[test]
fn test_unknown_name_is_inconclusive() {
    let mut host = AnalysisHost::new();
    let text = main_using("UnitA");
    let main = host.set_file_text("Main.pas", &text);

    let result = host
        .analysis()
        .resolve("TNowhere", main, offset(&text, "V:"), DeclKind::Type);
    assert_eq!(result.outcome(), ScopeOutcome::Inconclusive);
    assert!(result.diagnosis.is_none());
}

#[test]
fn test_qualified_name_restricts_unit() {
    let mut host = AnalysisHost::new();
    type_unit(&mut host, "UnitA", &[], &["TShared"]);
    type_unit(&mut host, "UnitB", &[], &["TShared"]);
    let text = main_using("UnitA, UnitB");
    let main = host.set_file_text("Main.pas", &text);

    let result = host
        .analysis()
        .resolve("UnitA.TShared", main, offset(&text, "V:"), DeclKind::Type);
    assert_eq!(result.name.as_str(), "TShared");
    assert_eq!(result.resolved().map(|d| d.unit.as_str()), Some("UnitA"));
}

#[test]
fn test_scope_name_aliasing() {
    let mut host = AnalysisHost::new();
    type_unit(&mut host, "Forms", &[], &["TForm"]);
    let text = main_using("Vcl.Forms");
    let main = host.set_file_text("Main.pas", &text);

    let result = host
        .analysis()
        .resolve("TForm", main, offset(&text, "V:"), DeclKind::Type);
    assert_eq!(result.outcome(), ScopeOutcome::Resolved);
    assert_eq!(result.resolved().map(|d| d.unit.as_str()), Some("Forms"));
}

#[test]
fn test_members_are_not_bare_names() {
    let mut host = AnalysisHost::new();
    let text = "unit UnitA;\n\ninterface\n\ntype\n  TBox = class\n    Width: Integer;\n  end;\n\nimplementation\n\nend.\n";
    add_unit(
        &mut host,
        "UnitA.pas",
        text,
        vec![
            Declaration::type_decl("TBox", at(text, "TBox")),
            Declaration::variable("Width", at(text, "Width"), VariableRole::Field).in_container("TBox"),
        ],
    );
    let main_text = main_using("UnitA");
    let main = host.set_file_text("Main.pas", &main_text);

    let result = host
        .analysis()
        .resolve("Width", main, offset(&main_text, "V:"), DeclKind::Variable);
    assert_eq!(result.outcome(), ScopeOutcome::Inconclusive);
}

#[test]
fn test_local_shadows_global_inside_its_routine() {
    let mut host = AnalysisHost::new();
    let text = "unit Main;\n\ninterface\n\nimplementation\n\nvar\n  Count: Integer;\n\nprocedure Tick;\nvar\n  Count: Integer;\nbegin\n  Count := 1;\nend;\n\nbegin\n  Count := 2;\nend.\n";
    let body = range_between(text, "procedure Tick", "end;");
    let main = add_unit(
        &mut host,
        "Main.pas",
        text,
        vec![
            Declaration::variable("Count", nth(text, "Count", 0), VariableRole::Global).with_type("Integer"),
            Declaration::routine("Tick", at(text, "Tick")).with_scope(body),
            Declaration::variable("Count", nth(text, "Count", 1), VariableRole::Local)
                .with_type("Integer")
                .with_scope(body),
        ],
    );
    let analysis = host.analysis();

    let inside = analysis.resolve("Count", main, offset(text, "Count := 1"), DeclKind::Variable);
    assert_eq!(inside.resolved().map(|d| u32::from(d.offset)), Some(nth(text, "Count", 1)));

    let outside = analysis.resolve("Count", main, offset(text, "Count := 2"), DeclKind::Variable);
    assert_eq!(outside.resolved().map(|d| u32::from(d.offset)), Some(nth(text, "Count", 0)));
    assert_eq!(outside.same_file.len(), 1);
}
