//! Scope and inheritance diagnostics for a whole file.

use unitscope::FileId;
use unitscope::hir::{Declaration, Severity, VariableRole, codes};
use unitscope::ide::AnalysisHost;

use crate::helpers::source_fixtures::*;

const MAIN: &str = "unit Main;

interface

uses UnitA;

type
  TWidget = class(TGadget)
    Part: TOnlyC;
    Early: TImplOnly;
  end;

implementation

uses UnitImpl;

var
  Late: TImplOnly;
  Twice: TDup;

end.
";

fn project() -> (AnalysisHost, FileId, FileId) {
    let mut host = AnalysisHost::new();
    type_unit(&mut host, "UnitA", &[], &["TGadget"]);
    let unit_c = type_unit(&mut host, "UnitC", &[], &["TOnlyC"]);
    type_unit(&mut host, "UnitImpl", &[], &["TImplOnly"]);
    type_unit(&mut host, "UnitX", &[], &["TDup"]);
    type_unit(&mut host, "UnitY", &[], &["TDup"]);
    let main = add_unit(
        &mut host,
        "Main.pas",
        MAIN,
        vec![
            Declaration::type_decl("TWidget", at(MAIN, "TWidget")).with_superclass("TGadget"),
            Declaration::variable("Part", at(MAIN, "Part"), VariableRole::Field)
                .in_container("TWidget")
                .with_type("TOnlyC"),
            Declaration::variable("Early", at(MAIN, "Early"), VariableRole::Field)
                .in_container("TWidget")
                .with_type("TImplOnly"),
            Declaration::variable("Late", at(MAIN, "Late"), VariableRole::Global).with_type("TImplOnly"),
            Declaration::variable("Twice", at(MAIN, "Twice"), VariableRole::Global).with_type("TDup"),
        ],
    );
    (host, main, unit_c)
}

#[test]
fn test_scope_error_codes() {
    let (host, main, _) = project();
    let diagnostics = host.analysis().check_file(main);

    let mut found: Vec<&str> = diagnostics.iter().filter_map(|d| d.code.as_deref()).collect();
    found.sort_unstable();
    assert_eq!(
        found,
        vec![codes::NOT_IN_USES, codes::AMBIGUOUS_OUT_OF_SCOPE, codes::IMPLEMENTATION_ONLY]
    );
    assert!(diagnostics.iter().all(|d| d.severity == Severity::Error));
}

#[test]
fn test_not_in_uses_points_at_declaration() {
    let (host, main, unit_c) = project();
    let diagnostics = host.analysis().check_file(main);
    let diag = diagnostics
        .iter()
        .find(|d| d.code.as_deref() == Some(codes::NOT_IN_USES))
        .expect("E0001");

    assert_eq!((diag.start_line, diag.start_col), (8, 4));
    assert_eq!(diag.end_col, 4 + "Part".len() as u32);
    assert!(diag.message.contains("UnitC"));
    assert_eq!(diag.related.len(), 1);
    assert_eq!(diag.related[0].file, unit_c);
    assert_eq!((diag.related[0].line, diag.related[0].col), (5, 2));
}

#[test]
fn test_ambiguous_lists_every_unit() {
    let (host, main, _) = project();
    let diagnostics = host.analysis().check_file(main);
    let diag = diagnostics
        .iter()
        .find(|d| d.code.as_deref() == Some(codes::AMBIGUOUS_OUT_OF_SCOPE))
        .expect("E0002");

    assert!(diag.message.contains("UnitX") && diag.message.contains("UnitY"));
    assert_eq!(diag.related.len(), 2);
}

#[test]
fn test_inheritance_cycle_warning() {
    let mut host = AnalysisHost::new();
    let text = "unit Loop;\n\ninterface\n\ntype\n  TX = class(TY)\n  end;\n  TY = class(TX)\n  end;\n\nimplementation\n\nend.\n";
    let file = add_unit(
        &mut host,
        "Loop.pas",
        text,
        vec![
            Declaration::type_decl("TX", at(text, "TX =")).with_superclass("TY"),
            Declaration::type_decl("TY", at(text, "TY =")).with_superclass("TX"),
        ],
    );

    let diagnostics = host.analysis().check_file(file);
    assert_eq!(diagnostics.len(), 2);
    assert!(diagnostics.iter().all(|d| {
        d.severity == Severity::Warning && d.code.as_deref() == Some(codes::INHERITANCE_CYCLE)
    }));
}

#[test]
fn test_clean_file_has_no_diagnostics() {
    let mut host = AnalysisHost::new();
    type_unit(&mut host, "UnitA", &[], &["TGadget"]);
    let text = "unit Clean;\n\ninterface\n\nuses UnitA;\n\nvar\n  G: TGadget;\n  N: Integer;\n  M: TUndeclared;\n\nimplementation\n\nend.\n";
    let file = add_unit(
        &mut host,
        "Clean.pas",
        text,
        vec![
            Declaration::variable("G", at(text, "G:"), VariableRole::Global).with_type("TGadget"),
            Declaration::variable("N", at(text, "N:"), VariableRole::Global).with_type("Integer"),
            Declaration::variable("M", at(text, "M:"), VariableRole::Global).with_type("TUndeclared"),
        ],
    );

    assert!(host.analysis().check_file(file).is_empty());
}
