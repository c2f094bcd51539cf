//! Uses clauses and unit priority through the host.

use rstest::rstest;
use unitscope::base::{UnitName, normalize_unit_name};
use unitscope::hir::{OutlineSection, SectionKind, UnitKind, UnitOutline, UnitPriority};
use unitscope::ide::AnalysisHost;

use crate::helpers::source_fixtures::*;

const MAIN: &str = "unit Main;

interface

uses
  System.SysUtils, { comment }
  UnitA,
  UnitB;

type
  TMain = class
  end;

implementation

uses UnitC;

end.
";

#[rstest]
#[case("UnitB", "TMain", UnitPriority::Listed(2))]
#[case("SysUtils", "TMain", UnitPriority::Listed(0))]
#[case("UnitC", "TMain", UnitPriority::Unavailable)]
#[case("UnitC", "end.", UnitPriority::Listed(3))]
#[case("System", "TMain", UnitPriority::ScopeName)]
#[case("Nowhere", "end.", UnitPriority::Unavailable)]
fn test_unit_priority(#[case] unit: &str, #[case] at_needle: &str, #[case] expected: UnitPriority) {
    let mut host = AnalysisHost::new();
    let main = host.set_file_text("Main.pas", MAIN);
    let priority = host.analysis().unit_priority(main, unit, offset(MAIN, at_needle));
    assert_eq!(priority, expected);
}

#[test]
fn test_priority_values() {
    assert_eq!(UnitPriority::Unavailable.value(), -2);
    assert_eq!(UnitPriority::ScopeName.value(), -1);
    assert_eq!(UnitPriority::Listed(3).value(), 3);
    assert!(UnitPriority::Listed(0) > UnitPriority::ScopeName);
    assert!(UnitPriority::ScopeName > UnitPriority::Unavailable);
}

#[test]
fn test_available_units_by_section() {
    let mut host = AnalysisHost::new();
    let main = host.set_file_text("Main.pas", MAIN);
    let analysis = host.analysis();

    let interface = analysis.available_units(main, offset(MAIN, "TMain"));
    assert_eq!(
        interface,
        vec![UnitName::new("System.SysUtils"), UnitName::new("UnitA"), UnitName::new("UnitB")]
    );
    let implementation = analysis.available_units(main, offset(MAIN, "end."));
    assert_eq!(implementation.len(), 4);
    assert_eq!(implementation[3], UnitName::new("UnitC"));

    let clause = analysis.uses_clause(main);
    assert_eq!(clause.unit_kind, UnitKind::Unit);
    assert_eq!(clause.unit_name, Some(UnitName::new("Main")));
}

#[test]
fn test_outline_takes_precedence_over_text() {
    let mut host = AnalysisHost::new();
    let main = host.set_file_text("Main.pas", MAIN);
    host.set_outline(
        main,
        UnitOutline {
            unit_name: Some(UnitName::new("Main")),
            kind: UnitKind::Unit,
            sections: vec![
                OutlineSection {
                    kind: SectionKind::Interface,
                    start: offset(MAIN, "interface"),
                    uses: vec![UnitName::new("Other")],
                },
                OutlineSection {
                    kind: SectionKind::Implementation,
                    start: offset(MAIN, "implementation"),
                    uses: Vec::new(),
                },
            ],
        },
    );

    let units = host.analysis().available_units(main, offset(MAIN, "TMain"));
    assert_eq!(units, vec![UnitName::new("Other")]);
}

#[test]
fn test_edit_invalidates_uses_clause() {
    let mut host = AnalysisHost::new();
    let main = host.set_file_text("Main.pas", MAIN);
    let before = host.analysis().uses_clause(main);
    assert_eq!(before.interface_uses.len(), 3);

    let edited = MAIN.replace("  UnitA,\n", "");
    host.set_file_text("Main.pas", &edited);
    let after = host.analysis().uses_clause(main);
    assert_eq!(after.interface_uses.len(), 2);
}

#[rstest]
#[case("Foo")]
#[case("Foo.pas")]
#[case("  Vcl.Forms.pas ")]
#[case("Foo.pas.dcu")]
#[case("Foo.PAS")]
#[case("")]
fn test_normalization_is_idempotent(#[case] raw: &str) {
    let once = normalize_unit_name(raw);
    assert_eq!(normalize_unit_name(once), once);
    assert_eq!(UnitName::new(raw), UnitName::new(once));
}
