//! Go-to-definition across units.

use unitscope::base::{FileId, LineCol};
use unitscope::hir::{DeclKind, Declaration, VariableRole};
use unitscope::ide::{AnalysisHost, GotoResult};

use crate::helpers::source_fixtures::*;

const LOGGING: &str = "unit Logging;

interface

procedure Log(const Msg: string); overload;
procedure Log(const Msg: string; Level: Integer); overload;

implementation

end.
";

const THINGS: &str = "unit Things;

interface

type
  TThing = class
    Size: Integer;
  end;

implementation

end.
";

const MAIN: &str = "unit Main;

interface

uses Logging, Things;

implementation

procedure Run;
var
  Local: TThing;
begin
  Log('a');
  Local.Size := 1;
end;

end.
";

struct Project {
    host: AnalysisHost,
    things: FileId,
    main: FileId,
}

fn project() -> Project {
    let mut host = AnalysisHost::new();
    add_unit(
        &mut host,
        "Logging.pas",
        LOGGING,
        vec![
            Declaration::routine("Log", nth(LOGGING, "Log(", 0)).with_param("Msg", Some("string")),
            Declaration::routine("Log", nth(LOGGING, "Log(", 1))
                .with_param("Msg", Some("string"))
                .with_param("Level", Some("Integer")),
        ],
    );
    let things = add_unit(
        &mut host,
        "Things.pas",
        THINGS,
        vec![
            Declaration::type_decl("TThing", at(THINGS, "TThing")),
            Declaration::variable("Size", at(THINGS, "Size"), VariableRole::Field)
                .in_container("TThing")
                .with_type("Integer"),
        ],
    );
    let body = range_between(MAIN, "procedure Run", "end;");
    let main = add_unit(
        &mut host,
        "Main.pas",
        MAIN,
        vec![
            Declaration::routine("Run", at(MAIN, "Run")).with_scope(body),
            Declaration::variable("Local", at(MAIN, "Local:"), VariableRole::Local)
                .with_type("TThing")
                .with_scope(body),
        ],
    );
    Project { host, things, main }
}

fn goto(project: &Project, needle: &str) -> GotoResult {
    let LineCol { line, col } = position(MAIN, needle);
    project.host.analysis().goto_definition(project.main, line, col)
}

#[test]
fn test_goto_type_in_other_unit() {
    let project = project();
    let result = goto(&project, "TThing;");

    assert_eq!(result.targets.len(), 1);
    let target = &result.targets[0];
    assert_eq!(target.file, project.things);
    assert_eq!(target.kind, DeclKind::Type);
    assert_eq!(&*target.name, "TThing");
    assert_eq!((target.start_line, target.start_col), (5, 2));
    assert_eq!(target.end_col, 2 + "TThing".len() as u32);
}

#[test]
fn test_goto_member_through_local() {
    let project = project();
    let result = goto(&project, "Size := 1");

    assert_eq!(result.targets.len(), 1);
    assert_eq!(result.targets[0].file, project.things);
    assert_eq!(&*result.targets[0].name, "Size");
    assert_eq!(result.targets[0].start_line, 6);
}

#[test]
fn test_goto_local_variable() {
    let project = project();
    let result = goto(&project, "Local.Size");

    assert_eq!(result.targets.len(), 1);
    assert_eq!(result.targets[0].file, project.main);
    assert_eq!(result.targets[0].kind, DeclKind::Variable);
}

#[test]
fn test_goto_overloaded_routine_lists_all() {
    let project = project();
    let result = goto(&project, "Log('a')");

    assert_eq!(result.targets.len(), 2);
    let lines: Vec<u32> = result.targets.iter().map(|t| t.start_line).collect();
    assert_eq!(lines, vec![4, 5]);
}

#[test]
fn test_goto_nowhere() {
    let project = project();
    assert!(project.host.analysis().goto_definition(project.main, 1, 0).is_empty());
    assert!(project.host.analysis().goto_definition(project.main, 500, 0).is_empty());
    assert!(goto(&project, "'a'").is_empty());
}
