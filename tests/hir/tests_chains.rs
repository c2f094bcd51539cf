//! Member chains resolved through scope, closure and inheritance.

use unitscope::FileId;
use unitscope::hir::{DeclKind, Declaration, MemberChainResolver, VariableRole};
use unitscope::ide::AnalysisHost;

use crate::helpers::source_fixtures::*;

fn resolved_units(host: &AnalysisHost, file: FileId, text: &str, needle: &str) -> Vec<Option<String>> {
    let result = host
        .analysis()
        .resolve_chain(file, offset(text, needle))
        .expect("identifier at offset");
    result
        .resolved
        .iter()
        .map(|d| d.as_ref().map(|d| format!("{}.{}", d.unit, d.name)))
        .collect()
}

fn some(items: &[&str]) -> Vec<Option<String>> {
    items.iter().map(|s| Some(s.to_string())).collect()
}

#[test]
fn test_field_found_in_ancestor_unit() {
    let h = &*HIERARCHY;
    assert_eq!(
        resolved_units(&h.host, h.main, MAIN_SRC, "FValue := 1"),
        some(&["Main.Obj", "Base.FValue"])
    );
}

#[test]
fn test_repeated_member_segments() {
    let h = &*HIERARCHY;
    assert_eq!(
        resolved_units(&h.host, h.main, MAIN_SRC, "FValue := 2"),
        some(&["Main.Obj", "Shapes.Next", "Shapes.Next", "Base.FValue"])
    );
}

#[test]
fn test_private_member_of_other_file_is_hidden() {
    let h = &*HIERARCHY;
    let units = resolved_units(&h.host, h.main, MAIN_SRC, "FSecret := 3");
    assert_eq!(units, vec![Some("Main.Obj".to_string()), None]);
}

#[test]
fn test_failed_head_leaves_everything_unresolved() {
    let h = &*HIERARCHY;
    let result = h
        .host
        .analysis()
        .resolve_chain(h.main, offset(MAIN_SRC, "Bar := 4"))
        .expect("chain");
    assert_eq!(result.chain.names(), vec!["Missing", "Foo", "Bar"]);
    assert_eq!(result.chain.focus, 2);
    assert!(result.resolved.iter().all(Option::is_none));
    assert!(!result.fully_resolved());
}

#[test]
fn test_chain_after_call_resolves_nothing() {
    let h = &*HIERARCHY;
    let result = h
        .host
        .analysis()
        .resolve_chain(h.main, offset(MAIN_SRC, "Items"))
        .expect("chain");
    assert!(result.chain.detached);
    assert_eq!(result.resolved, vec![None]);
}

#[test]
fn test_routine_segment_ends_chain() {
    let h = &*HIERARCHY;
    let units = resolved_units(&h.host, h.main, MAIN_SRC, "Length := 6");
    assert_eq!(
        units,
        vec![Some("Main.Obj".to_string()), Some("Base.Describe".to_string()), None]
    );
}

#[test]
fn test_members_with_inherited_nearest_first() {
    let h = &*HIERARCHY;
    let analysis = h.host.analysis();
    let derived = analysis.find_declarations("TDerived", DeclKind::Type).remove(0);
    let members = MemberChainResolver::new(analysis.ctx()).members_with_inherited(&derived);
    let names: Vec<&str> = members.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["Next", "FSecret", "FValue", "Describe"]);
}

#[test]
fn test_inline_variable_type_from_constructor() {
    let mut host = AnalysisHost::new();
    let lists = "unit Lists;\n\ninterface\n\ntype\n  TList = class\n    Count: Integer;\n    constructor Create;\n  end;\n\nfunction NewList: TList;\n\nimplementation\n\nend.\n";
    add_unit(
        &mut host,
        "Lists.pas",
        lists,
        vec![
            Declaration::type_decl("TList", at(lists, "TList")),
            Declaration::variable("Count", at(lists, "Count"), VariableRole::Property).in_container("TList"),
            Declaration::routine("Create", at(lists, "Create"))
                .in_container("TList")
                .as_constructor(),
            Declaration::routine("NewList", at(lists, "NewList")).with_return_type("TList"),
        ],
    );

    let main = "unit Main;\n\ninterface\n\nimplementation\n\nuses Lists;\n\nprocedure Run;\nbegin\n  var A := TList.Create;\n  var B := NewList;\n  A.Count := 1;\n  B.Count := 2;\nend;\n\nend.\n";
    let body = range_between(main, "procedure Run", "end;");
    let file = add_unit(
        &mut host,
        "Main.pas",
        main,
        vec![
            Declaration::routine("Run", at(main, "Run")).with_scope(body),
            Declaration::variable("A", at(main, "A :="), VariableRole::Local)
                .with_scope(body)
                .with_initializer_call("TList.Create"),
            Declaration::variable("B", at(main, "B :="), VariableRole::Local)
                .with_scope(body)
                .with_initializer_call("NewList"),
        ],
    );

    assert_eq!(
        resolved_units(&host, file, main, "Count := 1"),
        some(&["Main.A", "Lists.Count"])
    );
    assert_eq!(
        resolved_units(&host, file, main, "Count := 2"),
        some(&["Main.B", "Lists.Count"])
    );
}

#[test]
fn test_inline_variable_type_from_enclosing_method() {
    let mut host = AnalysisHost::new();
    let text = "unit Shop;\n\ninterface\n\ntype\n  TItems = class\n    Total: Integer;\n  end;\n\n  TShop = class\n    function Items: TItems;\n    procedure Fill;\n  end;\n\nimplementation\n\nprocedure TShop.Fill;\nbegin\n  var L := Items;\n  L.Total := 3;\nend;\n\nend.\n";
    let body = range_between(text, "procedure TShop.Fill", "end;");
    let file = add_unit(
        &mut host,
        "Shop.pas",
        text,
        vec![
            Declaration::type_decl("TItems", at(text, "TItems")),
            Declaration::variable("Total", at(text, "Total"), VariableRole::Field).in_container("TItems"),
            Declaration::type_decl("TShop", at(text, "TShop")),
            Declaration::routine("Items", at(text, "Items:"))
                .in_container("TShop")
                .with_return_type("TItems"),
            Declaration::routine("Fill", at(text, "Fill"))
                .in_container("TShop")
                .with_scope(body),
            Declaration::variable("L", at(text, "L :="), VariableRole::Local)
                .with_scope(body)
                .with_initializer_call("Items"),
        ],
    );

    assert_eq!(
        resolved_units(&host, file, text, "Total := 3"),
        some(&["Shop.L", "Shop.Total"])
    );
}

#[test]
fn test_self_and_implicit_members() {
    let mut host = AnalysisHost::new();
    let text = "unit Widgets;\n\ninterface\n\ntype\n  TWidget = class\n    Size: Integer;\n    procedure Grow;\n  end;\n\nimplementation\n\nprocedure TWidget.Grow;\nbegin\n  Self.Size := 1;\n  Size := 2;\nend;\n\nend.\n";
    let body = range_between(text, "procedure TWidget.Grow", "end;");
    let file = add_unit(
        &mut host,
        "Widgets.pas",
        text,
        vec![
            Declaration::type_decl("TWidget", at(text, "TWidget")),
            Declaration::variable("Size", at(text, "Size"), VariableRole::Field).in_container("TWidget"),
            Declaration::routine("Grow", at(text, "Grow"))
                .in_container("TWidget")
                .with_scope(body),
        ],
    );

    assert_eq!(
        resolved_units(&host, file, text, "Size := 1"),
        some(&["Widgets.TWidget", "Widgets.Size"])
    );
    assert_eq!(
        resolved_units(&host, file, text, "Size := 2"),
        some(&["Widgets.Size"])
    );
}

#[test]
fn test_attached_reference_overrides_lookup() {
    let mut host = AnalysisHost::new();
    type_unit(&mut host, "UnitA", &[], &["TThing"]);
    let other = type_unit(&mut host, "UnitB", &[], &["TThing"]);
    let text = "unit Main;\n\ninterface\n\nuses UnitA;\n\nimplementation\n\nbegin\n  TThing.Free;\nend.\n";
    let main = host.set_file_text("Main.pas", text);

    let target = host.declarations().declarations_in_file(other)[0].id;
    host.attach_reference(main, offset(text, "TThing.Free"), target);

    let units = resolved_units(&host, main, text, "TThing.Free");
    assert_eq!(units[0].as_deref(), Some("UnitB.TThing"));
    assert_eq!(units[1], None);
}
