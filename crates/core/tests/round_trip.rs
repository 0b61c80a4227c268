//! Round-trip law for the spec grammar: rendering a parsed tree and
//! parsing the result again yields a structurally equal tree.

use proptest::prelude::*;
use unitspec_core::{parse, render, Mnemonic, Urn, Variable};

fn caller() -> Urn {
    "urn:test:1".parse().unwrap()
}

fn owner() -> Urn {
    "urn:github:77".parse().unwrap()
}

/// Leaves that the parser can produce.
fn leaf_strategy() -> impl Strategy<Value = Variable> {
    prop_oneof![
        any::<i64>().prop_map(Variable::long),
        "[ -~\n\t]{0,12}".prop_map(Variable::text),
        Just(Variable::meta(Mnemonic::Work)),
        Just(Variable::meta(Mnemonic::Wallet)),
        (0u32..5, "[a-z' \\\\]{0,6}").prop_map(|(i, v)| Variable::alter(i, v)),
    ]
}

fn tree_strategy() -> impl Strategy<Value = Variable> {
    leaf_strategy().prop_recursive(4, 48, 4, |inner| {
        prop_oneof![
            (
                "[a-z]{1,5}(\\.[A-Z][a-zA-Z0-9]{0,5}){0,2}",
                prop::collection::vec(inner.clone(), 0..4)
            )
                .prop_map(|(name, children)| Variable::composite(name, children)),
            ("[a-z][a-z0-9-]{0,8}", prop::collection::vec(inner, 0..3))
                .prop_map(|(name, overrides)| Variable::foreign(caller(), owner(), name, overrides)),
        ]
    })
}

proptest! {
    /// parse(render(t)) == t for every tree the grammar can express
    #[test]
    fn render_then_parse_is_identity(tree in tree_strategy()) {
        let text = render(&tree);
        let reparsed = parse(&caller(), &text).expect("rendered text should parse");
        prop_assert_eq!(reparsed, tree);
    }

    /// Rendering is a fixed point after one parse
    #[test]
    fn canonical_text_is_stable(tree in tree_strategy()) {
        let once = render(&tree);
        let twice = render(&parse(&caller(), &once).unwrap());
        prop_assert_eq!(once, twice);
    }
}

#[test]
fn hand_written_spec_round_trips() {
    let src = r#"com.rultor.ci.OnCommit(
        urn:github:77:git-repo(#arg(0,'git@github.com:x/y.git')),
        com.rultor.shell.bash.Concat("echo \"hi\"", 120L),
        ${work},
        ${wallet}
    )"#;
    let tree = parse(&caller(), src).unwrap();
    assert_eq!(parse(&caller(), &render(&tree)).unwrap(), tree);
}

#[test]
fn tree_serializes_to_tagged_json() {
    let tree = parse(&caller(), "a.B(1L, urn:github:77:x(), ${work})").unwrap();
    let json = serde_json::to_value(&tree).unwrap();
    assert_eq!(json["kind"], "composite");
    assert_eq!(json["type_name"], "a.B");
    assert_eq!(json["children"][0]["literal"]["type"], "long");
    assert_eq!(json["children"][1]["kind"], "ref_foreign");
    assert_eq!(json["children"][1]["owner"], "urn:github:77");
    assert_eq!(json["children"][1]["caller"], "urn:test:1");
    assert_eq!(json["children"][2]["mnemonic"], "work");
}
