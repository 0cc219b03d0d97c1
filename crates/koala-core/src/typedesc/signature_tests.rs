use super::*;

fn render(sigs: &[&str]) -> String {
    sigs.iter()
        .map(|sig| match TypeDesc::parse(sig) {
            Ok(desc) => format!("{sig} => {desc}"),
            Err(err) => format!("{sig} => error: {err}"),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn parse_primitives() {
    let res = render(&["b", "c", "i", "f", "z", "s", "A"]);

    insta::assert_snapshot!(res, @r"
    b => byte
    c => char
    i => int
    f => float
    z => bool
    s => string
    A => Any
    ");
}

#[test]
fn parse_modifiers_and_user_types() {
    let res = render(&[
        "[i",
        "[[s",
        "...A",
        "Okoala/lang.String;",
        "OFoo;",
        "[Oio.File;",
        "Oa.b.C;",
        "Kkoala/io;",
        "Pi:z;",
    ]);

    insta::assert_snapshot!(res, @r"
    [i => []int
    [[s => [][]string
    ...A => ...Any
    Okoala/lang.String; => koala/lang.String
    OFoo; => Foo
    [Oio.File; => []io.File
    Oa.b.C; => a.b.C
    Kkoala/io; => koala/io
    Pi:z; => proto
    ");
}

#[test]
fn parse_errors() {
    let res = render(&[
        "x",
        "Okoala/lang.String",
        "O;",
        "O.Foo;",
        "...[i",
        "..i",
        "ii",
        "Pi",
        "[",
    ]);

    insta::assert_snapshot!(res, @r"
    x => error: unknown type tag 'x' at offset 0
    Okoala/lang.String => error: unterminated user type starting at offset 0
    O; => error: empty name in type starting at offset 0
    O.Foo; => error: empty name in type starting at offset 0
    ...[i => error: variadic marker at offset 0 combined with array dims
    ..i => error: unknown type tag '.' at offset 0
    ii => error: trailing input at offset 1
    Pi => error: unterminated prototype starting at offset 2
    [ => error: unterminated descriptor starting at offset 1
    ");
}

#[test]
fn parse_empty_is_an_error() {
    assert_eq!(TypeDesc::parse(""), Err(SignatureError::Empty));
}

#[test]
fn user_type_splits_at_first_dot() {
    let desc = TypeDesc::parse("Oa.b.C;").unwrap();
    assert_eq!(
        desc.kind,
        TypeKind::UserDefined {
            path: Some("a".into()),
            name: "b.C".into()
        }
    );
}

#[test]
fn parse_list_mixed() {
    let list = TypeDesc::parse_list("i[sOkoala/lang.Tuple;...A").unwrap();

    assert_eq!(list.len(), 4);
    assert_eq!(list[0], TypeDesc::primitive(Primitive::Int));
    assert_eq!(
        list[1],
        TypeDesc::primitive(Primitive::String).with_dims(1)
    );
    assert_eq!(
        list[2],
        TypeDesc::user_defined(Some("koala/lang"), "Tuple")
    );
    assert_eq!(list[3], TypeDesc::primitive(Primitive::Any).into_variadic());
}

#[test]
fn parse_list_empty_is_empty() {
    assert_eq!(TypeDesc::parse_list(""), Ok(vec![]));
}

#[test]
fn variadic_must_be_last() {
    assert_eq!(
        TypeDesc::parse_list("...ii"),
        Err(SignatureError::MisplacedVariadic { offset: 0 })
    );
    assert_eq!(
        TypeDesc::parse_list("i...s...z"),
        Err(SignatureError::MisplacedVariadic { offset: 1 })
    );
}

#[test]
fn parse_proto() {
    let desc = TypeDesc::parse("PiOkoala/lang.String;...A:zs;").unwrap();

    let TypeKind::Proto { returns, params } = &desc.kind else {
        panic!("expected proto, got {desc:?}");
    };
    assert_eq!(
        params,
        &vec![
            TypeDesc::primitive(Primitive::Int),
            TypeDesc::user_defined(Some("koala/lang"), "String"),
            TypeDesc::primitive(Primitive::Any).into_variadic(),
        ]
    );
    assert_eq!(
        returns,
        &vec![
            TypeDesc::primitive(Primitive::Bool),
            TypeDesc::primitive(Primitive::String),
        ]
    );
    assert!(desc.has_varargs());
}

#[test]
fn parse_nested_proto() {
    let desc = TypeDesc::parse("PPi:z;:;").unwrap();

    let TypeKind::Proto { returns, params } = &desc.kind else {
        panic!("expected proto");
    };
    assert!(returns.is_empty());
    assert_eq!(params.len(), 1);
    assert_eq!(
        params[0],
        TypeDesc::proto(
            vec![TypeDesc::primitive(Primitive::Bool)],
            vec![TypeDesc::primitive(Primitive::Int)],
        )
    );
}

#[test]
fn proto_variadic_must_be_last() {
    assert_eq!(
        TypeDesc::parse("P...ii:;"),
        Err(SignatureError::MisplacedVariadic { offset: 1 })
    );
}

#[test]
fn signature_roundtrip_all_shapes() {
    let shapes = [
        "i",
        "[[f",
        "...s",
        "OFoo;",
        "[Okoala/lang.String;",
        "Kkoala/io;",
        "P:;",
        "Pi...A:z;",
        "[PPs:i;:Oa.B;;",
    ];

    for sig in shapes {
        let desc = TypeDesc::parse(sig).unwrap();
        assert_eq!(desc.signature(), sig);

        let again = TypeDesc::parse(&desc.signature()).unwrap();
        assert_eq!(again, desc);
        assert_eq!(again.to_string(), desc.to_string());
    }
}

#[test]
fn from_signature_accepts_valid_input() {
    assert_eq!(
        TypeDesc::from_signature("[z"),
        TypeDesc::primitive(Primitive::Bool).with_dims(1)
    );
    assert_eq!(TypeDesc::list_from_signature("").len(), 0);
}

#[test]
#[should_panic(expected = "malformed signature")]
fn from_signature_is_fatal_on_malformed_input() {
    TypeDesc::from_signature("q");
}

#[test]
fn proto_from_signatures_splits_returns_and_params() {
    let desc = TypeDesc::proto_from_signatures("i", "sz");
    assert_eq!(desc.signature(), "Psz:i;");
}

#[test]
fn array_nesting_past_u16_is_an_error() {
    let sig = format!("{}i", "[".repeat(u16::MAX as usize + 1));

    assert_eq!(TypeDesc::parse(&sig), Err(SignatureError::TooManyDims { offset: 0 }));

    let deepest = format!("{}i", "[".repeat(u16::MAX as usize));
    assert_eq!(TypeDesc::parse(&deepest).map(|d| d.dims()), Ok(u16::MAX));
}
