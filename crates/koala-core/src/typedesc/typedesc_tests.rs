use std::collections::HashSet;

use super::*;

fn int() -> TypeDesc {
    TypeDesc::primitive(Primitive::Int)
}

fn any() -> TypeDesc {
    TypeDesc::primitive(Primitive::Any)
}

#[test]
fn primitive_tags_roundtrip() {
    for p in Primitive::ALL {
        assert_eq!(Primitive::from_tag(p.tag()), Some(p));
    }
    assert_eq!(Primitive::from_tag(b'x'), None);
}

#[test]
fn exact_equality_covers_modifiers() {
    assert_eq!(int(), int());
    assert_ne!(int(), int().with_dims(1));
    assert_ne!(int(), int().into_variadic());
    assert_ne!(
        TypeDesc::user_defined(Some("koala/lang"), "String"),
        TypeDesc::user_defined(None, "String")
    );
}

#[test]
fn exact_equality_is_hash_consistent() {
    let mut set = HashSet::new();
    set.insert(TypeDesc::user_defined(Some("koala/lang"), "String"));
    set.insert(TypeDesc::user_defined(Some("koala/lang"), "String"));
    set.insert(TypeDesc::proto(vec![int()], vec![]));
    set.insert(TypeDesc::proto(vec![int()], vec![]));
    set.insert(TypeDesc::proto(vec![], vec![int()]));

    assert_eq!(set.len(), 3);
}

#[test]
fn any_is_compatible_with_everything() {
    let targets = [
        int(),
        int().with_dims(3),
        TypeDesc::user_defined(None, "Foo"),
        TypeDesc::proto(vec![], vec![]),
    ];
    for t in &targets {
        assert!(any().is_compatible(t));
        assert!(t.is_compatible(&any()));
    }
}

#[test]
fn any_does_not_affect_exact_equality() {
    assert_ne!(any(), int());
}

#[test]
fn compatibility_requires_kind_and_dims() {
    assert!(int().is_compatible(&int()));
    assert!(!int().is_compatible(&int().with_dims(1)));
    assert!(!int().is_compatible(&TypeDesc::primitive(Primitive::Float)));
    assert!(!int().is_compatible(&TypeDesc::user_defined(None, "int")));
}

#[test]
fn user_type_path_compared_only_when_both_present() {
    let qualified = TypeDesc::user_defined(Some("koala/lang"), "String");
    let other_pkg = TypeDesc::user_defined(Some("app"), "String");
    let bare = TypeDesc::user_defined(None, "String");

    assert!(qualified.is_compatible(&bare));
    assert!(bare.is_compatible(&qualified));
    assert!(!qualified.is_compatible(&other_pkg));
    assert!(!bare.is_compatible(&TypeDesc::user_defined(None, "Str")));
}

#[test]
fn protos_are_always_compatible() {
    let a = TypeDesc::proto(vec![int()], vec![]);
    let b = TypeDesc::proto(vec![], vec![TypeDesc::primitive(Primitive::Bool)]);
    assert!(a.is_compatible(&b));
}

#[test]
fn display_forms() {
    assert_eq!(int().with_dims(2).to_string(), "[][]int");
    assert_eq!(any().into_variadic().to_string(), "...Any");
    assert_eq!(
        TypeDesc::user_defined(Some("koala/lang"), "String").to_string(),
        "koala/lang.String"
    );
    assert_eq!(TypeDesc::user_defined(None, "Foo").to_string(), "Foo");
    assert_eq!(TypeDesc::proto(vec![int()], vec![int()]).to_string(), "proto");
    assert_eq!(TypeDesc::package_path("koala/io").to_string(), "koala/io");
}

#[test]
fn list_to_string_joins() {
    let list = [int(), TypeDesc::user_defined(None, "Foo"), any().into_variadic()];
    assert_eq!(list_to_string(&list), "int, Foo, ...Any");
    assert_eq!(list_to_string(&[]), "");
}

#[test]
fn has_varargs_only_for_protos() {
    assert!(!int().into_variadic().has_varargs());
    assert!(TypeDesc::proto(vec![], vec![int(), any().into_variadic()]).has_varargs());
    assert!(!TypeDesc::proto(vec![], vec![]).has_varargs());
}

#[test]
#[should_panic(expected = "variadic descriptor cannot have array dims")]
fn variadic_with_dims_is_rejected() {
    let _ = int().with_dims(1).into_variadic();
}

#[test]
fn from_parts_rejects_conflicting_modifiers() {
    let kind = TypeKind::Primitive(Primitive::Int);

    assert_eq!(TypeDesc::from_parts(kind.clone(), 2, true), None);
    assert_eq!(TypeDesc::from_parts(kind.clone(), 2, false), Some(int().with_dims(2)));
    assert_eq!(TypeDesc::from_parts(kind, 0, true), Some(int().into_variadic()));
}

#[test]
fn accessors_expose_modifiers() {
    let desc = TypeDesc::user_defined(None, "Foo").with_dims(2);

    assert_eq!(desc.dims(), 2);
    assert!(!desc.is_variadic());
    assert!(matches!(desc.kind(), TypeKind::UserDefined { name, .. } if name == "Foo"));
    assert!(any().into_variadic().is_variadic());
}
