use super::sig::{SigArgs, render};

fn sig(signature: &str, list: bool) -> String {
    let args = SigArgs {
        signature: signature.to_owned(),
        list,
    };
    match render(&args) {
        Ok(out) => out,
        Err(err) => format!("error: {err}"),
    }
}

#[test]
fn single_descriptors() {
    let res = [
        sig("[i", false),
        sig("Okoala/lang.String;", false),
        sig("Pi...A:z;", false),
        sig("Kkoala/io;", false),
    ]
    .join("\n");

    insta::assert_snapshot!(res, @r"
    []int
    koala/lang.String
    proto (int, ...Any) -> (bool)
    koala/io
    ");
}

#[test]
fn descriptor_list() {
    insta::assert_snapshot!(sig("is[z", true), @r"
    int
    string
    []bool
    ");
}

#[test]
fn malformed_signature() {
    assert_eq!(
        sig("q", false),
        r#"error: malformed signature "q": unknown type tag 'q' at offset 0"#
    );
    assert_eq!(
        sig("...ii", true),
        r#"error: malformed signature "...ii": variadic marker at offset 0 is not on the last element"#
    );
}
