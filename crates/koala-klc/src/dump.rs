//! Human-readable image dump for debugging.
//!
//! Sections appear in file order: `[header]`, `[package]`, `[map]`, then one
//! section per non-empty category. Records are listed as `#N` followed by
//! their content with every index resolved.

use std::fmt::Write as _;

use koala_core::typedesc::list_to_string;
use koala_core::{Colors, Index};

use crate::format::{
    Category, ClassItem, CodeItem, ConstItem, FieldItem, FuncItem, IMethItem, LocVarItem,
    MethodItem, ProtoItem, StringItem, TraitItem, TypeItem, TypeListItem, TypePayload, VarItem,
};
use crate::image::Image;

/// Dump every section of `image`.
pub fn dump(image: &Image, colors: Colors) -> String {
    render(image, colors, true)
}

/// Dump without the `[header]` block.
pub fn dump_without_header(image: &Image, colors: Colors) -> String {
    render(image, colors, false)
}

fn render(image: &Image, colors: Colors, with_header: bool) -> String {
    let mut out = String::new();
    let ctx = DumpContext { image, colors };

    if with_header {
        dump_header(&mut out, &ctx);
    }
    dump_package(&mut out, &ctx);
    dump_map(&mut out, &ctx);

    for category in Category::payload() {
        if image.count(category) == 0 {
            continue;
        }
        section(&mut out, &ctx, category.name());
        let w = width_for_count(image.count(category));
        for i in 0..image.count(category) {
            let line = ctx.record_line(category, Index::from_raw(i as u32));
            writeln!(out, "{} {line}", colors.paint(colors.index, format_args!("#{i:0w$}"))).unwrap();
        }
        out.push('\n');
    }

    // Single trailing newline.
    while out.ends_with("\n\n") {
        out.pop();
    }
    out
}

/// Digits needed to print the largest index of a table with `count` records.
fn width_for_count(count: usize) -> usize {
    count.saturating_sub(1).max(1).ilog10() as usize + 1
}

fn section(out: &mut String, ctx: &DumpContext, name: &str) {
    let c = &ctx.colors;
    writeln!(out, "{}", c.paint(c.section, format_args!("[{name}]"))).unwrap();
}

fn dump_header(out: &mut String, ctx: &DumpContext) {
    let h = ctx.image.header();
    section(out, ctx, "header");
    writeln!(out, "magic = {}", String::from_utf8_lossy(&h.magic[..3])).unwrap();
    writeln!(out, "version = {}.{}.{}", h.major(), h.minor(), h.build()).unwrap();
    writeln!(out, "file_size = {}", h.file_size).unwrap();
    writeln!(out, "header_size = {}", h.header_size).unwrap();
    writeln!(out, "endian_tag = {:#x}", h.endian_tag).unwrap();
    writeln!(out, "map_offset = {:#x}", h.map_offset).unwrap();
    writeln!(out, "map_size = {}", h.map_size).unwrap();
    writeln!(out, "pkg_size = {}", h.pkg_size).unwrap();
    out.push('\n');
}

fn dump_package(out: &mut String, ctx: &DumpContext) {
    section(out, ctx, "package");
    writeln!(out, "{}", ctx.image.package()).unwrap();
    out.push('\n');
}

fn dump_map(out: &mut String, ctx: &DumpContext) {
    let c = &ctx.colors;
    let directory = ctx.image.directory();
    if directory.is_empty() {
        return;
    }

    section(out, ctx, "map");
    let w = width_for_count(directory.len());
    for (i, entry) in directory.iter().enumerate() {
        writeln!(
            out,
            "{} {:<8} offset={:#x} count={}",
            c.paint(c.index, format_args!("#{i:0w$}")),
            entry.category.name(),
            entry.offset,
            entry.count
        )
        .unwrap();
    }
    out.push('\n');
}

struct DumpContext<'a> {
    image: &'a Image,
    colors: Colors,
}

impl DumpContext<'_> {
    fn unresolved(&self, what: &str, index: Index) -> String {
        let c = &self.colors;
        c.paint(c.unresolved, format_args!("<{what} #{index}>"))
    }

    fn string(&self, index: Index) -> String {
        match self.image.string(index) {
            Some(s) => s.to_owned(),
            None => self.unresolved("string", index),
        }
    }

    fn quoted(&self, index: Index) -> String {
        let c = &self.colors;
        match self.image.string(index) {
            Some(s) => c.paint(c.literal, format_args!("{s:?}")),
            None => self.unresolved("string", index),
        }
    }

    fn ty(&self, index: Index) -> String {
        match self.image.resolve_type(index) {
            Some(desc) => desc.to_string(),
            None => self.unresolved("type", index),
        }
    }

    fn type_list(&self, index: Option<Index>) -> String {
        let Some(index) = index else {
            return String::new();
        };
        match self.image.resolve_type_list(index) {
            Some(list) => list_to_string(&list),
            None => self.unresolved("typelist", index),
        }
    }

    /// `(params) -> (returns)`
    fn proto(&self, index: Index) -> String {
        match self.image.get::<ProtoItem>(index) {
            Some(p) => format!(
                "({}) -> ({})",
                self.type_list(p.params),
                self.type_list(p.returns)
            ),
            None => self.unresolved("proto", index),
        }
    }

    fn record_line(&self, category: Category, index: Index) -> String {
        let image = self.image;
        let c = &self.colors;
        let missing = || self.unresolved(category.name(), index);

        match category {
            Category::Map => missing(),
            Category::String => image
                .get::<StringItem>(index)
                .map_or_else(missing, |s| c.paint(c.literal, format_args!("{:?}", s.0))),
            Category::Type => {
                let Some(item) = image.get::<TypeItem>(index) else {
                    return missing();
                };
                let mut line = self.ty(index);
                if let TypePayload::Proto(p) = item.payload {
                    write!(line, " {}", self.proto(p)).unwrap();
                }
                line
            }
            Category::TypeList => image
                .get::<TypeListItem>(index)
                .map_or_else(missing, |_| format!("({})", self.type_list(Some(index)))),
            Category::Proto => self.proto(index),
            Category::Const => image.get::<ConstItem>(index).map_or_else(missing, |k| match *k {
                ConstItem::Int(v) => format!("int {v}"),
                ConstItem::Float(bits) => format!("float {:?}", f64::from_bits(bits)),
                ConstItem::Bool(b) => format!("bool {b}"),
                ConstItem::String(s) => format!("string {}", self.quoted(s)),
            }),
            Category::LocVar => image.get::<LocVarItem>(index).map_or_else(missing, |v| {
                format!(
                    "{} {} {} #{} slot={}",
                    self.string(v.name),
                    self.ty(v.ty),
                    v.scope.name(),
                    v.pos,
                    v.index
                )
            }),
            Category::Var => image.get::<VarItem>(index).map_or_else(missing, |v| {
                format!("{} {} {}", self.string(v.name), self.ty(v.ty), v.access)
            }),
            Category::Func => image.get::<FuncItem>(index).map_or_else(missing, |f| {
                format!(
                    "{} {} {} locvars={} code=#{}",
                    self.string(f.name),
                    self.proto(f.proto),
                    f.access,
                    f.locvars,
                    f.code
                )
            }),
            Category::Code => image
                .get::<CodeItem>(index)
                .map_or_else(missing, |code| hex(&code.0)),
            Category::Class => image.get::<ClassItem>(index).map_or_else(missing, |k| {
                let mut line = format!("{} {}", self.ty(k.ty), k.access);
                if let Some(s) = k.super_type {
                    write!(line, " extends {}", self.ty(s)).unwrap();
                }
                if k.traits.is_some() {
                    write!(line, " with ({})", self.type_list(k.traits)).unwrap();
                }
                line
            }),
            Category::Field => image.get::<FieldItem>(index).map_or_else(missing, |f| {
                format!(
                    "{}.{} {} {}",
                    self.ty(f.class),
                    self.string(f.name),
                    self.ty(f.ty),
                    f.access
                )
            }),
            Category::Method => image.get::<MethodItem>(index).map_or_else(missing, |m| {
                format!(
                    "{}.{} {} {} locvars={} code=#{}",
                    self.ty(m.class),
                    self.string(m.name),
                    self.proto(m.proto),
                    m.access,
                    m.locvars,
                    m.code
                )
            }),
            Category::Trait => image.get::<TraitItem>(index).map_or_else(missing, |t| {
                let mut line = format!("{} {}", self.ty(t.ty), t.access);
                if t.traits.is_some() {
                    write!(line, " with ({})", self.type_list(t.traits)).unwrap();
                }
                line
            }),
            Category::IMeth => image.get::<IMethItem>(index).map_or_else(missing, |m| {
                format!(
                    "{}.{} {} {}",
                    self.ty(m.owner),
                    self.string(m.name),
                    self.proto(m.proto),
                    m.access
                )
            }),
        }
    }
}

fn hex(bytes: &[u8]) -> String {
    if bytes.is_empty() {
        return "<empty>".to_owned();
    }
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}
