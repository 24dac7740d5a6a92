// Copyright 2022 Asen Lazarov

use std::sync::Arc;

use log::debug;

use crate::schema::template::MapNameTemplate;
use crate::schema::types::*;
use crate::schema::SchemaError;

/// Parse tree for one type expression, before classification.
#[derive(Debug, Clone, PartialEq)]
enum TypeTree {
    Primitive(PrimitiveKind),
    List(Box<TypeTree>),
    Map(Box<TypeTree>, Box<TypeTree>),
    Struct(Vec<(String, TypeTree)>),
    Union(Vec<TypeTree>),
}

struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(src: &'a str) -> Cursor<'a> {
        Cursor { src, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn skip_ws(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.bump();
            } else {
                break;
            }
        }
    }

    fn eat(&mut self, expected: char) -> Result<(), SchemaError> {
        match self.peek() {
            Some(c) if c == expected => {
                self.bump();
                Ok(())
            }
            _ => Err(SchemaError::bad_type_string(
                &format!("expected '{}' at offset {}", expected, self.pos),
                self.src,
            )),
        }
    }

    fn ident(&mut self) -> Result<&'a str, SchemaError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                self.bump();
            } else {
                break;
            }
        }
        if self.pos == start {
            Err(SchemaError::bad_type_string(
                &format!("expected an identifier at offset {}", start),
                self.src,
            ))
        } else {
            Ok(&self.src[start..self.pos])
        }
    }
}

fn parse_type(cur: &mut Cursor) -> Result<TypeTree, SchemaError> {
    cur.skip_ws();
    let name = cur.ident()?;
    match name {
        "array" => {
            cur.skip_ws();
            cur.eat('<')?;
            let element = parse_type(cur)?;
            cur.skip_ws();
            cur.eat('>')?;
            Ok(TypeTree::List(Box::new(element)))
        }
        "map" => {
            cur.skip_ws();
            cur.eat('<')?;
            let key = parse_type(cur)?;
            cur.skip_ws();
            cur.eat(',')?;
            let value = parse_type(cur)?;
            cur.skip_ws();
            cur.eat('>')?;
            Ok(TypeTree::Map(Box::new(key), Box::new(value)))
        }
        "struct" => {
            cur.skip_ws();
            cur.eat('<')?;
            let fields = parse_struct_fields(cur)?;
            cur.eat('>')?;
            Ok(TypeTree::Struct(fields))
        }
        "uniontype" => {
            cur.skip_ws();
            cur.eat('<')?;
            let mut alternatives = vec![parse_type(cur)?];
            loop {
                cur.skip_ws();
                match cur.peek() {
                    Some(',') => {
                        cur.bump();
                        alternatives.push(parse_type(cur)?);
                    }
                    _ => break,
                }
            }
            cur.eat('>')?;
            Ok(TypeTree::Union(alternatives))
        }
        _ => match str2kind(name) {
            Some(kind) => {
                cur.skip_ws();
                if cur.peek() == Some('(') {
                    parse_type_params(cur, kind)?;
                }
                Ok(TypeTree::Primitive(kind))
            }
            None => Err(SchemaError::bad_type_string(
                &format!("unknown type {}", name),
                cur.src,
            )),
        },
    }
}

/// Consumes a `(p[,s])` parameter list. The values are validated but
/// discarded, precision does not change how a field is flattened.
fn parse_type_params(cur: &mut Cursor, kind: PrimitiveKind) -> Result<(), SchemaError> {
    if !kind.parameterized() {
        return Err(SchemaError::bad_type_string(
            &format!("type {} does not take parameters", kind),
            cur.src,
        ));
    }
    cur.eat('(')?;
    loop {
        match cur.peek() {
            Some(c) if c.is_ascii_digit() || c == ',' || c.is_whitespace() => cur.bump(),
            Some(')') => {
                cur.bump();
                return Ok(());
            }
            _ => {
                return Err(SchemaError::bad_type_string(
                    &format!("bad type parameters for {}", kind),
                    cur.src,
                ))
            }
        }
    }
}

fn parse_struct_fields(cur: &mut Cursor) -> Result<Vec<(String, TypeTree)>, SchemaError> {
    let mut fields = Vec::new();
    loop {
        cur.skip_ws();
        let name = cur.ident()?;
        cur.skip_ws();
        cur.eat(':')?;
        let field_type = parse_type(cur)?;
        fields.push((name.to_string(), field_type));
        cur.skip_ws();
        match cur.peek() {
            Some(',') => cur.bump(),
            _ => break,
        }
    }
    Ok(fields)
}

/// One-level nesting rule: lists and maps of primitives are flattenable,
/// everything deeper is not.
fn classify(tree: &TypeTree) -> FieldKind {
    match tree {
        TypeTree::Primitive(k) => FieldKind::Primitive(*k),
        TypeTree::List(element) => match element.as_ref() {
            TypeTree::Primitive(k) => FieldKind::List(*k),
            _ => FieldKind::Unsupported,
        },
        TypeTree::Map(key, value) => match (key.as_ref(), value.as_ref()) {
            (TypeTree::Primitive(k), TypeTree::Primitive(v)) => FieldKind::Map(*k, *v),
            _ => FieldKind::Unsupported,
        },
        TypeTree::Struct(_) | TypeTree::Union(_) => FieldKind::Unsupported,
    }
}

/// Compiles a type string into an ordered [StructSchema]. Fails when the
/// string does not parse or its top level is not a struct; under `strict`
/// an unsupported field shape fails too instead of being kept as a
/// to-be-skipped field.
pub fn compile(
    type_string: &str,
    template: &MapNameTemplate,
    strict: bool,
) -> Result<StructSchema, SchemaError> {
    let mut cur = Cursor::new(type_string);
    let tree = parse_type(&mut cur)?;
    cur.skip_ws();
    if !cur.at_end() {
        return Err(SchemaError::bad_type_string(
            &format!("trailing characters at offset {}", cur.pos),
            type_string,
        ));
    }
    let tree_fields = match tree {
        TypeTree::Struct(fields) => fields,
        _ => return Err(SchemaError::not_a_struct(type_string)),
    };
    let mut fields = Vec::with_capacity(tree_fields.len());
    for (name, field_type) in tree_fields {
        let kind = classify(&field_type);
        if strict && kind == FieldKind::Unsupported {
            return Err(SchemaError::unsupported_shape(&name, type_string));
        }
        let map_namer = match kind {
            FieldKind::Map(_, _) => Some(template.resolve(&name)),
            _ => None,
        };
        fields.push(FieldSchema::new(Arc::from(name.as_str()), kind, map_namer));
    }
    debug!(
        "compiled struct schema with {} fields from {:?}",
        fields.len(),
        type_string
    );
    Ok(StructSchema::new(fields))
}

/// Fallback type string for configurations without an explicit one: an
/// all-string struct of the timestamp column followed by the dimensions.
/// The binding between schema and decoded values is positional, so a
/// repeated timestamp column would shift every value after it, the
/// duplicate is filtered out of the dimension list here.
pub fn derive_type_string(timestamp_column: &str, dimensions: &[Arc<str>]) -> String {
    let mut buf = String::from("struct<");
    buf.push_str(timestamp_column);
    buf.push_str(":string");
    for dim in dimensions.iter().filter(|d| d.as_ref() != timestamp_column) {
        buf.push(',');
        buf.push_str(dim);
        buf.push_str(":string");
    }
    buf.push('>');
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_template() -> MapNameTemplate {
        MapNameTemplate::new(None)
    }

    fn names(schema: &StructSchema) -> Vec<String> {
        schema
            .fields()
            .iter()
            .map(|f| f.name().to_string())
            .collect()
    }

    #[test]
    fn compile_preserves_declaration_order() {
        let schema = compile(
            "struct<a:string,b:bigint,c:array<string>,d:map<string,int>>",
            &default_template(),
            false,
        )
        .unwrap();
        assert_eq!(names(&schema), vec!["a", "b", "c", "d"]);
        assert_eq!(
            schema.fields()[0].kind(),
            &FieldKind::Primitive(PrimitiveKind::String)
        );
        assert_eq!(
            schema.fields()[1].kind(),
            &FieldKind::Primitive(PrimitiveKind::BigInt)
        );
        assert_eq!(
            schema.fields()[2].kind(),
            &FieldKind::List(PrimitiveKind::String)
        );
        assert_eq!(
            schema.fields()[3].kind(),
            &FieldKind::Map(PrimitiveKind::String, PrimitiveKind::Int)
        );
    }

    #[test]
    fn parameterized_primitives_parse() {
        let schema = compile(
            "struct<a:decimal(10,2),b:varchar(64),c:char(8)>",
            &default_template(),
            false,
        )
        .unwrap();
        assert_eq!(
            schema.fields()[0].kind(),
            &FieldKind::Primitive(PrimitiveKind::Decimal)
        );
        assert_eq!(
            schema.fields()[1].kind(),
            &FieldKind::Primitive(PrimitiveKind::Varchar)
        );
    }

    #[test]
    fn whitespace_is_tolerated() {
        let schema = compile(
            "struct< a : string , b : array< int > >",
            &default_template(),
            false,
        )
        .unwrap();
        assert_eq!(names(&schema), vec!["a", "b"]);
    }

    #[test]
    fn nested_shapes_classify_as_unsupported() {
        let schema = compile(
            "struct<a:struct<x:int>,b:array<array<int>>,c:map<string,array<int>>,d:uniontype<int,string>,e:string>",
            &default_template(),
            false,
        )
        .unwrap();
        assert_eq!(schema.fields()[0].kind(), &FieldKind::Unsupported);
        assert_eq!(schema.fields()[1].kind(), &FieldKind::Unsupported);
        assert_eq!(schema.fields()[2].kind(), &FieldKind::Unsupported);
        assert_eq!(schema.fields()[3].kind(), &FieldKind::Unsupported);
        assert_eq!(
            schema.fields()[4].kind(),
            &FieldKind::Primitive(PrimitiveKind::String)
        );
    }

    #[test]
    fn strict_mode_rejects_unsupported_shapes() {
        let res = compile("struct<a:struct<x:int>>", &default_template(), true);
        assert!(res.is_err());
        println!("{}", res.err().unwrap());
    }

    #[test]
    fn top_level_must_be_a_struct() {
        let res = compile("array<string>", &default_template(), false);
        assert!(res.is_err());
        let res = compile("string", &default_template(), false);
        assert!(res.is_err());
    }

    #[test]
    fn garbage_does_not_parse() {
        assert!(compile("struct<a:string", &default_template(), false).is_err());
        assert!(compile("struct<a>", &default_template(), false).is_err());
        assert!(compile("struct<a:frobnicate>", &default_template(), false).is_err());
        assert!(compile("struct<a:string>x", &default_template(), false).is_err());
        assert!(compile("struct<a:int(3)>", &default_template(), false).is_err());
        assert!(compile("", &default_template(), false).is_err());
    }

    #[test]
    fn map_fields_get_a_namer() {
        let schema = compile(
            "struct<attrs:map<string,string>,a:string>",
            &default_template(),
            false,
        )
        .unwrap();
        assert!(schema.fields()[0].map_namer().is_some());
        assert!(schema.fields()[1].map_namer().is_none());
    }

    #[test]
    fn derive_type_string_puts_timestamp_first_and_dedups() {
        let dims: Vec<Arc<str>> = vec![Arc::from("host"), Arc::from("ts"), Arc::from("service")];
        let ts = derive_type_string("ts", &dims);
        assert_eq!(ts, "struct<ts:string,host:string,service:string>");

        let no_dims: Vec<Arc<str>> = vec![];
        assert_eq!(derive_type_string("ts", &no_dims), "struct<ts:string>");
    }

    #[test]
    fn derived_type_string_round_trips() {
        let dims: Vec<Arc<str>> = vec![Arc::from("host"), Arc::from("ts"), Arc::from("service")];
        let ts = derive_type_string("ts", &dims);
        let schema = compile(&ts, &default_template(), false).unwrap();
        assert_eq!(names(&schema), vec!["ts", "host", "service"]);
        for f in schema.fields() {
            assert_eq!(f.kind(), &FieldKind::Primitive(PrimitiveKind::String));
        }
    }
}
