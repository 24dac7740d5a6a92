// Copyright 2022 Asen Lazarov

use log::debug;

use crate::flatten::{flatten, DecodedStruct, RowParseError};
use crate::row::input_row::InputRow;
use crate::row::spec::ParseSpec;
use crate::schema::{compile, derive_type_string, MapNameTemplate, SchemaError, StructSchema};

/// Turns decoded records into [InputRow]s. The schema and the map entry
/// namers are compiled once here and only read afterwards, one parser can
/// serve any number of rows from any number of threads.
pub struct StructRowParser {
    parse_spec: ParseSpec,
    type_string: String,
    template: MapNameTemplate,
    schema: StructSchema,
}

impl StructRowParser {
    pub fn new(
        parse_spec: ParseSpec,
        type_string: Option<String>,
        map_field_name_format: Option<String>,
        strict_shapes: bool,
    ) -> Result<StructRowParser, SchemaError> {
        let type_string = type_string.unwrap_or_else(|| {
            derive_type_string(
                parse_spec.timestamp_spec().column(),
                parse_spec.dimensions_spec().dimension_names(),
            )
        });
        let template = MapNameTemplate::new(map_field_name_format.as_deref());
        let schema = compile(type_string.as_str(), &template, strict_shapes)?;
        debug!(
            "struct row parser ready, {} fields, type string {:?}",
            schema.len(),
            type_string
        );
        Ok(StructRowParser {
            parse_spec,
            type_string,
            template,
            schema,
        })
    }

    pub fn schema(&self) -> &StructSchema {
        &self.schema
    }

    pub fn type_string(&self) -> &str {
        self.type_string.as_str()
    }

    pub fn map_field_name_format(&self) -> &str {
        self.template.as_str()
    }

    pub fn parse_spec(&self) -> &ParseSpec {
        &self.parse_spec
    }

    /// One record in, one timestamp-tagged flat row out. A row without a
    /// usable timestamp is an error the caller may drop and move on from,
    /// nothing here aborts the surrounding pipeline.
    pub fn parse(&self, row: &DecodedStruct) -> Result<InputRow, RowParseError> {
        let flat = flatten(&self.schema, row)?;
        let timestamp_spec = self.parse_spec.timestamp_spec();
        let timestamp = timestamp_spec
            .extract(&flat)
            .ok_or_else(|| RowParseError::missing_timestamp(timestamp_spec.column()))?;
        let dimensions = self.parse_spec.dimensions_spec().select(&flat);
        Ok(InputRow::new(timestamp, dimensions, flat))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::flatten::{DecodedPrimitive, FieldValue, ScalarValue, ValueNode};
    use crate::row::spec::{str2tsformat, DimensionsSpec, TimestampSpec};

    use super::*;

    fn test_parse_spec(dimensions: Vec<&str>, exclusions: Vec<&str>) -> ParseSpec {
        ParseSpec::new(
            TimestampSpec::new("ts", str2tsformat("auto")),
            DimensionsSpec::new(
                dimensions.into_iter().map(Arc::from).collect(),
                exclusions.into_iter().map(Arc::from).collect(),
            ),
        )
    }

    fn str_node(s: &str) -> ValueNode {
        ValueNode::Primitive(DecodedPrimitive::Str(Arc::from(s)))
    }

    #[test]
    fn parse_assembles_a_row() {
        let parser = StructRowParser::new(
            test_parse_spec(vec!["host"], vec![]),
            Some("struct<ts:string,host:string,attrs:map<string,string>>".to_string()),
            None,
            false,
        )
        .unwrap();
        let row = DecodedStruct::new(vec![
            str_node("2022-04-20T21:12:55+03:00"),
            str_node("db1"),
            ValueNode::Map(Some(vec![(
                DecodedPrimitive::Str(Arc::from("env")),
                DecodedPrimitive::Str(Arc::from("prod")),
            )])),
        ]);
        let parsed = parser.parse(&row).unwrap();
        assert_eq!(parsed.timestamp().timestamp(), 1650478375);
        assert_eq!(parsed.dimensions(), &[Arc::<str>::from("host")]);
        assert_eq!(
            parsed.fields().get_scalar("attrs_env"),
            Some(&ScalarValue::Str(Arc::from("prod")))
        );
    }

    #[test]
    fn derived_dimensions_exclude_the_timestamp_column() {
        let parser = StructRowParser::new(
            test_parse_spec(vec![], vec!["ts"]),
            Some("struct<ts:string,host:string,service:string>".to_string()),
            None,
            false,
        )
        .unwrap();
        let row = DecodedStruct::new(vec![
            str_node("1650000000000"),
            str_node("db1"),
            str_node("ingest"),
        ]);
        let parsed = parser.parse(&row).unwrap();
        assert_eq!(
            parsed.dimensions(),
            &[Arc::<str>::from("host"), Arc::<str>::from("service")]
        );
    }

    #[test]
    fn missing_type_string_derives_one() {
        let parser = StructRowParser::new(
            test_parse_spec(vec!["host", "ts", "service"], vec![]),
            None,
            None,
            false,
        )
        .unwrap();
        assert_eq!(
            parser.type_string(),
            "struct<ts:string,host:string,service:string>"
        );
        // a row laid out per the derived schema parses cleanly
        let row = DecodedStruct::new(vec![
            str_node("1650000000000"),
            str_node("db1"),
            str_node("ingest"),
        ]);
        let parsed = parser.parse(&row).unwrap();
        assert_eq!(parsed.fields().len(), 3);
    }

    #[test]
    fn unusable_timestamp_is_a_row_error() {
        let parser = StructRowParser::new(
            test_parse_spec(vec![], vec![]),
            Some("struct<ts:string,host:string>".to_string()),
            None,
            false,
        )
        .unwrap();
        let row = DecodedStruct::new(vec![ValueNode::Absent, str_node("db1")]);
        let res = parser.parse(&row);
        assert!(res.is_err());
        println!("{}", res.err().unwrap());
    }

    #[test]
    fn custom_map_format_is_used() {
        let parser = StructRowParser::new(
            test_parse_spec(vec![], vec![]),
            Some("struct<ts:string,attrs:map<string,string>>".to_string()),
            Some("{parent}.{child}".to_string()),
            false,
        )
        .unwrap();
        let row = DecodedStruct::new(vec![
            str_node("1650000000000"),
            ValueNode::Map(Some(vec![(
                DecodedPrimitive::Str(Arc::from("env")),
                DecodedPrimitive::Str(Arc::from("prod")),
            )])),
        ]);
        let parsed = parser.parse(&row).unwrap();
        assert!(parsed.fields().contains("attrs.env"));
    }

    #[test]
    fn bad_map_format_falls_back_to_default() {
        let parser = StructRowParser::new(
            test_parse_spec(vec![], vec![]),
            Some("struct<ts:string,attrs:map<string,string>>".to_string()),
            Some("no_placeholders_at_all".to_string()),
            false,
        )
        .unwrap();
        assert_eq!(parser.map_field_name_format(), "{parent}_{child}");
        let row = DecodedStruct::new(vec![
            str_node("1650000000000"),
            ValueNode::Map(Some(vec![(
                DecodedPrimitive::Str(Arc::from("env")),
                DecodedPrimitive::Str(Arc::from("prod")),
            )])),
        ]);
        let parsed = parser.parse(&row).unwrap();
        assert!(parsed.fields().contains("attrs_env"));
    }

    #[test]
    fn strict_shapes_fail_at_construction() {
        let res = StructRowParser::new(
            test_parse_spec(vec![], vec![]),
            Some("struct<ts:string,nested:struct<x:int>>".to_string()),
            None,
            true,
        );
        assert!(res.is_err());
    }

    #[test]
    fn parser_is_shareable_across_threads() {
        let parser = Arc::new(
            StructRowParser::new(
                test_parse_spec(vec![], vec!["ts"]),
                Some("struct<ts:string,n:bigint>".to_string()),
                None,
                false,
            )
            .unwrap(),
        );
        let mut handles = Vec::new();
        for i in 0..4 {
            let parser = parser.clone();
            handles.push(std::thread::spawn(move || {
                let row = DecodedStruct::new(vec![
                    str_node("1650000000000"),
                    ValueNode::Primitive(DecodedPrimitive::Long(i)),
                ]);
                parser.parse(&row).unwrap()
            }));
        }
        for (i, h) in handles.into_iter().enumerate() {
            let parsed = h.join().unwrap();
            assert_eq!(
                parsed.fields().get("n"),
                Some(&FieldValue::Scalar(ScalarValue::Long(i as i64)))
            );
        }
    }
}
