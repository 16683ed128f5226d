// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Conversions between command-line text, stored values and JSON.

use std::io::Write;

use rowkit_db::{RowSource, Value};
use serde_json::{Map, Value as Json};

/// Interpret a `--arg` value: integers and reals bind as numbers, `NULL`
/// binds as SQL NULL, anything else as text.
pub fn parse_arg(raw: &str) -> Value {
    if raw == "NULL" {
        Value::Null
    } else if let Ok(v) = raw.parse::<i64>() {
        Value::Integer(v)
    } else if let Some(v) = raw.parse::<f64>().ok().filter(|v| v.is_finite()) {
        Value::Real(v)
    } else {
        Value::Text(raw.to_string())
    }
}

/// Blobs are written as lowercase hex.
pub fn to_json(value: &Value) -> Json {
    match value {
        Value::Null => Json::Null,
        Value::Integer(v) => Json::from(*v),
        Value::Real(v) => Json::from(*v),
        Value::Text(v) => Json::from(v.as_str()),
        Value::Blob(v) => Json::from(hex::encode(v)),
    }
}

/// Write every row as one JSON object per line, keyed by column name.
pub fn write_rows(out: &mut impl Write, rows: &RowSource) -> Result<usize, serde_json::Error> {
    let mut written = 0;
    for row in rows.rows() {
        let object: Map<String, Json> = rows
            .column_names()
            .iter()
            .cloned()
            .zip(row.iter().map(to_json))
            .collect();
        serde_json::to_writer(&mut *out, &object)?;
        writeln!(out).map_err(serde_json::Error::io)?;
        written += 1;
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("42", Value::Integer(42))]
    #[case("-7", Value::Integer(-7))]
    #[case("2.5", Value::Real(2.5))]
    #[case("NULL", Value::Null)]
    #[case("inf", Value::Text("inf".into()))]
    #[case("Ann", Value::Text("Ann".into()))]
    #[case("", Value::Text(String::new()))]
    fn parse_args(#[case] raw: &str, #[case] expected: Value) {
        assert_eq!(parse_arg(raw), expected);
    }

    #[test]
    fn test_write_rows() {
        let rows = RowSource::new(
            vec!["id".into(), "name".into(), "avatar".into(), "score".into()],
            vec![
                vec![
                    Value::Integer(1),
                    Value::Text("Ann".into()),
                    Value::Blob(vec![0xca, 0xfe]),
                    Value::Real(0.5),
                ],
                vec![Value::Integer(2), Value::Null, Value::Null, Value::Null],
            ],
        );
        let mut out = Vec::new();
        assert_eq!(write_rows(&mut out, &rows).unwrap(), 2);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "{\"avatar\":\"cafe\",\"id\":1,\"name\":\"Ann\",\"score\":0.5}\n\
             {\"avatar\":null,\"id\":2,\"name\":null,\"score\":null}\n"
        );
    }
}
