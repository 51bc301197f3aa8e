use crate::filter::{FilterError, decode_record};
use std::collections::BTreeSet;
use std::io::BufRead;

/// Collect the unique top-level keys of every record in the input
pub fn collect_fields<R: BufRead>(mut reader: R) -> Result<BTreeSet<String>, FilterError> {
    let mut fields = BTreeSet::new();
    let mut line = Vec::new();
    let mut line_number = 0usize;

    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            break;
        }
        line_number += 1;

        let record = decode_record(&line, line_number)?;
        fields.extend(record.into_iter().map(|(key, _)| key));
    }

    log::debug!("Collected {} fields from {} records", fields.len(), line_number);
    Ok(fields)
}

pub fn format_fields(fields: &BTreeSet<String>, separator: &str) -> String {
    fields
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(separator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_sorted_union_of_keys() {
        let input = "{\"pid\":1,\"name\":\"a\"}\n{\"name\":\"b\",\"cpu\":0.5}\n";
        let fields = collect_fields(input.as_bytes()).unwrap();
        assert_eq!(format_fields(&fields, " "), "cpu name pid");
        assert_eq!(format_fields(&fields, ","), "cpu,name,pid");
    }

    #[test]
    fn empty_input_has_no_fields() {
        let fields = collect_fields("".as_bytes()).unwrap();
        assert!(fields.is_empty());
        assert_eq!(format_fields(&fields, " "), "");
    }

    #[test]
    fn rejects_invalid_utf8_with_its_line_number() {
        let result = collect_fields(&b"{\"a\":1}\n{\"\xfe\":1}\n"[..]);
        assert!(matches!(
            result,
            Err(FilterError::RecordDecode { line_number: 2, .. })
        ));
    }

    #[test]
    fn rejects_lines_that_are_not_objects() {
        let result = collect_fields("{\"a\":1}\nnope\n".as_bytes());
        assert!(matches!(
            result,
            Err(FilterError::RecordDecode { line_number: 2, .. })
        ));
    }
}
