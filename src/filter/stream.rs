use super::error::FilterError;
use super::matcher::RecordFilter;
use serde_json::{Map, Value};
use std::io::{BufRead, ErrorKind, Write};

/// Counters for one pass over the input
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterSummary {
    pub records: usize,
    pub emitted: usize,
}

/// Decode one raw input line as a flat JSON object.
///
/// Invalid UTF-8 is a decode error of that line, shown lossily in the message.
pub fn decode_record(line: &[u8], line_number: usize) -> Result<Map<String, Value>, FilterError> {
    serde_json::from_slice(line).map_err(|source| FilterError::RecordDecode {
        line_number,
        line: String::from_utf8_lossy(line)
            .trim_end_matches(['\n', '\r'])
            .to_string(),
        source,
    })
}

/// Stream JSON lines from `reader` to `writer`, keeping the ones the filter emits.
///
/// Lines are read one at a time and matching lines are written exactly as
/// read, flushing after each, so a downstream consumer sees them right away.
/// The first error stops the run; anything already written stays written.
pub fn filter_stream<R: BufRead, W: Write>(
    mut reader: R,
    mut writer: W,
    filter: &RecordFilter,
) -> Result<FilterSummary, FilterError> {
    let mut summary = FilterSummary::default();
    let mut line = Vec::new();

    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            break;
        }
        summary.records += 1;

        let record = decode_record(&line, summary.records)?;
        if !filter.matches(&record, summary.records)? {
            continue;
        }

        match writer.write_all(&line).and_then(|_| writer.flush()) {
            Ok(()) => summary.emitted += 1,
            Err(e) if e.kind() == ErrorKind::BrokenPipe => {
                log::debug!("Output closed after {} records", summary.records);
                break;
            }
            Err(e) => return Err(e.into()),
        }
    }

    log::debug!(
        "Filtered {} records, emitted {}",
        summary.records,
        summary.emitted
    );
    Ok(summary)
}
