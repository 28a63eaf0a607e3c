use crate::error::{Field, Result, TsError};
use crate::types::{Dataset, Directive, Instance, Label, LabelKind, Metadata, Sample, MISSING_TOKEN};
use rayon::prelude::*;
use std::io::BufRead;

/// Row count from which rows are parsed on the rayon pool by default
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 1024;

/// Options for parsing a `.ts` file
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Parse rows in parallel once the data section has at least this many rows
    pub parallel_threshold: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl ParseOptions {
    pub fn sequential() -> Self {
        Self {
            parallel_threshold: usize::MAX,
        }
    }
}

/// Parse the full text of a `.ts` file
pub fn parse_str(content: &str) -> Result<Dataset> {
    parse_with_options(content.lines(), &ParseOptions::default())
}

/// Parse a sequence of lines with default options
pub fn parse_lines<I, S>(lines: I) -> Result<Dataset>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str> + Sync,
{
    parse_with_options(lines, &ParseOptions::default())
}

/// Read all lines from `reader` and parse them
pub fn parse_reader<R: BufRead>(reader: R) -> Result<Dataset> {
    let lines = reader.lines().collect::<std::io::Result<Vec<String>>>()?;
    parse_lines(lines)
}

/// Parse a `.ts` file given as lines.
///
/// The scan has two phases: header directives up to `@data`, then one
/// instance per data row. The first data row fixes the channel count. The
/// result is all-or-nothing; on failure the error of the earliest offending
/// line is returned, whether or not rows were parsed in parallel.
pub fn parse_with_options<I, S>(lines: I, options: &ParseOptions) -> Result<Dataset>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str> + Sync,
{
    let mut lines = lines
        .into_iter()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line));

    let metadata = parse_header(&mut lines)?;

    let rows: Vec<(usize, S)> = lines
        .filter(|(_, line)| !is_skippable(line.as_ref()))
        .collect();

    let Some((first_line, first_row)) = rows.first() else {
        log::warn!("Data section of '{}' is empty", problem_label(&metadata));
        return Ok(Dataset::new(metadata, Vec::new()));
    };

    let layout = RowLayout::establish(&metadata, *first_line, first_row.as_ref())?;

    let parsed: Vec<Result<Instance>> = if rows.len() >= options.parallel_threshold {
        log::debug!("Parsing {} rows in parallel", rows.len());
        rows.par_iter()
            .map(|(line, text)| layout.parse_row(*line, text.as_ref()))
            .collect()
    } else {
        rows.iter()
            .map(|(line, text)| layout.parse_row(*line, text.as_ref()))
            .collect()
    };

    let mut reference_lengths: Option<Vec<usize>> = None;
    let mut instances = Vec::with_capacity(parsed.len());
    for ((line, _), result) in rows.iter().zip(parsed) {
        let instance = result?;
        check_equal_length(&metadata, &mut reference_lengths, *line, &instance)?;
        instances.push(instance);
    }

    log::info!(
        "Loaded '{}': {} instances × {} channels (labels: {})",
        problem_label(&metadata),
        instances.len(),
        layout.channels,
        layout.label.name()
    );

    Ok(Dataset::new(metadata, instances))
}

fn problem_label(metadata: &Metadata) -> &str {
    metadata.problem_name.as_deref().unwrap_or("<unnamed>")
}

fn is_skippable(line: &str) -> bool {
    let text = line.trim();
    text.is_empty() || text.starts_with('%')
}

fn parse_header<S: AsRef<str>>(lines: &mut impl Iterator<Item = (usize, S)>) -> Result<Metadata> {
    let mut metadata = Metadata::default();
    let mut last_line = 0;

    for (line_no, line) in lines {
        last_line = line_no;
        let text = line.as_ref().trim();
        if is_skippable(text) {
            continue;
        }

        let Some(directive) = text.strip_prefix('@') else {
            return Err(TsError::Header {
                line: line_no,
                message: "expected a directive or @data before the data section".to_string(),
            });
        };

        let (key, value) = match directive.split_once(char::is_whitespace) {
            Some((key, value)) => (key, value.trim()),
            None => (directive, ""),
        };

        if key.is_empty() {
            return Err(TsError::Header {
                line: line_no,
                message: "directive has no name".to_string(),
            });
        }

        if key.eq_ignore_ascii_case("data") {
            validate_header(&metadata, line_no)?;
            log::debug!("Header ends at line {}: {:?}", line_no, metadata.directives());
            return Ok(metadata);
        }

        apply_directive(&mut metadata, key, value, line_no)?;
    }

    Err(TsError::Header {
        line: last_line,
        message: "missing @data marker".to_string(),
    })
}

fn apply_directive(metadata: &mut Metadata, key: &str, value: &str, line: usize) -> Result<()> {
    match key.to_ascii_lowercase().as_str() {
        "problemname" => metadata.problem_name = Some(value.to_string()),
        "timestamps" => metadata.timestamps = Some(parse_bool(key, value, line)?),
        "univariate" => metadata.univariate = Some(parse_bool(key, value, line)?),
        "equallength" => metadata.equal_length = Some(parse_bool(key, value, line)?),
        "targetlabel" => metadata.target_label = Some(parse_bool(key, value, line)?),
        "serieslength" => metadata.series_length = Some(parse_count(key, value, line)?),
        "dimensions" | "dimension" => metadata.dimensions = Some(parse_count(key, value, line)?),
        "classlabel" => {
            let mut parts = value.split_whitespace();
            let flag = parse_bool(key, parts.next().unwrap_or(""), line)?;
            let names: Vec<String> = parts.map(str::to_string).collect();
            if flag && names.is_empty() {
                return Err(TsError::Header {
                    line,
                    message: "@classLabel true must list at least one class".to_string(),
                });
            }
            if !flag && !names.is_empty() {
                return Err(TsError::Header {
                    line,
                    message: "@classLabel false cannot list classes".to_string(),
                });
            }
            metadata.class_label = Some(flag);
            metadata.class_names = names;
        }
        _ => {
            log::debug!("Keeping unrecognized directive @{} at line {}", key, line);
            metadata.extra.push(Directive::new(key, value));
        }
    }
    Ok(())
}

fn parse_bool(key: &str, value: &str, line: usize) -> Result<bool> {
    if value.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if value.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(TsError::Header {
            line,
            message: format!("@{} expects true or false, found '{}'", key, value),
        })
    }
}

fn parse_count(key: &str, value: &str, line: usize) -> Result<usize> {
    value.parse::<usize>().map_err(|_| TsError::Header {
        line,
        message: format!("@{} expects a non-negative integer, found '{}'", key, value),
    })
}

fn validate_header(metadata: &Metadata, line: usize) -> Result<()> {
    let fail = |message: &str| -> Result<()> {
        Err(TsError::Header {
            line,
            message: message.to_string(),
        })
    };

    if metadata.timestamps == Some(true) {
        return fail("timestamped series (@timestamps true) are not supported");
    }
    if metadata.target_label == Some(true) && metadata.class_label == Some(true) {
        return fail("@targetlabel and @classLabel cannot both be true");
    }
    if metadata.dimensions == Some(0) {
        return fail("@dimensions must be at least 1");
    }
    match (metadata.univariate, metadata.dimensions) {
        (Some(true), Some(d)) if d != 1 => fail("@univariate true contradicts @dimensions"),
        (Some(false), Some(1)) => fail("@univariate false contradicts @dimensions 1"),
        _ => Ok(()),
    }
}

/// Shape every data row must follow, fixed by the first row
struct RowLayout {
    channels: usize,
    label: LabelKind,
}

impl RowLayout {
    fn establish(metadata: &Metadata, line: usize, text: &str) -> Result<Self> {
        let label = metadata.label_kind();
        let segments = text.split(':').count();

        let missing_label = label.is_labelled()
            && (segments < 2
                || metadata.dimensions == Some(segments)
                || (metadata.univariate == Some(false) && segments == 2)
                || Self::trailing_segment_is_channel(&label, text));
        if missing_label {
            return Err(TsError::Structural {
                line,
                message: "row has no label segment after the last ':' but labels are declared"
                    .to_string(),
            });
        }

        let channels = if label.is_labelled() {
            segments - 1
        } else {
            segments
        };

        if let Some(dims) = metadata.dimensions {
            if channels != dims {
                return Err(TsError::Consistency {
                    line,
                    message: format!(
                        "row has {} channels but @dimensions declares {}",
                        channels, dims
                    ),
                });
            }
        }

        match metadata.univariate {
            Some(true) if channels != 1 => Err(TsError::Consistency {
                line,
                message: format!("@univariate true but row has {} channels", channels),
            }),
            Some(false) if channels < 2 => Err(TsError::Consistency {
                line,
                message: "@univariate false but row has a single channel".to_string(),
            }),
            _ => Ok(Self { channels, label }),
        }
    }

    /// A numeric label never holds a ',', so a trailing segment with one is a channel.
    fn trailing_segment_is_channel(label: &LabelKind, text: &str) -> bool {
        let last = text.rsplit(':').next().unwrap_or_default().trim();
        if !last.contains(',') {
            return false;
        }
        match label {
            LabelKind::Class(names) => !names.iter().any(|name| name == last),
            _ => true,
        }
    }

    fn parse_row(&self, line: usize, text: &str) -> Result<Instance> {
        let segments: Vec<&str> = text.split(':').collect();
        let labelled = self.label.is_labelled();
        let expected = self.channels + usize::from(labelled);

        if segments.len() != expected {
            let message = if labelled && segments.len() == self.channels {
                format!(
                    "missing label segment: expected {} channels followed by a label",
                    self.channels
                )
            } else {
                format!(
                    "expected {} ':'-separated segments ({} channels{}), found {}",
                    expected,
                    self.channels,
                    if labelled { " + label" } else { "" },
                    segments.len()
                )
            };
            return Err(TsError::Structural { line, message });
        }

        let (channel_segments, label_segment) = match segments.split_last() {
            Some((last, rest)) if labelled => (rest, Some(*last)),
            _ => (segments.as_slice(), None),
        };

        let channels = channel_segments
            .iter()
            .enumerate()
            .map(|(idx, segment)| parse_channel(segment, line, idx))
            .collect::<Result<Vec<_>>>()?;

        let label = match label_segment {
            Some(token) => Some(self.parse_label(token, line)?),
            None => None,
        };

        Ok(Instance::new(channels, label))
    }

    fn parse_label(&self, token: &str, line: usize) -> Result<Label> {
        let token = token.trim();
        if token.is_empty() {
            return Err(TsError::Structural {
                line,
                message: "label segment after the last ':' is empty".to_string(),
            });
        }

        match &self.label {
            LabelKind::Numeric => parse_number(token)
                .map(Label::Numeric)
                .ok_or_else(|| TsError::Format {
                    line,
                    field: Field::Label,
                    token: token.to_string(),
                }),
            LabelKind::Class(names) => {
                if names.iter().any(|name| name == token) {
                    Ok(Label::Class(token.to_string()))
                } else {
                    Err(TsError::Consistency {
                        line,
                        message: format!("class label '{}' is not declared in @classLabel", token),
                    })
                }
            }
            LabelKind::None => Err(TsError::Structural {
                line,
                message: "row carries a label but none is declared".to_string(),
            }),
        }
    }
}

/// A blank segment is a channel of length 0.
fn parse_channel(segment: &str, line: usize, channel: usize) -> Result<Vec<Sample>> {
    let segment = segment.trim();
    if segment.is_empty() {
        return Ok(Vec::new());
    }

    segment
        .split(',')
        .map(|token| parse_sample(token, line, channel))
        .collect()
}

fn parse_sample(token: &str, line: usize, channel: usize) -> Result<Sample> {
    let token = token.trim();
    if token.is_empty() || token == MISSING_TOKEN {
        return Ok(None);
    }

    parse_number(token).map(Some).ok_or_else(|| TsError::Format {
        line,
        field: Field::Channel(channel),
        token: token.to_string(),
    })
}

/// Finite decimal literal; `inf` and `NaN` are rejected.
fn parse_number(token: &str) -> Option<f64> {
    token.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn check_equal_length(
    metadata: &Metadata,
    reference: &mut Option<Vec<usize>>,
    line: usize,
    instance: &Instance,
) -> Result<()> {
    if metadata.equal_length != Some(true) {
        return Ok(());
    }

    let lengths = instance.series_lengths();

    if let Some(declared) = metadata.series_length {
        if let Some((idx, len)) = lengths.iter().enumerate().find(|&(_, &len)| len != declared) {
            return Err(TsError::Consistency {
                line,
                message: format!(
                    "channel {} has length {} but @seriesLength declares {}",
                    idx, len, declared
                ),
            });
        }
    }

    match reference {
        None => *reference = Some(lengths),
        Some(expected) => {
            let mismatch = lengths
                .iter()
                .zip(expected.iter())
                .enumerate()
                .find(|(_, (len, exp))| len != exp);
            if let Some((idx, (len, exp))) = mismatch {
                return Err(TsError::Consistency {
                    line,
                    message: format!(
                        "@equalLength true but channel {} has length {} where earlier instances have {}",
                        idx, len, exp
                    ),
                });
            }
        }
    }

    Ok(())
}
