use crate::types::{Dataset, Instance, MISSING_TOKEN};
use std::fmt;
use std::io::Write;

/// Write `dataset` in `.ts` format.
///
/// Recognized directives come first in a fixed order, followed by any
/// unrecognized ones in the order they were read. Values use Rust's shortest
/// round-trip float formatting, so parsing the output yields an equal dataset.
pub fn write_ts<W: Write>(dataset: &Dataset, mut out: W) -> std::io::Result<()> {
    write!(out, "{}", dataset)?;
    out.flush()
}

impl Dataset {
    pub fn to_ts_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for directive in self.metadata().directives() {
            if directive.value.is_empty() {
                writeln!(f, "@{}", directive.key)?;
            } else {
                writeln!(f, "@{} {}", directive.key, directive.value)?;
            }
        }
        writeln!(f, "@data")?;

        for instance in self.instances() {
            write_row(f, instance)?;
            writeln!(f)?;
        }
        Ok(())
    }
}

fn write_row(f: &mut fmt::Formatter<'_>, instance: &Instance) -> fmt::Result {
    for (idx, channel) in instance.channels().iter().enumerate() {
        if idx > 0 {
            f.write_str(":")?;
        }
        for (pos, sample) in channel.iter().enumerate() {
            if pos > 0 {
                f.write_str(",")?;
            }
            match sample {
                Some(v) => write!(f, "{:?}", v)?,
                None => f.write_str(MISSING_TOKEN)?,
            }
        }
    }
    if let Some(label) = instance.label() {
        write!(f, ":{}", label)?;
    }
    Ok(())
}
