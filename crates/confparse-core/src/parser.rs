//! Table-driven INI-style configuration parser
//!
//! Reads a file line by line, tracks the current `[Section]`, splits
//! `key = value` assignments and hands each recognized `(section, key)` pair
//! to the callback registered for it in a caller-supplied table.
//!
//! ```text
//! [Net]
//! mtu = 1500
//! ; comment
//! # comment
//! ```

use crate::error::{Error, Result};
use crate::strings::{strip, truncate_nl, COMMENTS, WHITESPACE};
use std::fmt;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, trace, warn};

/// Historical upper bound on distinct sections per file
pub const MAX_SECTIONS: usize = 64;

/// Context handed to a callback for one assignment line
#[derive(Debug, Clone, Copy)]
pub struct ConfigLine<'a> {
    pub filename: &'a Path,
    pub line: usize,
    pub section: &'a str,
    pub lvalue: &'a str,
    /// Distinguishes different variables passed to the same callback
    pub ltype: i32,
    pub rvalue: &'a str,
}

/// Storage for values that don't fit one of the built-in targets
pub trait ConfigSink {
    fn set_value(&mut self, line: &ConfigLine<'_>, rvalue: &str) -> Result<()>;
}

/// Where a matched value is stored
///
/// Borrows caller-owned storage for the duration of the parse.
pub enum ConfigTarget<'a> {
    None,
    Int(&'a mut i32),
    Bool(&'a mut bool),
    String(&'a mut Option<String>),
    /// Byte sizes and percentages
    Size(&'a mut u64),
    Strv(&'a mut Vec<String>),
    Float(&'a mut f32),
    Custom(&'a mut (dyn ConfigSink + 'a)),
}

impl fmt::Debug for ConfigTarget<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigTarget::None => write!(f, "None"),
            ConfigTarget::Int(v) => f.debug_tuple("Int").field(v).finish(),
            ConfigTarget::Bool(v) => f.debug_tuple("Bool").field(v).finish(),
            ConfigTarget::String(v) => f.debug_tuple("String").field(v).finish(),
            ConfigTarget::Size(v) => f.debug_tuple("Size").field(v).finish(),
            ConfigTarget::Strv(v) => f.debug_tuple("Strv").field(v).finish(),
            ConfigTarget::Float(v) => f.debug_tuple("Float").field(v).finish(),
            ConfigTarget::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

/// Parser for a specific configuration setting
pub type ConfigParserCallback = fn(&ConfigLine<'_>, &mut ConfigTarget<'_>) -> Result<()>;

/// Binds a `(section, key)` pair to a callback and its storage
pub struct ConfigTableItem<'a> {
    /// `None` matches the key in any section
    pub section: Option<&'a str>,
    /// Name of the variable; an empty name terminates the table
    pub lvalue: &'a str,
    pub cb: Option<ConfigParserCallback>,
    pub ltype: i32,
    pub data: ConfigTarget<'a>,
}

impl<'a> ConfigTableItem<'a> {
    pub fn new(
        section: Option<&'a str>,
        lvalue: &'a str,
        cb: ConfigParserCallback,
        data: ConfigTarget<'a>,
    ) -> Self {
        Self {
            section,
            lvalue,
            cb: Some(cb),
            ltype: 0,
            data,
        }
    }

    pub fn with_ltype(mut self, ltype: i32) -> Self {
        self.ltype = ltype;
        self
    }

    fn matches(&self, section: &str, lvalue: &str) -> bool {
        self.lvalue == lvalue && self.section.map_or(true, |s| s == section)
    }
}

impl fmt::Debug for ConfigTableItem<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigTableItem")
            .field("section", &self.section)
            .field("lvalue", &self.lvalue)
            .field("cb", &self.cb.is_some())
            .field("ltype", &self.ltype)
            .field("data", &self.data)
            .finish()
    }
}

/// Sections seen so far in one file, in order of first appearance
struct SectionTable {
    names: Vec<String>,
    max: Option<usize>,
}

impl SectionTable {
    fn new(max: Option<usize>) -> Self {
        Self {
            names: Vec::new(),
            max,
        }
    }

    /// Index of `name`, registering it if not seen before
    fn open(&mut self, name: &str) -> Result<usize> {
        if let Some(idx) = self.names.iter().position(|n| n == name) {
            return Ok(idx);
        }

        if let Some(max) = self.max {
            if self.names.len() >= max {
                return Err(Error::ResourceExhausted(max));
            }
        }

        debug!("New section [{}]", name);
        self.names.push(name.to_string());
        Ok(self.names.len() - 1)
    }

    fn get(&self, idx: usize) -> &str {
        &self.names[idx]
    }
}

/// INI-style config parser
#[derive(Debug, Clone, Default)]
pub struct ConfigParser {
    max_sections: Option<usize>,
}

impl ConfigParser {
    /// Parser without a bound on the number of sections
    pub fn new() -> Self {
        Self::default()
    }

    /// Parser limited to `MAX_SECTIONS` distinct sections per file
    pub fn legacy() -> Self {
        Self::new().with_max_sections(MAX_SECTIONS)
    }

    pub fn with_max_sections(mut self, max: usize) -> Self {
        self.max_sections = Some(max);
        self
    }

    pub fn max_sections(&self) -> Option<usize> {
        self.max_sections
    }

    /// Parse `path` against `table`
    ///
    /// Stops at the first callback error, malformed section header or
    /// section overflow. Values already stored are kept.
    pub fn parse(&self, path: impl AsRef<Path>, table: &mut [ConfigTableItem<'_>]) -> Result<()> {
        let path = path.as_ref();
        let file = File::open(path)?;

        self.parse_reader(path, BufReader::new(file), table)
    }

    /// Parse an already opened source; `name` is reported as the filename
    pub fn parse_reader<R: BufRead>(
        &self,
        name: impl AsRef<Path>,
        mut reader: R,
        table: &mut [ConfigTableItem<'_>],
    ) -> Result<()> {
        let name = name.as_ref();
        let mut sections = SectionTable::new(self.max_sections);
        let mut section: Option<usize> = None;
        let mut line: usize = 0;
        let mut buf = Vec::new();

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }

            line += 1;
            let raw = String::from_utf8_lossy(&buf);
            let l = truncate_nl(&raw);

            let first = l
                .trim_start_matches(|c: char| WHITESPACE.contains(c))
                .chars()
                .next();
            if first.map_or(true, |c| COMMENTS.contains(c)) {
                trace!("{}:{}: skipped", name.display(), line);
                continue;
            }

            if let Some(header) = l.strip_prefix('[') {
                let Some(header) = header.strip_suffix(']') else {
                    warn!("{}:{}: malformed section header '{}'", name.display(), line, l);
                    return Err(Error::MalformedHeader {
                        file: name.to_path_buf(),
                        line,
                    });
                };

                section = Some(sections.open(header).map_err(|e| {
                    warn!("{}:{}: {}", name.display(), line, e);
                    e
                })?);
                continue;
            }

            let Some(idx) = section else {
                continue;
            };

            let Some((lvalue, rvalue)) = l.split_once('=') else {
                continue;
            };

            let ctx = ConfigLine {
                filename: name,
                line,
                section: sections.get(idx),
                lvalue: strip(lvalue),
                ltype: 0,
                rvalue: strip(rvalue),
            };

            dispatch(table, ctx).map_err(|e| {
                warn!(
                    "{}:{}: failed to parse [{}] {}: {}",
                    name.display(),
                    line,
                    ctx.section,
                    ctx.lvalue,
                    e
                );
                e
            })?;
        }

        Ok(())
    }
}

/// Run the callback registered for an assignment, if any
fn dispatch(table: &mut [ConfigTableItem<'_>], ctx: ConfigLine<'_>) -> Result<()> {
    let item = table
        .iter_mut()
        .take_while(|t| !t.lvalue.is_empty())
        .find(|t| t.matches(ctx.section, ctx.lvalue));

    let Some(item) = item else {
        return Ok(());
    };

    let Some(cb) = item.cb else {
        return Ok(());
    };

    debug!(
        "{}:{}: [{}] {} = {}",
        ctx.filename.display(),
        ctx.line,
        ctx.section,
        ctx.lvalue,
        ctx.rvalue
    );

    let ctx = ConfigLine {
        ltype: item.ltype,
        ..ctx
    };
    cb(&ctx, &mut item.data)
}

/// Parse `filename` against `table` with the legacy section limit
pub fn config_parse(filename: impl AsRef<Path>, table: &mut [ConfigTableItem<'_>]) -> Result<()> {
    ConfigParser::legacy().parse(filename, table)
}

/// Call `f` for every regular file in `dir`
///
/// Not recursive, in directory order. Errors returned by `f` are logged and
/// ignored; only failing to read the directory itself is an error.
pub fn config_parse_dir<F>(dir: impl AsRef<Path>, mut f: F) -> Result<()>
where
    F: FnMut(&Path) -> Result<()>,
{
    let dir = dir.as_ref();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;

        if !entry.file_type()?.is_file() {
            continue;
        }

        let path = entry.path();
        if let Err(e) = f(&path) {
            warn!("Skipping {}: {}", path.display(), e);
        }
    }

    Ok(())
}
