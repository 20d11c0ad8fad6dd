//! Reader for `.ini`-style model input files.
//!
//! # File Format
//!
//! ```text
//! # Slope flow case
//! [grid]
//! itot = 64
//! swspatialorder = 4
//!
//! [thermo]
//! swthermo = slope
//! alpha = 0.1
//! n2 = 1.0
//!
//! [fields]
//! svisc[b] = 1e-5
//! ```
//!
//! Text after `#` is a comment. Items are looked up by block and name;
//! an item may carry a subitem in brackets (`svisc[b]`) which takes
//! precedence over the plain item (`svisc`) when the subitem is requested.
//!
//! Every value is parsed strictly: a value that does not parse as the
//! requested type is an error, never a silent default.

use std::cell::Cell;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use super::ConfigError;

/// Types that can be read from an input item.
pub trait InputValue: Sized {
    /// Name used in error messages.
    const TYPE_NAME: &'static str;

    /// Parse a trimmed value string, `None` if it is not of this type.
    fn parse_value(value: &str) -> Option<Self>;
}

macro_rules! impl_input_value_fromstr {
    ($($ty:ty => $name:literal),* $(,)?) => {
        $(
            impl InputValue for $ty {
                const TYPE_NAME: &'static str = $name;

                fn parse_value(value: &str) -> Option<Self> {
                    value.parse::<$ty>().ok()
                }
            }
        )*
    };
}

impl_input_value_fromstr!(
    i32 => "int",
    i64 => "int",
    usize => "unsigned int",
);

impl InputValue for f64 {
    const TYPE_NAME: &'static str = "double";

    fn parse_value(value: &str) -> Option<Self> {
        value.parse::<f64>().ok().filter(|v| v.is_finite())
    }
}

impl InputValue for bool {
    const TYPE_NAME: &'static str = "bool";

    fn parse_value(value: &str) -> Option<Self> {
        match value {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        }
    }
}

impl InputValue for String {
    const TYPE_NAME: &'static str = "string";

    fn parse_value(value: &str) -> Option<Self> {
        Some(value.to_string())
    }
}

#[derive(Clone, Debug)]
struct Entry {
    value: String,
    used: Cell<bool>,
}

/// Parsed input file, organised as blocks of items.
#[derive(Clone, Debug, Default)]
pub struct Input {
    blocks: BTreeMap<String, BTreeMap<String, Entry>>,
}

impl Input {
    /// Create an empty input.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read and parse an input file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        text.parse()
    }

    /// Insert or replace an item.
    pub fn set(&mut self, block: &str, item: &str, value: impl ToString) {
        self.blocks.entry(block.to_string()).or_default().insert(
            item.to_string(),
            Entry {
                value: value.to_string(),
                used: Cell::new(false),
            },
        );
    }

    /// Whether an item is present (subitem form first).
    pub fn has_item(&self, block: &str, item: &str, subitem: Option<&str>) -> bool {
        self.lookup(block, item, subitem).is_some()
    }

    /// Read a required item.
    pub fn get_item<T: InputValue>(
        &self,
        block: &str,
        item: &str,
        subitem: Option<&str>,
    ) -> Result<T, ConfigError> {
        match self.lookup(block, item, subitem) {
            Some((key, entry)) => Self::parse_entry(block, &key, entry),
            None => Err(ConfigError::Missing {
                block: block.to_string(),
                item: Self::key(item, subitem),
            }),
        }
    }

    /// Read an optional item, falling back to `default` when absent.
    ///
    /// A present but malformed value is still an error.
    pub fn get_item_or<T: InputValue>(
        &self,
        block: &str,
        item: &str,
        subitem: Option<&str>,
        default: T,
    ) -> Result<T, ConfigError> {
        match self.lookup(block, item, subitem) {
            Some((key, entry)) => Self::parse_entry(block, &key, entry),
            None => Ok(default),
        }
    }

    /// Items that were never read, as `(block, item)` pairs.
    pub fn unused_items(&self) -> Vec<(String, String)> {
        self.blocks
            .iter()
            .flat_map(|(block, items)| {
                items
                    .iter()
                    .filter(|(_, entry)| !entry.used.get())
                    .map(move |(item, _)| (block.clone(), item.clone()))
            })
            .collect()
    }

    /// Total number of items across all blocks.
    pub fn len(&self) -> usize {
        self.blocks.values().map(BTreeMap::len).sum()
    }

    /// Whether no items are defined.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn key(item: &str, subitem: Option<&str>) -> String {
        match subitem {
            Some(sub) => format!("{}[{}]", item, sub),
            None => item.to_string(),
        }
    }

    fn lookup(&self, block: &str, item: &str, subitem: Option<&str>) -> Option<(String, &Entry)> {
        let items = self.blocks.get(block)?;
        if let Some(sub) = subitem {
            let key = Self::key(item, Some(sub));
            if let Some(entry) = items.get(&key) {
                return Some((key, entry));
            }
        }
        items.get(item).map(|entry| (item.to_string(), entry))
    }

    fn parse_entry<T: InputValue>(block: &str, key: &str, entry: &Entry) -> Result<T, ConfigError> {
        entry.used.set(true);
        T::parse_value(&entry.value).ok_or_else(|| ConfigError::InvalidValue {
            block: block.to_string(),
            item: key.to_string(),
            value: entry.value.clone(),
            expected: T::TYPE_NAME,
        })
    }
}

impl FromStr for Input {
    type Err = ConfigError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut input = Input::new();
        let mut block: Option<String> = None;

        for (line_idx, raw) in text.lines().enumerate() {
            let line_num = line_idx + 1;
            let line = raw.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }

            if let Some(rest) = line.strip_prefix('[') {
                let name = rest.strip_suffix(']').ok_or_else(|| ConfigError::Parse {
                    line: line_num,
                    message: format!("unterminated block header '{}'", line),
                })?;
                let name = name.trim();
                if name.is_empty() {
                    return Err(ConfigError::Parse {
                        line: line_num,
                        message: "empty block name".to_string(),
                    });
                }
                input.blocks.entry(name.to_string()).or_default();
                block = Some(name.to_string());
                continue;
            }

            let Some((item, value)) = line.split_once('=') else {
                return Err(ConfigError::Parse {
                    line: line_num,
                    message: format!("illegal input line '{}'", line),
                });
            };
            let (item, value) = (item.trim(), value.trim());
            if item.is_empty() || value.is_empty() {
                return Err(ConfigError::Parse {
                    line: line_num,
                    message: format!("item without name or value '{}'", line),
                });
            }

            let Some(block_name) = block.as_deref() else {
                return Err(ConfigError::Parse {
                    line: line_num,
                    message: format!("item '{}' appears before any [block]", item),
                });
            };

            if input.has_item(block_name, item, None) {
                return Err(ConfigError::Duplicate {
                    block: block_name.to_string(),
                    item: item.to_string(),
                    line: line_num,
                });
            }
            input.set(block_name, item, value);
        }

        Ok(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
# slope case
[grid]
itot = 32   # trailing comment
swspatialorder=4

[thermo]
swthermo = slope
alpha = 0.1
n2 = 1.0

[fields]
svisc = 2e-5
svisc[b] = 1e-5
";

    #[test]
    fn test_parse_blocks_and_items() {
        let input: Input = SAMPLE.parse().unwrap();
        assert_eq!(input.len(), 7);
        assert_eq!(input.get_item::<usize>("grid", "itot", None).unwrap(), 32);
        assert_eq!(
            input.get_item::<String>("grid", "swspatialorder", None).unwrap(),
            "4"
        );
        assert_eq!(input.get_item::<f64>("thermo", "alpha", None).unwrap(), 0.1);
    }

    #[test]
    fn test_subitem_precedence() {
        let input: Input = SAMPLE.parse().unwrap();
        assert_eq!(input.get_item::<f64>("fields", "svisc", Some("b")).unwrap(), 1e-5);
        assert_eq!(input.get_item::<f64>("fields", "svisc", Some("qt")).unwrap(), 2e-5);
        assert_eq!(input.get_item::<f64>("fields", "svisc", None).unwrap(), 2e-5);
    }

    #[test]
    fn test_invalid_value_is_error() {
        let input: Input = "[thermo]\nalpha = 0.1x\n".parse().unwrap();
        let err = input.get_item::<f64>("thermo", "alpha", None).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { expected: "double", .. }));
    }

    #[test]
    fn test_integer_rejects_fraction() {
        let input: Input = "[grid]\nitot = 3.5\n".parse().unwrap();
        assert!(input.get_item::<usize>("grid", "itot", None).is_err());
        assert!(input.get_item::<i64>("grid", "itot", None).is_err());
    }

    #[test]
    fn test_bool_forms() {
        let input: Input = "[a]\nx = true\ny = 0\nz = yes\n".parse().unwrap();
        assert!(input.get_item::<bool>("a", "x", None).unwrap());
        assert!(!input.get_item::<bool>("a", "y", None).unwrap());
        assert!(input.get_item::<bool>("a", "z", None).is_err());
    }

    #[test]
    fn test_missing_and_default() {
        let input: Input = SAMPLE.parse().unwrap();
        assert!(matches!(
            input.get_item::<f64>("thermo", "missing", None),
            Err(ConfigError::Missing { .. })
        ));
        assert_eq!(input.get_item_or("grid", "utrans", None, 0.5).unwrap(), 0.5);
    }

    #[test]
    fn test_malformed_lines() {
        assert!(matches!(
            "itot = 3\n".parse::<Input>(),
            Err(ConfigError::Parse { line: 1, .. })
        ));
        assert!(matches!(
            "[grid]\nnot a line\n".parse::<Input>(),
            Err(ConfigError::Parse { line: 2, .. })
        ));
        assert!(matches!(
            "[grid\n".parse::<Input>(),
            Err(ConfigError::Parse { line: 1, .. })
        ));
        assert!(matches!(
            "[grid]\na = 1\na = 2\n".parse::<Input>(),
            Err(ConfigError::Duplicate { line: 3, .. })
        ));
    }

    #[test]
    fn test_unused_items() {
        let input: Input = SAMPLE.parse().unwrap();
        input.get_item::<usize>("grid", "itot", None).unwrap();
        input.get_item::<f64>("fields", "svisc", Some("b")).unwrap();
        let unused = input.unused_items();
        assert!(unused.contains(&("thermo".to_string(), "alpha".to_string())));
        assert!(unused.contains(&("fields".to_string(), "svisc".to_string())));
        assert!(!unused.contains(&("grid".to_string(), "itot".to_string())));
        assert!(!unused.contains(&("fields".to_string(), "svisc[b]".to_string())));
    }
}
