// Devrs Device Table
// Parsed lookup table mapping hardware model identifiers to device data

use crate::csv;

/// Recognized header titles, matched case-exactly.
pub const DEVICE_NAME_TITLE: &str = "Device Name";
pub const MODEL_NAMES_TITLE: &str = "Model Names";
pub const NOTCH_HEIGHT_TITLE: &str = "Notch Height";

/// Column indices for the three recognized fields.
///
/// The header row declares which column holds which field; any column
/// arrangement is supported. A title that is absent from the header
/// falls back to its default index (0 / 1 / 2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    /// Column holding the display name
    pub device_name: usize,
    /// Column holding the semicolon-delimited model identifiers
    pub model_names: usize,
    /// Column holding the notch height
    pub notch_height: usize,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            device_name: 0,
            model_names: 1,
            notch_height: 2,
        }
    }
}

impl ColumnLayout {
    /// Build a layout from header titles, keeping defaults for any
    /// recognized title that does not appear.
    pub fn from_header(titles: &[&str]) -> Self {
        let mut layout = Self::default();
        for (idx, title) in titles.iter().enumerate() {
            match *title {
                DEVICE_NAME_TITLE => layout.device_name = idx,
                MODEL_NAMES_TITLE => layout.model_names = idx,
                NOTCH_HEIGHT_TITLE => layout.notch_height = idx,
                _ => {}
            }
        }
        layout
    }

    /// Highest column index any recognized field lives in.
    ///
    /// Rows with fewer fields than this are truncated and get skipped.
    pub fn max_index(&self) -> usize {
        self.device_name.max(self.model_names).max(self.notch_height)
    }
}

/// One table entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceRow {
    /// Display string (e.g. "iPhone 13")
    pub device_name: String,
    /// Raw hardware model strings that map to this row
    pub model_identifiers: Vec<String>,
    /// Display inset size; 0 for devices without a notch
    pub notch_height: u32,
}

impl DeviceRow {
    /// Whether this row claims the given model identifier.
    pub fn matches(&self, model: &str) -> bool {
        self.model_identifiers.iter().any(|m| m == model)
    }
}

/// A parsed, ordered device table.
///
/// Rebuilt from raw text on every load and discarded after the scan;
/// row order in the source is authoritative for tie-breaking.
#[derive(Debug, Clone)]
pub struct DeviceTable {
    layout: ColumnLayout,
    rows: Vec<DeviceRow>,
    skipped_lines: usize,
}

impl DeviceTable {
    /// Parse a table from raw text.
    ///
    /// The first non-empty line is the header. Malformed lines (no
    /// split points, unbalanced quotes, too few fields) are skipped and
    /// counted, never fatal. An empty input yields an empty table.
    pub fn parse(raw: &str) -> Self {
        let lines = csv::split_lines(raw);
        let mut lines = lines.into_iter();

        let layout = match lines.next().and_then(csv::split_fields) {
            Some(titles) => ColumnLayout::from_header(&titles),
            None => ColumnLayout::default(),
        };
        let max_index = layout.max_index();

        let mut rows = Vec::new();
        let mut skipped_lines = 0;
        for line in lines {
            let fields = match csv::split_fields(line) {
                Some(fields) => fields,
                None => {
                    log::debug!("skipping table line with no split points: {:?}", line);
                    skipped_lines += 1;
                    continue;
                }
            };
            if fields.len() <= max_index {
                log::debug!("skipping truncated table line: {:?}", line);
                skipped_lines += 1;
                continue;
            }

            let model_identifiers: Vec<String> = csv::strip_outer_quotes(fields[layout.model_names])
                .split(';')
                .map(str::to_string)
                .collect();
            // Height parse failure is non-fatal and defaults to 0.
            let notch_height = fields[layout.notch_height].parse().unwrap_or(0);

            rows.push(DeviceRow {
                device_name: fields[layout.device_name].to_string(),
                model_identifiers,
                notch_height,
            });
        }

        Self {
            layout,
            rows,
            skipped_lines,
        }
    }

    /// Column layout declared by the header (or defaults).
    pub fn layout(&self) -> ColumnLayout {
        self.layout
    }

    /// All parsed rows, in source order.
    pub fn rows(&self) -> &[DeviceRow] {
        &self.rows
    }

    /// Number of parsed rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of non-header lines skipped as malformed.
    pub fn skipped_lines(&self) -> usize {
        self.skipped_lines
    }

    /// Find the first row claiming the given model identifier.
    ///
    /// First match wins; the table is expected to have no duplicate
    /// identifiers across rows, but malformed data may.
    pub fn find(&self, model: &str) -> Option<&DeviceRow> {
        self.rows.iter().find(|row| row.matches(model))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "Device Name,Model Names,Notch Height\n\
                          iPhone 13,\"iPhone14,2;iPhone14,3\",47\n\
                          iPhone SE,\"iPhone12,8\",0\n";

    #[test]
    fn test_layout_default() {
        let layout = ColumnLayout::default();
        assert_eq!(layout.device_name, 0);
        assert_eq!(layout.model_names, 1);
        assert_eq!(layout.notch_height, 2);
        assert_eq!(layout.max_index(), 2);
    }

    #[test]
    fn test_layout_from_reordered_header() {
        let layout =
            ColumnLayout::from_header(&["Notch Height", "Device Name", "Model Names"]);
        assert_eq!(layout.notch_height, 0);
        assert_eq!(layout.device_name, 1);
        assert_eq!(layout.model_names, 2);
    }

    #[test]
    fn test_layout_missing_title_keeps_default() {
        // "Model Names" absent: stays at its default index 1.
        let layout = ColumnLayout::from_header(&["Device Name", "Comment", "Notch Height"]);
        assert_eq!(layout.device_name, 0);
        assert_eq!(layout.model_names, 1);
        assert_eq!(layout.notch_height, 2);
    }

    #[test]
    fn test_layout_titles_are_case_exact() {
        let layout = ColumnLayout::from_header(&["device name", "MODEL NAMES", "Notch Height"]);
        assert_eq!(layout.device_name, 0);
        assert_eq!(layout.model_names, 1);
        assert_eq!(layout.notch_height, 2);
    }

    #[test]
    fn test_layout_extra_columns() {
        let layout = ColumnLayout::from_header(&[
            "Release Year",
            "Device Name",
            "Screen Size",
            "Model Names",
            "Notch Height",
        ]);
        assert_eq!(layout.device_name, 1);
        assert_eq!(layout.model_names, 3);
        assert_eq!(layout.notch_height, 4);
        assert_eq!(layout.max_index(), 4);
    }

    #[test]
    fn test_parse_sample() {
        let table = DeviceTable::parse(SAMPLE);
        assert_eq!(table.len(), 2);
        assert_eq!(table.skipped_lines(), 0);
        assert_eq!(table.rows()[0].device_name, "iPhone 13");
        assert_eq!(
            table.rows()[0].model_identifiers,
            vec!["iPhone14,2".to_string(), "iPhone14,3".to_string()]
        );
        assert_eq!(table.rows()[0].notch_height, 47);
    }

    #[test]
    fn test_parse_crlf_line_endings() {
        let raw = SAMPLE.replace('\n', "\r\n");
        let table = DeviceTable::parse(&raw);
        assert_eq!(table.len(), 2);
        assert_eq!(table.skipped_lines(), 0);
    }

    #[test]
    fn test_parse_empty_input() {
        let table = DeviceTable::parse("");
        assert!(table.is_empty());
        assert_eq!(table.layout(), ColumnLayout::default());
    }

    #[test]
    fn test_parse_header_only() {
        let table = DeviceTable::parse("Device Name,Model Names,Notch Height\n");
        assert!(table.is_empty());
    }

    #[test]
    fn test_parse_skips_truncated_row() {
        let raw = "Device Name,Model Names,Notch Height\n\
                   iPhone 13,\"iPhone14,5\"\n\
                   iPhone SE,\"iPhone12,8\",0\n";
        let table = DeviceTable::parse(raw);
        assert_eq!(table.len(), 1);
        assert_eq!(table.skipped_lines(), 1);
        assert_eq!(table.rows()[0].device_name, "iPhone SE");
    }

    #[test]
    fn test_parse_skips_unbalanced_quotes() {
        let raw = "Device Name,Model Names,Notch Height\n\
                   iPhone 13,\"iPhone14,5,47\n\
                   iPhone SE,\"iPhone12,8\",0\n";
        let table = DeviceTable::parse(raw);
        assert_eq!(table.len(), 1);
        assert_eq!(table.skipped_lines(), 1);
    }

    #[test]
    fn test_parse_bad_height_defaults_to_zero() {
        let raw = "Device Name,Model Names,Notch Height\n\
                   iPhone 13,\"iPhone14,5\",notanumber\n";
        let table = DeviceTable::parse(raw);
        assert_eq!(table.rows()[0].notch_height, 0);
    }

    #[test]
    fn test_parse_unquoted_model_names() {
        // Quoting is optional when the field itself contains no comma.
        let raw = "Device Name,Model Names,Notch Height\n\
                   iPad Air,iPad13;iPad14,0\n";
        let table = DeviceTable::parse(raw);
        assert_eq!(
            table.rows()[0].model_identifiers,
            vec!["iPad13".to_string(), "iPad14".to_string()]
        );
    }

    #[test]
    fn test_parse_reordered_columns() {
        let raw = "Notch Height,Device Name,Model Names\n\
                   47,iPhone 13,\"iPhone14,5\"\n";
        let table = DeviceTable::parse(raw);
        assert_eq!(table.rows()[0].device_name, "iPhone 13");
        assert_eq!(table.rows()[0].notch_height, 47);
        assert_eq!(table.rows()[0].model_identifiers, vec!["iPhone14,5".to_string()]);
    }

    #[test]
    fn test_find_match() {
        let table = DeviceTable::parse(SAMPLE);
        let row = table.find("iPhone14,3").unwrap();
        assert_eq!(row.device_name, "iPhone 13");
        assert_eq!(row.notch_height, 47);
    }

    #[test]
    fn test_find_no_match() {
        let table = DeviceTable::parse(SAMPLE);
        assert!(table.find("iPhone99,9").is_none());
    }

    #[test]
    fn test_find_first_match_wins() {
        let raw = "Device Name,Model Names,Notch Height\n\
                   First,\"iPhone14,2\",47\n\
                   Second,\"iPhone14,2\",50\n";
        let table = DeviceTable::parse(raw);
        let row = table.find("iPhone14,2").unwrap();
        assert_eq!(row.device_name, "First");
        assert_eq!(row.notch_height, 47);
    }

    #[test]
    fn test_identifier_match_is_exact() {
        let table = DeviceTable::parse(SAMPLE);
        assert!(table.find("iPhone14").is_none());
        assert!(table.find("iphone14,2").is_none());
    }
}
