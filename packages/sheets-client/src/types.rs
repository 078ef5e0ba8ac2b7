use serde::{Deserialize, Serialize};

/// Spreadsheet metadata, restricted to `sheets.properties`.
#[derive(Debug, Clone, Deserialize)]
pub struct Spreadsheet {
    #[serde(default)]
    pub sheets: Vec<Sheet>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Sheet {
    pub properties: SheetProperties,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheet_id: Option<i64>,
    pub title: String,
}

impl Spreadsheet {
    pub fn has_tab(&self, title: &str) -> bool {
        self.sheets.iter().any(|s| s.properties.title == title)
    }
}

/// Body of `spreadsheets.batchUpdate` with a single `addSheet` request.
#[derive(Debug, Serialize)]
pub struct BatchUpdateRequest {
    pub requests: Vec<serde_json::Value>,
}

impl BatchUpdateRequest {
    pub fn add_sheet(title: &str) -> Self {
        Self {
            requests: vec![serde_json::json!({
                "addSheet": { "properties": { "title": title } }
            })],
        }
    }
}

/// Body of `spreadsheets.values.update`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueRange {
    pub range: String,
    pub major_dimension: &'static str,
    pub values: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateValuesResponse {
    #[serde(default)]
    pub updated_rows: u32,
    #[serde(default)]
    pub updated_cells: u32,
}

/// Google API error envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub message: String,
}

/// A1 notation for `cells` on the named tab, with the title quoted.
pub fn tab_range(title: &str, cells: &str) -> String {
    format!("'{}'!{}", title.replace('\'', "''"), cells)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_tab() {
        let sheet: Spreadsheet = serde_json::from_str(
            r#"{"sheets":[{"properties":{"sheetId":0,"title":"Engineering"}}]}"#,
        )
        .unwrap();

        assert!(sheet.has_tab("Engineering"));
        assert!(!sheet.has_tab("Medical"));
    }

    #[test]
    fn test_empty_spreadsheet_has_no_tabs() {
        let sheet: Spreadsheet = serde_json::from_str("{}").unwrap();
        assert!(sheet.sheets.is_empty());
    }

    #[test]
    fn test_tab_range_quotes_title() {
        assert_eq!(tab_range("Top Colleges", "A1"), "'Top Colleges'!A1");
        assert_eq!(tab_range("Law's Best", "A:Z"), "'Law''s Best'!A:Z");
    }

    #[test]
    fn test_add_sheet_body() {
        let body = serde_json::to_value(BatchUpdateRequest::add_sheet("Medical")).unwrap();
        assert_eq!(body["requests"][0]["addSheet"]["properties"]["title"], "Medical");
    }

    #[test]
    fn test_value_range_serializes_camel_case() {
        let body = serde_json::to_value(ValueRange {
            range: "'X'!A1".into(),
            major_dimension: "ROWS",
            values: vec![vec!["a".into()]],
        })
        .unwrap();
        assert_eq!(body["majorDimension"], "ROWS");
    }
}
