use serde::Deserialize;

use crate::error::AppError;

fn full_channel() -> f64 {
    1.0
}

/// Background color of a cell. The spreadsheet service omits channels,
/// and an omitted channel reads as full intensity (white when all are missing).
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Color {
    #[serde(default = "full_channel")]
    pub red: f64,
    #[serde(default = "full_channel")]
    pub green: f64,
    #[serde(default = "full_channel")]
    pub blue: f64,
}

impl Color {
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);

    pub const fn new(red: f64, green: f64, blue: f64) -> Self {
        Color { red, green, blue }
    }

    /// Euclidean distance in RGB space
    pub fn distance(&self, other: &Color) -> f64 {
        ((self.red - other.red).powi(2)
            + (self.green - other.green).powi(2)
            + (self.blue - other.blue).powi(2))
        .sqrt()
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellFormat {
    #[serde(default)]
    pub background_color: Option<Color>,
}

/// One grid cell: display text plus the user-entered background color
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    #[serde(default)]
    pub formatted_value: Option<String>,
    #[serde(default)]
    pub user_entered_format: Option<CellFormat>,
}

impl Cell {
    #[cfg(test)]
    pub fn new(text: &str, background: Option<Color>) -> Self {
        Cell {
            formatted_value: Some(text.to_string()),
            user_entered_format: background.map(|color| CellFormat {
                background_color: Some(color),
            }),
        }
    }

    /// Trimmed display text, empty when the cell has no value
    pub fn text(&self) -> &str {
        self.formatted_value.as_deref().unwrap_or("").trim()
    }

    pub fn background(&self) -> Color {
        self.user_entered_format
            .as_ref()
            .and_then(|format| format.background_color)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Row {
    #[serde(default)]
    pub values: Vec<Cell>,
}

impl Row {
    #[cfg(test)]
    pub fn new(values: Vec<Cell>) -> Self {
        Row { values }
    }

    /// Text of the cell at `index`, empty when the row is shorter
    pub fn text_at(&self, index: usize) -> &str {
        self.values.get(index).map(Cell::text).unwrap_or("")
    }
}

#[derive(Debug, Deserialize)]
struct Spreadsheet {
    #[serde(default)]
    sheets: Vec<Sheet>,
}

#[derive(Debug, Deserialize)]
struct Sheet {
    #[serde(default)]
    data: Vec<GridData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GridData {
    #[serde(default)]
    row_data: Vec<Row>,
}

/// Decodes a `spreadsheets.get?includeGridData=true` response and returns
/// the rows of the first requested range.
pub fn rows_from_json(bytes: &[u8]) -> Result<Vec<Row>, AppError> {
    let spreadsheet: Spreadsheet = serde_json::from_slice(bytes)?;
    let grid = spreadsheet
        .sheets
        .into_iter()
        .next()
        .and_then(|sheet| sheet.data.into_iter().next())
        .ok_or(AppError::EmptySpreadsheet)?;
    Ok(grid.row_data)
}
