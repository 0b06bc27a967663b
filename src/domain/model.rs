use crate::utils::error::{Result, TopsisError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One row of the decision table: an opaque identifier plus its criterion values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alternative {
    pub id: String,
    pub values: Vec<f64>,
    /// Criterion cells as they appeared in the source, when read from text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cells: Option<Vec<String>>,
}

impl Alternative {
    pub fn new(id: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            id: id.into(),
            values,
            cells: None,
        }
    }

    pub fn with_cells(mut self, cells: Vec<String>) -> Self {
        self.cells = Some(cells);
        self
    }

    /// Source text of criterion `column`, or the value's shortest rendering.
    pub fn cell_text(&self, column: usize) -> String {
        self.cells
            .as_ref()
            .and_then(|cells| cells.get(column))
            .cloned()
            .unwrap_or_else(|| self.values[column].to_string())
    }
}

/// A rectangular, fully numeric alternatives x criteria table.
///
/// Construction enforces the table invariants, so every `DecisionTable`
/// in circulation has at least one row, at least one criterion, equal
/// row lengths and only finite values.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionTable {
    header: Option<Vec<String>>,
    rows: Vec<Alternative>,
    criteria: usize,
}

impl DecisionTable {
    pub fn new(header: Option<Vec<String>>, rows: Vec<Alternative>) -> Result<Self> {
        let first = rows.first().ok_or_else(|| {
            TopsisError::validation("table", "", "table has no alternatives")
        })?;
        let criteria = first.values.len();

        if let Some(names) = &header {
            if names.len() < 2 {
                return Err(TopsisError::validation(
                    "table header",
                    names.join(","),
                    "expected an identifier column followed by at least one criterion column",
                ));
            }
            if names.len() != criteria + 1 {
                return Err(TopsisError::validation(
                    "table header",
                    names.join(","),
                    format!(
                        "header has {} criterion columns but rows have {}",
                        names.len() - 1,
                        criteria
                    ),
                ));
            }
        }

        let table = Self {
            header,
            rows,
            criteria,
        };

        if criteria == 0 {
            return Err(TopsisError::validation(
                table.row_field(0),
                "",
                "expected at least one criterion column after the identifier",
            ));
        }

        for (i, row) in table.rows.iter().enumerate() {
            if row.values.len() != criteria {
                return Err(TopsisError::validation(
                    table.row_field(i),
                    row.values.len().to_string(),
                    format!("expected {} criterion values", criteria),
                ));
            }
            if let Some(cells) = &row.cells {
                if cells.len() != criteria {
                    return Err(TopsisError::validation(
                        table.row_field(i),
                        cells.len().to_string(),
                        format!("expected {} criterion cells", criteria),
                    ));
                }
            }
            for (j, value) in row.values.iter().enumerate() {
                if !value.is_finite() {
                    return Err(TopsisError::validation(
                        table.cell_field(i, j),
                        value.to_string(),
                        "criterion values must be finite numbers",
                    ));
                }
            }
        }

        Ok(table)
    }

    pub fn criteria_count(&self) -> usize {
        self.criteria
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Alternative] {
        &self.rows
    }

    pub fn header(&self) -> Option<&[String]> {
        self.header.as_deref()
    }

    pub fn id_column_name(&self) -> &str {
        self.header
            .as_ref()
            .and_then(|h| h.first())
            .map(String::as_str)
            .unwrap_or("Alternative")
    }

    pub fn criterion_name(&self, column: usize) -> String {
        self.header
            .as_ref()
            .and_then(|h| h.get(column + 1))
            .cloned()
            .unwrap_or_else(|| format!("C{}", column + 1))
    }

    pub fn criterion_names(&self) -> Vec<String> {
        (0..self.criteria).map(|j| self.criterion_name(j)).collect()
    }

    /// Column-major copy of criterion `column`.
    pub fn column(&self, column: usize) -> Vec<f64> {
        self.rows.iter().map(|row| row.values[column]).collect()
    }

    fn row_field(&self, row: usize) -> String {
        let id = self.rows.get(row).map(|r| r.id.as_str()).unwrap_or("");
        format!("table row {} ({})", row + 1, id)
    }

    fn cell_field(&self, row: usize, column: usize) -> String {
        format!("{}, column '{}'", self.row_field(row), self.criterion_name(column))
    }
}

/// Per-criterion positive weights.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightVector(Vec<f64>);

impl WeightVector {
    pub fn new(weights: Vec<f64>) -> Result<Self> {
        if weights.is_empty() {
            return Err(TopsisError::validation("weights", "", "at least one weight is required"));
        }
        for (k, weight) in weights.iter().enumerate() {
            if !weight.is_finite() || *weight <= 0.0 {
                return Err(TopsisError::validation(
                    format!("weights[{}]", k),
                    weight.to_string(),
                    "weights must be positive finite numbers",
                ));
            }
        }
        Ok(Self(weights))
    }

    /// Parses the comma-separated form used on the command line, e.g. `1,1,2,0.5`.
    pub fn parse(input: &str) -> Result<Self> {
        let mut weights = Vec::new();
        for (k, token) in input.split(',').map(str::trim).enumerate() {
            let weight = token.parse::<f64>().map_err(|_| {
                TopsisError::validation(format!("weights[{}]", k), token, "not a number")
            })?;
            weights.push(weight);
        }
        Self::new(weights)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

impl FromStr for WeightVector {
    type Err = TopsisError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Direction of a criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Impact {
    /// Higher is better (`+`).
    #[serde(rename = "+")]
    Benefit,
    /// Lower is better (`-`).
    #[serde(rename = "-")]
    Cost,
}

impl Impact {
    pub fn symbol(self) -> &'static str {
        match self {
            Impact::Benefit => "+",
            Impact::Cost => "-",
        }
    }
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Impact {
    type Err = TopsisError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "+" => Ok(Impact::Benefit),
            "-" => Ok(Impact::Cost),
            other => Err(TopsisError::validation("impact", other, "expected '+' or '-'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImpactVector(Vec<Impact>);

impl ImpactVector {
    pub fn new(impacts: Vec<Impact>) -> Result<Self> {
        if impacts.is_empty() {
            return Err(TopsisError::validation("impacts", "", "at least one impact is required"));
        }
        Ok(Self(impacts))
    }

    /// Parses the comma-separated form, e.g. `+,+,-,+`.
    pub fn parse(input: &str) -> Result<Self> {
        let mut impacts = Vec::new();
        for (k, token) in input.split(',').map(str::trim).enumerate() {
            let impact = token.parse::<Impact>().map_err(|_| {
                TopsisError::validation(format!("impacts[{}]", k), token, "expected '+' or '-'")
            })?;
            impacts.push(impact);
        }
        Self::new(impacts)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[Impact] {
        &self.0
    }
}

impl FromStr for ImpactVector {
    type Err = TopsisError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Separation measures, closeness and rank of one alternative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Outcome {
    pub dist_best: f64,
    pub dist_worst: f64,
    pub closeness: f64,
    pub rank: usize,
}

/// The input table plus one `Outcome` per row, in input row order.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredTable {
    table: DecisionTable,
    weights: Vec<f64>,
    impacts: Vec<Impact>,
    ideal_best: Vec<f64>,
    ideal_worst: Vec<f64>,
    outcomes: Vec<Outcome>,
}

impl ScoredTable {
    pub(crate) fn new(
        table: DecisionTable,
        weights: &WeightVector,
        impacts: &ImpactVector,
        ideal_best: Vec<f64>,
        ideal_worst: Vec<f64>,
        outcomes: Vec<Outcome>,
    ) -> Self {
        Self {
            table,
            weights: weights.as_slice().to_vec(),
            impacts: impacts.as_slice().to_vec(),
            ideal_best,
            ideal_worst,
            outcomes,
        }
    }

    pub fn table(&self) -> &DecisionTable {
        &self.table
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn impacts(&self) -> &[Impact] {
        &self.impacts
    }

    pub fn ideal_best(&self) -> &[f64] {
        &self.ideal_best
    }

    pub fn ideal_worst(&self) -> &[f64] {
        &self.ideal_worst
    }

    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    pub fn closeness(&self) -> Vec<f64> {
        self.outcomes.iter().map(|o| o.closeness).collect()
    }

    pub fn ranks(&self) -> Vec<usize> {
        self.outcomes.iter().map(|o| o.rank).collect()
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = (&Alternative, &Outcome)> {
        self.table.rows().iter().zip(self.outcomes.iter())
    }

    /// Rows ordered by rank; tied rows keep their input order.
    pub fn ranked(&self) -> Vec<(&Alternative, &Outcome)> {
        let mut rows: Vec<_> = self.rows().collect();
        rows.sort_by_key(|(_, outcome)| outcome.rank);
        rows
    }

    pub fn best(&self) -> Option<(&Alternative, &Outcome)> {
        self.ranked().into_iter().next()
    }
}

/// Rendered outputs of one scoring run, keyed by format extension.
#[derive(Debug, Clone)]
pub struct TransformResult {
    pub scored: ScoredTable,
    pub outputs: Vec<(String, String)>,
}
