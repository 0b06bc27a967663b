use crate::domain::model::{Impact, ScoredTable};
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct CriterionSummary {
    pub name: String,
    pub weight: f64,
    pub impact: Impact,
    pub ideal_best: f64,
    pub ideal_worst: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AlternativeSummary {
    pub id: String,
    pub values: Vec<f64>,
    pub dist_best: f64,
    pub dist_worst: f64,
    pub closeness: f64,
    pub rank: usize,
}

/// Full breakdown of a scoring run, alternatives in input order.
#[derive(Debug, Clone, Serialize)]
pub struct RankingReport {
    pub generated_at: DateTime<Utc>,
    pub id_column: String,
    pub criteria: Vec<CriterionSummary>,
    pub alternatives: Vec<AlternativeSummary>,
}

impl RankingReport {
    pub fn from_scored(scored: &ScoredTable) -> Self {
        let table = scored.table();
        let criteria = (0..table.criteria_count())
            .map(|j| CriterionSummary {
                name: table.criterion_name(j),
                weight: scored.weights()[j],
                impact: scored.impacts()[j],
                ideal_best: scored.ideal_best()[j],
                ideal_worst: scored.ideal_worst()[j],
            })
            .collect();

        let alternatives = scored
            .rows()
            .map(|(row, outcome)| AlternativeSummary {
                id: row.id.clone(),
                values: row.values.clone(),
                dist_best: outcome.dist_best,
                dist_worst: outcome.dist_worst,
                closeness: outcome.closeness,
                rank: outcome.rank,
            })
            .collect();

        Self {
            generated_at: Utc::now(),
            id_column: table.id_column_name().to_string(),
            criteria,
            alternatives,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::topsis::TopsisEngine;
    use crate::domain::model::{Alternative, DecisionTable, ImpactVector, WeightVector};

    #[test]
    fn test_report_json_shape() {
        let table = DecisionTable::new(
            Some(vec!["Laptop".into(), "Price".into(), "Battery".into()]),
            vec![
                Alternative::new("L1", vec![900.0, 8.0]),
                Alternative::new("L2", vec![1200.0, 12.0]),
            ],
        )
        .unwrap();
        let scored = TopsisEngine::score(
            table,
            &WeightVector::parse("2,1").unwrap(),
            &ImpactVector::parse("-,+").unwrap(),
        )
        .unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&RankingReport::from_scored(&scored).to_json().unwrap()).unwrap();

        assert_eq!(json["id_column"], "Laptop");
        assert_eq!(json["criteria"][0]["name"], "Price");
        assert_eq!(json["criteria"][0]["impact"], "-");
        assert_eq!(json["criteria"][1]["weight"], 1.0);
        assert_eq!(json["alternatives"][1]["id"], "L2");
        assert_eq!(json["alternatives"].as_array().unwrap().len(), 2);
        assert!(json["generated_at"].is_string());
    }
}
