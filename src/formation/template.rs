//! Formation templates
//!
//! A template is a rectangular matrix of small integers: 0 empty, 1 light
//! infantry, 2 heavy infantry, 3 archer. Row index is depth (distance from
//! the front line), column index is lateral offset. Validation happens at
//! construction so a malformed template aborts unit setup instead of
//! silently producing a broken formation.

use serde::{Deserialize, Serialize};

use crate::core::error::{BattleError, Result};
use crate::core::types::SoldierClass;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<u8>>", into = "Vec<Vec<u8>>")]
pub struct FormationTemplate {
    rows: Vec<Vec<u8>>,
}

impl FormationTemplate {
    /// Validate and wrap a matrix. An empty matrix is a valid (empty)
    /// formation; ragged rows and unknown class codes are errors.
    pub fn new(rows: Vec<Vec<u8>>) -> Result<Self> {
        if let Some(first) = rows.first() {
            let expected = first.len();
            for (index, row) in rows.iter().enumerate() {
                if row.len() != expected {
                    return Err(BattleError::RaggedFormation {
                        row: index,
                        expected,
                        found: row.len(),
                    });
                }
                for (col, &code) in row.iter().enumerate() {
                    if code != 0 && SoldierClass::from_code(code).is_none() {
                        return Err(BattleError::UnknownClassCode {
                            code,
                            row: index,
                            col,
                        });
                    }
                }
            }
        }
        Ok(Self { rows })
    }

    /// Parse the JSON wire format: a 2D integer array
    pub fn from_json_str(json: &str) -> Result<Self> {
        let rows: Vec<Vec<u8>> = serde_json::from_str(json)?;
        Self::new(rows)
    }

    pub fn rows(&self) -> usize {
        self.rows.len()
    }

    pub fn columns(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Class at a cell, None for empty cells
    pub fn class_at(&self, row: usize, col: usize) -> Option<SoldierClass> {
        SoldierClass::from_code(self.rows[row][col])
    }

    /// Number of non-empty cells
    pub fn soldier_count(&self) -> usize {
        self.rows
            .iter()
            .map(|row| row.iter().filter(|&&c| c != 0).count())
            .sum()
    }

    /// Uniform block of one class, the common case for test armies
    pub fn uniform(rows: usize, columns: usize, code: u8) -> Result<Self> {
        Self::new(vec![vec![code; columns]; rows])
    }
}

impl TryFrom<Vec<Vec<u8>>> for FormationTemplate {
    type Error = BattleError;

    fn try_from(rows: Vec<Vec<u8>>) -> Result<Self> {
        Self::new(rows)
    }
}

impl From<FormationTemplate> for Vec<Vec<u8>> {
    fn from(template: FormationTemplate) -> Self {
        template.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_template() {
        let template = FormationTemplate::new(vec![vec![1, 0, 3], vec![2, 2, 0]]).unwrap();
        assert_eq!(template.rows(), 2);
        assert_eq!(template.columns(), 3);
        assert_eq!(template.soldier_count(), 4);
        assert_eq!(template.class_at(0, 0), Some(SoldierClass::LightInfantry));
        assert_eq!(template.class_at(0, 1), None);
        assert_eq!(template.class_at(0, 2), Some(SoldierClass::Archer));
        assert_eq!(template.class_at(1, 0), Some(SoldierClass::HeavyInfantry));
    }

    #[test]
    fn test_empty_template_is_valid() {
        let template = FormationTemplate::new(vec![]).unwrap();
        assert!(template.is_empty());
        assert_eq!(template.soldier_count(), 0);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = FormationTemplate::new(vec![vec![1, 1, 1], vec![1, 1]]).unwrap_err();
        assert!(matches!(
            err,
            BattleError::RaggedFormation {
                row: 1,
                expected: 3,
                found: 2
            }
        ));
    }

    #[test]
    fn test_unknown_class_code_rejected() {
        let err = FormationTemplate::new(vec![vec![1, 7]]).unwrap_err();
        assert!(matches!(
            err,
            BattleError::UnknownClassCode {
                code: 7,
                row: 0,
                col: 1
            }
        ));
    }

    #[test]
    fn test_json_round_trip() {
        let template = FormationTemplate::from_json_str("[[1,2],[3,0]]").unwrap();
        assert_eq!(template.rows(), 2);
        assert_eq!(template.soldier_count(), 3);

        let json = serde_json::to_string(&template).unwrap();
        assert_eq!(json, "[[1,2],[3,0]]");
    }

    #[test]
    fn test_json_ragged_rejected() {
        assert!(FormationTemplate::from_json_str("[[1,2],[3]]").is_err());
    }
}
