//! Wire types exchanged with the finance API.
//!
//! Records are decoded leniently: unknown fields are ignored, optional
//! relations default to `None`, and monetary amounts accept either JSON
//! numbers or numeric strings. Create bodies (`New*`) and update bodies
//! (`*Patch`) are encoded in camelCase, with absent patch fields omitted.

use serde::{Deserialize, Serialize};

pub type RecordId = i64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: RecordId,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl User {
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.email,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementKind {
    #[serde(alias = "ingreso", alias = "INCOME")]
    Income,
    #[serde(alias = "gasto", alias = "egreso", alias = "EXPENSE")]
    Expense,
}

impl MovementKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Income => "Income",
            Self::Expense => "Expense",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movement {
    pub id: RecordId,
    #[serde(default)]
    pub description: String,
    #[serde(deserialize_with = "amount::deserialize")]
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: MovementKind,
    #[serde(default)]
    pub date: String,
    #[serde(default, alias = "category_id")]
    pub category_id: Option<RecordId>,
    #[serde(default)]
    pub category: Option<Category>,
}

impl Movement {
    /// Amount with the sign implied by the movement kind.
    pub fn signed_amount(&self) -> f64 {
        match self.kind {
            MovementKind::Income => self.amount.abs(),
            MovementKind::Expense => -self.amount.abs(),
        }
    }

    pub fn category_name(&self) -> Option<&str> {
        self.category.as_ref().map(|category| category.name.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMovement {
    pub description: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: MovementKind,
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<RecordId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<MovementKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<RecordId>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Category {
    pub id: RecordId,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: Option<MovementKind>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewCategory {
    pub name: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<MovementKind>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CategoryPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<MovementKind>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: RecordId,
    #[serde(deserialize_with = "amount::deserialize")]
    pub amount: f64,
    #[serde(default)]
    pub month: Option<u32>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default, alias = "category_id")]
    pub category_id: Option<RecordId>,
    #[serde(default)]
    pub category: Option<Category>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBudget {
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<RecordId>,
}

impl NewBudget {
    pub fn new(amount: f64) -> Self {
        Self {
            amount,
            month: None,
            year: None,
            category_id: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<RecordId>,
}

/// Income, expense and balance of one calendar month.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MonthlySummary {
    #[serde(default, deserialize_with = "amount::deserialize")]
    pub income: f64,
    #[serde(default, deserialize_with = "amount::deserialize")]
    pub expense: f64,
    #[serde(default, deserialize_with = "amount::deserialize")]
    pub balance: f64,
    #[serde(default)]
    pub movements: Vec<Movement>,
}

mod amount {
    use serde::{de, Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = match Raw::deserialize(deserializer)? {
            Raw::Number(value) => value,
            Raw::Text(text) => text.trim().parse::<f64>().map_err(de::Error::custom)?,
        };
        if value.is_finite() {
            Ok(value)
        } else {
            Err(de::Error::custom(format!("amount {value} is not finite")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn amounts_decode_from_numbers_and_strings() {
        let movements: Vec<Movement> = serde_json::from_value(json!([
            { "id": 1, "description": "Salary", "amount": 1500, "type": "income", "date": "2026-10-01" },
            { "id": 2, "description": "Rent", "amount": "700.50", "type": "expense", "date": "2026-10-02", "categoryId": 4 }
        ]))
        .unwrap();

        assert_eq!(movements[0].amount, 1500.0);
        assert_eq!(movements[1].amount, 700.5);
        assert_eq!(movements[1].category_id, Some(4));
        assert_eq!(movements[1].signed_amount(), -700.5);
    }

    #[test]
    fn non_numeric_amount_is_rejected() {
        let result = serde_json::from_value::<Budget>(json!({ "id": 1, "amount": "lots" }));
        assert!(result.is_err());
    }

    #[rstest]
    #[case("NaN")]
    #[case("-inf")]
    #[case("infinity")]
    #[case("1e400")]
    fn non_finite_amount_is_rejected(#[case] raw: &str) {
        let result = serde_json::from_value::<Budget>(json!({ "id": 1, "amount": raw }));
        assert!(result.is_err());
    }

    #[test]
    fn huge_finite_amount_still_decodes() {
        let budget: Budget = serde_json::from_value(json!({ "id": 1, "amount": "-1e300" })).unwrap();
        assert_eq!(budget.amount, -1e300);
    }

    #[test]
    fn spanish_kind_aliases_are_accepted() {
        let category: Category =
            serde_json::from_value(json!({ "id": 3, "name": "Comida", "type": "gasto" })).unwrap();
        assert_eq!(category.kind, Some(MovementKind::Expense));
    }

    #[test]
    fn patch_bodies_omit_absent_fields() {
        let patch = BudgetPatch {
            amount: Some(250.0),
            ..BudgetPatch::default()
        };
        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({ "amount": 250.0 }));

        let patch = MovementPatch {
            kind: Some(MovementKind::Income),
            category_id: Some(9),
            ..MovementPatch::default()
        };
        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            json!({ "type": "income", "categoryId": 9 })
        );
    }

    #[test]
    fn summary_defaults_missing_fields() {
        let summary: MonthlySummary = serde_json::from_value(json!({ "income": "20" })).unwrap();
        assert_eq!(summary.income, 20.0);
        assert_eq!(summary.expense, 0.0);
        assert!(summary.movements.is_empty());
    }

    #[test]
    fn login_response_tolerates_missing_user() {
        let response: LoginResponse =
            serde_json::from_value(json!({ "access_token": "T" })).unwrap();
        assert_eq!(response.access_token, "T");
        assert!(response.user.is_none());
    }

    #[test]
    fn display_name_falls_back_to_email() {
        let user = User {
            id: 1,
            email: "ana@example.test".to_string(),
            name: Some("  ".to_string()),
        };
        assert_eq!(user.display_name(), "ana@example.test");
    }
}
