//! The canonical structured result of a contract analysis.
//!
//! The model's JSON output is untrusted: fields may be absent, null, or of
//! the wrong type entirely. `ContractAnalysis::from_value` is the explicit
//! validation-and-defaulting pass that turns a provisional `serde_json::Value`
//! into a fully populated record. Every sequence defaults to empty and every
//! nullable scalar defaults to `None`, so consumers never branch on
//! "missing vs empty".

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// One party to the contract.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Party {
    pub name: String,
    pub role: String,
    pub contact_info: Option<String>,
}

/// Scope, deliverables and territory of the agreement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyTerms {
    pub scope_of_work: Option<String>,
    pub deliverables: Vec<String>,
    pub territory: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentTerms {
    pub amount: Option<String>,
    pub currency: Option<String>,
    pub schedule: Option<String>,
    pub method: Option<String>,
    pub invoicing: Option<String>,
    pub penalties: Option<String>,
    pub expenses: Option<String>,
}

/// A dated event. `kind` is one of milestone/deadline/termination/renewal in
/// practice but stays free text on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportantDate {
    pub date: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminationClause {
    #[serde(rename = "type")]
    pub kind: String,
    pub notice_period: Option<String>,
    pub conditions: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Confidentiality {
    pub applies: bool,
    pub duration: Option<String>,
    pub scope: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntellectualProperty {
    pub ownership: Option<String>,
    pub licenses: Option<String>,
    pub restrictions: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiabilityAndIndemnification {
    pub liability_cap: Option<String>,
    pub indemnification: Option<String>,
    pub insurance: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisputeResolution {
    pub method: Option<String>,
    pub jurisdiction: Option<String>,
    pub governing_law: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecialClause {
    pub title: String,
    pub description: String,
}

/// An identified risk. `severity` is low/medium/high in practice but stays
/// free text on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Risk {
    pub category: String,
    pub description: String,
    pub severity: String,
    pub mitigation: Option<String>,
}

/// The full structured analysis of one contract.
///
/// Produced once per request by the response parser, never mutated after
/// creation, and held only in request/response memory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractAnalysis {
    pub contract_type: String,
    pub parties: Vec<Party>,
    pub effective_date: Option<String>,
    pub duration: Option<String>,
    pub key_terms: KeyTerms,
    /// Obligations keyed by party name. Keys are free-form and not
    /// guaranteed to match `parties[].name`.
    pub obligations: BTreeMap<String, Vec<String>>,
    pub payment_terms: PaymentTerms,
    pub important_dates: Vec<ImportantDate>,
    pub termination_clauses: Vec<TerminationClause>,
    pub renewal_terms: Option<String>,
    pub confidentiality: Confidentiality,
    pub intellectual_property: IntellectualProperty,
    pub liability_and_indemnification: LiabilityAndIndemnification,
    pub warranties_and_representations: Vec<String>,
    pub dispute_resolution: DisputeResolution,
    pub special_clauses: Vec<SpecialClause>,
    pub risks: Vec<Risk>,
    pub compliance_requirements: Vec<String>,
    pub amendments: Option<String>,
    pub notices: Option<String>,
    pub missing_elements: Vec<String>,
    pub red_flags: Vec<String>,
    pub text_analysis: String,
}

/// Coerce a scalar JSON value into a string. Numbers and booleans are
/// stringified; nulls, arrays and objects are not.
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn opt_string(obj: &Value, key: &str) -> Option<String> {
    obj.get(key).and_then(scalar_to_string)
}

fn string_or_empty(obj: &Value, key: &str) -> String {
    opt_string(obj, key).unwrap_or_default()
}

fn string_vec(obj: &Value, key: &str) -> Vec<String> {
    obj.get(key)
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(scalar_to_string).collect())
        .unwrap_or_default()
}

fn bool_or_false(obj: &Value, key: &str) -> bool {
    obj.get(key).and_then(Value::as_bool).unwrap_or(false)
}

/// Map each object entry of an array field through `f`, skipping entries
/// that are not objects.
fn object_vec<T>(obj: &Value, key: &str, f: impl Fn(&Value) -> T) -> Vec<T> {
    obj.get(key)
        .and_then(Value::as_array)
        .map(|items| items.iter().filter(|v| v.is_object()).map(&f).collect())
        .unwrap_or_default()
}

impl Party {
    fn from_value(value: &Value) -> Self {
        Self {
            name: string_or_empty(value, "name"),
            role: string_or_empty(value, "role"),
            contact_info: opt_string(value, "contact_info"),
        }
    }
}

impl KeyTerms {
    fn from_value(value: &Value) -> Self {
        Self {
            scope_of_work: opt_string(value, "scope_of_work"),
            deliverables: string_vec(value, "deliverables"),
            territory: opt_string(value, "territory"),
        }
    }
}

impl PaymentTerms {
    fn from_value(value: &Value) -> Self {
        Self {
            amount: opt_string(value, "amount"),
            currency: opt_string(value, "currency"),
            schedule: opt_string(value, "schedule"),
            method: opt_string(value, "method"),
            invoicing: opt_string(value, "invoicing"),
            penalties: opt_string(value, "penalties"),
            expenses: opt_string(value, "expenses"),
        }
    }
}

impl ImportantDate {
    fn from_value(value: &Value) -> Self {
        Self {
            date: string_or_empty(value, "date"),
            description: string_or_empty(value, "description"),
            kind: string_or_empty(value, "type"),
        }
    }
}

impl TerminationClause {
    fn from_value(value: &Value) -> Self {
        Self {
            kind: string_or_empty(value, "type"),
            notice_period: opt_string(value, "notice_period"),
            conditions: opt_string(value, "conditions"),
        }
    }
}

impl Confidentiality {
    fn from_value(value: &Value) -> Self {
        Self {
            applies: bool_or_false(value, "applies"),
            duration: opt_string(value, "duration"),
            scope: opt_string(value, "scope"),
        }
    }
}

impl IntellectualProperty {
    fn from_value(value: &Value) -> Self {
        Self {
            ownership: opt_string(value, "ownership"),
            licenses: opt_string(value, "licenses"),
            restrictions: opt_string(value, "restrictions"),
        }
    }
}

impl LiabilityAndIndemnification {
    fn from_value(value: &Value) -> Self {
        Self {
            liability_cap: opt_string(value, "liability_cap"),
            indemnification: opt_string(value, "indemnification"),
            insurance: opt_string(value, "insurance"),
        }
    }
}

impl DisputeResolution {
    fn from_value(value: &Value) -> Self {
        Self {
            method: opt_string(value, "method"),
            jurisdiction: opt_string(value, "jurisdiction"),
            governing_law: opt_string(value, "governing_law"),
        }
    }
}

impl SpecialClause {
    fn from_value(value: &Value) -> Self {
        Self {
            title: string_or_empty(value, "title"),
            description: string_or_empty(value, "description"),
        }
    }
}

impl Risk {
    fn from_value(value: &Value) -> Self {
        Self {
            category: string_or_empty(value, "category"),
            description: string_or_empty(value, "description"),
            severity: string_or_empty(value, "severity"),
            mitigation: opt_string(value, "mitigation"),
        }
    }
}

impl ContractAnalysis {
    /// Build a `ContractAnalysis` from an untyped JSON object, defaulting
    /// every absent or wrong-typed field instead of failing.
    pub fn from_value(value: &Value) -> Self {
        let obligations = value
            .get("obligations")
            .and_then(Value::as_object)
            .map(|map| {
                map.iter()
                    .filter_map(|(party, v)| match v {
                        Value::Array(items) => Some((
                            party.clone(),
                            items.iter().filter_map(scalar_to_string).collect(),
                        )),
                        // A single obligation string becomes a one-item list
                        Value::String(s) => Some((party.clone(), vec![s.clone()])),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default();

        let sub = |key: &str| value.get(key).cloned().unwrap_or(Value::Null);

        Self {
            contract_type: string_or_empty(value, "contract_type"),
            parties: object_vec(value, "parties", Party::from_value),
            effective_date: opt_string(value, "effective_date"),
            duration: opt_string(value, "duration"),
            key_terms: KeyTerms::from_value(&sub("key_terms")),
            obligations,
            payment_terms: PaymentTerms::from_value(&sub("payment_terms")),
            important_dates: object_vec(value, "important_dates", ImportantDate::from_value),
            termination_clauses: object_vec(
                value,
                "termination_clauses",
                TerminationClause::from_value,
            ),
            renewal_terms: opt_string(value, "renewal_terms"),
            confidentiality: Confidentiality::from_value(&sub("confidentiality")),
            intellectual_property: IntellectualProperty::from_value(&sub("intellectual_property")),
            liability_and_indemnification: LiabilityAndIndemnification::from_value(&sub(
                "liability_and_indemnification",
            )),
            warranties_and_representations: string_vec(value, "warranties_and_representations"),
            dispute_resolution: DisputeResolution::from_value(&sub("dispute_resolution")),
            special_clauses: object_vec(value, "special_clauses", SpecialClause::from_value),
            risks: object_vec(value, "risks", Risk::from_value),
            compliance_requirements: string_vec(value, "compliance_requirements"),
            amendments: opt_string(value, "amendments"),
            notices: opt_string(value, "notices"),
            missing_elements: string_vec(value, "missing_elements"),
            red_flags: string_vec(value, "red_flags"),
            text_analysis: string_or_empty(value, "text_analysis"),
        }
    }
}
