//! Maps a `ContractAnalysis` into grouped view sections.
//!
//! The grouping mirrors the analyzer dashboard tabs: overview, parties,
//! obligations, dates, payment, risks and the narrative analysis. The typed
//! model already guarantees the defaulting invariant, so a field-sparse
//! record renders as sections with zero items, never as an error.

use crate::analysis::ContractAnalysis;
use serde::Serialize;

/// A single labeled entry inside a section.
#[derive(Debug, Clone, Serialize)]
pub struct ViewItem {
    pub label: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ViewItem {
    fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            badge: None,
            detail: None,
        }
    }

    fn with_badge(mut self, badge: impl Into<String>) -> Self {
        self.badge = Some(badge.into());
        self
    }

    fn with_detail(mut self, detail: Option<String>) -> Self {
        self.detail = detail;
        self
    }
}

/// One dashboard section.
#[derive(Debug, Clone, Serialize)]
pub struct ViewSection {
    pub id: String,
    pub title: String,
    pub items: Vec<ViewItem>,
}

/// The grouped, render-ready form of an analysis.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisView {
    pub sections: Vec<ViewSection>,
}

fn section(id: &str, title: &str, items: Vec<ViewItem>) -> ViewSection {
    ViewSection {
        id: id.to_string(),
        title: title.to_string(),
        items,
    }
}

fn push_scalar(items: &mut Vec<ViewItem>, label: &str, value: &Option<String>) {
    if let Some(v) = value {
        items.push(ViewItem::new(label, v.clone()));
    }
}

/// Build the grouped dashboard view for one analysis.
pub fn build_view(analysis: &ContractAnalysis) -> AnalysisView {
    let mut overview = Vec::new();
    if !analysis.contract_type.is_empty() {
        overview.push(ViewItem::new("Contract Type", analysis.contract_type.clone()));
    }
    push_scalar(&mut overview, "Duration", &analysis.duration);
    push_scalar(&mut overview, "Effective Date", &analysis.effective_date);
    push_scalar(&mut overview, "Scope of Work", &analysis.key_terms.scope_of_work);
    push_scalar(&mut overview, "Territory", &analysis.key_terms.territory);
    for deliverable in &analysis.key_terms.deliverables {
        overview.push(ViewItem::new("Deliverable", deliverable.clone()));
    }
    for flag in &analysis.red_flags {
        overview.push(ViewItem::new("Red Flag", flag.clone()).with_badge("red-flag"));
    }
    for missing in &analysis.missing_elements {
        overview.push(ViewItem::new("Missing Element", missing.clone()).with_badge("missing"));
    }

    let mut parties = Vec::new();
    for party in &analysis.parties {
        parties.push(
            ViewItem::new(party.name.clone(), party.role.clone())
                .with_detail(party.contact_info.clone()),
        );
    }
    for clause in &analysis.special_clauses {
        parties.push(
            ViewItem::new(clause.title.clone(), clause.description.clone())
                .with_badge("special-clause"),
        );
    }

    let mut obligations = Vec::new();
    for (party, duties) in &analysis.obligations {
        for duty in duties {
            obligations.push(ViewItem::new(party.clone(), duty.clone()));
        }
    }

    let mut dates = Vec::new();
    for date in &analysis.important_dates {
        dates.push(
            ViewItem::new(date.date.clone(), date.description.clone())
                .with_badge(date.kind.clone()),
        );
    }
    for clause in &analysis.termination_clauses {
        dates.push(
            ViewItem::new("Termination", clause.kind.clone())
                .with_badge("termination")
                .with_detail(clause.notice_period.clone().or_else(|| clause.conditions.clone())),
        );
    }
    push_scalar(&mut dates, "Renewal Terms", &analysis.renewal_terms);

    let mut payment = Vec::new();
    push_scalar(&mut payment, "Amount", &analysis.payment_terms.amount);
    push_scalar(&mut payment, "Currency", &analysis.payment_terms.currency);
    push_scalar(&mut payment, "Schedule", &analysis.payment_terms.schedule);
    push_scalar(&mut payment, "Method", &analysis.payment_terms.method);
    push_scalar(&mut payment, "Invoicing", &analysis.payment_terms.invoicing);
    push_scalar(&mut payment, "Penalties", &analysis.payment_terms.penalties);
    push_scalar(&mut payment, "Expenses", &analysis.payment_terms.expenses);

    let mut risks = Vec::new();
    for risk in &analysis.risks {
        risks.push(
            ViewItem::new(risk.category.clone(), risk.description.clone())
                .with_badge(risk.severity.clone())
                .with_detail(risk.mitigation.clone()),
        );
    }
    for requirement in &analysis.compliance_requirements {
        risks.push(ViewItem::new("Compliance", requirement.clone()).with_badge("compliance"));
    }

    let mut narrative = Vec::new();
    if !analysis.text_analysis.is_empty() {
        narrative.push(ViewItem::new("Analysis", analysis.text_analysis.clone()));
    }

    AnalysisView {
        sections: vec![
            section("overview", "Overview", overview),
            section("parties", "Parties & Terms", parties),
            section("obligations", "Obligations", obligations),
            section("dates", "Important Dates", dates),
            section("payment", "Payment", payment),
            section("risks", "Risks & Issues", risks),
            section("analysis", "Analysis", narrative),
        ],
    }
}
