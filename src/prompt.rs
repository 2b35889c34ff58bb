//! Prompt construction for the contract analysis model call.
//!
//! Pure string building: the extracted contract text is truncated to a fixed
//! cap and interpolated into an instruction template that names the target
//! schema field by field and demands raw JSON output.

/// Maximum number of characters of contract text embedded in the prompt.
pub const MAX_CONTRACT_CHARS: usize = 12_000;

/// Schema-and-instructions template. `{contract_text}` is the only slot.
const ANALYSIS_TEMPLATE: &str = r###"
You are an advanced contract analysis AI capable of analyzing any type of contract including employment agreements, service contracts, NDAs, leases, purchase agreements, partnership agreements, licensing contracts, and more.

Analyze the following contract document and return ONLY a valid JSON object with no additional text, code blocks, or formatting.

The JSON must have exactly this structure:
{
    "contract_type": "Specific type of contract (e.g., Employment Agreement, Service Contract, NDA, Lease, etc.)",
    "parties": [
        {
            "name": "Party name",
            "role": "Their role (e.g., Employer, Service Provider, Landlord, Buyer, etc.)",
            "contact_info": "Contact details if available or null"
        }
    ],
    "effective_date": "Contract start date (YYYY-MM-DD or as stated) or null",
    "duration": "Contract duration or term or null",
    "key_terms": {
        "scope_of_work": "Description of services, products, or subject matter or null",
        "deliverables": ["List of deliverables or obligations if applicable"],
        "territory": "Geographical scope or jurisdiction or null"
    },
    "obligations": {
        "party_name_1": ["obligation1", "obligation2"],
        "party_name_2": ["obligation1", "obligation2"]
    },
    "payment_terms": {
        "amount": "Total amount, rate, or compensation structure or null",
        "currency": "Currency if specified or null",
        "schedule": "Payment frequency and timing or null",
        "method": "Accepted payment methods or null",
        "invoicing": "Invoicing requirements or null",
        "penalties": "Late payment penalties or interest or null",
        "expenses": "Reimbursable expenses if any or null"
    },
    "important_dates": [
        {
            "date": "YYYY-MM-DD or description",
            "description": "Event description",
            "type": "milestone/deadline/renewal/termination"
        }
    ],
    "termination_clauses": [
        {
            "type": "termination type (e.g., for cause, convenience, mutual)",
            "notice_period": "Required notice period or null",
            "conditions": "Conditions for termination"
        }
    ],
    "renewal_terms": "Auto-renewal clause or renewal process if applicable or null",
    "confidentiality": {
        "applies": true or false,
        "duration": "Duration of confidentiality obligation or null",
        "scope": "What information is protected or null"
    },
    "intellectual_property": {
        "ownership": "Who owns IP created under contract or null",
        "licenses": "Any licenses granted or null",
        "restrictions": "Usage restrictions or null"
    },
    "liability_and_indemnification": {
        "liability_cap": "Limitation of liability amount or terms or null",
        "indemnification": "Indemnification obligations or null",
        "insurance": "Required insurance coverage or null"
    },
    "warranties_and_representations": ["warranty1", "warranty2"],
    "dispute_resolution": {
        "method": "Arbitration, mediation, litigation or null",
        "jurisdiction": "Governing law and venue or null",
        "governing_law": "Applicable laws or null"
    },
    "special_clauses": [
        {
            "title": "Clause name",
            "description": "Brief description of unique or important clauses"
        }
    ],
    "risks": [
        {
            "category": "financial/legal/operational/reputational",
            "description": "Risk description",
            "severity": "high/medium/low",
            "mitigation": "Suggested mitigation if any or null"
        }
    ],
    "compliance_requirements": ["Any regulatory or compliance obligations"],
    "amendments": "Process for contract amendments or null",
    "notices": "How notices must be delivered between parties or null",
    "missing_elements": ["List any critical elements that seem to be missing"],
    "red_flags": ["Any concerning terms or unusual provisions"],
    "text_analysis": "## Contract Analysis Summary\n\n### Contract Overview\n**Type:** [Contract Type]\n**Parties:** [List parties]\n\n### Key Findings\n[Comprehensive analysis with proper markdown]\n\n### Strengths\n- [Positive aspects]\n\n### Concerns\n- [Issues or risks]\n\n### Recommendations\n- [Actionable advice]\n\n### Summary\n[Final assessment and overall recommendation]"
}

Contract Content:
"""{contract_text}"""

CRITICAL INSTRUCTIONS:
1. Return ONLY raw JSON - no markdown, no code blocks, no json wrapper
2. Start your response with { and end with }
3. Adapt the analysis to the specific contract type - not all fields will apply to every contract
4. If a field does not apply to this contract type, use null or an empty array/object as appropriate
5. Extract all dates in YYYY-MM-DD format when possible
6. Identify the contract type accurately (employment, service, NDA, lease, sale, partnership, etc.)
7. Flag any missing critical information for that contract type
8. Highlight unusual, concerning, or non-standard provisions

Return only the JSON object - nothing before or after it.
"###;

/// Build the full analysis prompt for one contract.
///
/// The extracted text is truncated to [`MAX_CONTRACT_CHARS`] characters with
/// no smart truncation or summarization.
pub fn build_analysis_prompt(contract_text: &str) -> String {
    let truncated: String = contract_text.chars().take(MAX_CONTRACT_CHARS).collect();
    ANALYSIS_TEMPLATE.replace("{contract_text}", &truncated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_contract_text() {
        let prompt = build_analysis_prompt("THE PARTIES AGREE AS FOLLOWS");
        assert!(prompt.contains("THE PARTIES AGREE AS FOLLOWS"));
        assert!(prompt.contains("Return ONLY raw JSON"));
        assert!(prompt.contains("\"contract_type\""));
    }

    #[test]
    fn test_prompt_truncates_long_text() {
        // The template itself contains 'a' characters, so compare against an
        // empty-text baseline
        let baseline = build_analysis_prompt("").chars().filter(|c| *c == 'a').count();
        let long_text = "a".repeat(MAX_CONTRACT_CHARS + 5_000);
        let prompt = build_analysis_prompt(&long_text);
        let embedded_len = prompt.chars().filter(|c| *c == 'a').count() - baseline;
        assert_eq!(embedded_len, MAX_CONTRACT_CHARS);
    }

    #[test]
    fn test_truncation_respects_utf8_boundaries() {
        // Multi-byte characters must not be split mid-codepoint
        let long_text = "é".repeat(MAX_CONTRACT_CHARS + 100);
        let prompt = build_analysis_prompt(&long_text);
        assert!(prompt.contains('é'));
    }

    #[test]
    fn test_deterministic_output() {
        let a = build_analysis_prompt("same input");
        let b = build_analysis_prompt("same input");
        assert_eq!(a, b);
    }
}
