//! Patient report composition
//!
//! Pure templating with no I/O: the same inputs and composition date always
//! produce the same message, so everything here is unit-testable without a
//! transport. Variables use {{name}} syntax.

use crate::domain::{AttachmentDescriptor, OutboundMessage};
use chrono::NaiveDate;

/// Salutation used when no patient name is available
const DEFAULT_PATIENT_NAME: &str = "Patient";

const REPORT_BODY_TEMPLATE: &str = "\
Dear {{patient_name}},

We are sending you your personalized Health Risk Assessment Report based on your recent medical evaluation.

Your detailed report is attached to this email as a PDF document. Please review it carefully and discuss the findings with your healthcare provider.

Important Next Steps:
1. Schedule an appointment with your primary care physician
2. Review your current medications with your pharmacist
3. Implement the lifestyle changes recommended in the report
4. Monitor your symptoms and report any changes

If you have any questions or concerns, please contact your healthcare provider immediately.

Best regards,
Your Healthcare Team

---
This is an automated message. Please do not reply to this email.
For medical emergencies, call 911 or your local emergency number.";

/// Subject line for a patient risk assessment report
pub fn report_subject(patient_id: &str) -> String {
    format!(
        "Your Health Risk Assessment Report - Patient ID: {}",
        patient_id
    )
}

/// Fixed multi-paragraph report body, addressed to the patient by name
pub fn report_body(patient_name: Option<&str>) -> String {
    let name = match patient_name {
        Some(name) if !name.is_empty() => name,
        _ => DEFAULT_PATIENT_NAME,
    };
    REPORT_BODY_TEMPLATE.replace("{{patient_name}}", name)
}

/// Attachment display name: `patient_risk_assessment_{id}_{YYYY-MM-DD}.pdf`
pub fn report_attachment_name(patient_id: &str, date: NaiveDate) -> String {
    format!(
        "patient_risk_assessment_{}_{}.pdf",
        patient_id,
        date.format("%Y-%m-%d")
    )
}

/// Assemble the full report message for one recipient
pub fn patient_report(
    recipient: &str,
    patient_name: Option<&str>,
    patient_id: &str,
    attachment: AttachmentDescriptor,
) -> OutboundMessage {
    OutboundMessage::new(
        recipient,
        report_subject(patient_id),
        report_body(patient_name),
        attachment,
    )
}
