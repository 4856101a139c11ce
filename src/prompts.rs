//! Prompt text for the two text-generation stages.
//!
//! The output is phishing-awareness training material: every organisation it
//! names must be invented, and the callback number comes from configuration.

pub const DETAILS_PROMPT: &str = "\
You are helping a security awareness team build a voice-phishing training exercise.
Invent an entirely fictional IT support department with the following details:
- Company name (invented; must not match or resemble any real company or brand)
- Security operations center location
- Department phone number (fictional but properly formatted)
- IT support ticket reference number (fictional but properly formatted)

Format as plain text, one detail per line.";

/// Builds the script prompt from approved department details.
pub fn script_prompt(details: &str, callback_number: &str) -> String {
    format!(
        "Write a training voicemail script for a voice-phishing awareness exercise, \
using this fictional company:
{details}

The script should:
- Be 30-45 seconds long
- Sound professional and authoritative
- Mention detecting suspicious login activity \"just minutes ago\"
- Express urgency about potential account compromise
- Use this exact callback number: {callback_number}
- Request a callback to verify identity and prevent account lockout
- Include a reference/ticket number
- End with clear urgency to call back

Format as a simple reading script without any dialog markers, brackets, or annotations.
Keep the tone professional but convey urgency."
    )
}
