use std::fmt::Write;

use client::SubmissionState;

pub fn render_outcome(state: &SubmissionState) -> String {
    let mut out = String::new();

    match state {
        SubmissionState::Succeeded(result) => {
            let name = result.food_name.as_deref().unwrap_or("Unknown food");
            let _ = writeln!(out, "Food: {}", name);
            if let Some(message) = &result.message {
                let _ = writeln!(out, "{}", message);
            }
            let _ = writeln!(out, "Nutrition:");
            for (nutrient, value) in result.nutrition.rows() {
                let _ = writeln!(
                    out,
                    "  {:<15} {}",
                    nutrient.to_string(),
                    nutrient.format_value(value)
                );
            }
        }
        SubmissionState::Failed(err) => {
            let _ = writeln!(out, "Error: {}", err.user_message());
        }
        SubmissionState::Submitting => out.push_str("Recognizing...\n"),
        SubmissionState::Idle => {}
    }

    out
}
