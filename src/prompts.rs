//! Prompt templates for the idea model, loaded from `data/prompts/`.

use crate::models::FourPillarChart;

pub const IDEAS_SYSTEM: &str = include_str!("../data/prompts/ideas_system.txt");
pub const IDEAS_USER: &str = include_str!("../data/prompts/ideas_user.txt");

/// Replace `{{key}}` placeholders in a template string.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        result = result.replace(&format!("{{{{{}}}}}", key), value);
    }
    result
}

/// User prompt asking for painting ideas keyed to the four pillars.
pub fn ideas_user(chart: &FourPillarChart) -> String {
    let [year, month, day, hour] = chart.pillars();
    render(
        IDEAS_USER,
        &[("year", year), ("month", month), ("day", day), ("hour", hour)],
    )
}
