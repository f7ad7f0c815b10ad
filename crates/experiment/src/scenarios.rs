//! The scenario battery every version is evaluated against.

use anyhow::{bail, Context, Result};
use std::{fs, path::Path};

/// Built-in Thai emergency reports, in evaluation order.
pub const EMERGENCY_SCENARIOS: [&str; 6] = [
    "มีอุบัติเหตุรถชนกันใกล้ BTS อโศก มีคนเจ็บ ต้องการคำแนะนำด่วน",
    "ตึกถล่มที่สีลม ช่วยด้วย มีคนติดอยู่ข้างใน",
    "พบคนหมดสติ ไม่หายใจ แถวสยามสแควร์ ต้องทำยังไง",
    "ไฟไหม้บ้านที่คลองเตย มีควันเยอะมาก",
    "มีคนชักอยู่ในรถที่จอดอยู่ริมถนน",
    "มีคนอาหารติดคออยู่ใกล้ฉัน",
];

/// `scenario_01`, `scenario_02`, ...
pub fn scenario_id(index: usize) -> String {
    format!("scenario_{:02}", index + 1)
}

/// Loads scenarios from a JSON array of strings, or the built-in battery.
pub fn load_scenarios(path: Option<&Path>) -> Result<Vec<String>> {
    let Some(path) = path else {
        return Ok(EMERGENCY_SCENARIOS.iter().map(|s| s.to_string()).collect());
    };

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read scenarios from '{}'", path.display()))?;
    let scenarios: Vec<String> = serde_json::from_str(&content)
        .with_context(|| format!("'{}' is not a JSON array of strings", path.display()))?;

    if scenarios.is_empty() {
        bail!("'{}' contains no scenarios", path.display());
    }
    if let Some(i) = scenarios.iter().position(|s| s.trim().is_empty()) {
        bail!("{} in '{}' is blank", scenario_id(i), path.display());
    }
    Ok(scenarios)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_ids_are_zero_padded() {
        assert_eq!(scenario_id(0), "scenario_01");
        assert_eq!(scenario_id(11), "scenario_12");
    }

    #[test]
    fn test_builtin_battery() {
        let scenarios = load_scenarios(None).unwrap();
        assert_eq!(scenarios.len(), 6);
        assert!(scenarios[5].contains("อาหารติดคอ"));
    }
}
